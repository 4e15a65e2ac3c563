// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use super::{capitalize, BuildContext, PERCENT_FORMAT, ROTATED_LABEL_ANGLE, SELECTION_PARAM};
use crate::error::SpecResult;
use crate::options::{check_bins, Aggregation, HistogramOptions, Role};
use crate::spec::{
    AggregateField, Axis, Bin, Blend, Channel, Encoding, FieldType, Mark, MarkType, Param,
    Stack, Transform, VegaLiteSpec,
};

pub const BIN_FIELD: &str = "bin_col_x";
pub const BIN_END_FIELD: &str = "bin_col_x_end";
pub const COUNT_FIELD: &str = "xCount";
pub const TOTAL_FIELD: &str = "TotalCount";
pub const SHARE_FIELD: &str = "PercentOfTotal";

const LAYER_SELECTED_OPACITY: f64 = 0.8;
const LAYER_OPACITY: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Single,
    Stacked,
    Layered,
}

/// Bin `x`, count rows per bin, then divide each count by the total.
pub fn share_pipeline(x: &str, bins: u32) -> Vec<Transform> {
    vec![
        Transform::bin(Bin::maxbins(bins), x, BIN_FIELD),
        Transform::aggregate(vec![AggregateField::count(COUNT_FIELD)], &[BIN_FIELD, BIN_END_FIELD]),
        Transform::join_aggregate(
            vec![AggregateField::of(Aggregation::Sum, COUNT_FIELD, TOTAL_FIELD)],
            &[],
        ),
        Transform::ratio(COUNT_FIELD, TOTAL_FIELD, SHARE_FIELD),
    ]
}

/// Single-series histogram. With `normalize` the bars show each bin's
/// share of all rows instead of a raw count.
pub fn simple_histogram(
    ctx: &BuildContext<'_>,
    x: &str,
    options: &HistogramOptions,
) -> SpecResult<VegaLiteSpec> {
    options.validate()?;
    let x = ctx.column(Role::X, x)?;
    Ok(histogram(ctx, x, None, options, Layout::Single))
}

/// Per-category bars stacked on each other. `normalize` stacks to 100%.
pub fn stacked_histogram(
    ctx: &BuildContext<'_>,
    x: &str,
    color: &str,
    options: &HistogramOptions,
) -> SpecResult<VegaLiteSpec> {
    check_bins("bins", options.bins)?;
    let x = ctx.column(Role::X, x)?;
    let color = ctx.column(Role::Color, color)?;
    Ok(histogram(ctx, x, Some(color), options, Layout::Stacked))
}

/// Per-category bars drawn over each other; clicking a legend entry
/// brings that category forward.
pub fn layered_histogram(
    ctx: &BuildContext<'_>,
    x: &str,
    color: &str,
    options: &HistogramOptions,
) -> SpecResult<VegaLiteSpec> {
    check_bins("bins", options.bins)?;
    let x = ctx.column(Role::X, x)?;
    let color = ctx.column(Role::Color, color)?;
    Ok(histogram(ctx, x, Some(color), options, Layout::Layered))
}

/// Stacked or layered per `options.layered`.
pub fn color_histogram(
    ctx: &BuildContext<'_>,
    x: &str,
    color: &str,
    options: &HistogramOptions,
) -> SpecResult<VegaLiteSpec> {
    if options.layered {
        layered_histogram(ctx, x, color, options)
    } else {
        stacked_histogram(ctx, x, color, options)
    }
}

fn histogram(
    ctx: &BuildContext<'_>,
    x: &str,
    color: Option<&str>,
    options: &HistogramOptions,
    layout: Layout,
) -> VegaLiteSpec {
    let share = options.normalize && layout == Layout::Single;
    let label_angle = if options.ordinal { ROTATED_LABEL_ANGLE } else { 0 };
    let x_channel = if share {
        Channel::field(BIN_FIELD).bin(Bin::prebinned(options.bins))
    } else {
        Channel::field(x).bin(Bin::maxbins(options.bins))
    };
    let x_channel = x_channel
        .typed(if options.ordinal {
            FieldType::Ordinal
        } else {
            FieldType::Quantitative
        })
        .axis(Axis::label_angle(label_angle))
        .title(capitalize(x));

    let y_channel = match layout {
        Layout::Single if share => Channel::field(SHARE_FIELD)
            .quantitative()
            .title("Relative Frequency")
            .stack(Stack::Zero)
            .axis(Axis::format(PERCENT_FORMAT)),
        Layout::Stacked if options.normalize => Channel::aggregate_only(Aggregation::Count)
            .quantitative()
            .title("Relative Frequency")
            .stack(Stack::Normalize)
            .axis(Axis::format(PERCENT_FORMAT)),
        Layout::Layered => Channel::aggregate_only(Aggregation::Count)
            .quantitative()
            .title("Count")
            .stack(Stack::Disabled),
        _ => Channel::aggregate_only(Aggregation::Count)
            .quantitative()
            .title("Count")
            .stack(Stack::Zero),
    };

    let mut encoding = Encoding {
        x: Some(x_channel),
        y: Some(y_channel),
        x2: share.then(|| Channel::field(BIN_END_FIELD)),
        color: color.map(|c| Channel::field(c).nominal()),
        ..Encoding::default()
    };
    let mut spec = ctx.base().mark(
        Mark::styled(MarkType::Bar)
            .blend(Blend::Normal)
            .bin_spacing(0),
    );
    if share {
        spec = spec.transforms(share_pipeline(x, options.bins));
    }
    if let (Layout::Layered, Some(color)) = (layout, color) {
        encoding.opacity = Some(Channel::selected(
            SELECTION_PARAM,
            LAYER_SELECTED_OPACITY,
            LAYER_OPACITY,
        ));
        encoding.order = Some(Channel::field(color).when_selected(SELECTION_PARAM, 1.0, 0.0));
        spec = spec.param(Param::legend_selection(SELECTION_PARAM, color));
    }
    spec.encoding(encoding)
}
