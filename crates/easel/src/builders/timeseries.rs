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

use super::{label_angle, BuildContext};
use crate::error::SpecResult;
use crate::options::{Aggregation, Role, SeriesMark, TimeSeriesOptions};
use crate::spec::{Axis, Channel, Encoding, Mark, MarkType, VegaLiteSpec};

const VALUE_FORMAT: &str = ".2f";

fn series_mark(mark: SeriesMark) -> Mark {
    match mark {
        SeriesMark::Line => Mark::with_tooltip(MarkType::Line).point_overlay(),
        SeriesMark::Bar => Mark::styled(MarkType::Bar),
    }
}

/// Rows per time bucket. `options.aggregation` is ignored.
pub fn count_series(
    ctx: &BuildContext<'_>,
    x: &str,
    color: Option<&str>,
    options: &TimeSeriesOptions,
) -> SpecResult<VegaLiteSpec> {
    series(
        ctx,
        x,
        Channel::aggregate_only(Aggregation::Count).quantitative(),
        color,
        options,
    )
}

/// `y` aggregated per time bucket.
pub fn aggregated_series(
    ctx: &BuildContext<'_>,
    x: &str,
    y: &str,
    color: Option<&str>,
    options: &TimeSeriesOptions,
) -> SpecResult<VegaLiteSpec> {
    let y = ctx.column(Role::Y, y)?;
    series(
        ctx,
        x,
        Channel::field(y)
            .quantitative()
            .aggregate(options.aggregation)
            .axis(Axis::format(VALUE_FORMAT)),
        color,
        options,
    )
}

fn series(
    ctx: &BuildContext<'_>,
    x: &str,
    y: Channel,
    color: Option<&str>,
    options: &TimeSeriesOptions,
) -> SpecResult<VegaLiteSpec> {
    let x = ctx.column(Role::X, x)?;
    let color = color.map(|c| ctx.column(Role::Color, c)).transpose()?;
    Ok(ctx.base().mark(series_mark(options.mark)).encoding(Encoding {
        x: Some(
            Channel::field(x)
                .ordinal()
                .time_unit(options.unit)
                .axis(Axis::label_angle(label_angle(options.bucket_count))),
        ),
        y: Some(y),
        color: color.map(|c| Channel::field(c).nominal()),
        ..Encoding::default()
    }))
}
