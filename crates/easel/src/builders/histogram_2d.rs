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

use super::{capitalize, BuildContext};
use crate::error::SpecResult;
use crate::options::{Aggregation, DensityMark, Histogram2dOptions, Role};
use crate::spec::{
    Bin, Channel, Config, Encoding, FieldType, Mark, MarkType, VegaLiteSpec, ViewStroke,
};

/// Row counts over a grid of `x` bins by `y` bins. Circles grow with the
/// count; rects are additionally colored by it.
///
/// A categorical `y` is placed on an ordinal axis as is, without binning.
pub fn density_histogram(
    ctx: &BuildContext<'_>,
    x: &str,
    y: &str,
    options: &Histogram2dOptions,
) -> SpecResult<VegaLiteSpec> {
    options.validate()?;
    let x = ctx.column(Role::X, x)?;
    let y = ctx.column(Role::Y, y)?;
    let axis_type = if options.ordinal {
        FieldType::Ordinal
    } else {
        FieldType::Quantitative
    };
    let x_channel = Channel::field(x)
        .typed(axis_type)
        .bin(Bin::maxbins(options.bins_x))
        .title(capitalize(x));
    let y_channel = if ctx.is_categorical(y) {
        Channel::field(y).ordinal().title(capitalize(y))
    } else {
        Channel::field(y)
            .typed(axis_type)
            .bin(Bin::maxbins(options.bins_y))
            .title(capitalize(y))
    };
    let count = || Channel::aggregate_only(Aggregation::Count);
    let (mark, color, config) = match options.mark {
        DensityMark::Circle => (MarkType::Circle, None, Config::borderless()),
        DensityMark::Rect => (
            MarkType::Rect,
            Some(count()),
            Config::with_stroke(ViewStroke::Transparent),
        ),
    };
    Ok(ctx
        .base()
        .mark(Mark::styled(mark))
        .encoding(Encoding {
            x: Some(x_channel),
            y: Some(y_channel),
            size: Some(count()),
            color,
            ..Encoding::default()
        })
        .config(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures;
    use serde_json::json;

    fn options(mark: DensityMark) -> Histogram2dOptions {
        Histogram2dOptions {
            mark,
            bins_x: 12,
            bins_y: 8,
            ordinal: false,
        }
    }

    #[test]
    fn circle_sizes_by_count() {
        let schema = fixtures::titanic();
        let value = density_histogram(&BuildContext::new(&schema), "fare", "age", &options(DensityMark::Circle))
            .unwrap()
            .to_value()
            .unwrap();
        assert_eq!(value["mark"]["type"], "circle");
        assert_eq!(value["encoding"]["size"], json!({"aggregate": "count"}));
        assert!(value["encoding"].get("color").is_none());
        assert_eq!(value["encoding"]["x"]["bin"], json!({"maxbins": 12}));
        assert_eq!(value["encoding"]["y"]["bin"], json!({"maxbins": 8}));
        assert_eq!(value["encoding"]["y"]["title"], "Age");
        assert_eq!(value["config"], json!({"view": {"stroke": null}}));
    }

    #[test]
    fn rect_colors_by_count_without_outline() {
        let schema = fixtures::titanic();
        let value = density_histogram(&BuildContext::new(&schema), "fare", "age", &options(DensityMark::Rect))
            .unwrap()
            .to_value()
            .unwrap();
        assert_eq!(value["encoding"]["color"], json!({"aggregate": "count"}));
        assert_eq!(value["config"], json!({"view": {"stroke": "transparent"}}));
    }

    #[test]
    fn categorical_y_is_not_binned() {
        let schema = fixtures::titanic();
        let value = density_histogram(&BuildContext::new(&schema), "fare", "class", &options(DensityMark::Circle))
            .unwrap()
            .to_value()
            .unwrap();
        assert_eq!(
            value["encoding"]["y"],
            json!({"field": "class", "type": "ordinal", "title": "Class"})
        );
    }

    #[test]
    fn out_of_range_bins_rejected() {
        let schema = fixtures::titanic();
        let mut bad = options(DensityMark::Rect);
        bad.bins_y = 0;
        assert!(density_histogram(&BuildContext::new(&schema), "fare", "age", &bad).is_err());
    }
}
