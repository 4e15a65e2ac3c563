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

use super::{BuildContext, PERCENT_FORMAT};
use crate::error::SpecResult;
use crate::options::{Aggregation, Role};
use crate::spec::{Axis, Channel, Encoding, Mark, MarkType, Stack, VegaLiteSpec};

fn category_axis(x: &str) -> Channel {
    Channel::field(x).ordinal().axis(Axis::label_angle(0))
}
fn color_channel(field: &str) -> Channel {
    Channel::field(field).nominal()
}
fn bar(ctx: &BuildContext<'_>, encoding: Encoding) -> VegaLiteSpec {
    ctx.base()
        .mark(Mark::styled(MarkType::Bar))
        .encoding(encoding)
}

/// Row count per category.
pub fn count_bar(ctx: &BuildContext<'_>, x: &str) -> SpecResult<VegaLiteSpec> {
    let x = ctx.column(Role::X, x)?;
    Ok(bar(
        ctx,
        Encoding {
            x: Some(category_axis(x)),
            y: Some(Channel::aggregate_only(Aggregation::Count).quantitative()),
            ..Encoding::default()
        },
    ))
}

/// One aggregated `y` value per category.
pub fn aggregated_bar(
    ctx: &BuildContext<'_>,
    x: &str,
    y: &str,
    aggregation: Aggregation,
) -> SpecResult<VegaLiteSpec> {
    let x = ctx.column(Role::X, x)?;
    let y = ctx.column(Role::Y, y)?;
    Ok(bar(
        ctx,
        Encoding {
            x: Some(category_axis(x)),
            y: Some(Channel::field(y).quantitative().aggregate(aggregation)),
            ..Encoding::default()
        },
    ))
}

/// Counts per category split by `color`; `normalize` rescales each bar
/// to 100%.
pub fn stacked_bar(
    ctx: &BuildContext<'_>,
    x: &str,
    color: &str,
    normalize: bool,
) -> SpecResult<VegaLiteSpec> {
    let x = ctx.column(Role::X, x)?;
    let color = ctx.column(Role::Color, color)?;
    let mut y = Channel::aggregate_only(Aggregation::Count).quantitative();
    if normalize {
        y = y
            .stack(Stack::Normalize)
            .format(PERCENT_FORMAT)
            .axis(Axis::format(PERCENT_FORMAT));
    }
    Ok(bar(
        ctx,
        Encoding {
            x: Some(category_axis(x)),
            y: Some(y),
            color: Some(color_channel(color)),
            ..Encoding::default()
        },
    ))
}

/// Side-by-side bars per `color` value within each category.
pub fn grouped_bar(
    ctx: &BuildContext<'_>,
    x: &str,
    y: &str,
    color: &str,
    aggregation: Aggregation,
) -> SpecResult<VegaLiteSpec> {
    let x = ctx.column(Role::X, x)?;
    let y = ctx.column(Role::Y, y)?;
    let color = ctx.column(Role::Color, color)?;
    Ok(bar(
        ctx,
        Encoding {
            x: Some(category_axis(x)),
            y: Some(Channel::field(y).quantitative().aggregate(aggregation)),
            color: Some(color_channel(color)),
            x_offset: Some(Channel::field(color)),
            ..Encoding::default()
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures;
    use serde_json::json;

    #[test]
    fn count_bar_has_no_color() {
        let schema = fixtures::titanic();
        let spec = count_bar(&BuildContext::new(&schema), "class").unwrap();
        let value = spec.to_value().unwrap();
        assert_eq!(value["mark"]["type"], "bar");
        assert_eq!(
            value["encoding"],
            json!({
                "x": {"field": "class", "type": "ordinal", "axis": {"labelAngle": 0}},
                "y": {"type": "quantitative", "aggregate": "count"}
            })
        );
        assert_eq!(value["width"], 600);
        assert_eq!(value["config"], json!({"view": {"stroke": null}}));
    }

    #[test]
    fn normalised_stack_uses_percent_format() {
        let schema = fixtures::titanic();
        let ctx = BuildContext::new(&schema);
        let plain = stacked_bar(&ctx, "class", "sex", false).unwrap().to_value().unwrap();
        assert!(plain["encoding"]["y"].get("stack").is_none());
        let normed = stacked_bar(&ctx, "class", "sex", true).unwrap().to_value().unwrap();
        assert_eq!(
            normed["encoding"]["y"],
            json!({
                "type": "quantitative",
                "aggregate": "count",
                "stack": "normalize",
                "axis": {"format": ".1%"},
                "format": ".1%"
            })
        );
        assert_eq!(normed["encoding"]["color"], json!({"field": "sex", "type": "nominal"}));
    }

    #[test]
    fn grouped_bar_offsets_by_color() {
        let schema = fixtures::titanic();
        let spec = grouped_bar(&BuildContext::new(&schema), "class", "fare", "sex", Aggregation::Mean)
            .unwrap()
            .to_value()
            .unwrap();
        assert_eq!(spec["encoding"]["xOffset"], json!({"field": "sex"}));
        assert_eq!(spec["encoding"]["y"]["aggregate"], "mean");
    }

    #[test]
    fn missing_column_is_rejected() {
        let schema = fixtures::titanic();
        assert!(aggregated_bar(&BuildContext::new(&schema), "class", "ghost", Aggregation::Max).is_err());
    }
}
