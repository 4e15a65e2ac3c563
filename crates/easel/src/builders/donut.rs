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

use super::{capitalize, BuildContext, PERCENT_FORMAT};
use crate::error::SpecResult;
use crate::options::{Aggregation, Role};
use crate::spec::{
    AggregateField, Channel, Encoding, Layer, Mark, MarkType, Resolve, SortOrder, Transform,
    VegaLiteSpec,
};

pub const TOTAL_FIELD: &str = "total";
pub const GROUP_COUNT_FIELD: &str = "groupcount";
pub const SHARE_FIELD: &str = "share";

pub const SIMPLE_INNER_RADIUS: u32 = 100;
pub const INNER_RING: (u32, u32) = (75, 150);
pub const OUTER_RING: (u32, u32) = (125, 175);

/// Drop rows without a category, then derive each category's share of
/// the remaining rows.
pub fn share_pipeline(category: &str) -> Vec<Transform> {
    vec![
        Transform::valid(category),
        Transform::window_total(vec![AggregateField::count(TOTAL_FIELD)]),
        Transform::join_aggregate(vec![AggregateField::count(GROUP_COUNT_FIELD)], &[category]),
        Transform::ratio(GROUP_COUNT_FIELD, TOTAL_FIELD, SHARE_FIELD),
    ]
}

// Slice angle comes from the count; share only orders the slices.
fn ring_encoding(category: &str) -> Encoding {
    Encoding {
        theta: Some(
            Channel::aggregate_only(Aggregation::Count)
                .quantitative()
                .title("Count"),
        ),
        color: Some(
            Channel::field(category)
                .nominal()
                .title(capitalize(category)),
        ),
        order: Some(
            Channel::field(SHARE_FIELD)
                .quantitative()
                .sort(SortOrder::Descending)
                .title("Share [%]")
                .format(PERCENT_FORMAT),
        ),
        ..Encoding::default()
    }
}

pub fn simple_donut(ctx: &BuildContext<'_>, color: &str) -> SpecResult<VegaLiteSpec> {
    let color = ctx.column(Role::Color, color)?;
    Ok(ctx
        .base()
        .mark(Mark::styled(MarkType::Arc).radii(SIMPLE_INNER_RADIUS, None))
        .transforms(share_pipeline(color))
        .encoding(ring_encoding(color)))
}

/// Two concentric rings sharing a center, one per categorical field,
/// each with its own color scale.
pub fn two_ring_donut(
    ctx: &BuildContext<'_>,
    inner: &str,
    outer: &str,
) -> SpecResult<VegaLiteSpec> {
    let inner = ctx.column(Role::Color, inner)?;
    let outer = ctx.column(Role::SecondColor, outer)?;
    let ring = |category: &str, (inner_radius, outer_radius): (u32, u32)| Layer {
        mark: Mark::styled(MarkType::Arc).radii(inner_radius, Some(outer_radius)),
        transform: share_pipeline(category),
        encoding: ring_encoding(category),
    };
    Ok(ctx
        .base()
        .layer(ring(inner, INNER_RING))
        .layer(ring(outer, OUTER_RING))
        .resolve(Resolve::independent_color()))
}
