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

use super::BuildContext;
use crate::error::SpecResult;
use crate::options::{Aggregation, Role};
use crate::spec::{Bin, Channel, Encoding, Mark, MarkType, VegaLiteSpec};

/// Mean of `y` over binned `x`. A datetime `x` goes on a temporal axis
/// instead of being binned.
pub fn line(
    ctx: &BuildContext<'_>,
    x: &str,
    y: &str,
    color: Option<&str>,
) -> SpecResult<VegaLiteSpec> {
    let x = ctx.column(Role::X, x)?;
    let y = ctx.column(Role::Y, y)?;
    let color = color.map(|c| ctx.column(Role::Color, c)).transpose()?;
    let x_channel = if ctx.is_datetime(x) {
        Channel::field(x).temporal()
    } else {
        Channel::field(x).quantitative().bin(Bin::Enabled(true))
    };
    let y_channel = if ctx.is_datetime(y) {
        Channel::field(y).temporal()
    } else {
        Channel::field(y).quantitative()
    };
    Ok(ctx
        .base()
        .mark(Mark::with_tooltip(MarkType::Line).point_overlay())
        .encoding(Encoding {
            x: Some(x_channel),
            y: Some(y_channel.aggregate(Aggregation::Mean)),
            color: color.map(|c| Channel::field(c).nominal()),
            ..Encoding::default()
        }))
}
