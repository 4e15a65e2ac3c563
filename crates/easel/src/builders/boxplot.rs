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
use crate::options::{BoxplotOptions, Role};
use crate::spec::{Axis, Channel, Encoding, Mark, MarkType, Scale, VegaLiteSpec};

pub const BOX_SIZE: f64 = 30.0;

pub fn boxplot(
    ctx: &BuildContext<'_>,
    x: &str,
    y: &str,
    options: &BoxplotOptions,
) -> SpecResult<VegaLiteSpec> {
    let x = ctx.column(Role::X, x)?;
    let y = ctx.column(Role::Y, y)?;
    Ok(ctx
        .base()
        .mark(Mark::styled(MarkType::Boxplot).ticks())
        .encoding(Encoding {
            x: Some(
                Channel::field(x)
                    .ordinal()
                    .title(capitalize(x))
                    .axis(Axis::label_angle(0)),
            ),
            y: Some(
                Channel::field(y)
                    .quantitative()
                    .title(capitalize(y))
                    .scale(Scale {
                        zero: Some(options.zero),
                    }),
            ),
            color: options
                .recolor
                .then(|| Channel::field(x).nominal().title(capitalize(x))),
            size: Some(Channel::constant(BOX_SIZE)),
            ..Encoding::default()
        }))
}
