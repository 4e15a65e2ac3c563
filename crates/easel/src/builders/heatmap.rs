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
use crate::options::{HeatmapOptions, Role};
use crate::spec::{Channel, Config, Encoding, Mark, MarkType, VegaLiteSpec};

/// Pixel size of one heatmap cell.
pub const CELL_STEP: u32 = 13;

/// Calendar heatmap: `date` bucketed two ways, cells colored by the
/// aggregated `value`. Sized by cell step, not by the canvas.
pub fn series_heatmap(
    ctx: &BuildContext<'_>,
    date: &str,
    value: &str,
    options: &HeatmapOptions,
) -> SpecResult<VegaLiteSpec> {
    let date = ctx.column(Role::X, date)?;
    let value = ctx.column(Role::Y, value)?;
    Ok(VegaLiteSpec::new()
        .mark(Mark::styled(MarkType::Rect))
        .encoding(Encoding {
            x: Some(
                Channel::field(date)
                    .ordinal()
                    .time_unit(options.unit_x)
                    .title(capitalize(options.unit_x.as_str())),
            ),
            y: Some(
                Channel::field(date)
                    .ordinal()
                    .time_unit(options.unit_y)
                    .title(capitalize(options.unit_y.as_str())),
            ),
            color: Some(
                Channel::field(value)
                    .quantitative()
                    .aggregate(options.aggregation)
                    .title(capitalize(value)),
            ),
            ..Encoding::default()
        })
        .config(Config::cells(CELL_STEP)))
}
