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

use super::{capitalize, BuildContext, SELECTION_PARAM};
use crate::error::SpecResult;
use crate::options::{PointMark, Role};
use crate::spec::{Channel, Encoding, Mark, MarkType, Param, VegaLiteSpec};

/// Two continuous fields against each other. With `color`, clicking a
/// legend entry dims every other category and draws the chosen one on top.
pub fn scatter(
    ctx: &BuildContext<'_>,
    x: &str,
    y: &str,
    color: Option<&str>,
    mark: PointMark,
) -> SpecResult<VegaLiteSpec> {
    let x = ctx.column(Role::X, x)?;
    let y = ctx.column(Role::Y, y)?;
    let color = color.map(|c| ctx.column(Role::Color, c)).transpose()?;
    let kind = match mark {
        PointMark::Point => MarkType::Point,
        PointMark::Circle => MarkType::Circle,
    };
    let mut encoding = Encoding {
        x: Some(Channel::field(x).quantitative().title(capitalize(x))),
        y: Some(Channel::field(y).quantitative().title(capitalize(y))),
        ..Encoding::default()
    };
    let mut spec = ctx.base().mark(Mark::with_tooltip(kind));
    if let Some(color) = color {
        encoding.color = Some(Channel::field(color).nominal().title(capitalize(color)));
        encoding.opacity = Some(Channel::selected(SELECTION_PARAM, 1.0, 0.1));
        encoding.order = Some(Channel::field(color).when_selected(SELECTION_PARAM, 1.0, 0.0));
        spec = spec.param(Param::legend_selection(SELECTION_PARAM, color));
    }
    Ok(spec.encoding(encoding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures;
    use serde_json::json;

    #[test]
    fn scatter_without_color_has_no_selection() {
        let schema = fixtures::titanic();
        let value = scatter(&BuildContext::new(&schema), "fare", "age", None, PointMark::Circle)
            .unwrap()
            .to_value()
            .unwrap();
        assert_eq!(value["mark"], json!({"type": "circle", "tooltip": true}));
        assert!(value.get("params").is_none());
        assert_eq!(value["encoding"]["x"]["title"], "Fare");
    }

    #[test]
    fn scatter_color_binds_legend() {
        let schema = fixtures::titanic();
        let value = scatter(&BuildContext::new(&schema), "fare", "age", Some("embarked"), PointMark::Point)
            .unwrap()
            .to_value()
            .unwrap();
        assert_eq!(value["params"][0]["bind"], "legend");
        assert_eq!(value["encoding"]["opacity"]["condition"]["value"], 1.0);
        assert_eq!(value["encoding"]["order"]["field"], "embarked");
        assert_eq!(value["encoding"]["color"]["title"], "Embarked");
    }
}
