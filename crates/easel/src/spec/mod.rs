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

//! Typed Vega-Lite specification tree.
//!
//! Specs are assembled once by a builder and then only read: every setter
//! consumes `self`, and nothing hands out `&mut`. Inline data is attached
//! by a render sink through [`VegaLiteSpec::with_values`], which returns a
//! new spec.

pub mod encoding;
pub mod mark;
pub mod transform;

pub use encoding::{
    Axis, Bin, BinParams, Channel, Condition, Encoding, FieldType, Scale, SortOrder, Stack,
};
pub use mark::{Blend, Mark, MarkType};
pub use transform::{AggregateField, Expr, Transform};

use serde::{Serialize, Serializer};

pub const SCHEMA_URL: &str = "https://vega.github.io/schema/vega-lite/v5.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineData {
    pub values: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSelection {
    #[serde(rename = "type")]
    kind: &'static str,
    fields: Vec<String>,
}

/// Interaction parameter. The only one the dashboard uses is a point
/// selection over one field, bound to the legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    name: String,
    select: PointSelection,
    bind: &'static str,
}
impl Param {
    pub fn legend_selection(name: &str, field: &str) -> Self {
        Self {
            name: name.to_string(),
            select: PointSelection {
                kind: "point",
                fields: vec![field.to_string()],
            },
            bind: "legend",
        }
    }
}

/// Outline of the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStroke {
    /// `null`: no outline.
    Hidden,
    Transparent,
}
impl Serialize for ViewStroke {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ViewStroke::Hidden => serializer.serialize_none(),
            ViewStroke::Transparent => serializer.serialize_str("transparent"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<ViewStroke>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AxisConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis: Option<AxisConfig>,
}
impl Config {
    /// Borderless plot area, the default for every chart.
    pub fn borderless() -> Self {
        Self::with_stroke(ViewStroke::Hidden)
    }
    pub fn with_stroke(stroke: ViewStroke) -> Self {
        Self {
            view: Some(ViewConfig {
                stroke: Some(stroke),
                ..ViewConfig::default()
            }),
            axis: None,
        }
    }
    /// Fixed-size cells with a grid and no axis domain line.
    pub fn cells(step: u32) -> Self {
        Self {
            view: Some(ViewConfig {
                stroke: None,
                stroke_width: Some(0),
                step: Some(step),
            }),
            axis: Some(AxisConfig {
                grid: Some(true),
                domain: Some(false),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveMode {
    Independent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleResolve {
    pub color: ResolveMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolve {
    pub scale: ScaleResolve,
}
impl Resolve {
    pub fn independent_color() -> Self {
        Self {
            scale: ScaleResolve {
                color: ResolveMode::Independent,
            },
        }
    }
}

/// One sub-chart of a layered spec.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub mark: Mark,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transform: Vec<Transform>,
    pub encoding: Encoding,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VegaLiteSpec {
    #[serde(rename = "$schema")]
    schema: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mark: Option<Mark>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    params: Vec<Param>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    transform: Vec<Transform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    encoding: Option<Encoding>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    layer: Vec<Layer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolve: Option<Resolve>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<Config>,
}
impl VegaLiteSpec {
    pub fn new() -> Self {
        Self {
            schema: SCHEMA_URL,
            data: None,
            width: None,
            height: None,
            mark: None,
            params: Vec::new(),
            transform: Vec::new(),
            encoding: None,
            layer: Vec::new(),
            resolve: None,
            config: None,
        }
    }
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
    pub fn mark(mut self, mark: Mark) -> Self {
        self.mark = Some(mark);
        self
    }
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }
    pub fn transforms(mut self, transforms: Vec<Transform>) -> Self {
        self.transform.extend(transforms);
        self
    }
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }
    pub fn layer(mut self, layer: Layer) -> Self {
        self.layer.push(layer);
        self
    }
    pub fn resolve(mut self, resolve: Resolve) -> Self {
        self.resolve = Some(resolve);
        self
    }
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }
    /// Copy of this spec with the given rows inlined as its data.
    pub fn with_values(&self, values: Vec<serde_json::Value>) -> Self {
        Self {
            data: Some(InlineData { values }),
            ..self.clone()
        }
    }
    pub fn schema(&self) -> &str {
        self.schema
    }
    pub fn data(&self) -> Option<&InlineData> {
        self.data.as_ref()
    }
    pub fn width(&self) -> Option<u32> {
        self.width
    }
    pub fn height(&self) -> Option<u32> {
        self.height
    }
    pub fn get_mark(&self) -> Option<&Mark> {
        self.mark.as_ref()
    }
    pub fn get_transforms(&self) -> &[Transform] {
        &self.transform
    }
    pub fn get_encoding(&self) -> Option<&Encoding> {
        self.encoding.as_ref()
    }
    pub fn layers(&self) -> &[Layer] {
        &self.layer
    }
    pub fn get_resolve(&self) -> Option<&Resolve> {
        self.resolve.as_ref()
    }
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
impl Default for VegaLiteSpec {
    fn default() -> Self {
        Self::new()
    }
}
