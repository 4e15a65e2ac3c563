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

use crate::options::{Aggregation, TimeUnit};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Quantitative,
    Ordinal,
    Nominal,
    Temporal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Stacking along a positional channel. `Disabled` serialises as `null`,
/// which is how the renderer is told to overlay instead of stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stack {
    Zero,
    Normalize,
    Disabled,
}
impl Serialize for Stack {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Stack::Zero => serializer.serialize_str("zero"),
            Stack::Normalize => serializer.serialize_str("normalize"),
            Stack::Disabled => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Bin {
    Enabled(bool),
    Params(BinParams),
}
impl Bin {
    pub fn maxbins(maxbins: u32) -> Self {
        Bin::Params(BinParams {
            maxbins: Some(maxbins),
            binned: None,
        })
    }
    /// Marks a field whose values were already binned by a transform.
    pub fn prebinned(maxbins: u32) -> Self {
        Bin::Params(BinParams {
            maxbins: Some(maxbins),
            binned: Some(true),
        })
    }
    pub fn max_bins(&self) -> Option<u32> {
        match self {
            Bin::Enabled(_) => None,
            Bin::Params(params) => params.maxbins,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BinParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxbins: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binned: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_angle: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}
impl Axis {
    pub fn label_angle(angle: i32) -> Self {
        Self {
            label_angle: Some(angle),
            ..Self::default()
        }
    }
    pub fn format(format: &str) -> Self {
        Self {
            format: Some(format.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Scale {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero: Option<bool>,
}

/// Value picked while a selection parameter is active.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub param: String,
    pub value: f64,
}

/// One visual channel. Every property is optional; the builder methods
/// below set them one at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<FieldType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aggregate: Option<Aggregation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bin: Option<Bin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_unit: Option<TimeUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<Stack>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    axis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scale: Option<Scale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
}
impl Channel {
    pub fn field(name: &str) -> Self {
        Self {
            field: Some(name.to_string()),
            ..Self::default()
        }
    }
    /// Channel without a field, e.g. a bare `count`.
    pub fn aggregate_only(aggregate: Aggregation) -> Self {
        Self {
            aggregate: Some(aggregate),
            ..Self::default()
        }
    }
    pub fn constant(value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }
    /// `value` normally, `selected` while the selection `param` is active.
    pub fn selected(param: &str, selected: f64, value: f64) -> Self {
        Self::default().when_selected(param, selected, value)
    }
    pub fn when_selected(mut self, param: &str, selected: f64, value: f64) -> Self {
        self.condition = Some(Condition {
            param: param.to_string(),
            value: selected,
        });
        self.value = Some(value);
        self
    }
    pub fn typed(mut self, kind: FieldType) -> Self {
        self.kind = Some(kind);
        self
    }
    pub fn quantitative(self) -> Self {
        self.typed(FieldType::Quantitative)
    }
    pub fn ordinal(self) -> Self {
        self.typed(FieldType::Ordinal)
    }
    pub fn nominal(self) -> Self {
        self.typed(FieldType::Nominal)
    }
    pub fn temporal(self) -> Self {
        self.typed(FieldType::Temporal)
    }
    pub fn aggregate(mut self, aggregate: Aggregation) -> Self {
        self.aggregate = Some(aggregate);
        self
    }
    pub fn bin(mut self, bin: Bin) -> Self {
        self.bin = Some(bin);
        self
    }
    pub fn time_unit(mut self, unit: TimeUnit) -> Self {
        self.time_unit = Some(unit);
        self
    }
    pub fn stack(mut self, stack: Stack) -> Self {
        self.stack = Some(stack);
        self
    }
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = Some(axis);
        self
    }
    pub fn scale(mut self, scale: Scale) -> Self {
        self.scale = Some(scale);
        self
    }
    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }
    pub fn format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }
    pub fn field_name(&self) -> Option<&str> {
        self.field.as_deref()
    }
    pub fn field_type(&self) -> Option<FieldType> {
        self.kind
    }
    pub fn aggregate_op(&self) -> Option<Aggregation> {
        self.aggregate
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Encoding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Channel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x2: Option<Channel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Channel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_offset: Option<Channel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theta: Option<Channel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Channel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Channel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<Channel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Channel>,
}
