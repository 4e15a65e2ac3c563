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

use super::encoding::Bin;
use crate::options::Aggregation;
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateField {
    pub op: Aggregation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(rename = "as")]
    pub output: String,
}
impl AggregateField {
    pub fn count(output: &str) -> Self {
        Self {
            op: Aggregation::Count,
            field: None,
            output: output.to_string(),
        }
    }
    pub fn of(op: Aggregation, field: &str, output: &str) -> Self {
        Self {
            op,
            field: Some(field.to_string()),
            output: output.to_string(),
        }
    }
}

/// Derived-field and filter expressions. Only the shapes the builders
/// emit are representable, so the preview evaluator can run every one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ratio { numerator: String, denominator: String },
    IsValid(String),
}
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ratio {
                numerator,
                denominator,
            } => write!(f, "{}/{}", datum(numerator), datum(denominator)),
            Expr::IsValid(field) => write!(f, "isValid({})", datum(field)),
        }
    }
}
impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
fn datum(field: &str) -> String {
    let mut chars = field.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        format!("datum.{field}")
    } else {
        format!("datum[{}]", serde_json::Value::String(field.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Transform {
    Bin {
        bin: Bin,
        field: String,
        #[serde(rename = "as")]
        output: String,
    },
    Aggregate {
        aggregate: Vec<AggregateField>,
        groupby: Vec<String>,
    },
    JoinAggregate {
        joinaggregate: Vec<AggregateField>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        groupby: Vec<String>,
    },
    /// Window over the whole frame (`frame: [null, null]`).
    Window {
        window: Vec<AggregateField>,
        frame: [Option<i64>; 2],
    },
    Calculate {
        calculate: Expr,
        #[serde(rename = "as")]
        output: String,
    },
    Filter {
        filter: Expr,
    },
}
impl Transform {
    pub fn bin(bin: Bin, field: &str, output: &str) -> Self {
        Transform::Bin {
            bin,
            field: field.to_string(),
            output: output.to_string(),
        }
    }
    pub fn aggregate(fields: Vec<AggregateField>, groupby: &[&str]) -> Self {
        Transform::Aggregate {
            aggregate: fields,
            groupby: groupby.iter().map(|g| g.to_string()).collect(),
        }
    }
    pub fn join_aggregate(fields: Vec<AggregateField>, groupby: &[&str]) -> Self {
        Transform::JoinAggregate {
            joinaggregate: fields,
            groupby: groupby.iter().map(|g| g.to_string()).collect(),
        }
    }
    pub fn window_total(fields: Vec<AggregateField>) -> Self {
        Transform::Window {
            window: fields,
            frame: [None, None],
        }
    }
    pub fn ratio(numerator: &str, denominator: &str, output: &str) -> Self {
        Transform::Calculate {
            calculate: Expr::Ratio {
                numerator: numerator.to_string(),
                denominator: denominator.to_string(),
            },
            output: output.to_string(),
        }
    }
    pub fn valid(field: &str) -> Self {
        Transform::Filter {
            filter: Expr::IsValid(field.to_string()),
        }
    }
    pub fn name(&self) -> &'static str {
        match self {
            Transform::Bin { .. } => "bin",
            Transform::Aggregate { .. } => "aggregate",
            Transform::JoinAggregate { .. } => "joinaggregate",
            Transform::Window { .. } => "window",
            Transform::Calculate { .. } => "calculate",
            Transform::Filter { .. } => "filter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalised_histogram_pipeline_serialises() {
        let pipeline = vec![
            Transform::bin(Bin::maxbins(10), "fare", "bin_col_x"),
            Transform::aggregate(
                vec![AggregateField::count("xCount")],
                &["bin_col_x", "bin_col_x_end"],
            ),
            Transform::join_aggregate(
                vec![AggregateField::of(Aggregation::Sum, "xCount", "TotalCount")],
                &[],
            ),
            Transform::ratio("xCount", "TotalCount", "PercentOfTotal"),
        ];
        assert_eq!(
            serde_json::to_value(&pipeline).unwrap(),
            json!([
                {"bin": {"maxbins": 10}, "field": "fare", "as": "bin_col_x"},
                {"aggregate": [{"op": "count", "as": "xCount"}], "groupby": ["bin_col_x", "bin_col_x_end"]},
                {"joinaggregate": [{"op": "sum", "field": "xCount", "as": "TotalCount"}]},
                {"calculate": "datum.xCount/datum.TotalCount", "as": "PercentOfTotal"}
            ])
        );
    }

    #[test]
    fn window_spans_whole_frame() {
        let window = Transform::window_total(vec![AggregateField::count("total")]);
        assert_eq!(
            serde_json::to_value(&window).unwrap(),
            json!({"window": [{"op": "count", "as": "total"}], "frame": [null, null]})
        );
    }

    #[test]
    fn awkward_field_names_are_bracket_quoted() {
        assert_eq!(Expr::IsValid("class".into()).to_string(), "isValid(datum.class)");
        assert_eq!(
            Expr::IsValid("petal width".into()).to_string(),
            "isValid(datum[\"petal width\"])"
        );
        assert_eq!(Transform::valid("x").name(), "filter");
    }
}
