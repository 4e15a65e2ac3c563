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

//! In-process evaluation of the transforms the builders emit, so the
//! derived table behind a chart can be shown and checked without a
//! renderer.
//!
//! Binning is equal-width over the field's extent with exactly `maxbins`
//! bins. The renderer picks "nice" boundaries instead, so bin edges can
//! differ; per-bin shares still sum to one.

use crate::options::Aggregation;
use crate::spec::{AggregateField, Bin, Expr, Transform, VegaLiteSpec};
use itertools::{Itertools, MinMaxResult};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

pub type Row = Map<String, Value>;

const DEFAULT_MAXBINS: u32 = 10;

/// Apply `transforms` in order. Non-object input rows are dropped.
pub fn evaluate(transforms: &[Transform], rows: &[Value]) -> Vec<Row> {
    let mut table: Vec<Row> = rows
        .iter()
        .filter_map(|row| row.as_object().cloned())
        .collect();
    for transform in transforms {
        table = apply(transform, table);
    }
    table
}

/// Derived table of a single-view spec, or one table per layer.
pub fn evaluate_spec(spec: &VegaLiteSpec, rows: &[Value]) -> Vec<Vec<Row>> {
    let base = evaluate(spec.get_transforms(), rows);
    if spec.layers().is_empty() {
        return vec![base];
    }
    let base: Vec<Value> = base.into_iter().map(Value::Object).collect();
    spec.layers()
        .iter()
        .map(|layer| evaluate(&layer.transform, &base))
        .collect()
}

/// Sum of the numeric values of `field`.
pub fn column_sum(table: &[Row], field: &str) -> f64 {
    table.iter().filter_map(|row| number(row.get(field))).sum()
}

fn apply(transform: &Transform, table: Vec<Row>) -> Vec<Row> {
    match transform {
        Transform::Bin { bin, field, output } => bin_rows(table, bin, field, output),
        Transform::Aggregate { aggregate, groupby } => aggregate_rows(&table, aggregate, groupby),
        Transform::JoinAggregate {
            joinaggregate,
            groupby,
        } => join_rows(table, joinaggregate, groupby),
        // frame [null, null]: every row sees the whole table
        Transform::Window { window, .. } => join_rows(table, window, &[]),
        Transform::Calculate { calculate, output } => table
            .into_iter()
            .map(|mut row| {
                let value = eval(calculate, &row);
                row.insert(output.clone(), value);
                row
            })
            .collect(),
        Transform::Filter { filter } => table
            .into_iter()
            .filter(|row| eval(filter, row).as_bool().unwrap_or(false))
            .collect(),
    }
}

fn eval(expr: &Expr, row: &Row) -> Value {
    match expr {
        Expr::Ratio {
            numerator,
            denominator,
        } => match (number(row.get(numerator)), number(row.get(denominator))) {
            (Some(n), Some(d)) if d != 0.0 => float(n / d),
            _ => Value::Null,
        },
        Expr::IsValid(field) => Value::Bool(!row.get(field).is_none_or(Value::is_null)),
    }
}

fn number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

fn float(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

fn bin_rows(table: Vec<Row>, bin: &Bin, field: &str, output: &str) -> Vec<Row> {
    let bins = bin.max_bins().unwrap_or(DEFAULT_MAXBINS).max(1);
    let (lo, hi) = match table
        .iter()
        .filter_map(|row| number(row.get(field)))
        .minmax_by(|a, b| a.total_cmp(b))
    {
        MinMaxResult::NoElements => return table,
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };
    let width = if hi > lo { (hi - lo) / f64::from(bins) } else { 1.0 };
    let end_field = format!("{output}_end");
    table
        .into_iter()
        .map(|mut row| {
            let (start, end) = match number(row.get(field)) {
                Some(v) => {
                    let index = (((v - lo) / width).floor() as u32).min(bins - 1);
                    let start = lo + f64::from(index) * width;
                    (float(start), float(start + width))
                }
                None => (Value::Null, Value::Null),
            };
            row.insert(output.to_string(), start);
            row.insert(end_field.clone(), end);
            row
        })
        .collect()
}

fn group_key(row: &Row, groupby: &[String]) -> String {
    groupby
        .iter()
        .map(|g| row.get(g).map_or_else(|| "null".to_string(), Value::to_string))
        .join("\u{1f}")
}

/// Rows grouped by `groupby`, groups in first-seen order.
fn groups<'a>(table: &'a [Row], groupby: &[String]) -> Vec<Vec<&'a Row>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<&Row>> = Vec::new();
    for row in table {
        let slot = *index.entry(group_key(row, groupby)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(row);
    }
    groups
}

fn aggregate_value(field: &AggregateField, rows: &[&Row]) -> Value {
    if field.op == Aggregation::Count {
        return Value::from(rows.len());
    }
    let Some(name) = field.field.as_deref() else {
        return Value::Null;
    };
    let mut values: Vec<f64> = rows.iter().filter_map(|r| number(r.get(name))).collect();
    if values.is_empty() {
        return Value::Null;
    }
    let result = match field.op {
        Aggregation::Count => values.len() as f64,
        Aggregation::Sum => values.iter().sum(),
        Aggregation::Mean => values.iter().sum::<f64>() / values.len() as f64,
        Aggregation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        Aggregation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        Aggregation::Median => {
            values.sort_by(f64::total_cmp);
            let mid = values.len() / 2;
            if values.len() % 2 == 0 {
                (values[mid - 1] + values[mid]) / 2.0
            } else {
                values[mid]
            }
        }
    };
    float(result)
}

fn aggregate_rows(table: &[Row], fields: &[AggregateField], groupby: &[String]) -> Vec<Row> {
    groups(table, groupby)
        .into_iter()
        .map(|rows| {
            let mut out = Row::new();
            for g in groupby {
                out.insert(g.clone(), rows[0].get(g).cloned().unwrap_or(Value::Null));
            }
            for field in fields {
                out.insert(field.output.clone(), aggregate_value(field, &rows));
            }
            out
        })
        .collect()
}

fn join_rows(table: Vec<Row>, fields: &[AggregateField], groupby: &[String]) -> Vec<Row> {
    let per_group: HashMap<String, Vec<(String, Value)>> = groups(&table, groupby)
        .into_iter()
        .map(|rows| {
            let key = group_key(rows[0], groupby);
            let values = fields
                .iter()
                .map(|f| (f.output.clone(), aggregate_value(f, &rows)))
                .collect();
            (key, values)
        })
        .collect();
    table
        .into_iter()
        .map(|mut row| {
            if let Some(values) = per_group.get(&group_key(&row, groupby)) {
                for (name, value) in values {
                    row.insert(name.clone(), value.clone());
                }
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{donut, histogram};
    use serde_json::json;

    fn fares() -> Vec<Value> {
        [7.25, 71.28, 7.92, 53.1, 8.05, 8.46, 51.86, 21.07, 11.13, 30.07, 16.7, 26.55]
            .iter()
            .map(|f| json!({"fare": f}))
            .collect()
    }

    #[test]
    fn histogram_shares_sum_to_one() {
        let table = evaluate(&histogram::share_pipeline("fare", 5), &fares());
        assert!(table.len() <= 5);
        let total = column_sum(&table, histogram::SHARE_FIELD);
        assert!((total - 1.0).abs() < 1e-9);
        assert!(table.iter().all(|row| row["TotalCount"] == json!(12.0)));
    }

    #[test]
    fn single_bin_holds_everything() {
        let table = evaluate(&histogram::share_pipeline("fare", 1), &fares());
        assert_eq!(table.len(), 1);
        assert_eq!(table[0]["xCount"], json!(12));
        assert_eq!(table[0][histogram::SHARE_FIELD], json!(1.0));
    }

    #[test]
    fn donut_shares_skip_null_categories() {
        let rows = vec![
            json!({"class": "A"}),
            json!({"class": "A"}),
            json!({"class": "B"}),
            json!({"class": null}),
            json!({"class": "C"}),
        ];
        let table = evaluate(&donut::share_pipeline("class"), &rows);
        assert_eq!(table.len(), 4);
        assert!(table.iter().all(|row| row["total"] == json!(4)));
        let first_a = table.iter().find(|r| r["class"] == "A").unwrap();
        assert_eq!(first_a["share"], json!(0.5));
        let distinct: f64 = table
            .iter()
            .unique_by(|r| r["class"].to_string())
            .filter_map(|r| r["share"].as_f64())
            .sum();
        assert!((distinct - 1.0).abs() < 1e-9);
    }

    #[test]
    fn aggregates_per_group() {
        let rows = vec![
            json!({"g": "a", "v": 1.0}),
            json!({"g": "a", "v": 3.0}),
            json!({"g": "b", "v": 10.0}),
            json!({"g": "a", "v": null}),
        ];
        let fields = [
            AggregateField::of(Aggregation::Mean, "v", "mean"),
            AggregateField::of(Aggregation::Median, "v", "median"),
            AggregateField::of(Aggregation::Max, "v", "max"),
            AggregateField::count("n"),
        ];
        let table = evaluate(&[Transform::aggregate(fields.to_vec(), &["g"])], &rows);
        assert_eq!(table.len(), 2);
        assert_eq!(
            Value::Object(table[0].clone()),
            json!({"g": "a", "mean": 2.0, "median": 2.0, "max": 3.0, "n": 3})
        );
        assert_eq!(table[1]["n"], json!(1));
    }

    #[test]
    fn ratio_by_zero_is_null() {
        let rows = vec![json!({"a": 1, "b": 0})];
        let table = evaluate(&[Transform::ratio("a", "b", "r")], &rows);
        assert_eq!(table[0]["r"], Value::Null);
    }
}
