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

use easel::error::{DataError, SpecError};
use easel::preview;
use easel::resolver::{BarSelection, HistogramSelection};
use easel::spec::{FieldType, ResolveMode};
use easel::{Aggregation, ChartFamily, Dashboard, DashboardConfig, EaselError, Roles, Selection};
use itertools::Itertools;
use serde_json::json;
use std::fmt::Write as _;
use std::sync::Arc;
use tempfile::TempDir;

const ROWS: usize = 48;

fn titanic_csv() -> String {
    let mut csv = String::from("class,sex,embarked,fare,age\n");
    for i in 0..ROWS {
        let class = ["First", "Second", "Third"][i % 3];
        let sex = ["male", "female"][i % 2];
        let embarked = ["S", "C", "Q", "S"][i % 4];
        let fare = 5.0 + (i * 37 % 97) as f64 * 1.25;
        let age = if i % 11 == 0 {
            String::new()
        } else {
            format!("{}", 1 + i * 13 % 70)
        };
        writeln!(csv, "{class},{sex},{embarked},{fare},{age}").unwrap();
    }
    csv
}

fn dashboard() -> (TempDir, Dashboard) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("titanic.csv"), titanic_csv()).unwrap();
    let config = DashboardConfig::default()
        .with_overrides(Some(dir.path().to_path_buf()), Some(dir.path().join("out")));
    (dir, Dashboard::new(config))
}

fn histogram(roles: Roles, bins: u32, normalize: bool) -> Selection {
    Selection::Histogram(HistogramSelection {
        roles,
        bins: Some(bins),
        ordinal: false,
        normalize,
    })
}

#[test]
fn test_dataset_is_classified_with_synthetic_date() {
    let (_dir, dashboard) = dashboard();
    assert_eq!(dashboard.available_datasets(), vec!["titanic".to_string()]);
    let dataset = dashboard.load("titanic").unwrap();
    assert_eq!(dataset.height(), ROWS);
    let types = dataset.schema().detected_types();
    assert_eq!(types.cat, vec!["class", "sex", "embarked"]);
    assert_eq!(types.num, vec!["fare", "age"]);
    assert_eq!(types.datetime, vec!["date"]);
}

#[test]
fn test_loads_are_cached() {
    let (_dir, dashboard) = dashboard();
    let first = dashboard.load("titanic").unwrap();
    let second = dashboard.load("titanic").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    let stats = dashboard.cache_stats();
    assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
}

#[test]
fn test_missing_dataset_is_reported() {
    let (_dir, dashboard) = dashboard();
    let result = dashboard.load("wine");
    assert!(matches!(
        result,
        Err(EaselError::Data(DataError::UnknownDataset { .. }))
    ));
    assert_eq!(dashboard.cache_stats().entries, 0);
}

#[test]
fn test_count_bar_for_categorical_x() {
    let (_dir, dashboard) = dashboard();
    let dataset = dashboard.load("titanic").unwrap();
    let panels = dashboard
        .resolve(
            &dataset,
            &Selection::Bar(BarSelection {
                roles: Roles::new().with_x("class"),
                aggregation: None,
            }),
        )
        .unwrap();
    assert_eq!(panels.len(), 1);
    assert_eq!(panels[0].title, "Count bar plot");
    let encoding = panels[0].spec.get_encoding().unwrap();
    let x = encoding.x.as_ref().unwrap();
    assert_eq!(x.field_name(), Some("class"));
    assert_eq!(x.field_type(), Some(FieldType::Ordinal));
    assert_eq!(
        encoding.y.as_ref().and_then(|y| y.aggregate_op()),
        Some(Aggregation::Count)
    );
    assert_eq!(panels[0].spec.width(), Some(600));
    let value = panels[0].spec.to_value().unwrap();
    assert_eq!(value["mark"]["type"], "bar");
    assert_eq!(value["encoding"]["x"]["field"], "class");
    assert_eq!(value["encoding"]["x"]["axis"]["labelAngle"], 0);
    assert_eq!(value["encoding"]["y"]["aggregate"], "count");
    assert_eq!(value["width"], 600);
}

#[test]
fn test_normalized_histogram_shares_sum_to_one() {
    let (_dir, dashboard) = dashboard();
    let dataset = dashboard.load("titanic").unwrap();
    let panels = dashboard
        .resolve(&dataset, &histogram(Roles::new().with_x("fare"), 10, true))
        .unwrap();
    let spec = &panels[0].spec;
    let value = spec.to_value().unwrap();
    assert_eq!(value["encoding"]["y"]["field"], "PercentOfTotal");
    assert_eq!(value["encoding"]["y"]["axis"]["format"], ".1%");

    let tables = preview::evaluate_spec(spec, &dataset.records().unwrap());
    assert_eq!(tables.len(), 1);
    let total = preview::column_sum(&tables[0], "PercentOfTotal");
    assert!((total - 1.0).abs() < 1e-9, "shares summed to {total}");
}

#[test]
fn test_bin_count_bounds() {
    let (_dir, dashboard) = dashboard();
    let dataset = dashboard.load("titanic").unwrap();
    for bins in [1, 100] {
        assert!(dashboard
            .resolve(&dataset, &histogram(Roles::new().with_x("fare"), bins, false))
            .is_ok());
    }
    for bins in [0, 101] {
        let result = dashboard.resolve(&dataset, &histogram(Roles::new().with_x("fare"), bins, false));
        assert!(
            matches!(
                result,
                Err(EaselError::Spec(SpecError::OptionOutOfRange { .. }))
            ),
            "bins = {bins}"
        );
    }
}

#[test]
fn test_two_ring_donut_has_independent_layers() {
    let (_dir, dashboard) = dashboard();
    let dataset = dashboard.load("titanic").unwrap();
    let selection =
        Selection::DonutComplex(Roles::new().with_color("class").with_second_color("embarked"));
    let panels = dashboard.resolve(&dataset, &selection).unwrap();
    let spec = &panels[0].spec;
    let value = spec.to_value().unwrap();
    assert_eq!(value["layer"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["resolve"], json!({"scale": {"color": "independent"}}));
    assert_eq!(
        spec.get_resolve().map(|r| r.scale.color),
        Some(ResolveMode::Independent)
    );
    assert_eq!(value["layer"][0]["encoding"]["color"]["field"], "class");
    assert_eq!(value["layer"][1]["encoding"]["color"]["field"], "embarked");

    let tables = preview::evaluate_spec(spec, &dataset.records().unwrap());
    assert_eq!(tables.len(), 2);
    for (table, field) in tables.iter().zip(["class", "embarked"]) {
        assert_eq!(table.len(), ROWS);
        assert!(table.iter().all(|row| row["total"] == json!(ROWS)));
        let shares: f64 = table
            .iter()
            .unique_by(|row| row[field].to_string())
            .filter_map(|row| row["share"].as_f64())
            .sum();
        assert!((shares - 1.0).abs() < 1e-9, "{field} shares summed to {shares}");
    }
}

#[test]
fn test_advisories_name_the_missing_role() {
    let (_dir, dashboard) = dashboard();
    let dataset = dashboard.load("titanic").unwrap();
    let message = |selection: Selection| match dashboard.resolve(&dataset, &selection) {
        Err(e @ EaselError::Advisory(_)) => e.user_message(),
        other => panic!("expected advisory, got {other:?}"),
    };
    assert_eq!(
        message(Selection::empty(ChartFamily::Bar)),
        "Please select a value for X."
    );
    assert_eq!(
        message(histogram(
            Roles::new().with_x("fare").with_y("age").with_color("sex"),
            10,
            false
        )),
        "You cannot select Y and Color at the same time."
    );
    assert_eq!(
        message(Selection::DonutComplex(Roles::new().with_second_color("sex"))),
        "Please select a value for both Colors."
    );
}

#[test]
fn test_resolve_all_keeps_families_apart() {
    let (_dir, dashboard) = dashboard();
    let dataset = dashboard.load("titanic").unwrap();
    let selections = vec![
        Selection::Line(Roles::new().with_x("date").with_y("fare")),
        Selection::Scatter(easel::resolver::ScatterSelection {
            roles: Roles::new().with_x("fare"),
            ..Default::default()
        }),
    ];
    let results = dashboard.resolve_all(&dataset, &selections);
    assert_eq!(results[0].0, ChartFamily::Line);
    let line = results[0].1.as_ref().unwrap();
    assert_eq!(
        line[0].spec.to_value().unwrap()["encoding"]["x"]["type"],
        "temporal"
    );
    assert!(results[1].1.is_err());
}

#[test]
fn test_render_writes_html_with_inline_rows() {
    let (dir, dashboard) = dashboard();
    let dataset = dashboard.load("titanic").unwrap();
    let panels = dashboard
        .resolve(&dataset, &Selection::DonutSimple(Roles::new().with_color("sex")))
        .unwrap();
    let path = dashboard.render(&dataset, &panels[0]).unwrap();
    assert!(path.starts_with(dir.path().join("out")));
    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("<title>Donut chart</title>"));
    assert!(html.contains("\"sex\":\"female\""));
    assert!(html.contains("vega-embed@6"));
}

#[test]
fn test_dashboard_from_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("titanic.csv"), titanic_csv()).unwrap();
    let config_path = dir.path().join("easel.yml");
    std::fs::write(
        &config_path,
        format!(
            "data_dir: {}\ncanvas:\n  width: 320\n  height: 200\n",
            dir.path().display()
        ),
    )
    .unwrap();
    let dashboard = Dashboard::from_yaml_file(config_path.to_str().unwrap()).unwrap();
    assert_eq!(dashboard.config().canvas.width, 320);
    let dataset = dashboard.load("titanic").unwrap();
    let panels = dashboard
        .resolve(&dataset, &Selection::Line(Roles::new().with_x("fare").with_y("age")))
        .unwrap();
    assert_eq!(panels[0].spec.height(), Some(200));
    assert_eq!(panels[0].spec.to_value().unwrap()["height"], 200);
}
