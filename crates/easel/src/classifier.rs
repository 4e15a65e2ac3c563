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

//! Column classification.
//!
//! Every column of a dataset lands in exactly one of three roles:
//! datetime, continuous numeric or categorical. The partition gates which
//! columns the dashboard offers for which chart role.

use crate::error::{DataError, SpecError};
use crate::options::Role;
use polars::prelude::{Column, DataFrame};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_CONTINUOUS_THRESHOLD: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Continuous,
    Categorical,
    Datetime,
}
impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColumnKind::Continuous => "continuous",
            ColumnKind::Categorical => "categorical",
            ColumnKind::Datetime => "datetime",
        })
    }
}

/// Storage type as declared by the dataframe, reduced to what the
/// classification rule looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredType {
    Numeric,
    Datetime,
    Other,
}
impl DeclaredType {
    pub fn of(dtype: &polars::prelude::DataType) -> Self {
        use polars::prelude::DataType::*;
        match dtype {
            Int8 | Int16 | Int32 | Int64 | UInt8 | UInt16 | UInt32 | UInt64 | Float32 | Float64 => {
                DeclaredType::Numeric
            }
            Date | Datetime(_, _) => DeclaredType::Datetime,
            _ => DeclaredType::Other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// A numeric column needs strictly more distinct values than this to
    /// count as continuous.
    pub continuous_threshold: usize,
}
impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            continuous_threshold: DEFAULT_CONTINUOUS_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub distinct_count: usize,
    pub null_count: usize,
}

/// Ordered, classified view of a dataset's columns. Builders only ever see
/// this, never the rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSchema {
    columns: Vec<ColumnProfile>,
}
impl DatasetSchema {
    pub fn new(columns: Vec<ColumnProfile>) -> Self {
        Self { columns }
    }
    /// Schema from `(name, kind)` pairs with unknown counts.
    pub fn from_kinds<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, ColumnKind)>,
        S: Into<String>,
    {
        Self {
            columns: columns
                .into_iter()
                .map(|(name, kind)| ColumnProfile {
                    name: name.into(),
                    kind,
                    distinct_count: 0,
                    null_count: 0,
                })
                .collect(),
        }
    }
    pub fn columns(&self) -> &[ColumnProfile] {
        &self.columns
    }
    pub fn len(&self) -> usize {
        self.columns.len()
    }
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
    pub fn get(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.get(name).map(|c| c.kind)
    }
    /// Resolve a role's column against the schema, failing on names the
    /// schema does not know.
    pub fn require(&self, role: Role, name: &str) -> Result<&ColumnProfile, SpecError> {
        self.get(name).ok_or_else(|| SpecError::UnknownColumn {
            role,
            column: name.to_string(),
        })
    }
    pub fn names_of(&self, kind: ColumnKind) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.name.as_str())
            .collect()
    }
    pub fn continuous(&self) -> Vec<&str> {
        self.names_of(ColumnKind::Continuous)
    }
    pub fn categorical(&self) -> Vec<&str> {
        self.names_of(ColumnKind::Categorical)
    }
    pub fn datetime(&self) -> Vec<&str> {
        self.names_of(ColumnKind::Datetime)
    }
    /// Names accepted by any of `kinds`, in column order.
    pub fn names_of_any(&self, kinds: &[ColumnKind]) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| kinds.contains(&c.kind))
            .map(|c| c.name.as_str())
            .collect()
    }
    pub fn detected_types(&self) -> DetectedTypes {
        DetectedTypes {
            num: self.continuous().into_iter().map(String::from).collect(),
            cat: self.categorical().into_iter().map(String::from).collect(),
            datetime: self.datetime().into_iter().map(String::from).collect(),
        }
    }
}
impl fmt::Display for DatasetSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} columns ({} continuous, {} categorical, {} datetime)",
            self.len(),
            self.continuous().len(),
            self.categorical().len(),
            self.datetime().len()
        )
    }
}

/// The three sets as the "Detected types" panel shows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedTypes {
    pub num: Vec<String>,
    pub cat: Vec<String>,
    pub datetime: Vec<String>,
}
impl DetectedTypes {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub struct ColumnClassifier {
    config: ClassifierConfig,
}
impl ColumnClassifier {
    pub fn new() -> Self {
        Self {
            config: ClassifierConfig::default(),
        }
    }
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
    /// The classification rule on its own: datetime wins, then numeric
    /// columns above the threshold are continuous, everything else is
    /// categorical.
    pub fn kind_for(&self, declared: DeclaredType, distinct_count: usize) -> ColumnKind {
        match declared {
            DeclaredType::Datetime => ColumnKind::Datetime,
            DeclaredType::Numeric if distinct_count > self.config.continuous_threshold => {
                ColumnKind::Continuous
            }
            _ => ColumnKind::Categorical,
        }
    }
    pub fn classify(&self, df: &DataFrame) -> Result<DatasetSchema, DataError> {
        let columns = df
            .get_columns()
            .par_iter()
            .map(|column| self.classify_column(column))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DatasetSchema { columns })
    }
    fn classify_column(&self, column: &Column) -> Result<ColumnProfile, DataError> {
        let series = column.as_materialized_series();
        let declared = DeclaredType::of(series.dtype());
        let null_count = series.null_count();
        // Nulls are not a distinct value.
        let distinct_count = series.drop_nulls().n_unique()?;
        Ok(ColumnProfile {
            name: series.name().to_string(),
            kind: self.kind_for(declared, distinct_count),
            distinct_count,
            null_count,
        })
    }
}
impl Default for ColumnClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn frame() -> DataFrame {
        let n = 30;
        let fare: Vec<f64> = (0..n).map(|i| i as f64 * 1.5).collect();
        let pclass: Vec<i64> = (0..n).map(|i| (i % 3) as i64 + 1).collect();
        let class: Vec<&str> = (0..n).map(|i| ["A", "B", "C"][i % 3]).collect();
        let survived: Vec<bool> = (0..n).map(|i| i % 2 == 0).collect();
        let stamps: Vec<i64> = (0..n).map(|i| i as i64 * 86_400_000).collect();
        let date = Series::new("date".into(), stamps)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap();
        DataFrame::new(vec![
            Series::new("fare".into(), fare).into(),
            Series::new("pclass".into(), pclass).into(),
            Series::new("class".into(), class).into(),
            Series::new("survived".into(), survived).into(),
            date.into(),
        ])
        .unwrap()
    }

    #[test]
    fn classifies_by_type_and_cardinality() {
        let schema = ColumnClassifier::new().classify(&frame()).unwrap();
        assert_eq!(schema.continuous(), vec!["fare"]);
        assert_eq!(schema.categorical(), vec!["pclass", "class", "survived"]);
        assert_eq!(schema.datetime(), vec!["date"]);
        assert_eq!(schema.get("pclass").unwrap().distinct_count, 3);
        assert_eq!(schema.to_string(), "5 columns (1 continuous, 3 categorical, 1 datetime)");
    }

    #[test]
    fn nulls_do_not_count_as_distinct_values() {
        let mut values: Vec<Option<f64>> = (0..20).map(|i| Some(f64::from(i))).collect();
        values.push(None);
        let df = DataFrame::new(vec![Series::new("score".into(), values).into()]).unwrap();
        let schema = ColumnClassifier::new().classify(&df).unwrap();
        let score = schema.get("score").unwrap();
        assert_eq!(score.kind, ColumnKind::Categorical);
        assert_eq!(score.distinct_count, 20);
        assert_eq!(score.null_count, 1);
    }

    #[test]
    fn empty_dataset_yields_empty_sets() {
        let schema = ColumnClassifier::new().classify(&DataFrame::empty()).unwrap();
        assert!(schema.is_empty());
        assert!(schema.continuous().is_empty());
        assert!(schema.categorical().is_empty());
        assert!(schema.datetime().is_empty());
    }

    #[test]
    fn threshold_is_configurable() {
        let classifier = ColumnClassifier::with_config(ClassifierConfig {
            continuous_threshold: 2,
        });
        let schema = classifier.classify(&frame()).unwrap();
        assert_eq!(schema.continuous(), vec!["fare", "pclass"]);
    }

    #[test]
    fn detected_types_export() {
        let schema = ColumnClassifier::new().classify(&frame()).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&schema.detected_types().to_json_pretty().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "num": ["fare"],
                "cat": ["pclass", "class", "survived"],
                "datetime": ["date"]
            })
        );
    }

    fn declared() -> impl Strategy<Value = DeclaredType> {
        prop_oneof![
            Just(DeclaredType::Numeric),
            Just(DeclaredType::Datetime),
            Just(DeclaredType::Other)
        ]
    }

    proptest! {
        #[test]
        fn partition_is_disjoint_and_complete(
            columns in prop::collection::vec((declared(), 0usize..60), 0..25)
        ) {
            let classifier = ColumnClassifier::new();
            let schema = DatasetSchema::from_kinds(
                columns
                    .iter()
                    .enumerate()
                    .map(|(i, (d, n))| (format!("c{i}"), classifier.kind_for(*d, *n))),
            );
            let cont: HashSet<&str> = schema.continuous().into_iter().collect();
            let cat: HashSet<&str> = schema.categorical().into_iter().collect();
            let dt: HashSet<&str> = schema.datetime().into_iter().collect();
            prop_assert!(cont.is_disjoint(&cat));
            prop_assert!(cont.is_disjoint(&dt));
            prop_assert!(cat.is_disjoint(&dt));
            prop_assert_eq!(cont.len() + cat.len() + dt.len(), columns.len());
        }

        #[test]
        fn continuous_iff_numeric_above_threshold(declared in declared(), distinct in 0usize..100) {
            let kind = ColumnClassifier::new().kind_for(declared, distinct);
            let expect_continuous = declared == DeclaredType::Numeric && distinct > 20;
            prop_assert_eq!(kind == ColumnKind::Continuous, expect_continuous);
            if declared != DeclaredType::Datetime && !expect_continuous {
                prop_assert_eq!(kind, ColumnKind::Categorical);
            }
            if declared == DeclaredType::Datetime {
                prop_assert_eq!(kind, ColumnKind::Datetime);
            }
        }
    }
}
