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

use crate::classifier::{ColumnClassifier, ColumnKind, DatasetSchema};
use crate::error::{DataError, DataResult};
use crate::options::TimeUnit;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use polars::prelude::{
    CsvReader, DataFrame, DataType, NamedFrom, SerReader, Series, TimeUnit as PlTimeUnit,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// The datasets the dashboard offers out of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetName {
    Titanic,
    Iris,
    Diabetes,
    Wine,
    Sonar,
}
impl DatasetName {
    pub const ALL: [DatasetName; 5] = [
        DatasetName::Titanic,
        DatasetName::Iris,
        DatasetName::Diabetes,
        DatasetName::Wine,
        DatasetName::Sonar,
    ];
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetName::Titanic => "titanic",
            DatasetName::Iris => "iris",
            DatasetName::Diabetes => "diabetes",
            DatasetName::Wine => "wine",
            DatasetName::Sonar => "sonar",
        }
    }
}
impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
impl FromStr for DatasetName {
    type Err = DataError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetName::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DataError::UnknownDataset {
                name: s.to_string(),
            })
    }
}

/// Evenly spaced timestamps appended to every dataset so the time-based
/// charts always have a datetime column to work with. Both ends are
/// included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticDatetime {
    pub column: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}
impl Default for SyntheticDatetime {
    fn default() -> Self {
        Self {
            column: "date".to_string(),
            start: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
        }
    }
}
impl SyntheticDatetime {
    /// `n` timestamps from `start` to `end`. A single point sits on `start`.
    pub fn timestamps(&self, n: usize) -> Vec<NaiveDateTime> {
        let start = self.start.and_time(chrono::NaiveTime::MIN);
        let end = self.end.and_time(chrono::NaiveTime::MIN);
        let span_ms = (end - start).num_milliseconds();
        match n {
            0 => Vec::new(),
            1 => vec![start],
            _ => (0..n)
                .map(|i| {
                    // span_ms * i exceeds i64 for wide windows over long frames
                    let offset = i128::from(span_ms) * i as i128 / (n as i128 - 1);
                    start + chrono::Duration::milliseconds(offset as i64)
                })
                .collect(),
        }
    }
    pub fn append_to(&self, mut frame: DataFrame) -> DataResult<DataFrame> {
        if frame.get_column_names().iter().any(|c| c.as_str() == self.column) {
            return Err(DataError::DuplicateColumn {
                column: self.column.clone(),
            });
        }
        let millis: Vec<i64> = self
            .timestamps(frame.height())
            .iter()
            .map(|ts| ts.and_utc().timestamp_millis())
            .collect();
        let series = Series::new(self.column.as_str().into(), millis)
            .cast(&DataType::Datetime(PlTimeUnit::Milliseconds, None))?;
        frame.with_column(series)?;
        Ok(frame)
    }
}

/// Where named datasets come from.
pub trait DatasetSource: Send + Sync {
    fn load(&self, name: &str) -> DataResult<DataFrame>;
    fn available(&self) -> Vec<String>;
}

/// Reads `<dir>/<name>.csv`.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    dir: PathBuf,
}
impl CsvDirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
    pub fn dir(&self) -> &Path {
        &self.dir
    }
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.csv"))
    }
}
impl DatasetSource for CsvDirectorySource {
    fn load(&self, name: &str) -> DataResult<DataFrame> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(DataError::UnknownDataset {
                name: name.to_string(),
            });
        }
        load_csv(&path)
    }
    fn available(&self) -> Vec<String> {
        DatasetName::ALL
            .iter()
            .map(DatasetName::as_str)
            .filter(|name| self.path_for(name).is_file())
            .map(String::from)
            .collect()
    }
}

pub fn load_csv(path: &Path) -> DataResult<DataFrame> {
    let file = File::open(path)?;
    let frame = CsvReader::new(file)
        .finish()
        .map_err(|source| DataError::DataFileError {
            path: path.display().to_string(),
            source,
        })?;
    debug!(path = %path.display(), rows = frame.height(), cols = frame.width(), "read csv");
    Ok(frame)
}

/// A loaded frame together with its classified schema.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    frame: DataFrame,
    schema: DatasetSchema,
}
impl Dataset {
    pub fn from_frame(
        name: impl Into<String>,
        frame: DataFrame,
        classifier: &ColumnClassifier,
    ) -> DataResult<Self> {
        let name = name.into();
        let schema = classifier.classify(&frame)?;
        info!(dataset = %name, rows = frame.height(), %schema, "dataset ready");
        Ok(Self {
            name,
            frame,
            schema,
        })
    }
    /// Load `name` from `source`, append the synthetic datetime column and
    /// classify.
    pub fn load(
        source: &dyn DatasetSource,
        name: &str,
        synthetic: &SyntheticDatetime,
        classifier: &ColumnClassifier,
    ) -> DataResult<Self> {
        let frame = synthetic.append_to(source.load(name)?)?;
        Self::from_frame(name, frame, classifier)
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }
    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Rows as JSON objects, ready to inline into a spec.
    pub fn records(&self) -> DataResult<Vec<Value>> {
        let height = self.frame.height();
        let mut rows: Vec<Map<String, Value>> = vec![Map::new(); height];
        for column in self.frame.get_columns() {
            let series = column.as_materialized_series();
            let name = series.name().to_string();
            for (row, value) in rows.iter_mut().zip(json_values(series)?) {
                row.insert(name.clone(), value);
            }
        }
        Ok(rows.into_iter().map(Value::Object).collect())
    }

    /// Number of distinct buckets `column` falls into at `unit`.
    pub fn distinct_time_buckets(&self, column: &str, unit: TimeUnit) -> DataResult<usize> {
        match self.schema.kind_of(column) {
            None => {
                return Err(DataError::ColumnNotFound {
                    column: column.to_string(),
                })
            }
            Some(ColumnKind::Datetime) => {}
            Some(_) => {
                return Err(DataError::NotTemporal {
                    column: column.to_string(),
                })
            }
        }
        let millis = epoch_millis(self.frame.column(column)?.as_materialized_series())?;
        let buckets: HashSet<i64> = millis
            .into_iter()
            .flatten()
            .filter_map(DateTime::<Utc>::from_timestamp_millis)
            .map(|ts| unit.bucket(&ts.naive_utc()))
            .collect();
        Ok(buckets.len())
    }
}

fn epoch_millis(series: &Series) -> DataResult<Vec<Option<i64>>> {
    let as_millis = series
        .cast(&DataType::Datetime(PlTimeUnit::Milliseconds, None))?
        .cast(&DataType::Int64)?;
    Ok(as_millis.i64()?.into_iter().collect())
}

fn json_values(series: &Series) -> DataResult<Vec<Value>> {
    let values = match series.dtype() {
        DataType::Boolean => series
            .bool()?
            .into_iter()
            .map(|v| v.map_or(Value::Null, Value::Bool))
            .collect(),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => series
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .map(|v| v.map_or(Value::Null, Value::from))
            .collect(),
        DataType::UInt64 | DataType::Float32 | DataType::Float64 => series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.and_then(serde_json::Number::from_f64).map_or(Value::Null, Value::Number))
            .collect(),
        DataType::Date | DataType::Datetime(_, _) => epoch_millis(series)?
            .into_iter()
            .map(|v| {
                v.and_then(DateTime::<Utc>::from_timestamp_millis)
                    .map_or(Value::Null, |ts| {
                        Value::String(ts.naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string())
                    })
            })
            .collect(),
        _ => series
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|v| v.map_or(Value::Null, |s| Value::String(s.to_string())))
            .collect(),
    };
    Ok(values)
}
