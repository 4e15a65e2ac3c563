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

use crate::classifier::ColumnKind;
use crate::error::SpecError;
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_BINS: u32 = 1;
pub const MAX_BINS: u32 = 100;
pub const DEFAULT_BINS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartFamily {
    Bar,
    Histogram,
    TimeSeries,
    Boxplot,
    Scatter,
    DonutSimple,
    DonutComplex,
    Line,
}
impl ChartFamily {
    pub const ALL: [ChartFamily; 8] = [
        ChartFamily::Bar,
        ChartFamily::Histogram,
        ChartFamily::TimeSeries,
        ChartFamily::Boxplot,
        ChartFamily::Scatter,
        ChartFamily::DonutSimple,
        ChartFamily::DonutComplex,
        ChartFamily::Line,
    ];
    pub fn label(&self) -> &'static str {
        match self {
            ChartFamily::Bar => "Bar",
            ChartFamily::Histogram => "Histogram",
            ChartFamily::TimeSeries => "Time Series",
            ChartFamily::Boxplot => "Boxplot",
            ChartFamily::Scatter => "Scatter",
            ChartFamily::DonutSimple => "Donut Simple",
            ChartFamily::DonutComplex => "Donut Complex",
            ChartFamily::Line => "Line",
        }
    }
    /// Column kinds a role may draw from for this family. An empty slice
    /// means the family has no such role.
    pub fn accepts(&self, role: Role) -> &'static [ColumnKind] {
        use ColumnKind::{Categorical, Continuous, Datetime};
        match (self, role) {
            (ChartFamily::Bar, Role::X) => &[Categorical],
            (ChartFamily::Bar, Role::Y) => &[Continuous],
            (ChartFamily::Bar, Role::Color) => &[Categorical],
            (ChartFamily::Histogram, Role::X) => &[Continuous],
            (ChartFamily::Histogram, Role::Y) => &[Continuous, Categorical],
            (ChartFamily::Histogram, Role::Color) => &[Categorical],
            (ChartFamily::TimeSeries, Role::X) => &[Datetime],
            (ChartFamily::TimeSeries, Role::Y) => &[Continuous],
            (ChartFamily::TimeSeries, Role::Color) => &[Categorical],
            (ChartFamily::Boxplot, Role::X) => &[Categorical],
            (ChartFamily::Boxplot, Role::Y) => &[Continuous],
            (ChartFamily::Scatter, Role::X | Role::Y) => &[Continuous],
            (ChartFamily::Scatter, Role::Color) => &[Categorical],
            (ChartFamily::DonutSimple, Role::Color) => &[Categorical],
            (ChartFamily::DonutComplex, Role::Color | Role::SecondColor) => &[Categorical],
            (ChartFamily::Line, Role::X | Role::Y) => &[Continuous, Datetime],
            (ChartFamily::Line, Role::Color) => &[Categorical],
            _ => &[],
        }
    }
}
impl fmt::Display for ChartFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    X,
    Y,
    Color,
    SecondColor,
}
impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::X => "X",
            Role::Y => "Y",
            Role::Color => "Color",
            Role::SecondColor => "Second Color",
        })
    }
}

/// Zero or one column per role. Names are weak references into a
/// dataset schema and are only checked when a spec is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    pub x: Option<String>,
    pub y: Option<String>,
    pub color: Option<String>,
    pub second_color: Option<String>,
}
impl Roles {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_x(mut self, column: impl Into<String>) -> Self {
        self.x = non_empty(column.into());
        self
    }
    pub fn with_y(mut self, column: impl Into<String>) -> Self {
        self.y = non_empty(column.into());
        self
    }
    pub fn with_color(mut self, column: impl Into<String>) -> Self {
        self.color = non_empty(column.into());
        self
    }
    pub fn with_second_color(mut self, column: impl Into<String>) -> Self {
        self.second_color = non_empty(column.into());
        self
    }
    pub fn get(&self, role: Role) -> Option<&str> {
        match role {
            Role::X => self.x.as_deref(),
            Role::Y => self.y.as_deref(),
            Role::Color => self.color.as_deref(),
            Role::SecondColor => self.second_color.as_deref(),
        }
    }
    pub fn assigned(&self) -> impl Iterator<Item = (Role, &str)> {
        [Role::X, Role::Y, Role::Color, Role::SecondColor]
            .into_iter()
            .filter_map(|role| self.get(role).map(|column| (role, column)))
    }
}
// Select boxes offer an empty entry; treat it as "no selection".
fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Count,
    Sum,
    Mean,
    Median,
    Max,
    Min,
}
impl Aggregation {
    /// Choices offered wherever a numeric field is aggregated.
    pub const NUMERIC: [Aggregation; 4] = [
        Aggregation::Mean,
        Aggregation::Median,
        Aggregation::Max,
        Aggregation::Min,
    ];
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Count => "count",
            Aggregation::Sum => "sum",
            Aggregation::Mean => "mean",
            Aggregation::Median => "median",
            Aggregation::Max => "max",
            Aggregation::Min => "min",
        }
    }
}
impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Granularity a datetime field is truncated to before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Year,
    Month,
    Day,
    Date,
    Week,
    Hours,
    Minutes,
    YearMonth,
    MonthDate,
    YearMonthDate,
}
impl TimeUnit {
    pub const ALL: [TimeUnit; 10] = [
        TimeUnit::Year,
        TimeUnit::Month,
        TimeUnit::Day,
        TimeUnit::Date,
        TimeUnit::Week,
        TimeUnit::Hours,
        TimeUnit::Minutes,
        TimeUnit::YearMonth,
        TimeUnit::MonthDate,
        TimeUnit::YearMonthDate,
    ];
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Year => "year",
            TimeUnit::Month => "month",
            TimeUnit::Day => "day",
            TimeUnit::Date => "date",
            TimeUnit::Week => "week",
            TimeUnit::Hours => "hours",
            TimeUnit::Minutes => "minutes",
            TimeUnit::YearMonth => "yearmonth",
            TimeUnit::MonthDate => "monthdate",
            TimeUnit::YearMonthDate => "yearmonthdate",
        }
    }
    /// Bucket key of a timestamp under this unit. Single-component units
    /// ignore the larger components, so `Month` folds every January of every
    /// year into one bucket, as the renderer does.
    pub fn bucket(&self, ts: &NaiveDateTime) -> i64 {
        let year = i64::from(ts.year());
        let month = i64::from(ts.month());
        let date = i64::from(ts.day());
        match self {
            TimeUnit::Year => year,
            TimeUnit::Month => month,
            TimeUnit::Day => i64::from(ts.weekday().num_days_from_sunday()),
            TimeUnit::Date => date,
            TimeUnit::Week => {
                let from_sunday = ts.weekday().num_days_from_sunday();
                i64::from((ts.ordinal0() + 7 - from_sunday) / 7)
            }
            TimeUnit::Hours => i64::from(ts.hour()),
            TimeUnit::Minutes => i64::from(ts.minute()),
            TimeUnit::YearMonth => year * 100 + month,
            TimeUnit::MonthDate => month * 100 + date,
            TimeUnit::YearMonthDate => year * 10_000 + month * 100 + date,
        }
    }
}
impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesMark {
    #[default]
    Line,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointMark {
    #[default]
    Point,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityMark {
    Circle,
    Rect,
}

/// Axis pairs offered for the series heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeatmapScale {
    #[default]
    MonthVsDay,
    DayVsHour,
    MonthVsYear,
}
impl HeatmapScale {
    pub const ALL: [HeatmapScale; 3] = [
        HeatmapScale::MonthVsDay,
        HeatmapScale::DayVsHour,
        HeatmapScale::MonthVsYear,
    ];
    pub fn label(&self) -> &'static str {
        match self {
            HeatmapScale::MonthVsDay => "Month v/s Day",
            HeatmapScale::DayVsHour => "Day v/s Hour",
            HeatmapScale::MonthVsYear => "Month v/s Year",
        }
    }
    /// `(x unit, y unit)`.
    pub fn units(&self) -> (TimeUnit, TimeUnit) {
        match self {
            HeatmapScale::MonthVsDay => (TimeUnit::Date, TimeUnit::Month),
            HeatmapScale::DayVsHour => (TimeUnit::Hours, TimeUnit::Date),
            HeatmapScale::MonthVsYear => (TimeUnit::Year, TimeUnit::Month),
        }
    }
}

pub(crate) fn check_bins(option: &'static str, bins: u32) -> Result<u32, SpecError> {
    if (MIN_BINS..=MAX_BINS).contains(&bins) {
        Ok(bins)
    } else {
        Err(SpecError::OptionOutOfRange {
            option,
            value: i64::from(bins),
            min: i64::from(MIN_BINS),
            max: i64::from(MAX_BINS),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramOptions {
    pub bins: u32,
    pub ordinal: bool,
    pub normalize: bool,
    pub layered: bool,
}
impl Default for HistogramOptions {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            ordinal: false,
            normalize: false,
            layered: false,
        }
    }
}
impl HistogramOptions {
    pub fn validate(&self) -> Result<(), SpecError> {
        check_bins("bins", self.bins)?;
        if self.ordinal && self.normalize {
            return Err(SpecError::ConflictingOptions {
                first: "ordinal",
                second: "normalize",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Histogram2dOptions {
    pub mark: DensityMark,
    pub bins_x: u32,
    pub bins_y: u32,
    pub ordinal: bool,
}
impl Histogram2dOptions {
    pub fn validate(&self) -> Result<(), SpecError> {
        check_bins("bins_x", self.bins_x)?;
        check_bins("bins_y", self.bins_y)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSeriesOptions {
    pub unit: TimeUnit,
    pub mark: SeriesMark,
    pub aggregation: Aggregation,
    /// Distinct buckets the x field produces at `unit`; drives label rotation.
    pub bucket_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapOptions {
    pub unit_x: TimeUnit,
    pub unit_y: TimeUnit,
    pub aggregation: Aggregation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxplotOptions {
    pub zero: bool,
    pub recolor: bool,
}
impl Default for BoxplotOptions {
    fn default() -> Self {
        Self {
            zero: true,
            recolor: false,
        }
    }
}
