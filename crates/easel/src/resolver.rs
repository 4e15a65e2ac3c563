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

//! Maps what the user picked in one tab to the chart variant(s) to build.
//!
//! Each family first turns its role presence pattern into a variant enum
//! (or an [`Advisory`] when a required role is missing or a combination is
//! not allowed), then checks the picked columns' kinds, then calls one
//! builder per panel. A family that fails produces nothing; other families
//! are unaffected.

use crate::builders::{
    bar, boxplot, donut, heatmap, histogram, histogram_2d, line, scatter, timeseries,
    BuildContext, Canvas,
};
use crate::classifier::DatasetSchema;
use crate::dataset::Dataset;
use crate::error::{Advisory, Result};
use crate::options::{
    Aggregation, BoxplotOptions, ChartFamily, DensityMark, HeatmapOptions,
    HeatmapScale, Histogram2dOptions, HistogramOptions, PointMark, Role, Roles, SeriesMark,
    TimeSeriesOptions, TimeUnit,
};
use crate::spec::VegaLiteSpec;
use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One rendered chart and the heading it is shown under.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPanel {
    pub family: ChartFamily,
    pub title: &'static str,
    pub spec: VegaLiteSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarSelection {
    pub roles: Roles,
    /// Aggregation for the variants with a Y column; mean when unset.
    pub aggregation: Option<Aggregation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistogramSelection {
    pub roles: Roles,
    pub bins: Option<u32>,
    pub ordinal: bool,
    pub normalize: bool,
}
impl HistogramSelection {
    fn options(&self) -> HistogramOptions {
        HistogramOptions {
            bins: self.bins.unwrap_or(HistogramOptions::default().bins),
            ordinal: self.ordinal,
            normalize: self.normalize,
            layered: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesSelection {
    pub roles: Roles,
    pub unit: TimeUnit,
    pub mark: SeriesMark,
    pub aggregation: Aggregation,
    pub heatmap_aggregation: Aggregation,
    pub heatmap_scale: HeatmapScale,
}
impl Default for TimeSeriesSelection {
    fn default() -> Self {
        Self {
            roles: Roles::default(),
            unit: TimeUnit::Year,
            mark: SeriesMark::Line,
            aggregation: Aggregation::Mean,
            heatmap_aggregation: Aggregation::Mean,
            heatmap_scale: HeatmapScale::MonthVsDay,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxplotSelection {
    pub roles: Roles,
    pub zero: bool,
    pub recolor: bool,
}
impl Default for BoxplotSelection {
    fn default() -> Self {
        let options = BoxplotOptions::default();
        Self {
            roles: Roles::default(),
            zero: options.zero,
            recolor: options.recolor,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScatterSelection {
    pub roles: Roles,
    pub mark: PointMark,
}

/// Everything picked in one tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Selection {
    Bar(BarSelection),
    Histogram(HistogramSelection),
    TimeSeries(TimeSeriesSelection),
    Boxplot(BoxplotSelection),
    Scatter(ScatterSelection),
    DonutSimple(Roles),
    DonutComplex(Roles),
    Line(Roles),
}
impl Selection {
    /// Nothing picked yet.
    pub fn empty(family: ChartFamily) -> Self {
        match family {
            ChartFamily::Bar => Selection::Bar(BarSelection::default()),
            ChartFamily::Histogram => Selection::Histogram(HistogramSelection::default()),
            ChartFamily::TimeSeries => Selection::TimeSeries(TimeSeriesSelection::default()),
            ChartFamily::Boxplot => Selection::Boxplot(BoxplotSelection::default()),
            ChartFamily::Scatter => Selection::Scatter(ScatterSelection::default()),
            ChartFamily::DonutSimple => Selection::DonutSimple(Roles::default()),
            ChartFamily::DonutComplex => Selection::DonutComplex(Roles::default()),
            ChartFamily::Line => Selection::Line(Roles::default()),
        }
    }
    pub fn family(&self) -> ChartFamily {
        match self {
            Selection::Bar(_) => ChartFamily::Bar,
            Selection::Histogram(_) => ChartFamily::Histogram,
            Selection::TimeSeries(_) => ChartFamily::TimeSeries,
            Selection::Boxplot(_) => ChartFamily::Boxplot,
            Selection::Scatter(_) => ChartFamily::Scatter,
            Selection::DonutSimple(_) => ChartFamily::DonutSimple,
            Selection::DonutComplex(_) => ChartFamily::DonutComplex,
            Selection::Line(_) => ChartFamily::Line,
        }
    }
    pub fn roles(&self) -> &Roles {
        match self {
            Selection::Bar(s) => &s.roles,
            Selection::Histogram(s) => &s.roles,
            Selection::TimeSeries(s) => &s.roles,
            Selection::Boxplot(s) => &s.roles,
            Selection::Scatter(s) => &s.roles,
            Selection::DonutSimple(roles)
            | Selection::DonutComplex(roles)
            | Selection::Line(roles) => roles,
        }
    }
    pub fn roles_mut(&mut self) -> &mut Roles {
        match self {
            Selection::Bar(s) => &mut s.roles,
            Selection::Histogram(s) => &mut s.roles,
            Selection::TimeSeries(s) => &mut s.roles,
            Selection::Boxplot(s) => &mut s.roles,
            Selection::Scatter(s) => &mut s.roles,
            Selection::DonutSimple(roles)
            | Selection::DonutComplex(roles)
            | Selection::Line(roles) => roles,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarVariant<'a> {
    Count { x: &'a str },
    Aggregated { x: &'a str, y: &'a str },
    Stacked { x: &'a str, color: &'a str },
    Grouped { x: &'a str, y: &'a str, color: &'a str },
}
impl<'a> BarVariant<'a> {
    pub fn from_roles(roles: &'a Roles) -> std::result::Result<Self, Advisory> {
        let x = required(roles, ChartFamily::Bar, Role::X)?;
        Ok(match (roles.y.as_deref(), roles.color.as_deref()) {
            (None, None) => BarVariant::Count { x },
            (Some(y), None) => BarVariant::Aggregated { x, y },
            (None, Some(color)) => BarVariant::Stacked { x, color },
            (Some(y), Some(color)) => BarVariant::Grouped { x, y, color },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistogramVariant<'a> {
    Simple { x: &'a str },
    Density { x: &'a str, y: &'a str },
    ByColor { x: &'a str, color: &'a str },
}
impl<'a> HistogramVariant<'a> {
    pub fn from_selection(
        selection: &'a HistogramSelection,
    ) -> std::result::Result<Self, Advisory> {
        let family = ChartFamily::Histogram;
        let roles = &selection.roles;
        let x = required(roles, family, Role::X)?;
        match (roles.y.as_deref(), roles.color.as_deref()) {
            (None, None) if selection.ordinal && selection.normalize => {
                Err(Advisory::ExclusiveOptions {
                    family,
                    first: "Ordinal",
                    second: "Normalize",
                })
            }
            (None, None) => Ok(HistogramVariant::Simple { x }),
            (Some(y), None) => Ok(HistogramVariant::Density { x, y }),
            (None, Some(color)) => Ok(HistogramVariant::ByColor { x, color }),
            (Some(_), Some(_)) => Err(Advisory::ExclusiveRoles {
                family,
                first: Role::Y,
                second: Role::Color,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesVariant<'a> {
    Count {
        x: &'a str,
        color: Option<&'a str>,
    },
    Aggregated {
        x: &'a str,
        y: &'a str,
        color: Option<&'a str>,
    },
}
impl<'a> SeriesVariant<'a> {
    pub fn from_roles(roles: &'a Roles) -> std::result::Result<Self, Advisory> {
        let x = required(roles, ChartFamily::TimeSeries, Role::X)?;
        let color = roles.color.as_deref();
        Ok(match roles.y.as_deref() {
            None => SeriesVariant::Count { x, color },
            Some(y) => SeriesVariant::Aggregated { x, y, color },
        })
    }
}

fn required<'a>(
    roles: &'a Roles,
    family: ChartFamily,
    role: Role,
) -> std::result::Result<&'a str, Advisory> {
    roles.get(role).ok_or(Advisory::MissingRole { family, role })
}

fn both<'a>(
    roles: &'a Roles,
    family: ChartFamily,
) -> std::result::Result<(&'a str, &'a str), Advisory> {
    match (roles.x.as_deref(), roles.y.as_deref()) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(Advisory::MissingRoles {
            family,
            first: Role::X,
            second: Role::Y,
        }),
    }
}

/// Every role the family uses must hold a column of an accepted kind.
/// Columns missing from the schema are left for the builder to reject.
fn check_kinds(
    schema: &DatasetSchema,
    family: ChartFamily,
    roles: &Roles,
) -> std::result::Result<(), Advisory> {
    for (role, column) in roles.assigned() {
        let accepted = family.accepts(role);
        if accepted.is_empty() {
            continue;
        }
        match schema.kind_of(column) {
            Some(kind) if !accepted.contains(&kind) => {
                return Err(Advisory::RoleMismatch {
                    family,
                    role,
                    column: column.to_string(),
                    expected: accepted.iter().join(" or "),
                })
            }
            _ => {}
        }
    }
    Ok(())
}

pub const BAR_COUNT_TITLE: &str = "Count bar plot";
pub const BAR_AGGREGATED_TITLE: &str = "Mean bar plot";
pub const BAR_STACKED_TITLE: &str = "Stacked bar";
pub const BAR_NORMED_TITLE: &str = "Normed bar";
pub const BAR_GROUPED_TITLE: &str = "Grouped bar";
pub const HISTOGRAM_SIMPLE_TITLE: &str = "Simple histogram";
pub const HISTOGRAM_SCATTER_TITLE: &str = "2D scatter histogram";
pub const HISTOGRAM_HEATMAP_TITLE: &str = "2D heatmap histogram";
pub const HISTOGRAM_STACKED_TITLE: &str = "Stacked histogram";
pub const HISTOGRAM_LAYERED_TITLE: &str = "Layered histogram";
pub const SERIES_COUNT_TITLE: &str = "Count series plot";
pub const SERIES_AGGREGATED_TITLE: &str = "Aggregated series plot";
pub const SERIES_HEATMAP_TITLE: &str = "Heatmap series plot";
pub const BOXPLOT_TITLE: &str = "Box plot";
pub const SCATTER_TITLE: &str = "Scatter plot";
pub const DONUT_SIMPLE_TITLE: &str = "Donut chart";
pub const DONUT_COMPLEX_TITLE: &str = "Two-ring donut chart";
pub const LINE_TITLE: &str = "Line plot";

/// Panels for one tab's selection over `dataset`.
pub fn resolve(dataset: &Dataset, canvas: Canvas, selection: &Selection) -> Result<Vec<ChartPanel>> {
    let family = selection.family();
    let ctx = BuildContext::new(dataset.schema()).with_canvas(canvas);
    let panel = |title: &'static str, spec: VegaLiteSpec| ChartPanel {
        family,
        title,
        spec,
    };
    let panels = match selection {
        Selection::Bar(s) => {
            let variant = BarVariant::from_roles(&s.roles)?;
            check_kinds(ctx.schema, family, &s.roles)?;
            debug!(?variant, "bar variant");
            let aggregation = s.aggregation.unwrap_or(Aggregation::Mean);
            match variant {
                BarVariant::Count { x } => vec![panel(BAR_COUNT_TITLE, bar::count_bar(&ctx, x)?)],
                BarVariant::Aggregated { x, y } => vec![panel(
                    BAR_AGGREGATED_TITLE,
                    bar::aggregated_bar(&ctx, x, y, aggregation)?,
                )],
                BarVariant::Stacked { x, color } => vec![
                    panel(BAR_STACKED_TITLE, bar::stacked_bar(&ctx, x, color, false)?),
                    panel(BAR_NORMED_TITLE, bar::stacked_bar(&ctx, x, color, true)?),
                ],
                BarVariant::Grouped { x, y, color } => vec![panel(
                    BAR_GROUPED_TITLE,
                    bar::grouped_bar(&ctx, x, y, color, aggregation)?,
                )],
            }
        }
        Selection::Histogram(s) => {
            let variant = HistogramVariant::from_selection(s)?;
            check_kinds(ctx.schema, family, &s.roles)?;
            debug!(?variant, bins = ?s.bins, "histogram variant");
            let options = s.options();
            match variant {
                HistogramVariant::Simple { x } => vec![panel(
                    HISTOGRAM_SIMPLE_TITLE,
                    histogram::simple_histogram(&ctx, x, &options)?,
                )],
                HistogramVariant::Density { x, y } => {
                    let density = |mark| Histogram2dOptions {
                        mark,
                        bins_x: options.bins,
                        bins_y: options.bins,
                        ordinal: options.ordinal,
                    };
                    vec![
                        panel(
                            HISTOGRAM_SCATTER_TITLE,
                            histogram_2d::density_histogram(&ctx, x, y, &density(DensityMark::Circle))?,
                        ),
                        panel(
                            HISTOGRAM_HEATMAP_TITLE,
                            histogram_2d::density_histogram(&ctx, x, y, &density(DensityMark::Rect))?,
                        ),
                    ]
                }
                HistogramVariant::ByColor { x, color } => vec![
                    panel(
                        HISTOGRAM_STACKED_TITLE,
                        histogram::color_histogram(&ctx, x, color, &options)?,
                    ),
                    panel(
                        HISTOGRAM_LAYERED_TITLE,
                        histogram::color_histogram(
                            &ctx,
                            x,
                            color,
                            &HistogramOptions {
                                layered: true,
                                ..options
                            },
                        )?,
                    ),
                ],
            }
        }
        Selection::TimeSeries(s) => {
            let variant = SeriesVariant::from_roles(&s.roles)?;
            check_kinds(ctx.schema, family, &s.roles)?;
            let x = match variant {
                SeriesVariant::Count { x, .. } | SeriesVariant::Aggregated { x, .. } => x,
            };
            ctx.schema.require(Role::X, x)?;
            let bucket_count = dataset.distinct_time_buckets(x, s.unit)?;
            debug!(?variant, unit = %s.unit, bucket_count, "time series variant");
            let options = TimeSeriesOptions {
                unit: s.unit,
                mark: s.mark,
                aggregation: s.aggregation,
                bucket_count,
            };
            match variant {
                SeriesVariant::Count { x, color } => vec![panel(
                    SERIES_COUNT_TITLE,
                    timeseries::count_series(&ctx, x, color, &options)?,
                )],
                SeriesVariant::Aggregated { x, y, color } => {
                    let (unit_x, unit_y) = s.heatmap_scale.units();
                    let heat = HeatmapOptions {
                        unit_x,
                        unit_y,
                        aggregation: s.heatmap_aggregation,
                    };
                    vec![
                        panel(
                            SERIES_AGGREGATED_TITLE,
                            timeseries::aggregated_series(&ctx, x, y, color, &options)?,
                        ),
                        panel(SERIES_HEATMAP_TITLE, heatmap::series_heatmap(&ctx, x, y, &heat)?),
                    ]
                }
            }
        }
        Selection::Boxplot(s) => {
            let y = required(&s.roles, family, Role::Y)?;
            let x = required(&s.roles, family, Role::X)?;
            check_kinds(ctx.schema, family, &s.roles)?;
            let options = BoxplotOptions {
                zero: s.zero,
                recolor: s.recolor,
            };
            vec![panel(BOXPLOT_TITLE, boxplot::boxplot(&ctx, x, y, &options)?)]
        }
        Selection::Scatter(s) => {
            let (x, y) = both(&s.roles, family)?;
            check_kinds(ctx.schema, family, &s.roles)?;
            vec![panel(
                SCATTER_TITLE,
                scatter::scatter(&ctx, x, y, s.roles.color.as_deref(), s.mark)?,
            )]
        }
        Selection::DonutSimple(roles) => {
            let color = required(roles, family, Role::Color)?;
            check_kinds(ctx.schema, family, roles)?;
            vec![panel(DONUT_SIMPLE_TITLE, donut::simple_donut(&ctx, color)?)]
        }
        Selection::DonutComplex(roles) => {
            let (Some(inner), Some(outer)) = (roles.color.as_deref(), roles.second_color.as_deref())
            else {
                return Err(Advisory::MissingColors { family }.into());
            };
            check_kinds(ctx.schema, family, roles)?;
            vec![panel(DONUT_COMPLEX_TITLE, donut::two_ring_donut(&ctx, inner, outer)?)]
        }
        Selection::Line(roles) => {
            let (x, y) = both(roles, family)?;
            check_kinds(ctx.schema, family, roles)?;
            vec![panel(LINE_TITLE, line::line(&ctx, x, y, roles.color.as_deref())?)]
        }
    };
    debug!(%family, panels = panels.len(), "resolved");
    Ok(panels)
}

/// Resolve every selection independently; one family failing leaves the
/// others untouched.
pub fn resolve_all(
    dataset: &Dataset,
    canvas: Canvas,
    selections: &[Selection],
) -> Vec<(ChartFamily, Result<Vec<ChartPanel>>)> {
    selections
        .par_iter()
        .map(|selection| {
            let family = selection.family();
            let result = resolve(dataset, canvas, selection);
            if let Err(e) = &result {
                if e.is_recoverable() {
                    debug!(%family, error = %e, "no chart");
                } else {
                    warn!(%family, error = %e, "chart failed");
                }
            }
            (family, result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ColumnClassifier;
    use crate::dataset::SyntheticDatetime;
    use crate::error::{EaselError, SpecError};
    use crate::options::TimeUnit;
    use polars::prelude::*;

    fn dataset() -> Dataset {
        let n = 30;
        let class: Vec<&str> = (0..n).map(|i| ["A", "B", "C"][i % 3]).collect();
        let sex: Vec<&str> = (0..n).map(|i| ["m", "f"][i % 2]).collect();
        let fare: Vec<f64> = (0..n).map(|i| i as f64 * 1.5 + 0.25).collect();
        let age: Vec<f64> = (0..n).map(|i| (i * 7 % 61) as f64).collect();
        let frame = df!("class" => class, "sex" => sex, "fare" => fare, "age" => age).unwrap();
        let frame = SyntheticDatetime::default().append_to(frame).unwrap();
        Dataset::from_frame("titanic", frame, &ColumnClassifier::new()).unwrap()
    }

    fn titles(result: Result<Vec<ChartPanel>>) -> Vec<&'static str> {
        result.unwrap().into_iter().map(|p| p.title).collect()
    }

    fn advisory(result: Result<Vec<ChartPanel>>) -> Advisory {
        match result {
            Err(EaselError::Advisory(a)) => a,
            other => panic!("expected advisory, got {other:?}"),
        }
    }

    #[test]
    fn bar_variants_follow_presence_pattern() {
        let roles = Roles::new().with_x("class");
        assert_eq!(BarVariant::from_roles(&roles), Ok(BarVariant::Count { x: "class" }));
        let roles = roles.with_color("sex");
        assert_eq!(
            BarVariant::from_roles(&roles),
            Ok(BarVariant::Stacked {
                x: "class",
                color: "sex"
            })
        );
        assert_eq!(
            BarVariant::from_roles(&Roles::new().with_y("fare")),
            Err(Advisory::MissingRole {
                family: ChartFamily::Bar,
                role: Role::X
            })
        );
    }

    #[test]
    fn bar_panels() {
        let ds = dataset();
        let canvas = Canvas::default();
        let select = |roles: Roles| {
            resolve(
                &ds,
                canvas,
                &Selection::Bar(BarSelection {
                    roles,
                    aggregation: None,
                }),
            )
        };
        assert_eq!(titles(select(Roles::new().with_x("class"))), vec![BAR_COUNT_TITLE]);
        assert_eq!(
            titles(select(Roles::new().with_x("class").with_color("sex"))),
            vec![BAR_STACKED_TITLE, BAR_NORMED_TITLE]
        );
        let grouped = select(Roles::new().with_x("class").with_y("fare").with_color("sex")).unwrap();
        assert_eq!(grouped.len(), 1);
        let value = grouped[0].spec.to_value().unwrap();
        assert_eq!(value["encoding"]["y"]["aggregate"], "mean");
        assert_eq!(value["encoding"]["xOffset"]["field"], "sex");
    }

    #[test]
    fn bar_aggregation_override() {
        let ds = dataset();
        let panels = resolve(
            &ds,
            Canvas::default(),
            &Selection::Bar(BarSelection {
                roles: Roles::new().with_x("class").with_y("fare"),
                aggregation: Some(Aggregation::Median),
            }),
        )
        .unwrap();
        assert_eq!(panels[0].spec.to_value().unwrap()["encoding"]["y"]["aggregate"], "median");
    }

    #[test]
    fn histogram_rules() {
        let ds = dataset();
        let run = |roles: Roles, ordinal: bool, normalize: bool| {
            resolve(
                &ds,
                Canvas::default(),
                &Selection::Histogram(HistogramSelection {
                    roles,
                    bins: Some(10),
                    ordinal,
                    normalize,
                }),
            )
        };
        assert_eq!(
            titles(run(Roles::new().with_x("fare"), false, true)),
            vec![HISTOGRAM_SIMPLE_TITLE]
        );
        assert_eq!(
            advisory(run(Roles::new().with_x("fare"), true, true)).to_string(),
            "Please select only one (Ordinal or Normalize)"
        );
        assert_eq!(
            titles(run(Roles::new().with_x("fare").with_y("age"), true, false)),
            vec![HISTOGRAM_SCATTER_TITLE, HISTOGRAM_HEATMAP_TITLE]
        );
        // ordinal and normalize only conflict in the single-series branch
        assert_eq!(
            titles(run(Roles::new().with_x("fare").with_color("sex"), true, true)),
            vec![HISTOGRAM_STACKED_TITLE, HISTOGRAM_LAYERED_TITLE]
        );
        assert_eq!(
            advisory(run(Roles::new().with_x("fare").with_y("age").with_color("sex"), false, false))
                .to_string(),
            "You cannot select Y and Color at the same time."
        );
    }

    #[test]
    fn layered_panel_disables_stacking() {
        let ds = dataset();
        let panels = resolve(
            &ds,
            Canvas::default(),
            &Selection::Histogram(HistogramSelection {
                roles: Roles::new().with_x("fare").with_color("class"),
                ..HistogramSelection::default()
            }),
        )
        .unwrap();
        let stacked = panels[0].spec.to_value().unwrap();
        let layered = panels[1].spec.to_value().unwrap();
        assert_eq!(stacked["encoding"]["y"]["stack"], "zero");
        assert_eq!(layered["encoding"]["y"].get("stack"), Some(&serde_json::Value::Null));
        assert_eq!(layered["params"][0]["name"], "select");
    }

    #[test]
    fn time_series_counts_buckets_from_data() {
        let ds = dataset();
        let run = |unit: TimeUnit, y: &str| {
            resolve(
                &ds,
                Canvas::default(),
                &Selection::TimeSeries(TimeSeriesSelection {
                    roles: Roles::new().with_x("date").with_y(y),
                    unit,
                    ..TimeSeriesSelection::default()
                }),
            )
            .unwrap()
        };
        // points are under a year apart, so every year from 2000 to 2022 is hit
        let by_year = run(TimeUnit::Year, "");
        assert_eq!(by_year.len(), 1);
        assert_eq!(by_year[0].title, SERIES_COUNT_TITLE);
        assert_eq!(
            by_year[0].spec.to_value().unwrap()["encoding"]["x"]["axis"]["labelAngle"],
            -45
        );
        let by_month = run(TimeUnit::Month, "fare");
        assert_eq!(
            by_month.iter().map(|p| p.title).collect::<Vec<_>>(),
            vec![SERIES_AGGREGATED_TITLE, SERIES_HEATMAP_TITLE]
        );
        assert_eq!(
            by_month[0].spec.to_value().unwrap()["encoding"]["x"]["axis"]["labelAngle"],
            0
        );
    }

    #[test]
    fn role_kind_mismatch_is_an_advisory() {
        let ds = dataset();
        let result = resolve(
            &ds,
            Canvas::default(),
            &Selection::Bar(BarSelection {
                roles: Roles::new().with_x("fare"),
                aggregation: None,
            }),
        );
        match advisory(result) {
            Advisory::RoleMismatch { role, column, .. } => {
                assert_eq!(role, Role::X);
                assert_eq!(column, "fare");
            }
            other => panic!("unexpected advisory {other:?}"),
        }
    }

    #[test]
    fn unknown_column_is_a_spec_error() {
        let ds = dataset();
        let result = resolve(
            &ds,
            Canvas::default(),
            &Selection::Line(Roles::new().with_x("fare").with_y("ghost")),
        );
        assert!(matches!(
            result,
            Err(EaselError::Spec(SpecError::UnknownColumn { role: Role::Y, .. }))
        ));
    }

    #[test]
    fn required_role_advisories() {
        let ds = dataset();
        let canvas = Canvas::default();
        let message = |selection: Selection| advisory(resolve(&ds, canvas, &selection)).to_string();
        assert_eq!(
            message(Selection::Boxplot(BoxplotSelection {
                roles: Roles::new().with_x("class"),
                ..BoxplotSelection::default()
            })),
            "Please select a value for Y."
        );
        assert_eq!(
            message(Selection::Scatter(ScatterSelection {
                roles: Roles::new().with_x("fare"),
                mark: PointMark::Point,
            })),
            "Please select values for both X and Y."
        );
        assert_eq!(
            message(Selection::DonutSimple(Roles::new())),
            "Please select a value for Color."
        );
        assert_eq!(
            message(Selection::DonutComplex(Roles::new().with_color("class"))),
            "Please select a value for both Colors."
        );
        assert_eq!(
            message(Selection::Line(Roles::new().with_y("fare"))),
            "Please select values for both X and Y."
        );
        assert_eq!(
            message(Selection::TimeSeries(TimeSeriesSelection::default())),
            "Please select a value for X."
        );
    }

    #[test]
    fn resolve_all_isolates_failures() {
        let ds = dataset();
        let selections: Vec<Selection> = ChartFamily::ALL
            .iter()
            .map(|family| Selection::empty(*family))
            .chain([Selection::DonutSimple(Roles::new().with_color("class"))])
            .collect();
        let results = resolve_all(&ds, Canvas::default(), &selections);
        assert_eq!(results.len(), 9);
        assert!(results[..8].iter().all(|(_, r)| r.is_err()));
        let (family, last) = &results[8];
        assert_eq!(*family, ChartFamily::DonutSimple);
        assert_eq!(last.as_ref().unwrap()[0].title, DONUT_SIMPLE_TITLE);
    }
}
