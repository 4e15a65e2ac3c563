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

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use easel::options::{HeatmapScale, PointMark, SeriesMark, MAX_BINS, MIN_BINS};
use easel::resolver::{
    BarSelection, BoxplotSelection, HistogramSelection, ScatterSelection, TimeSeriesSelection,
};
use easel::{
    Aggregation, ChartFamily, ChartPanel, Dashboard, DashboardConfig, Dataset, ErrorReporter,
    Role, Roles, Selection, TimeUnit,
};

#[derive(Parser, Debug)]
#[command(name = "easel-dashboard", about = "Interactive Vega-Lite chart explorer")]
struct Cli {
    /// YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory holding `<dataset>.csv` files.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Where rendered HTML pages are written.
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Smaller canvas for low-resolution screens.
    #[arg(long)]
    compact: bool,
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(args.debug)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = match &args.config {
        Some(path) => DashboardConfig::from_yaml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None if args.compact => DashboardConfig::compact(),
        None => DashboardConfig::default(),
    }
    .with_env_overrides()
    .with_overrides(args.data_dir, args.output_dir);
    info!(data_dir = %config.data_dir.display(), "starting dashboard");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_title("Easel"),
        ..Default::default()
    };
    eframe::run_native(
        "Easel",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(Dashboard::new(config))))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard window failed: {e}"))
}

/// Log directives used when `RUST_LOG` is unset.
fn default_directives(debug: bool) -> &'static str {
    if debug {
        "easel=debug,info"
    } else {
        "easel=info,easel_dashboard=info,warn"
    }
}

/// Result of resolving one tab.
enum TabOutcome {
    Panels(Vec<ChartPanel>),
    Notice(String),
}

struct DashboardApp {
    dashboard: Dashboard,
    dataset: Option<Arc<Dataset>>,
    dataset_label: String,
    available: Vec<String>,
    active: ChartFamily,
    selections: Vec<Selection>,
    outcome: Option<TabOutcome>,
    dirty: bool,
    show_types: bool,
    show_spec: bool,
    status: Option<String>,
    error_message: Option<String>,
    reporter: ErrorReporter,
}

impl DashboardApp {
    fn new(dashboard: Dashboard) -> Self {
        let default_bins = dashboard.config().default_bins;
        let selections = ChartFamily::ALL
            .iter()
            .map(|family| match Selection::empty(*family) {
                Selection::Histogram(s) => Selection::Histogram(HistogramSelection {
                    bins: Some(default_bins),
                    ..s
                }),
                other => other,
            })
            .collect();
        let available = dashboard.available_datasets();
        let mut app = Self {
            dashboard,
            dataset: None,
            dataset_label: String::new(),
            available,
            active: ChartFamily::Bar,
            selections,
            outcome: None,
            dirty: false,
            show_types: true,
            show_spec: false,
            status: None,
            error_message: None,
            reporter: ErrorReporter::plain(),
        };
        if let Some(first) = app.available.first().cloned() {
            app.select_dataset(&first);
        }
        app
    }

    fn rescan(&mut self) {
        self.available = self.dashboard.available_datasets();
    }

    fn select_dataset(&mut self, name: &str) {
        match self.dashboard.load(name) {
            Ok(dataset) => self.set_dataset(dataset, name.to_string()),
            Err(e) => self.error_message = Some(self.reporter.report(&e)),
        }
    }

    fn open_file(&mut self, path: &Path) {
        match self.dashboard.load_file(path) {
            Ok(dataset) => {
                let label = dataset.name().to_string();
                self.set_dataset(Arc::new(dataset), label);
            }
            Err(e) => self.error_message = Some(self.reporter.report(&e)),
        }
    }

    fn set_dataset(&mut self, dataset: Arc<Dataset>, label: String) {
        self.error_message = None;
        self.dataset = Some(dataset);
        self.dataset_label = label;
        // column names from the previous dataset mean nothing here
        for selection in &mut self.selections {
            *selection.roles_mut() = Roles::new();
        }
        self.dirty = true;
    }

    fn selection_mut(&mut self) -> &mut Selection {
        let index = ChartFamily::ALL
            .iter()
            .position(|f| *f == self.active)
            .unwrap_or(0);
        &mut self.selections[index]
    }

    fn refresh(&mut self) {
        self.dirty = false;
        let Some(dataset) = self.dataset.clone() else {
            self.outcome = None;
            return;
        };
        let selection = self.selection_mut().clone();
        self.outcome = Some(match self.dashboard.resolve(&dataset, &selection) {
            Ok(panels) => TabOutcome::Panels(panels),
            Err(e) => {
                if !e.is_recoverable() {
                    warn!(family = %selection.family(), error = %e, "could not build chart");
                }
                TabOutcome::Notice(self.reporter.report(&e))
            }
        });
    }

    fn open_in_browser(&self, panel: &ChartPanel) -> anyhow::Result<PathBuf> {
        let dataset = self.dataset.as_ref().context("no dataset loaded")?;
        let path = self.dashboard.render(dataset, panel)?;
        let opener = if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(target_os = "windows") {
            "explorer"
        } else {
            "xdg-open"
        };
        Command::new(opener)
            .arg(&path)
            .spawn()
            .with_context(|| format!("launching {opener}"))?;
        Ok(path)
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Easel");
                ui.separator();

                let mut picked = None;
                egui::ComboBox::from_id_salt("dataset")
                    .selected_text(if self.dataset_label.is_empty() {
                        "Pick a dataset"
                    } else {
                        self.dataset_label.as_str()
                    })
                    .show_ui(ui, |ui| {
                        for name in &self.available {
                            if ui
                                .selectable_label(self.dataset_label == *name, name)
                                .clicked()
                            {
                                picked = Some(name.clone());
                            }
                        }
                    });
                if let Some(name) = picked {
                    self.select_dataset(&name);
                }
                if ui
                    .small_button("Rescan")
                    .on_hover_text("Look for dataset files again")
                    .clicked()
                {
                    self.rescan();
                }

                if ui.button(" Open CSV File").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("CSV files", &["csv"])
                        .pick_file()
                    {
                        self.open_file(&path);
                    }
                }

                if let Some(dataset) = &self.dataset {
                    ui.label(format!(
                        "{} rows, {} columns",
                        dataset.height(),
                        dataset.schema().len()
                    ));
                }
            });
        });

        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let stats = self.dashboard.cache_stats();
                ui.label(format!(
                    "Cached datasets: {} (hit ratio {:.0}%)",
                    stats.entries,
                    stats.hit_ratio() * 100.0
                ));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status.as_str());
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.toggle_value(&mut self.show_spec, " Spec JSON");
                    ui.toggle_value(&mut self.show_types, " Detected types");
                });
            });
        });

        if self.show_types {
            egui::SidePanel::left("types_panel").show(ctx, |ui| {
                ui.heading("Detected types");
                match self.dataset.as_ref().map(|d| d.schema().detected_types()) {
                    Some(types) => {
                        egui::ScrollArea::vertical().show(ui, |ui| {
                            ui.monospace(types.to_json_pretty().unwrap_or_default());
                        });
                    }
                    None => {
                        ui.label("No dataset loaded.");
                    }
                }
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(error) = &self.error_message {
                ui.colored_label(egui::Color32::RED, "Error:");
                ui.monospace(error.as_str());
                ui.separator();
            }
            let Some(dataset) = self.dataset.clone() else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Pick a dataset or open a CSV file to get started");
                });
                return;
            };

            ui.horizontal_wrapped(|ui| {
                for family in ChartFamily::ALL {
                    if ui
                        .selectable_value(&mut self.active, family, family.label())
                        .changed()
                    {
                        self.dirty = true;
                    }
                }
            });
            ui.separator();

            let family = self.active;
            let changed = selection_controls(ui, &dataset, self.selection_mut());
            if changed {
                self.dirty = true;
            }
            if self.dirty {
                self.refresh();
            }
            ui.separator();

            let mut open = None;
            egui::ScrollArea::vertical().show(ui, |ui| match &self.outcome {
                Some(TabOutcome::Notice(message)) => {
                    ui.colored_label(egui::Color32::YELLOW, message.as_str());
                }
                Some(TabOutcome::Panels(panels)) => {
                    for (i, panel) in panels.iter().enumerate() {
                        ui.push_id((family.label(), i), |ui| {
                            ui.group(|ui| {
                                ui.horizontal(|ui| {
                                    ui.strong(panel.title);
                                    ui.with_layout(
                                        egui::Layout::right_to_left(egui::Align::Center),
                                        |ui| {
                                            if ui.button(" Open in Browser").clicked() {
                                                open = Some(i);
                                            }
                                            if ui.button(" Copy Spec").clicked() {
                                                if let Ok(json) = panel.spec.to_json_pretty() {
                                                    ui.ctx().copy_text(json);
                                                }
                                            }
                                        },
                                    );
                                });
                                if self.show_spec {
                                    egui::ScrollArea::vertical()
                                        .max_height(300.0)
                                        .show(ui, |ui| {
                                            ui.monospace(
                                                panel.spec.to_json_pretty().unwrap_or_default(),
                                            );
                                        });
                                }
                            });
                        });
                    }
                }
                None => {}
            });

            if let (Some(i), Some(TabOutcome::Panels(panels))) = (open, &self.outcome) {
                let result = self.open_in_browser(&panels[i]);
                match result {
                    Ok(path) => self.status = Some(format!("Wrote {}", path.display())),
                    Err(e) => self.error_message = Some(format!("Failed to open chart: {e:#}")),
                }
            }
        });
    }
}

/// Draws the option widgets for one tab. Returns whether anything changed.
fn selection_controls(ui: &mut egui::Ui, dataset: &Dataset, selection: &mut Selection) -> bool {
    let family = selection.family();
    let mut changed = false;
    ui.horizontal_wrapped(|ui| {
        for role in [Role::X, Role::Y, Role::Color, Role::SecondColor] {
            let kinds = family.accepts(role);
            if kinds.is_empty() {
                continue;
            }
            let label = match (family, role) {
                (ChartFamily::DonutComplex, Role::Color) => "Inner Color".to_string(),
                (ChartFamily::DonutComplex, Role::SecondColor) => "Outer Color".to_string(),
                _ => role.to_string(),
            };
            let columns = dataset.schema().names_of_any(kinds);
            changed |= role_picker(ui, family, role, &label, &columns, selection.roles_mut());
        }
    });

    ui.horizontal_wrapped(|ui| {
        match selection {
            Selection::Bar(BarSelection { aggregation, .. }) => {
                let mut current = aggregation.unwrap_or(Aggregation::Mean);
                if aggregation_picker(ui, "bar_agg", "Aggregation", &mut current) {
                    *aggregation = Some(current);
                    changed = true;
                }
            }
            Selection::Histogram(s) => {
                let mut bins = s.bins.unwrap_or(easel::options::DEFAULT_BINS);
                ui.label("Bins");
                if ui
                    .add(egui::Slider::new(&mut bins, MIN_BINS..=MAX_BINS))
                    .changed()
                {
                    s.bins = Some(bins);
                    changed = true;
                }
                changed |= ui.checkbox(&mut s.ordinal, "Ordinal").changed();
                changed |= ui.checkbox(&mut s.normalize, "Normalize").changed();
            }
            Selection::TimeSeries(s) => {
                egui::ComboBox::from_id_salt("time_unit")
                    .selected_text(format!("Time unit: {}", s.unit))
                    .show_ui(ui, |ui| {
                        for unit in TimeUnit::ALL {
                            changed |= ui
                                .selectable_value(&mut s.unit, unit, unit.as_str())
                                .changed();
                        }
                    });
                changed |= ui.radio_value(&mut s.mark, SeriesMark::Line, "Line").changed();
                changed |= ui.radio_value(&mut s.mark, SeriesMark::Bar, "Bar").changed();
                changed |= aggregation_picker(ui, "series_agg", "Aggregation", &mut s.aggregation);
                ui.separator();
                egui::ComboBox::from_id_salt("heatmap_scale")
                    .selected_text(s.heatmap_scale.label())
                    .show_ui(ui, |ui| {
                        for scale in HeatmapScale::ALL {
                            changed |= ui
                                .selectable_value(&mut s.heatmap_scale, scale, scale.label())
                                .changed();
                        }
                    });
                changed |= aggregation_picker(
                    ui,
                    "heatmap_agg",
                    "Heatmap aggregation",
                    &mut s.heatmap_aggregation,
                );
            }
            Selection::Boxplot(BoxplotSelection { zero, recolor, .. }) => {
                changed |= ui.checkbox(zero, "Zero").changed();
                changed |= ui.checkbox(recolor, "Color by X").changed();
            }
            Selection::Scatter(ScatterSelection { mark, .. }) => {
                changed |= ui.radio_value(mark, PointMark::Point, "Point").changed();
                changed |= ui.radio_value(mark, PointMark::Circle, "Circle").changed();
            }
            Selection::DonutSimple(_) | Selection::DonutComplex(_) | Selection::Line(_) => {}
        }
    });
    changed
}

fn role_picker(
    ui: &mut egui::Ui,
    family: ChartFamily,
    role: Role,
    label: &str,
    columns: &[&str],
    roles: &mut Roles,
) -> bool {
    let current = roles.get(role).map(str::to_string);
    let mut picked = current.clone();
    ui.label(label);
    egui::ComboBox::from_id_salt((family.label(), label))
        .selected_text(current.as_deref().unwrap_or(""))
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut picked, None, "");
            for column in columns {
                ui.selectable_value(&mut picked, Some((*column).to_string()), *column);
            }
        });
    if picked == current {
        return false;
    }
    let column = picked.unwrap_or_default();
    *roles = match role {
        Role::X => roles.clone().with_x(column),
        Role::Y => roles.clone().with_y(column),
        Role::Color => roles.clone().with_color(column),
        Role::SecondColor => roles.clone().with_second_color(column),
    };
    true
}

fn aggregation_picker(ui: &mut egui::Ui, id: &str, label: &str, value: &mut Aggregation) -> bool {
    let mut changed = false;
    egui::ComboBox::from_id_salt(id)
        .selected_text(format!("{label}: {value}"))
        .show_ui(ui, |ui| {
            for aggregation in Aggregation::NUMERIC {
                changed |= ui
                    .selectable_value(value, aggregation, aggregation.as_str())
                    .changed();
            }
        });
    changed
}
