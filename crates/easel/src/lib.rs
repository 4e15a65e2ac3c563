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

pub mod builders;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod options;
pub mod preview;
pub mod render;
pub mod resolver;
pub mod spec;

pub use builders::{BuildContext, Canvas};
pub use cache::{CacheStats, DatasetCache};
pub use classifier::{ColumnClassifier, ColumnKind, DatasetSchema, DetectedTypes};
pub use config::DashboardConfig;
pub use dataset::{CsvDirectorySource, Dataset, DatasetName, DatasetSource, SyntheticDatetime};
pub use error::{Advisory, ConfigError, DataError, EaselError, ErrorReporter, Result, SpecError};
pub use options::{Aggregation, ChartFamily, Role, Roles, TimeUnit};
pub use render::{HtmlFileSink, RenderSink};
pub use resolver::{ChartPanel, Selection};
pub use spec::VegaLiteSpec;

use std::path::PathBuf;
use std::sync::Arc;

/// Ties the pieces together: datasets come from `source`, are classified
/// once and cached, and selections are resolved against them.
pub struct Dashboard {
    config: DashboardConfig,
    classifier: ColumnClassifier,
    source: Box<dyn DatasetSource>,
    cache: DatasetCache,
}
impl Dashboard {
    /// Reads datasets from `config.data_dir`.
    pub fn new(config: DashboardConfig) -> Self {
        let source = CsvDirectorySource::new(config.data_dir.clone());
        Self::with_source(config, Box::new(source))
    }
    pub fn with_source(config: DashboardConfig, source: Box<dyn DatasetSource>) -> Self {
        let classifier = ColumnClassifier::with_config(config.classifier_config());
        Self {
            config,
            classifier,
            source,
            cache: DatasetCache::new(),
        }
    }
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let config = DashboardConfig::from_yaml_file(path)?.with_env_overrides();
        Ok(Self::new(config))
    }
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }
    pub fn available_datasets(&self) -> Vec<String> {
        self.source.available()
    }
    /// Cached after the first successful load.
    pub fn load(&self, name: &str) -> Result<Arc<Dataset>> {
        let dataset = self.cache.get_or_load(name, || {
            Dataset::load(
                self.source.as_ref(),
                name,
                &self.config.synthetic_datetime,
                &self.classifier,
            )
        })?;
        Ok(dataset)
    }
    /// Load an arbitrary CSV file. Not cached, since the file may change
    /// between picks.
    pub fn load_file(&self, path: &std::path::Path) -> Result<Dataset> {
        let frame = dataset::load_csv(path)?;
        let frame = self.config.synthetic_datetime.append_to(frame)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Dataset::from_frame(name, frame, &self.classifier)?)
    }
    pub fn resolve(&self, dataset: &Dataset, selection: &Selection) -> Result<Vec<ChartPanel>> {
        resolver::resolve(dataset, self.config.canvas, selection)
    }
    pub fn resolve_all(
        &self,
        dataset: &Dataset,
        selections: &[Selection],
    ) -> Vec<(ChartFamily, Result<Vec<ChartPanel>>)> {
        resolver::resolve_all(dataset, self.config.canvas, selections)
    }
    /// Write `panel` as an HTML page into the configured output directory.
    pub fn render(&self, dataset: &Dataset, panel: &ChartPanel) -> Result<PathBuf> {
        let sink = HtmlFileSink::new(self.config.output_dir.clone());
        let path = sink.render(panel.title, &panel.spec, dataset.records()?)?;
        Ok(path)
    }
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
