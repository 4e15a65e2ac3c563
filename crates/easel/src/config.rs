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

use crate::builders::Canvas;
use crate::classifier::{ClassifierConfig, DEFAULT_CONTINUOUS_THRESHOLD};
use crate::dataset::SyntheticDatetime;
use crate::error::{ConfigError, ConfigResult};
use crate::options::{DEFAULT_BINS, MAX_BINS, MIN_BINS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "EASEL_DATA_DIR";
pub const OUTPUT_DIR_ENV: &str = "EASEL_OUTPUT_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub canvas: Canvas,
    pub continuous_threshold: usize,
    pub default_bins: u32,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub synthetic_datetime: SyntheticDatetime,
}
impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            continuous_threshold: DEFAULT_CONTINUOUS_THRESHOLD,
            default_bins: DEFAULT_BINS,
            data_dir: PathBuf::from("data"),
            output_dir: std::env::temp_dir().join("easel"),
            synthetic_datetime: SyntheticDatetime::default(),
        }
    }
}
impl DashboardConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::ConfigFileError {
                path: path.as_ref().display().to_string(),
                source,
            })?;
        Self::from_yaml_str(&content)
    }
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
    /// Overlay `EASEL_DATA_DIR` / `EASEL_OUTPUT_DIR` when set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
            std::env::var_os(OUTPUT_DIR_ENV).map(PathBuf::from),
        )
    }
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, output_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        self
    }
    pub fn validate(&self) -> ConfigResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(invalid(
                "canvas",
                format!("{}x{}", self.canvas.width, self.canvas.height),
            ));
        }
        if !(MIN_BINS..=MAX_BINS).contains(&self.default_bins) {
            return Err(invalid("default_bins", self.default_bins.to_string()));
        }
        if self.synthetic_datetime.column.trim().is_empty() {
            return Err(invalid("synthetic_datetime.column", "\"\"".to_string()));
        }
        if self.synthetic_datetime.end < self.synthetic_datetime.start {
            return Err(invalid(
                "synthetic_datetime",
                format!(
                    "{} .. {}",
                    self.synthetic_datetime.start, self.synthetic_datetime.end
                ),
            ));
        }
        Ok(())
    }
    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            continuous_threshold: self.continuous_threshold,
        }
    }
    /// Smaller canvas for side panels and low-resolution screens.
    pub fn compact() -> Self {
        Self {
            canvas: Canvas {
                width: 400,
                height: 260,
            },
            ..Default::default()
        }
    }
}

fn invalid(field: &str, value: String) -> ConfigError {
    ConfigError::InvalidField {
        field: field.to_string(),
        value,
    }
}
