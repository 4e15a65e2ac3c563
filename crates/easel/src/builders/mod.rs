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

//! One pure function per chart variant. Builders only check that the
//! columns they are handed exist and that numeric options are in range;
//! deciding which variant applies is the resolver's job.

pub mod bar;
pub mod boxplot;
pub mod donut;
pub mod heatmap;
pub mod histogram;
pub mod histogram_2d;
pub mod line;
pub mod scatter;
pub mod timeseries;

use crate::classifier::{ColumnKind, DatasetSchema};
use crate::error::SpecResult;
use crate::options::Role;
use crate::spec::{Config, VegaLiteSpec};
use serde::{Deserialize, Serialize};

/// Name of the legend-bound selection parameter.
pub const SELECTION_PARAM: &str = "select";
/// One-decimal percent.
pub const PERCENT_FORMAT: &str = ".1%";
/// Bucket count above which time axis labels are rotated.
pub const LABEL_ROTATION_THRESHOLD: usize = 20;
pub const ROTATED_LABEL_ANGLE: i32 = -45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}
impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
        }
    }
}

/// What every builder needs besides its own options.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub schema: &'a DatasetSchema,
    pub canvas: Canvas,
}
impl<'a> BuildContext<'a> {
    pub fn new(schema: &'a DatasetSchema) -> Self {
        Self {
            schema,
            canvas: Canvas::default(),
        }
    }
    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }
    pub(crate) fn column<'c>(&self, role: Role, name: &'c str) -> SpecResult<&'c str> {
        self.schema.require(role, name)?;
        Ok(name)
    }
    pub(crate) fn is_datetime(&self, name: &str) -> bool {
        self.schema.kind_of(name) == Some(ColumnKind::Datetime)
    }
    pub(crate) fn is_categorical(&self, name: &str) -> bool {
        self.schema.kind_of(name) == Some(ColumnKind::Categorical)
    }
    /// Sized, borderless spec every family starts from.
    pub(crate) fn base(&self) -> VegaLiteSpec {
        VegaLiteSpec::new()
            .size(self.canvas.width, self.canvas.height)
            .config(Config::borderless())
    }
}

/// Default axis and legend title: the field name with its first letter
/// upper-cased. The rest is left as is.
pub fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn label_angle(bucket_count: usize) -> i32 {
    if bucket_count > LABEL_ROTATION_THRESHOLD {
        ROTATED_LABEL_ANGLE
    } else {
        0
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::classifier::{ColumnKind, DatasetSchema};

    pub fn titanic() -> DatasetSchema {
        DatasetSchema::from_kinds([
            ("class", ColumnKind::Categorical),
            ("sex", ColumnKind::Categorical),
            ("embarked", ColumnKind::Categorical),
            ("fare", ColumnKind::Continuous),
            ("age", ColumnKind::Continuous),
            ("date", ColumnKind::Datetime),
        ])
    }
}
