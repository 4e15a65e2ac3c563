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

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    Bar,
    Line,
    Point,
    Circle,
    Rect,
    Boxplot,
    Arc,
}

/// Blend mode for overlapping marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Blend {
    Normal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    #[serde(rename = "type")]
    kind: MarkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    tooltip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stroke: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    point: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ticks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    blend: Option<Blend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bin_spacing: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inner_radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outer_radius: Option<u32>,
}
impl Mark {
    /// Bare mark, no style at all.
    pub fn new(kind: MarkType) -> Self {
        Self {
            kind,
            tooltip: None,
            stroke: None,
            stroke_width: None,
            point: None,
            ticks: None,
            blend: None,
            bin_spacing: None,
            inner_radius: None,
            outer_radius: None,
        }
    }
    /// Mark carrying the default style: tooltip on, 1px stroke at 0.5 width.
    pub fn styled(kind: MarkType) -> Self {
        Self {
            tooltip: Some(true),
            stroke: Some(1),
            stroke_width: Some(0.5),
            ..Self::new(kind)
        }
    }
    /// Tooltip only; families that replace the default style start here.
    pub fn with_tooltip(kind: MarkType) -> Self {
        Self {
            tooltip: Some(true),
            ..Self::new(kind)
        }
    }
    pub fn point_overlay(mut self) -> Self {
        self.point = Some(true);
        self
    }
    pub fn ticks(mut self) -> Self {
        self.ticks = Some(true);
        self
    }
    pub fn blend(mut self, blend: Blend) -> Self {
        self.blend = Some(blend);
        self
    }
    pub fn bin_spacing(mut self, spacing: u32) -> Self {
        self.bin_spacing = Some(spacing);
        self
    }
    pub fn radii(mut self, inner: u32, outer: Option<u32>) -> Self {
        self.inner_radius = Some(inner);
        self.outer_radius = outer;
        self
    }
    pub fn kind(&self) -> MarkType {
        self.kind
    }
    pub fn inner_radius(&self) -> Option<u32> {
        self.inner_radius
    }
    pub fn outer_radius(&self) -> Option<u32> {
        self.outer_radius
    }
}
