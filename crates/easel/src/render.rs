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

use crate::error::RenderError;
use crate::spec::VegaLiteSpec;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

/// Consumer of finished specs.
pub trait RenderSink {
    type Output;
    fn render(
        &self,
        title: &str,
        spec: &VegaLiteSpec,
        rows: Vec<Value>,
    ) -> Result<Self::Output, RenderError>;
}

/// Writes one standalone HTML page per chart, drawn in the browser by
/// vega-embed.
#[derive(Debug, Clone)]
pub struct HtmlFileSink {
    output_dir: PathBuf,
}
impl HtmlFileSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
    pub fn page(title: &str, spec: &VegaLiteSpec, rows: Vec<Value>) -> Result<String, RenderError> {
        let spec_json = spec.with_values(rows).to_json()?;
        // keep a literal "</script>" in the data from closing the tag
        let spec_json = spec_json.replace("</", "<\\/");
        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <script src="https://cdn.jsdelivr.net/npm/vega@5"></script>
  <script src="https://cdn.jsdelivr.net/npm/vega-lite@5"></script>
  <script src="https://cdn.jsdelivr.net/npm/vega-embed@6"></script>
  <style>body {{ font-family: sans-serif; margin: 2em; }}</style>
</head>
<body>
  <h2>{title}</h2>
  <div id="vis"></div>
  <script type="text/javascript">
    vegaEmbed('#vis', {spec_json}).catch(console.error);
  </script>
</body>
</html>
"#,
            title = escape_html(title),
        ))
    }
}
impl RenderSink for HtmlFileSink {
    type Output = PathBuf;
    fn render(
        &self,
        title: &str,
        spec: &VegaLiteSpec,
        rows: Vec<Value>,
    ) -> Result<PathBuf, RenderError> {
        let html = Self::page(title, spec, rows)?;
        let path = self.output_dir.join(format!("chart_{}.html", Uuid::new_v4()));
        let written = fs::create_dir_all(&self.output_dir).and_then(|_| fs::write(&path, html));
        written.map_err(|source| RenderError::WriteFailed {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), title, "chart written");
        Ok(path)
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
