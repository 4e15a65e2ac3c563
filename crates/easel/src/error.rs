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

use crate::options::{ChartFamily, Role};
use thiserror::Error;
#[derive(Error, Debug)]
pub enum EaselError {
    #[error("{0}")]
    Advisory(#[from] Advisory),
    #[error("Chart specification error: {0}")]
    Spec(#[from] SpecError),
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),
}
/// A user-facing notice from the option resolver. The family renders
/// nothing; other families are unaffected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    #[error("Please select a value for {role}.")]
    MissingRole { family: ChartFamily, role: Role },
    #[error("Please select values for both {first} and {second}.")]
    MissingRoles {
        family: ChartFamily,
        first: Role,
        second: Role,
    },
    #[error("Please select a value for both Colors.")]
    MissingColors { family: ChartFamily },
    #[error("Please select only one ({first} or {second})")]
    ExclusiveOptions {
        family: ChartFamily,
        first: &'static str,
        second: &'static str,
    },
    #[error("You cannot select {first} and {second} at the same time.")]
    ExclusiveRoles {
        family: ChartFamily,
        first: Role,
        second: Role,
    },
    #[error("Column '{column}' cannot be used as {role} for {family} charts (expected {expected})")]
    RoleMismatch {
        family: ChartFamily,
        role: Role,
        column: String,
        expected: String,
    },
}
impl Advisory {
    pub fn family(&self) -> ChartFamily {
        match self {
            Advisory::MissingRole { family, .. }
            | Advisory::MissingRoles { family, .. }
            | Advisory::MissingColors { family }
            | Advisory::ExclusiveOptions { family, .. }
            | Advisory::ExclusiveRoles { family, .. }
            | Advisory::RoleMismatch { family, .. } => *family,
        }
    }
}
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("Column '{column}' assigned to role {role} does not exist in the dataset")]
    UnknownColumn { role: Role, column: String },
    #[error("Option '{option}' = {value} is outside [{min}, {max}]")]
    OptionOutOfRange {
        option: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("Options '{first}' and '{second}' cannot be combined")]
    ConflictingOptions {
        first: &'static str,
        second: &'static str,
    },
}
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown dataset '{name}'")]
    UnknownDataset { name: String },
    #[error("Failed to read data file '{path}': {source}")]
    DataFileError {
        path: String,
        #[source]
        source: polars::error::PolarsError,
    },
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },
    #[error("Column '{column}' is not a datetime column")]
    NotTemporal { column: String },
    #[error("Column '{column}' already exists in dataset")]
    DuplicateColumn { column: String },
}
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse YAML configuration: {source}")]
    YamlParseError {
        #[from]
        source: serde_yaml::Error,
    },
    #[error("Failed to read configuration file '{path}': {source}")]
    ConfigFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration: {field} = {value}")]
    InvalidField { field: String, value: String },
}
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to write chart '{path}': {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode chart specification: {0}")]
    Encode(#[from] serde_json::Error),
}
pub type Result<T> = std::result::Result<T, EaselError>;
pub type DataResult<T> = std::result::Result<T, DataError>;
pub type SpecResult<T> = std::result::Result<T, SpecError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
impl EaselError {
    /// Advisories and option problems clear up once the user changes the
    /// selection; everything else needs a code or data fix.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EaselError::Advisory(_)
                | EaselError::Spec(SpecError::OptionOutOfRange { .. })
                | EaselError::Spec(SpecError::ConflictingOptions { .. })
        )
    }
    pub fn category(&self) -> &'static str {
        match self {
            EaselError::Advisory(_) => "Advisory",
            EaselError::Spec(_) => "Spec",
            EaselError::Data(_) => "Data",
            EaselError::Config(_) => "Configuration",
            EaselError::Render(_) => "Render",
            EaselError::Io(_) => "I/O",
            EaselError::Serialisation(_) => "Serialisation",
        }
    }
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EaselError::Advisory(_) => ErrorSeverity::Warning,
            EaselError::Spec(SpecError::UnknownColumn { .. }) => ErrorSeverity::Error,
            EaselError::Spec(_) => ErrorSeverity::Warning,
            EaselError::Config(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }
    pub fn user_message(&self) -> String {
        match self {
            EaselError::Advisory(advisory) => advisory.to_string(),
            EaselError::Spec(SpecError::UnknownColumn { column, .. }) => format!(
                "Column '{column}' is no longer part of the dataset. Please pick the columns again."
            ),
            EaselError::Data(DataError::UnknownDataset { name }) => {
                format!("No data file found for dataset '{name}'.")
            }
            _ => self.to_string(),
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}
impl ErrorSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Info => "INFO",
            ErrorSeverity::Warning => "WARNING",
            ErrorSeverity::Error => "ERROR",
            ErrorSeverity::Critical => "CRITICAL",
        }
    }
    pub fn color_code(&self) -> &'static str {
        match self {
            ErrorSeverity::Info => "\x1b[36m",
            ErrorSeverity::Warning => "\x1b[33m",
            ErrorSeverity::Error => "\x1b[31m",
            ErrorSeverity::Critical => "\x1b[35m",
        }
    }
}
pub struct ErrorReporter {
    pub show_category: bool,
    pub colored_output: bool,
}
impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            show_category: true,
            colored_output: true,
        }
    }
    /// Reporter for widget text, where escape codes would show up verbatim.
    pub fn plain() -> Self {
        Self {
            show_category: false,
            colored_output: false,
        }
    }
    pub fn report(&self, error: &EaselError) -> String {
        let severity = error.severity();
        let mut output = String::new();
        if self.colored_output {
            output.push_str(severity.color_code());
        }
        if self.show_category {
            output.push_str(&format!("[{}:{}] ", severity.as_str(), error.category()));
        }
        output.push_str(&error.user_message());
        if self.colored_output {
            output.push_str("\x1b[0m");
        }
        output
    }
}
impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advisory_messages_name_the_missing_input() {
        let missing = Advisory::MissingRole {
            family: ChartFamily::Bar,
            role: Role::X,
        };
        assert_eq!(missing.to_string(), "Please select a value for X.");
        let both = Advisory::MissingRoles {
            family: ChartFamily::Scatter,
            first: Role::X,
            second: Role::Y,
        };
        assert_eq!(both.to_string(), "Please select values for both X and Y.");
        let toggles = Advisory::ExclusiveOptions {
            family: ChartFamily::Histogram,
            first: "Ordinal",
            second: "Normalize",
        };
        assert_eq!(toggles.to_string(), "Please select only one (Ordinal or Normalize)");
        let roles = Advisory::ExclusiveRoles {
            family: ChartFamily::Histogram,
            first: Role::Y,
            second: Role::Color,
        };
        assert_eq!(roles.to_string(), "You cannot select Y and Color at the same time.");
        assert_eq!(roles.family(), ChartFamily::Histogram);
    }

    #[test]
    fn severity_and_recoverability() {
        let advisory: EaselError = Advisory::MissingRole {
            family: ChartFamily::DonutSimple,
            role: Role::Color,
        }
        .into();
        assert!(advisory.is_recoverable());
        assert_eq!(advisory.severity(), ErrorSeverity::Warning);
        assert_eq!(advisory.category(), "Advisory");

        let unknown: EaselError = SpecError::UnknownColumn {
            role: Role::Y,
            column: "ghost".into(),
        }
        .into();
        assert!(!unknown.is_recoverable());
        assert_eq!(unknown.severity(), ErrorSeverity::Error);
        assert!(unknown.user_message().contains("ghost"));
    }

    #[test]
    fn plain_reporter_has_no_escape_codes() {
        let error: EaselError = Advisory::MissingRole {
            family: ChartFamily::Boxplot,
            role: Role::Y,
        }
        .into();
        assert_eq!(ErrorReporter::plain().report(&error), "Please select a value for Y.");
        let coloured = ErrorReporter::new().report(&error);
        assert!(coloured.starts_with("\x1b[33m[WARNING:Advisory] "));
        assert!(coloured.ends_with("\x1b[0m"));
    }
}
