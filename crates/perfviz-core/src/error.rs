// Dweve Perfviz - Benchmark Result Analysis and Reporting
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Structured error types for perfviz operations.
//!
//! Every fallible operation in the crate returns [`Result<T>`]. A missing
//! input file is deliberately *not* an error: loaders report it as `Ok(None)`
//! so pipelines can render placeholder output instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for perfviz operations.
pub type Result<T> = std::result::Result<T, PerfvizError>;

/// Errors that can occur while loading, reducing or rendering benchmark data.
///
/// Implements `Clone` so errors can be carried out of rayon worker closures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PerfvizError {
    /// I/O operation failed (file read, write, or directory creation).
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// Input file exceeds the configured size limit.
    #[error("File '{path}' is too large ({actual} bytes). Maximum allowed: {max} bytes")]
    FileTooLarge {
        /// The offending file
        path: PathBuf,
        /// Actual size in bytes
        actual: u64,
        /// Configured limit in bytes
        max: u64,
    },

    /// A CSV file could not be parsed or written.
    #[error("CSV error for '{path}': {message}")]
    Csv {
        /// The CSV file
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// Matrix operands have incompatible shapes.
    #[error("Shape mismatch in {op}: {left:?} vs {right:?}")]
    ShapeMismatch {
        /// Operation name
        op: &'static str,
        /// Shape of the left operand (rows, cols)
        left: (usize, usize),
        /// Shape of the right operand (rows, cols)
        right: (usize, usize),
    },

    /// Invalid configuration parameter.
    #[error("Invalid configuration parameter '{parameter}': {reason}")]
    InvalidConfig {
        /// Parameter name
        parameter: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Chart rendering failed.
    #[error("Render error: {0}")]
    Render(String),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(String),

    /// Worker pool could not be built.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl PerfvizError {
    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a CSV error with file path context.
    pub fn csv_error(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create a render error.
    pub fn render(msg: impl ToString) -> Self {
        Self::Render(msg.to_string())
    }
}

impl From<serde_json::Error> for PerfvizError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json(source.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for PerfvizError {
    fn from(source: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(source.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = PerfvizError::io_error(
            "speedup_analysis.csv",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("speedup_analysis.csv"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = PerfvizError::ShapeMismatch {
            op: "multiply",
            left: (2, 3),
            right: (4, 5),
        };
        let msg = err.to_string();
        assert!(msg.contains("multiply"));
        assert!(msg.contains("(2, 3)"));
        assert!(msg.contains("(4, 5)"));
    }

    #[test]
    fn test_invalid_config_display() {
        let err = PerfvizError::invalid_config("workers", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid configuration parameter 'workers': must be at least 1"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: PerfvizError = json_err.into();
        assert!(matches!(err, PerfvizError::Json(_)));
    }

    #[test]
    fn test_error_cloning() {
        let err = PerfvizError::render("backend closed");
        assert_eq!(err.clone(), err);
    }
}
