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

//! Markdown export for correctness validation results.

use super::NOT_AVAILABLE;
use crate::aggregator::{overall_status, summarize_validation, GroupKey};
use crate::error::{PerfvizError, Result};
use crate::records::ValidationRecord;
use std::fs;
use std::path::Path;

/// Correctness validation results ready for export.
#[derive(Debug, Clone)]
pub struct CorrectnessReport<'a> {
    /// Report title.
    pub title: String,
    /// Generation time.
    pub timestamp: String,
    /// Tolerance every record was checked against.
    pub tolerance: f64,
    /// One record per implementation per configuration.
    pub records: &'a [ValidationRecord],
}

impl<'a> CorrectnessReport<'a> {
    /// Creates a report stamped with the current time.
    pub fn new(records: &'a [ValidationRecord], tolerance: f64) -> Self {
        Self {
            title: "Correctness Validation Report".to_string(),
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            tolerance,
            records,
        }
    }

    /// Renders the report as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("# {}\n\n", self.title));
        md.push_str(&format!("**Timestamp:** {}\n\n", self.timestamp));
        md.push_str(&format!(
            "**Tolerance:** {:e} (maximum relative error, strict)\n\n",
            self.tolerance
        ));

        if self.records.is_empty() {
            md.push_str("No validation results.\n");
            return md;
        }

        let passed = self.records.iter().filter(|r| r.status.is_pass()).count();
        md.push_str(&format!(
            "**Result:** {} ({}/{} checks passed)\n\n",
            overall_status(self.records.iter().map(|r| &r.status)),
            passed,
            self.records.len()
        ));

        md.push_str("## Summary by Implementation\n\n");
        md.push_str("| Implementation | Checks | Passed | Mean Max Rel. Error | Worst Max Rel. Error | Status |\n");
        md.push_str("|----------------|--------|--------|---------------------|----------------------|--------|\n");
        for summary in summarize_validation(self.records, GroupKey::Implementation) {
            let (mean, worst) = if summary.error.count > 0 {
                (
                    format!("{:.3e}", summary.error.mean),
                    format!("{:.3e}", summary.error.max),
                )
            } else {
                (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string())
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                summary.key.implementation, summary.total, summary.passed, mean, worst, summary.overall
            ));
        }

        md.push_str("\n## Results by Configuration\n\n");
        md.push_str("| Implementation | Size | Sparsity | Max Rel. Error | Status |\n");
        md.push_str("|----------------|------|----------|----------------|--------|\n");
        for record in self.records {
            let error = if record.max_relative_error.is_finite() {
                format!("{:.3e}", record.max_relative_error)
            } else {
                NOT_AVAILABLE.to_string()
            };
            md.push_str(&format!(
                "| {} | {} | {:.2} | {} | {} |\n",
                record.implementation, record.matrix_size, record.sparsity, error, record.status
            ));
        }
        md
    }
}

/// Exports a correctness report as Markdown.
///
/// # Arguments
///
/// * `report` - The report to export
/// * `path` - Output file path
pub fn export_markdown(report: &CorrectnessReport<'_>, path: &Path) -> Result<()> {
    fs::write(path, report.to_markdown()).map_err(|e| PerfvizError::io_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::DEFAULT_TOLERANCE;
    use tempfile::NamedTempFile;

    fn records() -> Vec<ValidationRecord> {
        vec![
            ValidationRecord::new("simd", 64, 0.0, 1.5e-7, DEFAULT_TOLERANCE),
            ValidationRecord::new("parallel", 64, 0.5, 2e-5, DEFAULT_TOLERANCE),
            ValidationRecord::errored("parallel", 128, 0.9, DEFAULT_TOLERANCE),
        ]
    }

    #[test]
    fn test_markdown_sections() {
        let records = records();
        let md = CorrectnessReport::new(&records, DEFAULT_TOLERANCE).to_markdown();

        assert!(md.starts_with("# Correctness Validation Report"));
        assert!(md.contains("**Tolerance:** 1e-5"));
        assert!(md.contains("**Result:** ERROR (1/3 checks passed)"));
        assert!(md.contains("| simd | 1 | 1 | 1.500e-7 | 1.500e-7 | PASS |"));
        assert!(md.contains("| parallel | 2 | 0 | 2.000e-5 | 2.000e-5 | ERROR |"));
        assert!(md.contains("| parallel | 128 | 0.90 | n/a | ERROR |"));
    }

    #[test]
    fn test_empty_report() {
        let md = CorrectnessReport::new(&[], DEFAULT_TOLERANCE).to_markdown();
        assert!(md.contains("No validation results."));
        assert!(!md.contains("## Summary"));
    }

    #[test]
    fn test_export_markdown() {
        let records = records();
        let temp = NamedTempFile::new().unwrap();
        export_markdown(&CorrectnessReport::new(&records, DEFAULT_TOLERANCE), temp.path()).unwrap();

        let content = fs::read_to_string(temp.path()).unwrap();
        assert!(content.contains("## Results by Configuration"));
    }
}
