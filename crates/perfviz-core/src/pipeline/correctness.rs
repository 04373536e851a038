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

//! Correctness validation pipeline.

use super::ensure_output_dir;
use crate::aggregator::{overall_status, summarize_validation, GroupKey};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::loader::write_records;
use crate::records::{TimingRecord, ValidationRecord, ValidationStatus};
use crate::render::{render_figure, BarPanel, Figure};
use crate::reporters::{export_markdown, CorrectnessReport};
use crate::validator::{run_validation, ERROR_FLOOR};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{info, warn};

/// Validation results CSV.
pub const RESULTS_CSV: &str = "correctness_validation_results.csv";

/// Variant timing CSV.
pub const TIMINGS_CSV: &str = "performance_summary.csv";

/// Markdown report.
pub const REPORT_MD: &str = "correctness_report.md";

/// Chart stem of the per-configuration error chart.
pub const CORRECTNESS_CHART_STEM: &str = "correctness_validation";

/// What a correctness run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectnessOutcome {
    /// One record per implementation and configuration.
    pub records: Vec<ValidationRecord>,
    /// Reference timing first, then one per variant that ran.
    pub timings: Vec<TimingRecord>,
    /// AND-reduction over every record.
    pub overall: ValidationStatus,
    /// Files written: results CSV, timing CSV, report, chart.
    pub files: Vec<PathBuf>,
}

/// Runs the validation sweep and writes its CSVs, report and chart.
///
/// # Errors
///
/// Returns an error for an invalid configuration, a failed reference
/// product, or any write failure. Failing checks are not errors; they are
/// reported through [`CorrectnessOutcome::overall`].
pub fn run_correctness(config: &ReportConfig) -> Result<CorrectnessOutcome> {
    config.validate()?;
    ensure_output_dir(config)?;
    let validation = &config.validation;
    info!(
        sizes = ?validation.sizes,
        sparsities = ?validation.sparsities,
        workers = validation.workers,
        seed = validation.seed,
        "running correctness validation"
    );

    let run = run_validation(validation)?;
    let overall = overall_status(run.records.iter().map(|r| &r.status));
    let passed = run.records.iter().filter(|r| r.status.is_pass()).count();
    if overall.is_pass() {
        info!(passed, total = run.records.len(), "all correctness checks passed");
    } else {
        warn!(passed, total = run.records.len(), status = %overall, "correctness checks did not all pass");
    }

    let mut files = Vec::new();

    let path = config.output_path(RESULTS_CSV);
    write_records(&path, &run.records)?;
    files.push(path);

    let path = config.output_path(TIMINGS_CSV);
    write_records(&path, &run.timings)?;
    files.push(path);

    let path = config.output_path(REPORT_MD);
    export_markdown(&CorrectnessReport::new(&run.records, validation.tolerance), &path)?;
    files.push(path);

    let figure = error_figure(&run.records, validation.tolerance);
    files.push(render_figure(&config.render, CORRECTNESS_CHART_STEM, &figure)?);

    for file in &files {
        info!(path = %file.display(), "wrote correctness output");
    }

    Ok(CorrectnessOutcome {
        records: run.records,
        timings: run.timings,
        overall,
        files,
    })
}

/// Max relative error per configuration, one bar series per implementation,
/// on a log axis with the tolerance drawn across.
///
/// Errored checks have no bar.
fn error_figure(records: &[ValidationRecord], tolerance: f64) -> Figure {
    if records.is_empty() {
        return Figure::placeholder("Correctness Validation", "No validation results");
    }

    let mut configurations: Vec<(usize, u64)> = Vec::new();
    let mut by_implementation: BTreeMap<String, BTreeMap<(usize, u64), f64>> = BTreeMap::new();
    for summary in summarize_validation(records, GroupKey::ImplementationSizeSparsity) {
        let size = summary.key.matrix_size.unwrap_or_default();
        let ppm = summary.key.sparsity_ppm.unwrap_or_default();
        if !configurations.contains(&(size, ppm)) {
            configurations.push((size, ppm));
        }
        let errors = by_implementation.entry(summary.key.implementation).or_default();
        // exact results sit on the floor so the log axis can show them
        if summary.error.count > 0 {
            errors.insert((size, ppm), summary.error.max.max(ERROR_FLOOR));
        }
    }
    configurations.sort_unstable();

    let labels = configurations
        .iter()
        .map(|&(size, ppm)| format!("n={} s={}", size, ppm as f64 / 1e6));
    let mut panel = BarPanel::new("Max Relative Error by Configuration", labels)
        .x_label("Configuration (size, sparsity)")
        .y_label("Max Relative Error")
        .log_y()
        .reference(tolerance, format!("Tolerance ({:e})", tolerance));
    for (implementation, errors) in by_implementation {
        let values = configurations.iter().map(|c| errors.get(c).copied()).collect();
        panel = panel.series(implementation, values);
    }
    Figure::new(panel).with_title("Correctness Validation")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ImageFormat, Panel};
    use crate::validator::ValidationConfig;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_error_figure_layout() {
        let records = vec![
            ValidationRecord::new("simd", 64, 0.0, 2e-7, 1e-5),
            ValidationRecord::new("parallel", 64, 0.0, 3e-7, 1e-5),
            ValidationRecord::new("simd", 64, 0.5, 1e-7, 1e-5),
            ValidationRecord::errored("parallel", 64, 0.5, 1e-5),
        ];
        let figure = error_figure(&records, 1e-5);
        let Panel::Bars(panel) = &figure.panels[0] else {
            panic!("expected bars");
        };
        assert_eq!(panel.categories, vec!["n=64 s=0", "n=64 s=0.5"]);
        assert!(panel.log_y);
        assert_eq!(panel.reference.as_ref().unwrap().value, 1e-5);

        let names: Vec<&str> = panel.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["parallel", "simd"]);
        assert_eq!(panel.series[0].values, vec![Some(3e-7), None]);
        assert_eq!(panel.series[1].values, vec![Some(2e-7), Some(1e-7)]);
    }

    #[test]
    fn test_error_figure_keeps_exact_results() {
        let records = vec![
            ValidationRecord::new("simd", 16, 0.9, 0.0, 1e-5),
            ValidationRecord::new("parallel", 16, 0.9, 4e-8, 1e-5),
        ];
        let figure = error_figure(&records, 1e-5);
        let Panel::Bars(panel) = &figure.panels[0] else {
            panic!("expected bars");
        };
        assert_eq!(panel.series[1].name, "simd");
        assert_eq!(panel.series[1].values, vec![Some(ERROR_FLOOR)]);
        assert_eq!(panel.series[0].values, vec![Some(4e-8)]);
    }

    #[test]
    fn test_error_figure_empty() {
        assert!(error_figure(&[], 1e-5).is_placeholder());
    }

    #[test]
    fn test_run_correctness_writes_outputs() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("reports");
        let config = ReportConfig::default()
            .with_output_dir(&out)
            .with_format(ImageFormat::Svg)
            .with_validation(ValidationConfig::default().with_sizes(&[8, 16]).with_sparsities(&[0.0, 0.5]));

        let outcome = run_correctness(&config).unwrap();
        assert_eq!(outcome.overall, ValidationStatus::Pass);
        assert_eq!(outcome.records.len(), 8);
        assert_eq!(outcome.timings.len(), 12);
        assert_eq!(outcome.files.len(), 4);
        for file in &outcome.files {
            assert!(file.exists(), "{} missing", file.display());
        }

        let csv = fs::read_to_string(out.join(RESULTS_CSV)).unwrap();
        assert!(csv.starts_with("implementation,matrix_size,sparsity,max_relative_error,status,tolerance"));
        assert!(csv.contains("PASS"));

        let report = fs::read_to_string(out.join(REPORT_MD)).unwrap();
        assert!(report.contains("8/8 checks passed"));
        assert!(out.join("correctness_validation.svg").exists());
    }
}
