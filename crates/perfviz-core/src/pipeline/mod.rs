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

//! Experiment pipelines.
//!
//! Each pipeline runs ingest, reduce, derive and render for one experiment
//! and reports what it wrote. A missing input is not an error: the pipeline
//! logs a warning and renders a placeholder image in place of the chart.

mod correctness;
mod matmul;
mod storage;

pub use correctness::{run_correctness, CorrectnessOutcome, CORRECTNESS_CHART_STEM};
pub use storage::{run_storage_comparison, StorageOutcome, STORAGE_FIGURES};

use crate::config::ReportConfig;
use crate::error::{PerfvizError, Result};
use crate::loader::load_benchmarks;
use crate::render::{render_figure, Figure};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

/// A chart-producing matrix-multiply experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Experiment {
    /// Single-thread comparison and thread scaling.
    SimdThreadingSpeedup,
    /// Dense versus CSR throughput over sparsity.
    DensityBreakEven,
    /// Throughput over matrix size.
    WorkingSetTransitions,
    /// Measured kernels against the theoretical roofline.
    RooflineAnalysis,
}

impl Experiment {
    /// Every experiment, in run order.
    pub const ALL: [Experiment; 4] = [
        Experiment::SimdThreadingSpeedup,
        Experiment::DensityBreakEven,
        Experiment::WorkingSetTransitions,
        Experiment::RooflineAnalysis,
    ];

    /// Input CSV file name.
    pub fn input_file(&self) -> &'static str {
        match self {
            Experiment::SimdThreadingSpeedup => "speedup_analysis.csv",
            Experiment::DensityBreakEven => "density_break_even.csv",
            Experiment::WorkingSetTransitions => "working_set_transitions.csv",
            Experiment::RooflineAnalysis => "roofline_analysis.csv",
        }
    }

    /// Output image stem. The roofline experiment appends `_<kernel_type>`
    /// per kernel; its placeholder uses the bare stem.
    pub fn output_stem(&self) -> &'static str {
        match self {
            Experiment::SimdThreadingSpeedup => "simd_threading_speedup",
            Experiment::DensityBreakEven => "density_break_even",
            Experiment::WorkingSetTransitions => "working_set_transitions",
            Experiment::RooflineAnalysis => "roofline_analysis",
        }
    }

    /// Chart title.
    pub fn title(&self) -> &'static str {
        match self {
            Experiment::SimdThreadingSpeedup => "SIMD and Threading Speedup",
            Experiment::DensityBreakEven => "Density Break-even Analysis",
            Experiment::WorkingSetTransitions => "Working Set Transitions (Cache Effects)",
            Experiment::RooflineAnalysis => "Roofline Model Analysis",
        }
    }

    /// Command-line name.
    pub fn name(&self) -> &'static str {
        match self {
            Experiment::SimdThreadingSpeedup => "speedup",
            Experiment::DensityBreakEven => "break-even",
            Experiment::WorkingSetTransitions => "working-set",
            Experiment::RooflineAnalysis => "roofline",
        }
    }

    fn missing_message(&self) -> &'static str {
        match self {
            Experiment::SimdThreadingSpeedup => "No speedup analysis data found",
            Experiment::DensityBreakEven => "No density break-even data found",
            Experiment::WorkingSetTransitions => "No working set transitions data found",
            Experiment::RooflineAnalysis => "No roofline analysis data found",
        }
    }
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Experiment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Experiment::ALL
            .into_iter()
            .find(|e| e.name() == s.to_lowercase())
            .ok_or_else(|| {
                format!(
                    "Unknown experiment: '{}'. Expected speedup, break-even, working-set or roofline",
                    s
                )
            })
    }
}

/// What one experiment run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentOutcome {
    /// Experiment that ran.
    pub experiment: Experiment,
    /// Images written, in write order.
    pub files: Vec<PathBuf>,
    /// Whether a "no data" image was written in place of the chart.
    pub placeholder: bool,
    /// Break-even sparsity, for [`Experiment::DensityBreakEven`].
    pub break_even: Option<f64>,
    /// Number of input rows.
    pub records: usize,
}

/// Runs one experiment end to end.
///
/// # Errors
///
/// Returns an error for an invalid configuration, an unreadable or malformed
/// input file, or a rendering failure. A missing input file is not an error.
pub fn run_experiment(experiment: Experiment, config: &ReportConfig) -> Result<ExperimentOutcome> {
    config.validate()?;
    let input = config.input_path(experiment.input_file());
    info!(experiment = %experiment, input = %input.display(), "running experiment");

    let records = match load_benchmarks(&input)? {
        Some(records) if !records.is_empty() => records,
        Some(_) => {
            warn!(experiment = %experiment, input = %input.display(), "input has no rows");
            return placeholder(experiment, config, 0);
        }
        None => return placeholder(experiment, config, 0),
    };

    let mut outcome = ExperimentOutcome {
        experiment,
        files: Vec::new(),
        placeholder: false,
        break_even: None,
        records: records.len(),
    };

    match experiment {
        Experiment::SimdThreadingSpeedup => {
            let figure = matmul::speedup_figure(&records, &config.render.palette);
            outcome.files.push(render_figure(&config.render, experiment.output_stem(), &figure)?);
        }
        Experiment::DensityBreakEven => {
            let (figure, break_even) = matmul::break_even_figure(&records, config.policy);
            match break_even {
                Some(sparsity) => info!(sparsity, policy = %config.policy, "break-even sparsity"),
                None => info!(policy = %config.policy, "sparse kernel never overtakes dense"),
            }
            outcome.break_even = break_even;
            outcome.files.push(render_figure(&config.render, experiment.output_stem(), &figure)?);
        }
        Experiment::WorkingSetTransitions => {
            let figure = matmul::working_set_figure(&records);
            outcome.files.push(render_figure(&config.render, experiment.output_stem(), &figure)?);
        }
        Experiment::RooflineAnalysis => {
            for (kernel, figure) in matmul::roofline_figures(&records, config.roofline) {
                let stem = format!("{}_{}", experiment.output_stem(), kernel);
                outcome.files.push(render_figure(&config.render, &stem, &figure)?);
            }
        }
    }

    for file in &outcome.files {
        info!(experiment = %experiment, path = %file.display(), "wrote chart");
    }
    Ok(outcome)
}

fn placeholder(experiment: Experiment, config: &ReportConfig, records: usize) -> Result<ExperimentOutcome> {
    warn!(experiment = %experiment, "{}", experiment.missing_message());
    let figure = Figure::placeholder(experiment.title(), experiment.missing_message());
    let path = render_figure(&config.render, experiment.output_stem(), &figure)?;
    Ok(ExperimentOutcome {
        experiment,
        files: vec![path],
        placeholder: true,
        break_even: None,
        records,
    })
}

fn ensure_output_dir(config: &ReportConfig) -> Result<()> {
    let dir = config.output_dir();
    fs::create_dir_all(dir).map_err(|e| PerfvizError::io_error(dir, e))
}

/// Runs every experiment in [`Experiment::ALL`] order, stopping at the first error.
pub fn run_all(config: &ReportConfig) -> Result<Vec<ExperimentOutcome>> {
    info!("generating all experiment plots");
    Experiment::ALL
        .into_iter()
        .map(|experiment| run_experiment(experiment, config))
        .collect()
}
