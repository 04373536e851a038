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

//! Perfviz Core
//!
//! Result analysis and reporting for matrix-multiply and storage I/O
//! benchmarks.
//!
//! ## Features
//!
//! - **Loading**: CSV benchmark results into typed records, free-text
//!   storage reports into optional metric sets
//! - **Validation**: scalar reference multiply checked against vectorized and
//!   row-parallel variants
//! - **Analysis**: grouping statistics, break-even sparsity, roofline bounds,
//!   hardware versus software comparison
//! - **Output**: PNG or SVG charts, markdown and CSV reports, JSON export
//!
//! ## Usage
//!
//! ```no_run
//! use perfviz_core::{run_all, run_storage_comparison, ReportConfig};
//!
//! let config = ReportConfig::default()
//!     .with_input_dir("results")
//!     .with_output_dir("plots");
//!
//! for outcome in run_all(&config).unwrap() {
//!     println!("{}: {} file(s)", outcome.experiment, outcome.files.len());
//! }
//! run_storage_comparison(&config).unwrap();
//! ```
//!
//! Missing input files are not errors: the affected chart is replaced by a
//! "no data" placeholder and a warning is logged through `tracing`.

#![warn(missing_docs)]

pub mod aggregator;
pub mod breakeven;
pub mod compare;
pub mod config;
pub mod error;
pub mod extract;
pub mod loader;
pub mod matrix;
pub mod pipeline;
pub mod records;
pub mod render;
pub mod reporters;
pub mod roofline;
pub mod validator;

pub use aggregator::{group_by, summarize_throughput, summarize_validation, GroupKey, Statistics};
pub use breakeven::{find_break_even, pair_series, BreakEvenPolicy, SparsityPoint};
pub use compare::{compare, ImprovementSummary};
pub use config::ReportConfig;
pub use error::{PerfvizError, Result};
pub use extract::{extract_metrics, Metric, MetricSet, ReportSource};
pub use loader::{load_benchmarks, load_records, read_report, write_records};
pub use matrix::Matrix;
pub use pipeline::{
    run_all, run_correctness, run_experiment, run_storage_comparison, CorrectnessOutcome,
    Experiment, ExperimentOutcome, StorageOutcome,
};
pub use records::{BenchmarkRecord, TimingRecord, ValidationRecord, ValidationStatus, DEFAULT_TOLERANCE};
pub use render::{render_figure, Figure, ImageFormat, RenderConfig};
pub use roofline::RooflineModel;
pub use validator::{
    compute_max_relative_error, parallel_multiply, reference_multiply, run_validation, simd_multiply,
    ValidationConfig, ValidationRun,
};
