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

//! CLI command definitions and argument parsing.
//!
//! Every flag is optional. Shared flag groups are declared once as
//! [`clap::Args`] structs and flattened into the commands that use them;
//! each group folds its values into a [`ReportConfig`].

use crate::commands;
use clap::{Args, Subcommand};
use perfviz_core::{BreakEvenPolicy, Experiment, ImageFormat, ReportConfig, RooflineModel};
use perfviz_core::roofline::{DEFAULT_BANDWIDTH_GBS, DEFAULT_PEAK_GFLOPS};
use perfviz_core::validator::{DEFAULT_SEED, DEFAULT_WORKERS};
use std::path::PathBuf;

/// Input and output locations.
#[derive(Args, Debug, Clone)]
pub struct PathArgs {
    /// Directory holding the benchmark result files
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub input_dir: PathBuf,

    /// Directory charts and reports are written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Image format (png, svg)
    #[arg(short, long, default_value = "png")]
    pub format: ImageFormat,
}

impl PathArgs {
    /// Builds the base configuration.
    pub fn to_config(&self) -> ReportConfig {
        ReportConfig::default()
            .with_input_dir(&self.input_dir)
            .with_output_dir(&self.output_dir)
            .with_format(self.format)
    }
}

/// Theoretical roofline parameters.
#[derive(Args, Debug, Clone)]
pub struct RooflineArgs {
    /// Compute ceiling in GFLOP/s
    #[arg(long, value_name = "GFLOPS", default_value_t = DEFAULT_PEAK_GFLOPS)]
    pub peak_gflops: f64,

    /// Memory bandwidth in GB/s
    #[arg(long, value_name = "GBS", default_value_t = DEFAULT_BANDWIDTH_GBS)]
    pub bandwidth: f64,
}

impl RooflineArgs {
    /// Applies the model to `config`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if either parameter is not positive.
    pub fn apply(&self, config: ReportConfig) -> Result<ReportConfig, String> {
        let model = RooflineModel::new(self.peak_gflops, self.bandwidth).map_err(|e| e.to_string())?;
        Ok(config.with_roofline(model))
    }
}

/// Break-even policy selection.
#[derive(Args, Debug, Clone)]
pub struct PolicyArgs {
    /// Break-even policy (latch-first, reset-on-regression)
    #[arg(short, long, default_value = "latch-first")]
    pub policy: BreakEvenPolicy,
}

/// Correctness validation sweep.
#[derive(Args, Debug, Clone)]
pub struct ValidationArgs {
    /// Worker threads of the row-parallel multiply
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Seed for operand generation and noise
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Matrix sizes, comma separated (default 64,128,256)
    #[arg(long, value_delimiter = ',')]
    pub sizes: Option<Vec<usize>>,

    /// Sparsity levels, comma separated (default 0.0,0.5,0.9)
    #[arg(long, value_delimiter = ',')]
    pub sparsities: Option<Vec<f64>>,
}

impl ValidationArgs {
    /// Applies the sweep to `config`.
    pub fn apply(&self, config: ReportConfig) -> ReportConfig {
        let mut validation = config
            .validation
            .clone()
            .with_workers(self.workers)
            .with_seed(self.seed);
        if let Some(sizes) = &self.sizes {
            validation = validation.with_sizes(sizes);
        }
        if let Some(sparsities) = &self.sparsities {
            validation = validation.with_sparsities(sparsities);
        }
        config.with_validation(validation)
    }
}

/// Top-level CLI commands.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use perfviz_cli::cli::Commands;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(subcommand)]
///     command: Commands,
/// }
/// ```
#[derive(Subcommand)]
pub enum Commands {
    /// Render every matrix-multiply experiment chart
    ///
    /// Runs speedup, break-even, working-set and roofline in that order.
    /// A missing input file produces a placeholder image, not an error.
    All {
        #[command(flatten)]
        paths: PathArgs,

        #[command(flatten)]
        policy: PolicyArgs,

        #[command(flatten)]
        roofline: RooflineArgs,
    },

    /// SIMD and threading speedup chart (speedup_analysis.csv)
    Speedup {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Density break-even chart (density_break_even.csv)
    BreakEven {
        #[command(flatten)]
        paths: PathArgs,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Working set transitions chart (working_set_transitions.csv)
    WorkingSet {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Roofline charts per kernel type (roofline_analysis.csv)
    Roofline {
        #[command(flatten)]
        paths: PathArgs,

        #[command(flatten)]
        roofline: RooflineArgs,
    },

    /// Validate multiply variants against the scalar reference
    ///
    /// Writes correctness_validation_results.csv, performance_summary.csv,
    /// correctness_report.md and the correctness chart. Exits with status 1
    /// if any check does not pass.
    Validate {
        #[command(flatten)]
        paths: PathArgs,

        #[command(flatten)]
        validation: ValidationArgs,
    },

    /// Compare hardware and software storage reports
    ///
    /// Reads Outputs/hardware_output.txt and Outputs/software_output.txt
    /// under the input directory, prints the summary table and writes the
    /// Figures/ charts and storage_comparison.json.
    Storage {
        #[command(flatten)]
        paths: PathArgs,

        /// Hardware report, relative to the input directory
        #[arg(long, value_name = "FILE")]
        hardware_report: Option<PathBuf>,

        /// Software report, relative to the input directory
        #[arg(long, value_name = "FILE")]
        software_report: Option<PathBuf>,
    },
}

impl Commands {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns `Err` with a printable message if the configuration is
    /// invalid, an input cannot be parsed, an output cannot be written, or
    /// correctness validation does not pass.
    pub fn execute(self) -> Result<(), String> {
        match self {
            Commands::All {
                paths,
                policy,
                roofline,
            } => {
                let config = roofline.apply(paths.to_config().with_policy(policy.policy))?;
                commands::experiments(&config, &Experiment::ALL)
            }
            Commands::Speedup { paths } => {
                commands::experiments(&paths.to_config(), &[Experiment::SimdThreadingSpeedup])
            }
            Commands::BreakEven { paths, policy } => commands::experiments(
                &paths.to_config().with_policy(policy.policy),
                &[Experiment::DensityBreakEven],
            ),
            Commands::WorkingSet { paths } => {
                commands::experiments(&paths.to_config(), &[Experiment::WorkingSetTransitions])
            }
            Commands::Roofline { paths, roofline } => {
                let config = roofline.apply(paths.to_config())?;
                commands::experiments(&config, &[Experiment::RooflineAnalysis])
            }
            Commands::Validate { paths, validation } => {
                commands::validate(&validation.apply(paths.to_config()))
            }
            Commands::Storage {
                paths,
                hardware_report,
                software_report,
            } => {
                let mut config = paths.to_config();
                if let Some(path) = hardware_report {
                    config.hardware_report = path;
                }
                if let Some(path) = software_report {
                    config.software_report = path;
                }
                commands::storage(&config)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    #[test]
    fn test_defaults_match_fixed_filenames() {
        let cli = TestCli::try_parse_from(["perfviz", "break-even"]).unwrap();
        let Commands::BreakEven { paths, policy } = cli.command else {
            panic!("expected break-even");
        };
        assert_eq!(paths.input_dir, PathBuf::from("."));
        assert_eq!(paths.format, ImageFormat::Png);
        assert_eq!(policy.policy, BreakEvenPolicy::LatchFirst);
    }

    #[test]
    fn test_validation_flags() {
        let cli = TestCli::try_parse_from([
            "perfviz", "validate", "--workers", "4", "--seed", "7", "--sizes", "8,16",
        ])
        .unwrap();
        let Commands::Validate { paths, validation } = cli.command else {
            panic!("expected validate");
        };
        let config = validation.apply(paths.to_config());
        assert_eq!(config.validation.workers, 4);
        assert_eq!(config.validation.seed, 7);
        assert_eq!(config.validation.sizes, vec![8, 16]);
        assert_eq!(config.validation.sparsities, vec![0.0, 0.5, 0.9]);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(TestCli::try_parse_from(["perfviz", "speedup", "--format", "gif"]).is_err());
        assert!(TestCli::try_parse_from(["perfviz", "break-even", "--policy", "never"]).is_err());
    }

    #[test]
    fn test_roofline_args_reject_non_positive() {
        let args = RooflineArgs {
            peak_gflops: 0.0,
            bandwidth: 25.0,
        };
        assert!(args.apply(ReportConfig::default()).is_err());
    }
}
