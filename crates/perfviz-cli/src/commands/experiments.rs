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

//! Experiment commands - matrix-multiply result charts

use super::print_files;
use colored::Colorize;
use perfviz_core::{run_experiment, Experiment, ReportConfig};

/// Run `experiments` in order and report what each wrote.
///
/// # Errors
///
/// Returns `Err` at the first experiment whose input is malformed or whose
/// chart cannot be written. Missing inputs only print a notice.
///
/// # Examples
///
/// ```no_run
/// use perfviz_cli::commands::experiments;
/// use perfviz_core::{Experiment, ReportConfig};
///
/// # fn main() -> Result<(), String> {
/// experiments(&ReportConfig::default(), &Experiment::ALL)?;
/// # Ok(())
/// # }
/// ```
pub fn experiments(config: &ReportConfig, experiments: &[Experiment]) -> Result<(), String> {
    for &experiment in experiments {
        let outcome = run_experiment(experiment, config)
            .map_err(|e| format!("{} failed: {}", experiment, e))?;

        if outcome.placeholder {
            println!(
                "{} {}: no data in {}",
                "!".yellow().bold(),
                experiment.title(),
                config.input_path(experiment.input_file()).display()
            );
        } else {
            println!(
                "{} {} ({} rows)",
                "✓".green().bold(),
                experiment.title(),
                outcome.records
            );
        }
        if experiment == Experiment::DensityBreakEven && !outcome.placeholder {
            match outcome.break_even {
                Some(sparsity) => println!("  Break-even sparsity: {} ({})", sparsity, config.policy),
                None => println!("  Break-even sparsity: none ({})", config.policy),
            }
        }
        print_files(&outcome.files);
    }
    Ok(())
}
