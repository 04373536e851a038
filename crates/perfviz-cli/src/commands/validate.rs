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

//! Validate command - multiply correctness against the scalar reference

use super::print_files;
use colored::Colorize;
use perfviz_core::{run_correctness, ReportConfig};

/// Run the correctness sweep and write its reports.
///
/// # Errors
///
/// Returns `Err` if the sweep cannot run, an output cannot be written, or
/// any check does not pass.
pub fn validate(config: &ReportConfig) -> Result<(), String> {
    let outcome = run_correctness(config).map_err(|e| e.to_string())?;
    let total = outcome.records.len();
    let passed = outcome.records.iter().filter(|r| r.status.is_pass()).count();

    for record in &outcome.records {
        let mark = if record.status.is_pass() {
            "✓".green().bold()
        } else {
            "✗".red().bold()
        };
        println!(
            "{} {:<10} n={:<5} sparsity={:<5} max_rel_error={:.3e}",
            mark, record.implementation, record.matrix_size, record.sparsity, record.max_relative_error
        );
    }
    print_files(&outcome.files);

    if outcome.overall.is_pass() {
        println!("{} {}/{} checks passed", "✓".green().bold(), passed, total);
        Ok(())
    } else {
        Err(format!(
            "correctness validation {}: {}/{} checks passed",
            outcome.overall, passed, total
        ))
    }
}
