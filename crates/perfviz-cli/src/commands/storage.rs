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

//! Storage command - hardware versus software comparison

use super::print_files;
use colored::Colorize;
use perfviz_core::{run_storage_comparison, ReportConfig};

/// Compare the storage reports; the summary table is printed by the pipeline.
///
/// # Errors
///
/// Returns `Err` if a report cannot be read or an output cannot be written.
pub fn storage(config: &ReportConfig) -> Result<(), String> {
    let outcome = run_storage_comparison(config).map_err(|e| e.to_string())?;
    if outcome.placeholder {
        println!(
            "{} storage report missing under {}; wrote placeholder charts",
            "!".yellow().bold(),
            config.input_dir.display()
        );
    } else {
        println!("\n{} Analysis complete", "✓".green().bold());
    }
    print_files(&outcome.files);
    Ok(())
}
