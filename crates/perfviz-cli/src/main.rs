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

//! Perfviz Command Line Interface

use clap::Parser;
use perfviz_cli::cli::Commands;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Perfviz - benchmark result analysis and reporting
///
/// Turns benchmark CSVs and storage reports into charts, tables and
/// correctness reports. Run without flags, every command reads from and
/// writes to the current directory.
///
/// # Examples
///
/// ```bash
/// # Render all four matrix-multiply experiment charts
/// perfviz all
///
/// # Break-even chart as SVG with the reset policy
/// perfviz break-even --format svg --policy reset-on-regression
///
/// # Correctness validation on four workers
/// perfviz validate --workers 4 --output-dir reports
///
/// # Hardware versus software storage comparison
/// perfviz storage --input-dir track_b
/// ```
#[derive(Parser)]
#[command(name = "perfviz")]
#[command(author, version, about = "Perfviz - benchmark result analysis and reporting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("perfviz=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
