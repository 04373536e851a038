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

//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn perfviz_cmd() -> Command {
    Command::cargo_bin("perfviz").expect("Failed to find perfviz binary")
}

const BREAK_EVEN_CSV: &str = "\
kernel_type,implementation,size,sparsity,threads,time_seconds,gflops
dense,dense,512,0.1,1,0.1,10.0
dense,dense,512,0.2,1,0.1,8.0
dense,dense,512,0.3,1,0.1,6.0
dense,dense,512,0.4,1,0.1,4.0
csr,csr,512,0.1,1,0.1,2.0
csr,csr,512,0.2,1,0.1,3.0
csr,csr,512,0.3,1,0.1,7.0
csr,csr,512,0.4,1,0.1,9.0
";

// ===== Help and Version Tests =====

#[test]
fn test_help_output() {
    perfviz_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Perfviz - benchmark result analysis and reporting"))
        .stdout(predicate::str::contains("break-even"))
        .stdout(predicate::str::contains("storage"));
}

#[test]
fn test_version_output() {
    perfviz_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("perfviz"));
}

#[test]
fn test_no_subcommand_fails() {
    perfviz_cmd().assert().failure();
}

#[test]
fn test_unknown_format_fails() {
    perfviz_cmd()
        .args(["speedup", "--format", "gif"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gif"));
}

// ===== Experiment Command Tests =====

#[test]
fn test_break_even_reports_sparsity() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("density_break_even.csv"), BREAK_EVEN_CSV).unwrap();

    perfviz_cmd()
        .arg("break-even")
        .arg("--input-dir")
        .arg(dir.path())
        .arg("--output-dir")
        .arg(dir.path())
        .args(["--format", "svg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Break-even sparsity: 0.3"));

    assert!(dir.path().join("density_break_even.svg").exists());
}

#[test]
fn test_all_with_missing_inputs_writes_placeholders() {
    let dir = TempDir::new().unwrap();

    perfviz_cmd()
        .arg("all")
        .arg("--input-dir")
        .arg(dir.path())
        .arg("--output-dir")
        .arg(dir.path())
        .args(["--format", "svg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no data"));

    for stem in [
        "simd_threading_speedup",
        "density_break_even",
        "working_set_transitions",
        "roofline_analysis",
    ] {
        assert!(dir.path().join(format!("{}.svg", stem)).exists(), "{} missing", stem);
    }
}

#[test]
fn test_roofline_rejects_zero_peak() {
    perfviz_cmd()
        .args(["roofline", "--peak-gflops", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("peak_gflops"));
}

#[test]
fn test_malformed_csv_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("working_set_transitions.csv"),
        "size,gflops\nlarge,fast\n",
    )
    .unwrap();

    perfviz_cmd()
        .arg("working-set")
        .arg("--input-dir")
        .arg(dir.path())
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

// ===== Validate Command Tests =====

#[test]
fn test_validate_small_sweep() {
    let dir = TempDir::new().unwrap();

    perfviz_cmd()
        .arg("validate")
        .arg("--output-dir")
        .arg(dir.path())
        .args(["--format", "svg", "--sizes", "8,16", "--sparsities", "0.0,0.5", "--workers", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("8/8 checks passed"));

    for name in [
        "correctness_validation_results.csv",
        "performance_summary.csv",
        "correctness_report.md",
        "correctness_validation.svg",
    ] {
        assert!(dir.path().join(name).exists(), "{} missing", name);
    }
}

#[test]
fn test_validate_rejects_zero_workers() {
    let dir = TempDir::new().unwrap();
    perfviz_cmd()
        .arg("validate")
        .arg("--output-dir")
        .arg(dir.path())
        .args(["--workers", "0", "--sizes", "8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("workers"));
}

// ===== Storage Command Tests =====

#[test]
fn test_storage_prints_summary() {
    let dir = TempDir::new().unwrap();
    let outputs = dir.path().join("Outputs");
    fs::create_dir_all(&outputs).unwrap();
    fs::write(
        outputs.join("hardware_output.txt"),
        "95th Percentile (p95): 2.0 us\n99th Percentile (p99): 4.0 us\nEstimated IOPS: 1000000\n",
    )
    .unwrap();
    fs::write(
        outputs.join("software_output.txt"),
        "P95: 200.0 us\nP99: 400.0 us\nAverage IOPS: 500\n",
    )
    .unwrap();

    perfviz_cmd()
        .arg("storage")
        .arg("--input-dir")
        .arg(dir.path())
        .arg("--output-dir")
        .arg(dir.path())
        .args(["--format", "svg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HARDWARE VS SOFTWARE PERFORMANCE SUMMARY"))
        .stdout(predicate::str::contains("n/a"));

    assert!(dir.path().join("Figures").join("speedup_comparison.svg").exists());
    assert!(dir.path().join("storage_comparison.json").exists());
}

#[test]
fn test_storage_missing_reports_still_succeeds() {
    let dir = TempDir::new().unwrap();
    perfviz_cmd()
        .arg("storage")
        .arg("--input-dir")
        .arg(dir.path())
        .arg("--output-dir")
        .arg(dir.path())
        .args(["--format", "svg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("placeholder"));
}
