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

//! Typed benchmark records.
//!
//! These mirror the CSV schemas written by the benchmark harness and the
//! summaries this crate writes back out.

use crate::error::{PerfvizError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative-error tolerance for correctness validation.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

fn default_threads() -> u32 {
    1
}

/// One row of measured or derived matrix-multiply performance data.
///
/// Column order written by the harness:
/// `kernel_type,implementation,size,sparsity,threads,time_seconds,gflops,cpnz,flops,bytes_accessed,arithmetic_intensity`.
/// Experiments only read the columns they need, so every column is optional
/// in the input and falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    /// Kernel family (`dense`, `csr`, `csc`).
    #[serde(default)]
    pub kernel_type: String,
    /// Implementation label (`scalar`, `simd`, `omp`, `simd_omp`, ...).
    #[serde(default)]
    pub implementation: String,
    /// Matrix dimension.
    #[serde(default)]
    pub size: u64,
    /// Fraction of zero elements in the sparse operand.
    #[serde(default)]
    pub sparsity: f64,
    /// Worker thread count.
    #[serde(default = "default_threads")]
    pub threads: u32,
    /// Wall-clock time of one run.
    #[serde(default)]
    pub time_seconds: f64,
    /// Achieved throughput.
    #[serde(default)]
    pub gflops: f64,
    /// Cycles per nonzero (sparse kernels only).
    #[serde(default)]
    pub cpnz: f64,
    /// Floating-point operations performed.
    #[serde(default)]
    pub flops: u64,
    /// Bytes moved from memory.
    #[serde(default)]
    pub bytes_accessed: u64,
    /// FLOP per byte.
    #[serde(default)]
    pub arithmetic_intensity: f64,
}

impl Default for BenchmarkRecord {
    fn default() -> Self {
        Self {
            kernel_type: String::new(),
            implementation: String::new(),
            size: 0,
            sparsity: 0.0,
            threads: 1,
            time_seconds: 0.0,
            gflops: 0.0,
            cpnz: 0.0,
            flops: 0,
            bytes_accessed: 0,
            arithmetic_intensity: 0.0,
        }
    }
}

impl BenchmarkRecord {
    /// Returns true for the dense GEMM kernel.
    pub fn is_dense(&self) -> bool {
        self.kernel_type.eq_ignore_ascii_case("dense")
    }

    /// Returns true for the CSR SpMM kernel.
    pub fn is_csr(&self) -> bool {
        self.kernel_type.eq_ignore_ascii_case("csr")
    }

    /// Checks the record's value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`PerfvizError::InvalidConfig`] when sparsity lies outside
    /// `[0, 1]` or a throughput/intensity value is negative.
    pub fn validate(&self) -> Result<()> {
        check_sparsity(self.sparsity)?;
        if self.gflops < 0.0 {
            return Err(PerfvizError::invalid_config(
                "gflops",
                format!("must be non-negative, got {}", self.gflops),
            ));
        }
        if self.arithmetic_intensity < 0.0 {
            return Err(PerfvizError::invalid_config(
                "arithmetic_intensity",
                format!("must be non-negative, got {}", self.arithmetic_intensity),
            ));
        }
        Ok(())
    }
}

/// Rejects sparsity values outside `[0, 1]`.
pub fn check_sparsity(sparsity: f64) -> Result<()> {
    if (0.0..=1.0).contains(&sparsity) {
        Ok(())
    } else {
        Err(PerfvizError::invalid_config(
            "sparsity",
            format!("must be within [0, 1], got {}", sparsity),
        ))
    }
}

/// Outcome of comparing one implementation against the scalar reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    /// Error strictly below tolerance.
    Pass,
    /// Error at or above tolerance.
    Fail,
    /// The comparison itself could not be computed.
    Error,
}

impl ValidationStatus {
    /// Classifies a maximum relative error against a tolerance.
    ///
    /// The comparison is strict: an error equal to the tolerance fails.
    /// A non-finite error means the comparison broke down and is `Error`.
    pub fn from_error(max_relative_error: f64, tolerance: f64) -> Self {
        if !max_relative_error.is_finite() {
            ValidationStatus::Error
        } else if max_relative_error < tolerance {
            ValidationStatus::Pass
        } else {
            ValidationStatus::Fail
        }
    }

    /// Returns the status as an uppercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Pass => "PASS",
            ValidationStatus::Fail => "FAIL",
            ValidationStatus::Error => "ERROR",
        }
    }

    /// Returns whether this is a pass.
    pub fn is_pass(&self) -> bool {
        matches!(self, ValidationStatus::Pass)
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One implementation checked against the reference for one configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    /// Implementation under test.
    pub implementation: String,
    /// Square matrix dimension.
    pub matrix_size: usize,
    /// Sparsity of the left operand.
    pub sparsity: f64,
    /// Largest element-wise relative error.
    pub max_relative_error: f64,
    /// Classification of the error.
    pub status: ValidationStatus,
    /// Tolerance the error was checked against.
    pub tolerance: f64,
}

impl ValidationRecord {
    /// Builds a record, deriving the status from the error.
    pub fn new(
        implementation: impl Into<String>,
        matrix_size: usize,
        sparsity: f64,
        max_relative_error: f64,
        tolerance: f64,
    ) -> Self {
        Self {
            implementation: implementation.into(),
            matrix_size,
            sparsity,
            max_relative_error,
            status: ValidationStatus::from_error(max_relative_error, tolerance),
            tolerance,
        }
    }

    /// Builds a record for a comparison that could not be computed.
    ///
    /// The error is stored as NaN so the row stays in the results CSV and
    /// reads back as `ERROR`; no real comparison yields a non-finite error.
    pub fn errored(
        implementation: impl Into<String>,
        matrix_size: usize,
        sparsity: f64,
        tolerance: f64,
    ) -> Self {
        Self {
            implementation: implementation.into(),
            matrix_size,
            sparsity,
            max_relative_error: f64::NAN,
            status: ValidationStatus::Error,
            tolerance,
        }
    }
}

/// Wall-clock timing of one multiply variant during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingRecord {
    /// Variant name.
    pub implementation: String,
    /// Square matrix dimension.
    pub matrix_size: usize,
    /// Sparsity of the left operand.
    pub sparsity: f64,
    /// Elapsed time in milliseconds.
    pub time_ms: f64,
    /// `2 n^3` FLOP over the elapsed time.
    pub gflops: f64,
}

impl TimingRecord {
    /// Builds a timing record, deriving GFLOP/s from the elapsed time.
    pub fn new(
        implementation: impl Into<String>,
        matrix_size: usize,
        sparsity: f64,
        time_ms: f64,
    ) -> Self {
        let n = matrix_size as f64;
        let gflops = if time_ms > 0.0 {
            2.0 * n * n * n / (time_ms / 1_000.0) / 1e9
        } else {
            0.0
        };
        Self {
            implementation: implementation.into(),
            matrix_size,
            sparsity,
            time_ms,
            gflops,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strict_inequality() {
        assert_eq!(ValidationStatus::from_error(0.0, 1e-5), ValidationStatus::Pass);
        assert_eq!(ValidationStatus::from_error(9.9e-6, 1e-5), ValidationStatus::Pass);
        assert_eq!(ValidationStatus::from_error(1e-5, 1e-5), ValidationStatus::Fail);
        assert_eq!(ValidationStatus::from_error(2e-5, 1e-5), ValidationStatus::Fail);
    }

    #[test]
    fn test_status_non_finite_is_error() {
        assert_eq!(ValidationStatus::from_error(f64::NAN, 1e-5), ValidationStatus::Error);
        assert_eq!(
            ValidationStatus::from_error(f64::INFINITY, 1e-5),
            ValidationStatus::Error
        );
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ValidationStatus::Pass.to_string(), "PASS");
        assert_eq!(ValidationStatus::Error.as_str(), "ERROR");
    }

    #[test]
    fn test_validation_record_derives_status() {
        let record = ValidationRecord::new("simd", 64, 0.5, 3e-7, DEFAULT_TOLERANCE);
        assert!(record.status.is_pass());

        let record = ValidationRecord::new("simd", 64, 0.5, DEFAULT_TOLERANCE, DEFAULT_TOLERANCE);
        assert_eq!(record.status, ValidationStatus::Fail);
    }

    #[test]
    fn test_check_sparsity() {
        assert!(check_sparsity(0.0).is_ok());
        assert!(check_sparsity(1.0).is_ok());
        assert!(check_sparsity(-0.1).is_err());
        assert!(check_sparsity(1.5).is_err());
    }

    #[test]
    fn test_benchmark_record_validate() {
        let mut record = BenchmarkRecord {
            kernel_type: "csr".to_string(),
            sparsity: 0.9,
            gflops: 1.5,
            ..Default::default()
        };
        assert!(record.is_csr());
        assert!(!record.is_dense());
        assert!(record.validate().is_ok());

        record.gflops = -1.0;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_timing_record_gflops() {
        // 2 * 100^3 = 2e6 FLOP in 1 ms = 2 GFLOP/s
        let timing = TimingRecord::new("reference", 100, 0.0, 1.0);
        assert!((timing.gflops - 2.0).abs() < 1e-9);

        let instant = TimingRecord::new("reference", 100, 0.0, 0.0);
        assert_eq!(instant.gflops, 0.0);
    }
}
