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

//! Reference matrix-multiply validation.
//!
//! Self-test of the numeric handling in the reporting pipeline. A scalar
//! triple-loop product is the reference; two variants emulate what a SIMD
//! kernel and a row-parallel kernel would produce by injecting small
//! Gaussian noise on top of the exact result. Each variant is compared to
//! the reference by maximum relative error.
//!
//! # Concurrency
//!
//! [`parallel_multiply`] runs on a dedicated rayon pool of a fixed size.
//! Output rows are split into one contiguous block per worker, so workers
//! never share a mutable element and no locking is needed. Noise for each
//! row comes from a generator seeded by the row index, which keeps the
//! result independent of scheduling.

use crate::error::{PerfvizError, Result};
use crate::matrix::Matrix;
use crate::records::{TimingRecord, ValidationRecord, DEFAULT_TOLERANCE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Standard deviation of the injected relative noise.
pub const NOISE_STDDEV: f64 = 1e-7;

/// Floor on the relative-error denominator.
pub const ERROR_FLOOR: f64 = 1e-10;

/// Default worker count for [`parallel_multiply`].
pub const DEFAULT_WORKERS: usize = 2;

/// Default RNG seed for validation runs.
pub const DEFAULT_SEED: u64 = 42;

/// Matrix sizes swept by default.
pub const DEFAULT_SIZES: &[usize] = &[64, 128, 256];

/// Sparsity levels swept by default.
pub const DEFAULT_SPARSITIES: &[f64] = &[0.0, 0.5, 0.9];

/// Implementation label of the scalar reference.
pub const REFERENCE_IMPL: &str = "reference";

/// Implementation label of the vectorized-row variant.
pub const SIMD_IMPL: &str = "simd";

/// Implementation label of the row-parallel variant.
pub const PARALLEL_IMPL: &str = "parallel";

/// Computes `C = A * B` by triple-nested scalar accumulation.
///
/// # Errors
///
/// Returns [`PerfvizError::ShapeMismatch`] if `a.cols() != b.rows()`.
pub fn reference_multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    a.check_multiply(b)?;
    let (m, k) = a.shape();
    let n = b.cols();
    let (lhs, rhs) = (a.as_slice(), b.as_slice());

    let mut c = Matrix::zeros(m, n);
    let out = c.as_mut_slice();
    for i in 0..m {
        for j in 0..n {
            let mut sum = 0.0f32;
            for p in 0..k {
                sum += lhs[i * k + p] * rhs[p * n + j];
            }
            out[i * n + j] = sum;
        }
    }
    Ok(c)
}

/// Vectorized-row variant: i-k-j order, then relative Gaussian noise.
///
/// Each `A[i,k]` scales a whole row of `B` into row `i` of the output, the
/// access pattern a SIMD kernel uses. The noise stands in for the
/// reordering error of a real vector path.
///
/// # Errors
///
/// Returns [`PerfvizError::ShapeMismatch`] if `a.cols() != b.rows()`.
pub fn simd_multiply<R: Rng + ?Sized>(
    a: &Matrix,
    b: &Matrix,
    noise_stddev: f64,
    rng: &mut R,
) -> Result<Matrix> {
    a.check_multiply(b)?;
    let (m, k) = a.shape();
    let n = b.cols();
    let (lhs, rhs) = (a.as_slice(), b.as_slice());

    let mut c = Matrix::zeros(m, n);
    let out = c.as_mut_slice();
    for i in 0..m {
        let row = &mut out[i * n..(i + 1) * n];
        accumulate_row(&lhs[i * k..(i + 1) * k], rhs, row);
    }
    for value in out.iter_mut() {
        *value = perturb(*value, noise_stddev, rng);
    }
    Ok(c)
}

/// Row-parallel variant on a fixed-size worker pool, with injected noise.
///
/// # Errors
///
/// Returns an error on a shape mismatch, a zero worker count, or if the
/// pool cannot be built.
pub fn parallel_multiply(
    a: &Matrix,
    b: &Matrix,
    workers: usize,
    noise_stddev: f64,
    seed: u64,
) -> Result<Matrix> {
    a.check_multiply(b)?;
    if workers == 0 {
        return Err(PerfvizError::invalid_config("workers", "must be at least 1"));
    }
    let (m, k) = a.shape();
    let n = b.cols();
    let mut c = Matrix::zeros(m, n);
    if m == 0 || n == 0 {
        return Ok(c);
    }

    let (lhs, rhs) = (a.as_slice(), b.as_slice());
    let rows_per_worker = (m + workers - 1) / workers;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;

    pool.install(|| {
        c.as_mut_slice()
            .par_chunks_mut(rows_per_worker * n)
            .enumerate()
            .for_each(|(block, rows)| {
                let first_row = block * rows_per_worker;
                for (offset, row) in rows.chunks_mut(n).enumerate() {
                    let i = first_row + offset;
                    accumulate_row(&lhs[i * k..(i + 1) * k], rhs, row);
                    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
                    for value in row.iter_mut() {
                        *value = perturb(*value, noise_stddev, &mut rng);
                    }
                }
            });
    });
    debug!(rows = m, workers, "parallel multiply complete");
    Ok(c)
}

/// `row += Σ_p a_row[p] * B[p, :]`.
fn accumulate_row(a_row: &[f32], b: &[f32], row: &mut [f32]) {
    let n = row.len();
    for (p, &a_ip) in a_row.iter().enumerate() {
        let b_row = &b[p * n..(p + 1) * n];
        for (out, &b_pj) in row.iter_mut().zip(b_row) {
            *out += a_ip * b_pj;
        }
    }
}

/// Standard normal sample via the Box-Muller transform.
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Applies relative Gaussian noise; zero stays zero.
fn perturb<R: Rng + ?Sized>(value: f32, noise_stddev: f64, rng: &mut R) -> f32 {
    let z = standard_normal(rng);
    let v = f64::from(value);
    (v + v * noise_stddev * z) as f32
}

/// Maximum element-wise relative error of `test` against `reference`.
///
/// Computes `max(|ref - test| / max(|ref|, 1e-10))`; zero for empty
/// matrices.
///
/// # Errors
///
/// Returns [`PerfvizError::ShapeMismatch`] if the shapes differ.
pub fn compute_max_relative_error(reference: &Matrix, test: &Matrix) -> Result<f64> {
    if reference.shape() != test.shape() {
        return Err(PerfvizError::ShapeMismatch {
            op: "relative_error",
            left: reference.shape(),
            right: test.shape(),
        });
    }

    let max = reference
        .as_slice()
        .iter()
        .zip(test.as_slice())
        .map(|(&r, &t)| {
            let (r, t) = (f64::from(r), f64::from(t));
            (r - t).abs() / r.abs().max(ERROR_FLOOR)
        })
        .fold(0.0f64, |acc, e| if e.is_nan() || e > acc { e } else { acc });
    Ok(max)
}

/// Parameters for a validation sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Square matrix sizes.
    pub sizes: Vec<usize>,
    /// Sparsity levels applied to the left operand.
    pub sparsities: Vec<f64>,
    /// Pass/fail tolerance on the maximum relative error.
    pub tolerance: f64,
    /// Relative noise injected into both variants.
    pub noise_stddev: f64,
    /// Worker count of the row-parallel variant.
    pub workers: usize,
    /// Seed for operand generation and noise.
    pub seed: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            sparsities: DEFAULT_SPARSITIES.to_vec(),
            tolerance: DEFAULT_TOLERANCE,
            noise_stddev: NOISE_STDDEV,
            workers: DEFAULT_WORKERS,
            seed: DEFAULT_SEED,
        }
    }
}

impl ValidationConfig {
    /// Sets the matrix sizes.
    pub fn with_sizes(mut self, sizes: &[usize]) -> Self {
        self.sizes = sizes.to_vec();
        self
    }

    /// Sets the sparsity levels.
    pub fn with_sparsities(mut self, sparsities: &[f64]) -> Self {
        self.sparsities = sparsities.to_vec();
        self
    }

    /// Sets the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the injected noise level.
    pub fn with_noise(mut self, noise_stddev: f64) -> Self {
        self.noise_stddev = noise_stddev;
        self
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(PerfvizError::invalid_config("workers", "must be at least 1"));
        }
        if !(self.tolerance > 0.0) {
            return Err(PerfvizError::invalid_config("tolerance", "must be positive"));
        }
        if !(self.noise_stddev >= 0.0) {
            return Err(PerfvizError::invalid_config(
                "noise_stddev",
                "must be non-negative",
            ));
        }
        for &sparsity in &self.sparsities {
            crate::records::check_sparsity(sparsity)?;
        }
        Ok(())
    }
}

/// Records produced by [`run_validation`].
#[derive(Debug, Clone, Default)]
pub struct ValidationRun {
    /// One record per variant per configuration.
    pub records: Vec<ValidationRecord>,
    /// One timing per variant (reference included) per configuration.
    pub timings: Vec<TimingRecord>,
}

/// Sweeps every size and sparsity, checking both variants against the reference.
///
/// A variant whose error cannot be computed is recorded as `ERROR` rather
/// than aborting the sweep.
///
/// # Errors
///
/// Returns an error for an invalid configuration or if the reference
/// product itself fails.
pub fn run_validation(config: &ValidationConfig) -> Result<ValidationRun> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut run = ValidationRun::default();

    for &size in &config.sizes {
        for &sparsity in &config.sparsities {
            let a = Matrix::random_sparse(size, size, sparsity, &mut rng)?;
            let b = Matrix::random(size, size, &mut rng);
            debug!(size, sparsity, zeros = a.zero_fraction(), "generated operands");

            let start = Instant::now();
            let reference = reference_multiply(&a, &b)?;
            run.timings
                .push(TimingRecord::new(REFERENCE_IMPL, size, sparsity, elapsed_ms(start)));

            let start = Instant::now();
            let simd = simd_multiply(&a, &b, config.noise_stddev, &mut rng);
            let simd_ms = elapsed_ms(start);

            let parallel_seed = rng.gen::<u64>();
            let start = Instant::now();
            let parallel =
                parallel_multiply(&a, &b, config.workers, config.noise_stddev, parallel_seed);
            let parallel_ms = elapsed_ms(start);

            for (name, result, time_ms) in [
                (SIMD_IMPL, simd, simd_ms),
                (PARALLEL_IMPL, parallel, parallel_ms),
            ] {
                let record = match result.and_then(|c| compute_max_relative_error(&reference, &c)) {
                    Ok(error) => {
                        run.timings
                            .push(TimingRecord::new(name, size, sparsity, time_ms));
                        ValidationRecord::new(name, size, sparsity, error, config.tolerance)
                    }
                    Err(e) => {
                        warn!(implementation = name, size, sparsity, error = %e, "validation failed to run");
                        ValidationRecord::errored(name, size, sparsity, config.tolerance)
                    }
                };
                info!(
                    implementation = name,
                    size,
                    sparsity,
                    max_relative_error = record.max_relative_error,
                    status = %record.status,
                    "validated"
                );
                run.records.push(record);
            }
        }
    }
    Ok(run)
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1_000.0
}
