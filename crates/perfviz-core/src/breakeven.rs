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

//! Dense/sparse break-even search.
//!
//! Scans sparsity levels in ascending order and reports where the sparse
//! kernel's throughput first strictly exceeds the dense kernel's.

use crate::records::BenchmarkRecord;
use std::fmt;
use std::str::FromStr;

/// Tolerance used when matching dense and sparse rows by sparsity.
pub const SPARSITY_MATCH_EPSILON: f64 = 1e-9;

/// How a crossing that later regresses is treated.
///
/// `LatchFirst` is the default for every caller. Switching the default
/// changes reported results and needs product sign-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreakEvenPolicy {
    /// The first sparsity where sparse beats dense is final.
    #[default]
    LatchFirst,
    /// The candidate is dropped whenever sparse falls back to or below
    /// dense; the result is the start of the last sustained crossing.
    ResetOnRegression,
}

impl BreakEvenPolicy {
    /// Returns the policy's command-line name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakEvenPolicy::LatchFirst => "latch-first",
            BreakEvenPolicy::ResetOnRegression => "reset-on-regression",
        }
    }
}

impl fmt::Display for BreakEvenPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BreakEvenPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latch-first" | "latch" => Ok(BreakEvenPolicy::LatchFirst),
            "reset-on-regression" | "reset" => Ok(BreakEvenPolicy::ResetOnRegression),
            other => Err(format!(
                "Unknown break-even policy: '{}'. Expected latch-first or reset-on-regression",
                other
            )),
        }
    }
}

/// Dense and sparse throughput measured at one sparsity level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparsityPoint {
    /// Sparsity level.
    pub sparsity: f64,
    /// Dense kernel GFLOP/s.
    pub dense_gflops: f64,
    /// Sparse kernel GFLOP/s.
    pub sparse_gflops: f64,
}

impl SparsityPoint {
    /// Returns whether the sparse kernel strictly outperforms the dense one.
    pub fn sparse_wins(&self) -> bool {
        self.sparse_gflops > self.dense_gflops
    }
}

/// Pairs dense and sparse records measured at the same sparsity.
///
/// Walks the unique dense sparsities in ascending order; a level without a
/// sparse counterpart is skipped. When several rows share a level the first
/// one wins.
pub fn pair_series(dense: &[&BenchmarkRecord], sparse: &[&BenchmarkRecord]) -> Vec<SparsityPoint> {
    let mut levels: Vec<f64> = dense.iter().map(|r| r.sparsity).collect();
    levels.sort_by(f64::total_cmp);
    levels.dedup_by(|a, b| (*a - *b).abs() <= SPARSITY_MATCH_EPSILON);

    let at = |series: &[&BenchmarkRecord], level: f64| {
        series
            .iter()
            .find(|r| (r.sparsity - level).abs() <= SPARSITY_MATCH_EPSILON)
            .map(|r| r.gflops)
    };

    levels
        .into_iter()
        .filter_map(|level| {
            Some(SparsityPoint {
                sparsity: level,
                dense_gflops: at(dense, level)?,
                sparse_gflops: at(sparse, level)?,
            })
        })
        .collect()
}

/// Finds the break-even sparsity under `policy`.
///
/// `points` must be sorted by ascending sparsity.
pub fn find_break_even(points: &[SparsityPoint], policy: BreakEvenPolicy) -> Option<f64> {
    let mut candidate = None;
    for point in points {
        match (point.sparse_wins(), policy) {
            (true, BreakEvenPolicy::LatchFirst) => return Some(point.sparsity),
            (true, BreakEvenPolicy::ResetOnRegression) => {
                candidate.get_or_insert(point.sparsity);
            }
            (false, BreakEvenPolicy::ResetOnRegression) => candidate = None,
            (false, BreakEvenPolicy::LatchFirst) => {}
        }
    }
    candidate
}
