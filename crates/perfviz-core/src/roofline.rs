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

//! Theoretical roofline model.

use crate::error::{PerfvizError, Result};

/// Default compute ceiling in GFLOP/s.
pub const DEFAULT_PEAK_GFLOPS: f64 = 100.0;

/// Default memory bandwidth in GB/s.
pub const DEFAULT_BANDWIDTH_GBS: f64 = 25.0;

/// Arithmetic intensity range sampled by [`RooflineModel::curve`] (FLOP/byte).
pub const INTENSITY_RANGE: (f64, f64) = (1e-2, 1e2);

/// Attainable throughput bounded by compute and memory bandwidth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RooflineModel {
    /// Compute ceiling in GFLOP/s.
    pub peak_gflops: f64,
    /// Memory bandwidth in GB/s.
    pub memory_bandwidth_gbs: f64,
}

impl Default for RooflineModel {
    fn default() -> Self {
        Self {
            peak_gflops: DEFAULT_PEAK_GFLOPS,
            memory_bandwidth_gbs: DEFAULT_BANDWIDTH_GBS,
        }
    }
}

impl RooflineModel {
    /// Creates a model, rejecting non-positive parameters.
    pub fn new(peak_gflops: f64, memory_bandwidth_gbs: f64) -> Result<Self> {
        if !(peak_gflops > 0.0) {
            return Err(PerfvizError::invalid_config("peak_gflops", "must be positive"));
        }
        if !(memory_bandwidth_gbs > 0.0) {
            return Err(PerfvizError::invalid_config(
                "memory_bandwidth_gbs",
                "must be positive",
            ));
        }
        Ok(Self {
            peak_gflops,
            memory_bandwidth_gbs,
        })
    }

    /// `min(peak, bandwidth * ai)`.
    pub fn attainable(&self, arithmetic_intensity: f64) -> f64 {
        self.peak_gflops
            .min(self.memory_bandwidth_gbs * arithmetic_intensity)
    }

    /// Intensity where the memory slope meets the compute ceiling.
    pub fn ridge_point(&self) -> f64 {
        self.peak_gflops / self.memory_bandwidth_gbs
    }

    /// Returns whether a kernel at this intensity is memory bound.
    pub fn is_memory_bound(&self, arithmetic_intensity: f64) -> bool {
        arithmetic_intensity < self.ridge_point()
    }

    /// `(ai, attainable)` at `samples` log-spaced intensities over [`INTENSITY_RANGE`].
    pub fn curve(&self, samples: usize) -> Vec<(f64, f64)> {
        logspace(INTENSITY_RANGE.0, INTENSITY_RANGE.1, samples)
            .into_iter()
            .map(|ai| (ai, self.attainable(ai)))
            .collect()
    }
}

/// `samples` points evenly spaced in log10 between `start` and `end` inclusive.
pub fn logspace(start: f64, end: f64, samples: usize) -> Vec<f64> {
    match samples {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let (lo, hi) = (start.log10(), end.log10());
            let step = (hi - lo) / (samples - 1) as f64;
            (0..samples)
                .map(|i| 10f64.powf(lo + step * i as f64))
                .collect()
        }
    }
}
