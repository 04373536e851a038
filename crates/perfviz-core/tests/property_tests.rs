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

//! Property-based tests for the analysis core using proptest.
//!
//! - Relative error: identity is zero, noise-free variants match the reference
//! - Status classification: strict inequality against the tolerance
//! - Break-even: policy ordering and sustained crossings
//! - Roofline and comparison arithmetic
//! - Metric extraction of formatted values

use perfviz_core::{
    compare, compute_max_relative_error, extract_metrics, find_break_even, parallel_multiply,
    reference_multiply, simd_multiply, BreakEvenPolicy, Matrix, Metric, MetricSet, ReportSource,
    RooflineModel, SparsityPoint, Statistics, ValidationStatus,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ===== Generators =====

fn matrix_pair() -> impl Strategy<Value = (Matrix, Matrix, u64)> {
    (1usize..12, 1usize..12, 1usize..12, any::<u64>(), 0.0f64..=1.0).prop_map(|(m, k, n, seed, sparsity)| {
        let mut rng = StdRng::seed_from_u64(seed);
        let a = Matrix::random_sparse(m, k, sparsity, &mut rng).expect("sparsity in range");
        let b = Matrix::random(k, n, &mut rng);
        (a, b, seed)
    })
}

fn throughput_series() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1usize..12).prop_flat_map(|len| {
        (
            prop::collection::vec(0.1f64..100.0, len),
            prop::collection::vec(0.1f64..100.0, len),
        )
    })
}

// ===== Validator Properties =====

proptest! {
    #[test]
    fn prop_relative_error_identity((a, b, _) in matrix_pair()) {
        let c = reference_multiply(&a, &b).unwrap();
        prop_assert_eq!(compute_max_relative_error(&c, &c).unwrap(), 0.0);
    }

    #[test]
    fn prop_noise_free_variants_match_reference((a, b, seed) in matrix_pair(), workers in 1usize..6) {
        let reference = reference_multiply(&a, &b).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let simd = simd_multiply(&a, &b, 0.0, &mut rng).unwrap();
        let parallel = parallel_multiply(&a, &b, workers, 0.0, seed).unwrap();
        prop_assert_eq!(compute_max_relative_error(&reference, &simd).unwrap(), 0.0);
        prop_assert_eq!(compute_max_relative_error(&reference, &parallel).unwrap(), 0.0);
    }

    #[test]
    fn prop_parallel_independent_of_workers((a, b, seed) in matrix_pair(), workers in 2usize..6) {
        let one = parallel_multiply(&a, &b, 1, 1e-7, seed).unwrap();
        let many = parallel_multiply(&a, &b, workers, 1e-7, seed).unwrap();
        prop_assert_eq!(one, many);
    }

    #[test]
    fn prop_status_is_strict(error in 0.0f64..1e-3, tolerance in 1e-9f64..1e-3) {
        let status = ValidationStatus::from_error(error, tolerance);
        prop_assert_eq!(status == ValidationStatus::Pass, error < tolerance);
        prop_assert_ne!(status, ValidationStatus::Error);
    }
}

// ===== Break-even Properties =====

proptest! {
    #[test]
    fn prop_latch_first_never_later_than_reset((dense, sparse) in throughput_series()) {
        let points: Vec<SparsityPoint> = dense
            .iter()
            .zip(&sparse)
            .enumerate()
            .map(|(i, (&dense_gflops, &sparse_gflops))| SparsityPoint {
                sparsity: (i + 1) as f64 / 20.0,
                dense_gflops,
                sparse_gflops,
            })
            .collect();
        let latch = find_break_even(&points, BreakEvenPolicy::LatchFirst);
        let reset = find_break_even(&points, BreakEvenPolicy::ResetOnRegression);

        if let Some(reset) = reset {
            let latch = latch.expect("a sustained crossing is also a first crossing");
            prop_assert!(latch <= reset);
            prop_assert!(points.iter().filter(|p| p.sparsity >= reset).all(|p| p.sparse_wins()));
        }
        if latch.is_none() {
            prop_assert!(reset.is_none());
        }
    }
}

// ===== Arithmetic Properties =====

proptest! {
    #[test]
    fn prop_roofline_bounded(peak in 1.0f64..1e4, bandwidth in 1.0f64..1e3, ai in 1e-3f64..1e3) {
        let model = RooflineModel::new(peak, bandwidth).unwrap();
        let attainable = model.attainable(ai);
        prop_assert!(attainable <= peak);
        prop_assert!(attainable <= bandwidth * ai);
        prop_assert_eq!(model.is_memory_bound(ai), bandwidth * ai < peak);
    }

    #[test]
    fn prop_statistics_ordered(values in prop::collection::vec(-1e6f64..1e6, 1..50)) {
        let stats = Statistics::from_values(&values);
        prop_assert_eq!(stats.count, values.len());
        prop_assert!(stats.min <= stats.mean + 1e-6);
        prop_assert!(stats.mean <= stats.max + 1e-6);
    }

    #[test]
    fn prop_speedup_consistent_with_increase(hw in 1.0f64..1e7, sw in 1.0f64..1e7) {
        let summary = compare(
            &MetricSet::new().with(Metric::Iops, hw),
            &MetricSet::new().with(Metric::Iops, sw),
        );
        let speedup = summary.speedup_iops.unwrap();
        let increase = summary.iops_increase.unwrap();
        prop_assert!(((speedup - 1.0) * 100.0 - increase).abs() < 1e-6 * increase.abs().max(1.0));
    }

    #[test]
    fn prop_extracts_formatted_latency(whole in 0u32..100_000, frac in 0u32..100) {
        let text = format!("95th Percentile (p95): {}.{:02} us", whole, frac);
        let expected: f64 = format!("{}.{:02}", whole, frac).parse().unwrap();
        let metrics = extract_metrics(&text, ReportSource::Hardware);
        prop_assert_eq!(metrics.get(Metric::P95LatencyUs), Some(expected));
    }
}
