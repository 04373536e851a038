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

//! Hardware versus software comparison.
//!
//! Derives percentage improvements and speedup factors from two metric sets.
//! Every derived value is optional: it is `None` when either input is
//! missing or the denominator is zero.

use crate::extract::{Metric, MetricSet};
use serde::Serialize;

/// Percentage by which `candidate` is lower than `baseline` (lower is better).
pub fn percent_reduction(baseline: f64, candidate: f64) -> Option<f64> {
    (baseline != 0.0).then(|| (baseline - candidate) / baseline * 100.0)
}

/// Percentage by which `candidate` is higher than `baseline` (higher is better).
pub fn percent_increase(baseline: f64, candidate: f64) -> Option<f64> {
    (baseline != 0.0).then(|| (candidate - baseline) / baseline * 100.0)
}

/// `numerator / denominator`, or `None` for a zero denominator.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator != 0.0).then(|| numerator / denominator)
}

/// Improvements of the hardware path over the software path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImprovementSummary {
    /// p95 latency reduction (%).
    pub p95_reduction: Option<f64>,
    /// p99 latency reduction (%).
    pub p99_reduction: Option<f64>,
    /// Average latency reduction (%).
    pub avg_reduction: Option<f64>,
    /// Hardware p99 against software worst case (%).
    pub max_reduction: Option<f64>,
    /// IOPS increase (%).
    pub iops_increase: Option<f64>,
    /// Throughput increase (%), from MB/s.
    pub throughput_increase: Option<f64>,
    /// Software p95 / hardware p95.
    pub speedup_p95: Option<f64>,
    /// Software p99 / hardware p99.
    pub speedup_p99: Option<f64>,
    /// Software average / hardware average latency.
    pub speedup_avg: Option<f64>,
    /// Hardware IOPS / software IOPS.
    pub speedup_iops: Option<f64>,
    /// Hardware MB/s / software MB/s.
    pub speedup_throughput: Option<f64>,
}

impl ImprovementSummary {
    /// Percentage rows in display order: (label, value).
    pub fn percentages(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("p95 Latency Reduction", self.p95_reduction),
            ("p99 Latency Reduction", self.p99_reduction),
            ("Avg Latency Reduction", self.avg_reduction),
            ("IOPS Increase", self.iops_increase),
            ("Throughput Increase", self.throughput_increase),
        ]
    }

    /// Speedup rows in display order: (label, value).
    pub fn speedups(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("p95 Latency", self.speedup_p95),
            ("p99 Latency", self.speedup_p99),
            ("Average Latency", self.speedup_avg),
            ("IOPS", self.speedup_iops),
            ("Throughput", self.speedup_throughput),
        ]
    }
}

/// Compares two metric sets.
pub fn compare(hardware: &MetricSet, software: &MetricSet) -> ImprovementSummary {
    let both = |metric: Metric| Some((hardware.get(metric)?, software.get(metric)?));

    let lower_is_better = |metric: Metric| {
        let (hw, sw) = both(metric)?;
        Some((percent_reduction(sw, hw), ratio(sw, hw)))
    };
    let higher_is_better = |metric: Metric| {
        let (hw, sw) = both(metric)?;
        Some((percent_increase(sw, hw), ratio(hw, sw)))
    };

    let (p95_reduction, speedup_p95) = lower_is_better(Metric::P95LatencyUs).unwrap_or_default();
    let (p99_reduction, speedup_p99) = lower_is_better(Metric::P99LatencyUs).unwrap_or_default();
    let (avg_reduction, speedup_avg) = lower_is_better(Metric::AvgLatencyUs).unwrap_or_default();
    let (iops_increase, speedup_iops) = higher_is_better(Metric::Iops).unwrap_or_default();
    let (throughput_increase, speedup_throughput) =
        higher_is_better(Metric::ThroughputMbps).unwrap_or_default();

    let max_reduction = match (
        hardware.get(Metric::P99LatencyUs),
        software.get(Metric::MaxLatencyUs),
    ) {
        (Some(hw_p99), Some(sw_max)) => ratio(hw_p99, sw_max).map(|r| 100.0 - r * 100.0),
        _ => None,
    };

    ImprovementSummary {
        p95_reduction,
        p99_reduction,
        avg_reduction,
        max_reduction,
        iops_increase,
        throughput_increase,
        speedup_p95,
        speedup_p99,
        speedup_avg,
        speedup_iops,
        speedup_throughput,
    }
}
