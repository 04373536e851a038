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

//! Metric extraction from free-text storage benchmark reports.
//!
//! The hardware and software harnesses print differently labeled lines, so
//! each [`ReportSource`] has its own fixed pattern table. A field whose line
//! is absent is simply not present in the resulting [`MetricSet`]; every
//! read goes through an `Option`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Bytes-per-unit factor between MB/s and GB/s used by the harnesses.
pub const MB_PER_GB: f64 = 1024.0;

/// A named numeric field of a storage report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    /// Median latency in microseconds.
    P50LatencyUs,
    /// 95th percentile latency in microseconds.
    P95LatencyUs,
    /// 99th percentile latency in microseconds.
    P99LatencyUs,
    /// Mean latency in microseconds.
    AvgLatencyUs,
    /// Maximum latency in microseconds.
    MaxLatencyUs,
    /// I/O operations per second.
    Iops,
    /// Throughput in GB/s.
    ThroughputGbps,
    /// Throughput in MB/s.
    ThroughputMbps,
    /// Speedup multiplier reported by the software harness itself.
    HwAccelSpeedup,
}

impl Metric {
    /// Returns the metric's field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::P50LatencyUs => "p50_latency_us",
            Metric::P95LatencyUs => "p95_latency_us",
            Metric::P99LatencyUs => "p99_latency_us",
            Metric::AvgLatencyUs => "avg_latency_us",
            Metric::MaxLatencyUs => "max_latency_us",
            Metric::Iops => "iops",
            Metric::ThroughputGbps => "throughput_gbps",
            Metric::ThroughputMbps => "throughput_mbps",
            Metric::HwAccelSpeedup => "hw_accel_speedup",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Which harness produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSource {
    /// Hardware accelerator output.
    Hardware,
    /// Software baseline output.
    Software,
}

impl ReportSource {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ReportSource::Hardware => "Hardware",
            ReportSource::Software => "Software",
        }
    }
}

fn compile(table: &[(Metric, &str)]) -> Vec<(Metric, Regex)> {
    table
        .iter()
        .map(|&(metric, pattern)| (metric, Regex::new(pattern).expect("valid metric pattern")))
        .collect()
}

static HARDWARE_PATTERNS: Lazy<Vec<(Metric, Regex)>> = Lazy::new(|| {
    compile(&[
        (Metric::P95LatencyUs, r"95th Percentile \(p95\):\s+(\d+\.?\d*)\s+us"),
        (Metric::P99LatencyUs, r"99th Percentile \(p99\):\s+(\d+\.?\d*)\s+us"),
        (Metric::Iops, r"Estimated IOPS:\s+(\d+)"),
        (Metric::ThroughputGbps, r"Average Throughput:\s+(\d+\.?\d*)\s+GB/s"),
        (Metric::AvgLatencyUs, r"Average Latency:\s+(\d+\.?\d*)\s+us"),
    ])
});

static SOFTWARE_PATTERNS: Lazy<Vec<(Metric, Regex)>> = Lazy::new(|| {
    compile(&[
        (Metric::P95LatencyUs, r"P95:\s+(\d+\.?\d*)\s+us"),
        (Metric::P99LatencyUs, r"P99:\s+(\d+\.?\d*)\s+us"),
        (Metric::Iops, r"Average IOPS:\s+(\d+\.?\d*)"),
        (Metric::ThroughputMbps, r"Average Throughput:\s+(\d+\.?\d*)\s+MB/s"),
        (Metric::AvgLatencyUs, r"Average latency:\s+(\d+\.?\d*)\s+us"),
        (Metric::P50LatencyUs, r"P50 \(median\):\s+(\d+\.?\d*)\s+us"),
        (Metric::MaxLatencyUs, r"Max:\s+(\d+\.?\d*)\s+us"),
        (Metric::HwAccelSpeedup, r"Hardware accelerator is\s+(\d+\.?\d*)x faster"),
    ])
});

/// Extracted metrics; absent fields are simply missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricSet {
    values: BTreeMap<Metric, f64>,
}

impl MetricSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.insert(metric, value);
        self
    }

    /// Sets a metric.
    pub fn insert(&mut self, metric: Metric, value: f64) {
        self.values.insert(metric, value);
    }

    /// Value of `metric`, if extracted.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    /// Value of `metric`, or `default` when missing.
    pub fn get_or(&self, metric: Metric, default: f64) -> f64 {
        self.get(metric).unwrap_or(default)
    }

    /// Number of extracted fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Extracts every recognizable metric from a report's text.
///
/// The first match of each pattern wins. Throughput is filled in for both
/// units: hardware reports give GB/s, software reports give MB/s.
pub fn extract_metrics(content: &str, source: ReportSource) -> MetricSet {
    let patterns = match source {
        ReportSource::Hardware => &*HARDWARE_PATTERNS,
        ReportSource::Software => &*SOFTWARE_PATTERNS,
    };

    let mut metrics = MetricSet::new();
    for (metric, regex) in patterns {
        let value = regex
            .captures(content)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok());
        if let Some(value) = value {
            metrics.insert(*metric, value);
        }
    }

    match source {
        ReportSource::Hardware => {
            if let Some(gbps) = metrics.get(Metric::ThroughputGbps) {
                metrics.insert(Metric::ThroughputMbps, gbps * MB_PER_GB);
            }
        }
        ReportSource::Software => {
            if let Some(mbps) = metrics.get(Metric::ThroughputMbps) {
                metrics.insert(Metric::ThroughputGbps, mbps / MB_PER_GB);
            }
        }
    }
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    const HARDWARE_REPORT: &str = "\
=== LATENCY ===
Average Latency: 0.85 us
95th Percentile (p95): 123.45 us
99th Percentile (p99): 150.00 us
Estimated IOPS: 1000000
Average Throughput: 3.5 GB/s
";

    const SOFTWARE_REPORT: &str = "\
Latency Percentiles:
  P50 (median): 900.10 us
  P95: 2400.00 us
  P99: 3100.50 us
  Max: 8000 us
  Average latency: 1200.25 us
  Average IOPS: 500.00
  Average Throughput: 12.80 MB/s
Hardware accelerator is 1750.5x faster
";

    #[test]
    fn test_extract_hardware_p95() {
        let metrics = extract_metrics("95th Percentile (p95): 123.45 us", ReportSource::Hardware);
        assert_eq!(metrics.get(Metric::P95LatencyUs), Some(123.45));
        assert_eq!(metrics.len(), 1);
    }

    #[test]
    fn test_extract_full_hardware_report() {
        let metrics = extract_metrics(HARDWARE_REPORT, ReportSource::Hardware);
        assert_eq!(metrics.get(Metric::AvgLatencyUs), Some(0.85));
        assert_eq!(metrics.get(Metric::P99LatencyUs), Some(150.0));
        assert_eq!(metrics.get(Metric::Iops), Some(1_000_000.0));
        assert_eq!(metrics.get(Metric::ThroughputGbps), Some(3.5));
        assert_eq!(metrics.get(Metric::ThroughputMbps), Some(3.5 * 1024.0));
        assert_eq!(metrics.get(Metric::MaxLatencyUs), None);
    }

    #[test]
    fn test_extract_full_software_report() {
        let metrics = extract_metrics(SOFTWARE_REPORT, ReportSource::Software);
        assert_eq!(metrics.get(Metric::P50LatencyUs), Some(900.10));
        assert_eq!(metrics.get(Metric::P95LatencyUs), Some(2400.0));
        assert_eq!(metrics.get(Metric::P99LatencyUs), Some(3100.50));
        assert_eq!(metrics.get(Metric::MaxLatencyUs), Some(8000.0));
        assert_eq!(metrics.get(Metric::AvgLatencyUs), Some(1200.25));
        assert_eq!(metrics.get(Metric::Iops), Some(500.0));
        assert_eq!(metrics.get(Metric::ThroughputMbps), Some(12.80));
        assert_eq!(metrics.get(Metric::ThroughputGbps), Some(12.80 / 1024.0));
        assert_eq!(metrics.get(Metric::HwAccelSpeedup), Some(1750.5));
    }

    #[test]
    fn test_labels_are_source_specific() {
        // Software-style labels mean nothing to the hardware table.
        let metrics = extract_metrics(SOFTWARE_REPORT, ReportSource::Hardware);
        assert!(metrics.get(Metric::P95LatencyUs).is_none());
        assert!(metrics.get(Metric::Iops).is_none());
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let metrics = extract_metrics("nothing useful here", ReportSource::Software);
        assert!(metrics.is_empty());
        assert_eq!(metrics.get(Metric::Iops), None);
        assert_eq!(metrics.get_or(Metric::Iops, 1.0), 1.0);
    }

    #[test]
    fn test_first_match_wins() {
        let text = "P95: 10.0 us\nP95: 20.0 us\n";
        let metrics = extract_metrics(text, ReportSource::Software);
        assert_eq!(metrics.get(Metric::P95LatencyUs), Some(10.0));
    }

    #[test]
    fn test_metric_set_serializes_by_field_name() {
        let metrics = MetricSet::new().with(Metric::Iops, 2.0);
        let json = serde_json::to_string(&metrics).unwrap();
        assert_eq!(json, r#"{"iops":2.0}"#);
    }
}
