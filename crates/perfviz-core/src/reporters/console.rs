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

//! Fixed-width storage comparison table.

use super::{group_digits, NOT_AVAILABLE};
use crate::compare::ImprovementSummary;
use crate::extract::{Metric, MetricSet};

const WIDTH: usize = 80;

fn fixed(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn grouped(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| group_digits(v, decimals))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn suffixed(value: Option<f64>, suffix: &str) -> String {
    value
        .map(|v| format!("{:.1}{}", v, suffix))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn row(out: &mut String, label: &str, software: &str, hardware: &str, result: &str) {
    out.push_str(&format!(
        "{:<30} {:<20} {:<20} {:>20}\n",
        label, software, hardware, result
    ));
}

/// Formats the hardware versus software summary table.
///
/// Values that were not extracted or could not be derived print as `n/a`.
pub fn format_storage_summary(
    hardware: &MetricSet,
    software: &MetricSet,
    improvements: &ImprovementSummary,
) -> String {
    let heavy = "=".repeat(WIDTH);
    let light = "-".repeat(WIDTH);
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", heavy));
    out.push_str("HARDWARE VS SOFTWARE PERFORMANCE SUMMARY\n");
    out.push_str(&format!("{}\n", heavy));
    out.push_str(&format!(
        "{:<30} {:<20} {:<20} {:<20}\n",
        "Metric", "Software", "Hardware", "Improvement"
    ));
    out.push_str(&format!("{}\n", light));

    let both = |metric: Metric, decimals: usize| {
        (
            fixed(software.get(metric), decimals),
            fixed(hardware.get(metric), decimals),
        )
    };

    for (label, metric, improvement) in [
        ("p95 Latency (us)", Metric::P95LatencyUs, improvements.p95_reduction),
        ("p99 Latency (us)", Metric::P99LatencyUs, improvements.p99_reduction),
        ("Avg Latency (us)", Metric::AvgLatencyUs, improvements.avg_reduction),
    ] {
        let (sw, hw) = both(metric, 2);
        row(&mut out, label, &sw, &hw, &suffixed(improvement, "%"));
    }
    row(
        &mut out,
        "IOPS",
        &grouped(software.get(Metric::Iops), 0),
        &grouped(hardware.get(Metric::Iops), 0),
        &suffixed(improvements.iops_increase, "%"),
    );
    let (sw, hw) = both(Metric::ThroughputMbps, 2);
    row(
        &mut out,
        "Throughput (MB/s)",
        &sw,
        &hw,
        &suffixed(improvements.throughput_increase, "%"),
    );
    let (sw, hw) = both(Metric::ThroughputGbps, 3);
    row(&mut out, "Throughput (GB/s)", &sw, &hw, "-");

    out.push_str(&format!("{}\n", light));
    out.push_str(&format!(
        "{:<30} {:<20} {:<20} {:<20}\n",
        "Speedup Factor", "-", "-", "Value"
    ));
    for (label, speedup) in improvements.speedups() {
        row(&mut out, &format!("  {}", label), "-", "-", &suffixed(speedup, "x"));
    }

    if let Some(accel) = software.get(Metric::HwAccelSpeedup) {
        out.push_str(&format!("{}\n", light));
        row(
            &mut out,
            "Hardware Accelerator Speedup",
            "-",
            "-",
            &suffixed(Some(accel), "x"),
        );
        out.push_str("(from software analysis)\n");
    }
    out.push_str(&format!("{}\n", heavy));

    out.push_str("\nKEY TAKEAWAYS:\n");
    out.push_str(&format!(
        "1. Hardware is {}x faster in terms of IOPS\n",
        grouped(improvements.speedup_iops, 0)
    ));
    out.push_str(&format!(
        "2. Hardware reduces p99 latency by {}\n",
        suffixed(improvements.p99_reduction, "%")
    ));
    out.push_str(&format!(
        "3. Hardware provides {}% higher throughput\n",
        grouped(improvements.throughput_increase, 1)
    ));
    out.push_str(&format!(
        "4. Hardware achieves {}M IOPS vs Software's {} IOPS\n",
        fixed(hardware.get(Metric::Iops).map(|v| v / 1e6), 1),
        grouped(software.get(Metric::Iops), 0)
    ));
    out.push_str(&format!(
        "5. Hardware p95 latency is {} better than software\n",
        suffixed(improvements.speedup_p95, "x")
    ));
    out
}

/// Prints the summary table to stdout and returns it.
pub fn print_storage_summary(
    hardware: &MetricSet,
    software: &MetricSet,
    improvements: &ImprovementSummary,
) -> String {
    let table = format_storage_summary(hardware, software, improvements);
    print!("{}", table);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::compare;

    fn hardware() -> MetricSet {
        MetricSet::new()
            .with(Metric::P95LatencyUs, 2.0)
            .with(Metric::P99LatencyUs, 4.0)
            .with(Metric::AvgLatencyUs, 1.0)
            .with(Metric::Iops, 1_000_000.0)
            .with(Metric::ThroughputGbps, 4.0)
            .with(Metric::ThroughputMbps, 4096.0)
    }

    fn software() -> MetricSet {
        MetricSet::new()
            .with(Metric::P95LatencyUs, 200.0)
            .with(Metric::P99LatencyUs, 400.0)
            .with(Metric::AvgLatencyUs, 100.0)
            .with(Metric::Iops, 500.0)
            .with(Metric::ThroughputMbps, 2.0)
            .with(Metric::ThroughputGbps, 2.0 / 1024.0)
            .with(Metric::HwAccelSpeedup, 1750.5)
    }

    #[test]
    fn test_full_table() {
        let (hw, sw) = (hardware(), software());
        let table = format_storage_summary(&hw, &sw, &compare(&hw, &sw));

        assert!(table.contains("HARDWARE VS SOFTWARE PERFORMANCE SUMMARY"));
        assert!(table.contains("1,000,000"));
        assert!(table.contains("99.0%"));
        assert!(table.contains("2000.0x"));
        assert!(table.contains("1750.5x"));
        assert!(table.contains("1. Hardware is 2,000x faster in terms of IOPS"));
        assert!(table.contains("4. Hardware achieves 1.0M IOPS vs Software's 500 IOPS"));
        assert!(!table.contains(NOT_AVAILABLE));
    }

    #[test]
    fn test_missing_values_print_na() {
        let hw = MetricSet::new().with(Metric::Iops, 10.0);
        let sw = MetricSet::new();
        let table = format_storage_summary(&hw, &sw, &compare(&hw, &sw));

        assert!(table.contains(NOT_AVAILABLE));
        assert!(!table.contains("Hardware Accelerator Speedup"));
        assert!(table.contains("2. Hardware reduces p99 latency by n/a"));
    }

    #[test]
    fn test_rows_are_aligned() {
        let (hw, sw) = (hardware(), software());
        let table = format_storage_summary(&hw, &sw, &compare(&hw, &sw));
        let line = table
            .lines()
            .find(|l| l.starts_with("p95 Latency (us)"))
            .unwrap();
        assert_eq!(line.len(), 30 + 1 + 20 + 1 + 20 + 1 + 20);
        assert!(line.ends_with("99.0%"));
    }
}
