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

//! Hardware versus software storage comparison pipeline.

use super::ensure_output_dir;
use crate::compare::{compare, ImprovementSummary};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::extract::{extract_metrics, Metric, MetricSet, ReportSource};
use crate::loader::read_report;
use crate::render::{render_figure, BarPanel, Figure, LinePanel, Panel, RenderConfig, Series};
use crate::reporters::{export_json, group_digits, print_storage_summary, StorageComparison};
use plotters::style::RGBColor;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Storage chart stems, in write order, inside the figures directory.
pub const STORAGE_FIGURES: [&str; 5] = [
    "latency_comparison",
    "performance_comparison",
    "improvement_percentage",
    "speedup_comparison",
    "comprehensive_summary",
];

/// JSON export of the comparison.
pub const STORAGE_JSON: &str = "storage_comparison.json";

/// Sequential colors for the five speedup bars.
const SPEEDUP_COLORS: [RGBColor; 5] = [
    RGBColor(0x31, 0x68, 0x8E),
    RGBColor(0x25, 0x84, 0x8E),
    RGBColor(0x1F, 0xA1, 0x88),
    RGBColor(0x4A, 0xC1, 0x6D),
    RGBColor(0xBD, 0xDF, 0x26),
];

const SUMMARY_COLORS: [RGBColor; 4] = [
    RGBColor(0xFF, 0x6B, 0x6B),
    RGBColor(0x4E, 0xCD, 0xC4),
    RGBColor(0x45, 0xB7, 0xD1),
    RGBColor(0x96, 0xCE, 0xB4),
];

/// Hardware max latency is not reported; it is estimated from p99.
const HARDWARE_MAX_OVER_P99: f64 = 1.1;

/// Software max latency estimate when the report omits it.
const SOFTWARE_MAX_OVER_P99: f64 = 1.5;

/// What a storage comparison produced.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageOutcome {
    /// Metrics extracted from the hardware report.
    pub hardware: MetricSet,
    /// Metrics extracted from the software report.
    pub software: MetricSet,
    /// Hardware-over-software ratios.
    pub improvements: ImprovementSummary,
    /// The printed summary table.
    pub summary: String,
    /// Charts then the JSON export.
    pub files: Vec<PathBuf>,
    /// Whether a report was missing and placeholder charts were written.
    pub placeholder: bool,
}

/// Compares the hardware and software storage reports.
///
/// Prints the summary table, writes the five charts under the figures
/// directory and exports the comparison as JSON.
///
/// # Errors
///
/// Returns an error for an invalid configuration, an unreadable report, or a
/// write failure. A missing report is not an error.
pub fn run_storage_comparison(config: &ReportConfig) -> Result<StorageOutcome> {
    config.validate()?;
    ensure_output_dir(config)?;

    let hardware = load_metrics(&config.input_path(&config.hardware_report), ReportSource::Hardware)?;
    let software = load_metrics(&config.input_path(&config.software_report), ReportSource::Software)?;
    let placeholder = hardware.is_none() || software.is_none();
    let hardware = hardware.unwrap_or_default();
    let software = software.unwrap_or_default();

    let improvements = compare(&hardware, &software);
    let summary = print_storage_summary(&hardware, &software, &improvements);

    let figures = if placeholder {
        STORAGE_FIGURES
            .iter()
            .map(|name| Figure::placeholder(figure_title(name), "Storage report not found"))
            .collect()
    } else {
        vec![
            latency_figure(&hardware, &software, &config.render),
            performance_figure(&hardware, &software, &config.render),
            improvement_figure(&improvements),
            speedup_figure(&improvements),
            summary_figure(&hardware, &software, &improvements, &config.render),
        ]
    };

    info!("generating comparison charts");
    let mut files = Vec::new();
    for (name, figure) in STORAGE_FIGURES.iter().zip(&figures) {
        let path = render_figure(&config.render, &config.figure_stem(name), figure)?;
        info!(path = %path.display(), "wrote chart");
        files.push(path);
    }

    let path = config.output_path(STORAGE_JSON);
    export_json(
        &StorageComparison::new(hardware.clone(), software.clone(), improvements.clone()),
        &path,
    )?;
    info!(path = %path.display(), "wrote comparison");
    files.push(path);

    Ok(StorageOutcome {
        hardware,
        software,
        improvements,
        summary,
        files,
        placeholder,
    })
}

fn load_metrics(path: &Path, source: ReportSource) -> Result<Option<MetricSet>> {
    info!(source = source.label(), path = %path.display(), "extracting metrics");
    match read_report(path)? {
        Some(content) => {
            let metrics = extract_metrics(&content, source);
            if metrics.is_empty() {
                warn!(source = source.label(), path = %path.display(), "no metrics recognized in report");
            }
            Ok(Some(metrics))
        }
        None => Ok(None),
    }
}

fn figure_title(name: &str) -> &'static str {
    match name {
        "latency_comparison" => "Latency Comparison",
        "performance_comparison" => "Performance Comparison",
        "improvement_percentage" => "Hardware Improvement Over Software",
        "speedup_comparison" => "Hardware Speedup Over Software",
        _ => "Hardware vs Software Performance Analysis - Summary",
    }
}

/// Points of a categorical line; missing values are left out.
fn category_points(values: &[Option<f64>]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
        .collect()
}

fn hw_sw_series(
    hardware: &[Option<f64>],
    software: &[Option<f64>],
    render: &RenderConfig,
) -> [Series; 2] {
    [
        Series::new("Hardware", category_points(hardware)).with_color(render.hardware_color),
        Series::new("Software", category_points(software)).with_color(render.software_color),
    ]
}

fn latency_figure(hardware: &MetricSet, software: &MetricSet, render: &RenderConfig) -> Figure {
    let main = [Metric::P95LatencyUs, Metric::P99LatencyUs, Metric::AvgLatencyUs];
    let bars = BarPanel::new("Latency Comparison (Log Scale)", ["p95 Latency", "p99 Latency", "Avg Latency"])
        .colored_series("Hardware", main.iter().map(|&m| hardware.get(m)).collect(), render.hardware_color)
        .colored_series("Software", main.iter().map(|&m| software.get(m)).collect(), render.software_color)
        .log_y()
        .value_labels(|v| format!("{:.2}", v))
        .x_label("Latency Metric")
        .y_label("Latency (microseconds)");

    // avg stands in for the hardware median, p99 for its max
    let hw = [
        hardware.get(Metric::AvgLatencyUs),
        hardware.get(Metric::P95LatencyUs),
        hardware.get(Metric::P99LatencyUs),
        hardware.get(Metric::P99LatencyUs),
    ];
    let sw = [
        software.get(Metric::P50LatencyUs).or(software.get(Metric::AvgLatencyUs)),
        software.get(Metric::P95LatencyUs),
        software.get(Metric::P99LatencyUs),
        software.get(Metric::MaxLatencyUs).or(software.get(Metric::P99LatencyUs)),
    ];
    let [hw_series, sw_series] = hw_sw_series(&hw, &sw, render);
    let lines = LinePanel::new("Latency Distribution Comparison")
        .categories(["P50", "P95", "P99", "Max"])
        .series(hw_series)
        .series(sw_series)
        .log_y()
        .fill()
        .annotate()
        .x_label("Percentile")
        .y_label("Latency (μs)");

    Figure::with_panels(vec![Panel::from(bars), Panel::from(lines)])
}

fn format_iops(value: f64) -> String {
    if value > 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if value > 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        format!("{:.0}", value)
    }
}

fn format_throughput(mbps: f64) -> String {
    if mbps > 1000.0 {
        format!("{:.1} GB/s", mbps / 1000.0)
    } else {
        format!("{:.1} MB/s", mbps)
    }
}

fn performance_figure(hardware: &MetricSet, software: &MetricSet, render: &RenderConfig) -> Figure {
    let systems = ["Hardware", "Software"];
    let colors = vec![render.hardware_color, render.software_color];
    let pair = |metric: Metric| vec![hardware.get(metric), software.get(metric)];

    let iops = BarPanel::new("IOPS Comparison (Log Scale)", systems)
        .series("IOPS", pair(Metric::Iops))
        .category_colors(colors.clone())
        .log_y()
        .value_labels(format_iops)
        .y_label("IOPS");
    let throughput = BarPanel::new("Throughput Comparison (Log Scale)", systems)
        .series("Throughput", pair(Metric::ThroughputMbps))
        .category_colors(colors)
        .log_y()
        .value_labels(format_throughput)
        .y_label("Throughput (MB/s)");

    Figure::with_panels(vec![Panel::from(iops), Panel::from(throughput)])
}

fn improvement_figure(improvements: &ImprovementSummary) -> Figure {
    let rows = improvements.percentages();
    Figure::new(
        BarPanel::new("Hardware Improvement Over Software", rows.iter().map(|(label, _)| *label))
            .series("Improvement", rows.iter().map(|(_, v)| *v).collect())
            .color_by_sign()
            .value_labels(|v| format!("{}%", group_digits(v, 1)))
            .reference(0.0, "No Change")
            .y_label("Improvement (%)"),
    )
}

fn speedup_figure(improvements: &ImprovementSummary) -> Figure {
    let rows = improvements.speedups();
    Figure::new(
        BarPanel::new("Hardware Speedup Over Software", rows.iter().map(|(label, _)| *label))
            .series("Speedup", rows.iter().map(|(_, v)| *v).collect())
            .category_colors(SPEEDUP_COLORS.to_vec())
            .log_y()
            .value_labels(|v| format!("{}x", group_digits(v, 1)))
            .reference(1.0, "No Improvement (1x)")
            .y_label("Speedup Factor (x)"),
    )
}

fn summary_figure(
    hardware: &MetricSet,
    software: &MetricSet,
    improvements: &ImprovementSummary,
    render: &RenderConfig,
) -> Figure {
    let speedups = BarPanel::new(
        "Hardware Speedup Factors",
        ["P95 Latency", "P99 Latency", "IOPS", "Throughput"],
    )
    .series(
        "Speedup",
        vec![
            improvements.speedup_p95,
            improvements.speedup_p99,
            improvements.speedup_iops,
            improvements.speedup_throughput,
        ],
    )
    .category_colors(SUMMARY_COLORS.to_vec())
    .log_y()
    .value_labels(|v| format!("{}x", group_digits(v, 1)))
    .y_label("Speedup (x)");

    let hw_p99 = hardware.get(Metric::P99LatencyUs);
    let sw_p99 = software.get(Metric::P99LatencyUs);
    let hw = [
        hardware.get(Metric::AvgLatencyUs),
        hardware.get(Metric::P95LatencyUs),
        hw_p99,
        hw_p99.map(|v| v * HARDWARE_MAX_OVER_P99),
    ];
    let sw = [
        software.get(Metric::AvgLatencyUs),
        software.get(Metric::P95LatencyUs),
        sw_p99,
        software
            .get(Metric::MaxLatencyUs)
            .or(sw_p99.map(|v| v * SOFTWARE_MAX_OVER_P99)),
    ];
    let [hw_series, sw_series] = hw_sw_series(&hw, &sw, render);
    let lines = LinePanel::new("Latency Distribution")
        .categories(["Min/Avg", "P95", "P99", "Max"])
        .series(hw_series)
        .series(sw_series)
        .log_y()
        .x_label("Latency Type")
        .y_label("Latency (μs)");

    Figure::with_panels(vec![Panel::from(speedups), Panel::from(lines)])
        .with_title("Hardware vs Software Performance Analysis - Summary")
}
