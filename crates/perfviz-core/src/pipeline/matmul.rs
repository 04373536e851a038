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

//! Figures for the matrix-multiply experiments.

use crate::aggregator::{group_by, summarize_throughput};
use crate::breakeven::{find_break_even, pair_series, BreakEvenPolicy};
use crate::records::BenchmarkRecord;
use crate::render::{BarPanel, Figure, LinePanel, Panel, PointLabel, RooflinePanel, Series};
use crate::roofline::RooflineModel;
use plotters::style::RGBColor;
use tracing::debug;

/// Kernel label used for rows without a `kernel_type`.
pub(super) const UNLABELED_KERNEL: &str = "all";

/// Single-thread bars (mean GFLOP/s per implementation) beside
/// thread-scaling lines (mean GFLOP/s per implementation and thread count).
///
/// Each implementation's bar takes the next `palette` color.
pub(super) fn speedup_figure(records: &[BenchmarkRecord], palette: &[RGBColor]) -> Figure {
    let single: Vec<BenchmarkRecord> = records.iter().filter(|r| r.threads == 1).cloned().collect();
    let summaries = summarize_throughput(&single, |r| r.implementation.clone());

    let bars = BarPanel::new(
        "Single-Threaded Performance Comparison",
        summaries.iter().map(|s| s.key.clone()),
    )
    .series("GFLOP/s", summaries.iter().map(|s| Some(s.gflops.mean)).collect())
    .category_colors(palette.to_vec())
    .value_labels(|v| format!("{:.2}", v))
    .x_label("Implementation")
    .y_label("GFLOP/s");

    let multi: Vec<BenchmarkRecord> = records.iter().filter(|r| r.threads > 1).cloned().collect();
    let scaling = summarize_throughput(&multi, |r| (r.implementation.clone(), r.threads));
    let mut lines = LinePanel::new("Thread Scaling Analysis")
        .x_label("Thread Count")
        .y_label("GFLOP/s");
    for (implementation, points) in group_by(&scaling, |s| s.key.0.clone()) {
        let points = points
            .iter()
            .map(|s| (f64::from(s.key.1), s.gflops.mean))
            .collect();
        lines = lines.series(Series::new(implementation, points));
    }

    Figure::with_panels(vec![Panel::from(bars), Panel::from(lines)])
}

/// Dense GEMM and CSR SpMM throughput over log sparsity with the break-even marker.
pub(super) fn break_even_figure(records: &[BenchmarkRecord], policy: BreakEvenPolicy) -> (Figure, Option<f64>) {
    let dense: Vec<&BenchmarkRecord> = records.iter().filter(|r| r.is_dense()).collect();
    let sparse: Vec<&BenchmarkRecord> = records.iter().filter(|r| r.is_csr()).collect();

    let mut panel = LinePanel::new("Density Break-even Analysis")
        .x_label("Sparsity")
        .y_label("GFLOP/s")
        .log_x();
    for (name, series) in [("Dense GEMM", &dense), ("CSR SpMM", &sparse)] {
        if !series.is_empty() {
            panel = panel.series(Series::new(name, by_sparsity(series)));
        }
    }

    let break_even = find_break_even(&pair_series(&dense, &sparse), policy);
    if let Some(sparsity) = break_even {
        panel = panel.marker(sparsity, format!("Break-even: {:.3}", sparsity));
    }
    (Figure::new(panel), break_even)
}

fn by_sparsity(records: &[&BenchmarkRecord]) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = records.iter().map(|r| (r.sparsity, r.gflops)).collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    points
}

/// Throughput over matrix size, in ascending size order.
pub(super) fn working_set_figure(records: &[BenchmarkRecord]) -> Figure {
    let mut points: Vec<(f64, f64)> = records.iter().map(|r| (r.size as f64, r.gflops)).collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    Figure::new(
        LinePanel::new("Working Set Transitions (Cache Effects)")
            .series(Series::new("", points))
            .x_label("Matrix Size")
            .y_label("GFLOP/s"),
    )
}

/// One roofline figure per kernel type, keyed by a file-safe kernel label.
pub(super) fn roofline_figures(records: &[BenchmarkRecord], model: RooflineModel) -> Vec<(String, Figure)> {
    group_by(records, |r| kernel_label(&r.kernel_type))
        .into_iter()
        .map(|(kernel, members)| {
            let memory_bound = members
                .iter()
                .filter(|r| model.is_memory_bound(r.arithmetic_intensity))
                .count();
            debug!(kernel = %kernel, memory_bound, points = members.len(), "roofline placement");
            let points = members
                .iter()
                .map(|r| PointLabel {
                    x: r.arithmetic_intensity,
                    y: r.gflops,
                    label: r.size.to_string(),
                })
                .collect();
            let panel = RooflinePanel::new(format!("Roofline Model Analysis ({})", kernel), model)
                .measured(kernel_display_name(&kernel), points);
            (kernel, Figure::new(panel))
        })
        .collect()
}

/// Lowercase kernel type with anything outside `[a-z0-9_-]` replaced by `_`.
pub(super) fn kernel_label(kernel_type: &str) -> String {
    let trimmed = kernel_type.trim();
    if trimmed.is_empty() {
        return UNLABELED_KERNEL.to_string();
    }
    trimmed
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn kernel_display_name(kernel: &str) -> String {
    match kernel {
        "dense" => "Dense GEMM".to_string(),
        "csr" => "CSR SpMM".to_string(),
        "csc" => "CSC SpMM".to_string(),
        UNLABELED_KERNEL => "Measured".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DEFAULT_PALETTE;

    fn record(kernel: &str, implementation: &str, threads: u32, sparsity: f64, gflops: f64) -> BenchmarkRecord {
        BenchmarkRecord {
            kernel_type: kernel.to_string(),
            implementation: implementation.to_string(),
            threads,
            sparsity,
            gflops,
            ..Default::default()
        }
    }

    #[test]
    fn test_speedup_figure_averages() {
        let records = vec![
            record("dense", "scalar", 1, 0.0, 1.0),
            record("dense", "simd", 1, 0.0, 4.0),
            record("dense", "simd", 1, 0.0, 6.0),
            record("dense", "omp", 2, 0.0, 2.0),
            record("dense", "omp", 2, 0.0, 4.0),
            record("dense", "omp", 4, 0.0, 7.0),
        ];
        let figure = speedup_figure(&records, &DEFAULT_PALETTE);
        assert_eq!(figure.panels.len(), 2);

        let Panel::Bars(bars) = &figure.panels[0] else {
            panic!("expected bars");
        };
        assert_eq!(bars.categories, vec!["scalar", "simd"]);
        assert_eq!(bars.series[0].values, vec![Some(1.0), Some(5.0)]);

        let Panel::Lines(lines) = &figure.panels[1] else {
            panic!("expected lines");
        };
        assert_eq!(lines.series.len(), 1);
        assert_eq!(lines.series[0].name, "omp");
        assert_eq!(lines.series[0].points, vec![(2.0, 3.0), (4.0, 7.0)]);
    }

    #[test]
    fn test_break_even_figure_marker() {
        let records: Vec<BenchmarkRecord> = [0.4, 0.1, 0.3, 0.2]
            .iter()
            .zip([4.0, 10.0, 6.0, 8.0])
            .map(|(&s, g)| record("dense", "", 1, s, g))
            .chain(
                [0.1, 0.2, 0.3, 0.4]
                    .iter()
                    .zip([2.0, 3.0, 7.0, 9.0])
                    .map(|(&s, g)| record("csr", "", 1, s, g)),
            )
            .collect();
        let (figure, break_even) = break_even_figure(&records, BreakEvenPolicy::LatchFirst);
        assert_eq!(break_even, Some(0.3));

        let Panel::Lines(panel) = &figure.panels[0] else {
            panic!("expected lines");
        };
        assert!(panel.log_x);
        assert_eq!(panel.series[0].points[0], (0.1, 10.0));
        assert_eq!(panel.marker.as_ref().unwrap().label, "Break-even: 0.300");
    }

    #[test]
    fn test_break_even_figure_without_sparse() {
        let records = vec![record("dense", "", 1, 0.5, 3.0)];
        let (figure, break_even) = break_even_figure(&records, BreakEvenPolicy::default());
        assert_eq!(break_even, None);
        let Panel::Lines(panel) = &figure.panels[0] else {
            panic!("expected lines");
        };
        assert_eq!(panel.series.len(), 1);
        assert!(panel.marker.is_none());
    }

    #[test]
    fn test_roofline_figures_per_kernel() {
        let mut dense = record("dense", "", 1, 0.0, 20.0);
        dense.size = 512;
        dense.arithmetic_intensity = 2.0;
        let unlabeled = record("", "", 1, 0.0, 1.0);
        let figures = roofline_figures(&[dense, unlabeled], RooflineModel::default());
        let kernels: Vec<&str> = figures.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(kernels, vec!["all", "dense"]);

        let Panel::Roofline(panel) = &figures[1].1.panels[0] else {
            panic!("expected roofline");
        };
        assert_eq!(panel.measured_name, "Dense GEMM");
        assert_eq!(panel.points[0].label, "512");
    }

    #[test]
    fn test_kernel_label_sanitized() {
        assert_eq!(kernel_label(" CSR "), "csr");
        assert_eq!(kernel_label("block/ell"), "block_ell");
        assert_eq!(kernel_label(""), UNLABELED_KERNEL);
    }
}
