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


//! Panel drawing on any plotters backend.
//!
//! Log axes use plotters' `log_scale` coordinates. Values that cannot be
//! placed on an axis (non-finite, or non-positive on a log axis) are skipped.

use super::figure::{BarPanel, Figure, LinePanel, Panel, RooflinePanel};
use super::{RenderConfig, NEGATIVE_COLOR, POSITIVE_COLOR};
use crate::error::{PerfvizError, Result};
use plotters::coord::ranged1d::ValueFormatter;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

const FONT: &str = "sans-serif";
const BAR_GROUP_WIDTH: f64 = 0.8;
const RANGE_PADDING: f64 = 0.08;
const ROOFLINE_SAMPLES: usize = 100;

/// Draws `figure` onto `root` and flushes the backend.
pub(super) fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    config: &RenderConfig,
) -> Result<()> {
    root.fill(&WHITE).map_err(PerfvizError::render)?;
    let titled;
    let area = match &figure.title {
        Some(title) => {
            titled = root
                .titled(title, (FONT, 28).into_font())
                .map_err(PerfvizError::render)?;
            &titled
        }
        None => root,
    };

    if figure.panels.is_empty() {
        let message = figure.notice.as_deref().unwrap_or("No data available");
        draw_notice(area, message)?;
    } else {
        let cells = area.split_evenly((1, figure.panels.len()));
        for (cell, panel) in cells.iter().zip(&figure.panels) {
            match panel {
                Panel::Bars(bars) => draw_bars(cell, bars, config)?,
                Panel::Lines(lines) => draw_lines(cell, lines, config)?,
                Panel::Roofline(roofline) => draw_roofline(cell, roofline, config)?,
            }
        }
    }

    root.present().map_err(PerfvizError::render)
}

fn draw_notice<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, message: &str) -> Result<()> {
    let (width, height) = area.dim_in_pixel();
    let position = (width as i32 / 10, height as i32 / 2);
    area.draw(&Text::new(message.to_string(), position, (FONT, 24).into_font()))
        .map_err(PerfvizError::render)
}

fn chart_builder<'a, 'b, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    title: &str,
) -> ChartBuilder<'a, 'b, DB> {
    let mut builder = ChartBuilder::on(area);
    builder
        .caption(title, (FONT, 20))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70);
    builder
}

fn draw_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &BarPanel,
    config: &RenderConfig,
) -> Result<()> {
    let log = panel.log_y;
    let mut heights: Vec<f64> = panel
        .series
        .iter()
        .flat_map(|s| s.values.iter().flatten().copied())
        .filter(|&v| drawable(log, v))
        .collect();
    if let Some(reference) = panel.reference.as_ref().filter(|r| drawable(log, r.value)) {
        heights.push(reference.value);
    }

    let categories = panel.categories.len().max(1);
    let x_range = -0.5..(categories as f64 - 0.5);
    let mut builder = chart_builder(area, &panel.title);

    if log {
        let mut y_range = log_range(&heights);
        if panel.value_format.is_some() {
            y_range.end *= (y_range.end / y_range.start).powf(RANGE_PADDING);
        }
        let baseline = y_range.start;
        let chart = builder
            .build_cartesian_2d(x_range.clone(), y_range.log_scale())
            .map_err(PerfvizError::render)?;
        fill_bars(chart, panel, config, x_range, baseline)
    } else {
        let mut y_range = padded_range(&heights, true);
        if panel.value_format.is_some() {
            y_range.end += (y_range.end - y_range.start) * RANGE_PADDING;
        }
        let chart = builder
            .build_cartesian_2d(x_range.clone(), y_range)
            .map_err(PerfvizError::render)?;
        fill_bars(chart, panel, config, x_range, 0.0)
    }
}

fn fill_bars<'a, DB, Y>(
    mut chart: ChartContext<'a, DB, Cartesian2d<RangedCoordf64, Y>>,
    panel: &BarPanel,
    config: &RenderConfig,
    x_range: Range<f64>,
    baseline: f64,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let log = panel.log_y;
    let x_fmt = |v: &f64| category_label(&panel.categories, *v);
    let y_fmt = |v: &f64| format_tick(*v);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(panel.categories.len().max(1))
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .x_desc(panel.x_label.as_str())
        .y_desc(panel.y_label.as_str())
        .draw()
        .map_err(PerfvizError::render)?;

    let width = BAR_GROUP_WIDTH / panel.series.len().max(1) as f64;
    let mut has_legend = false;

    for (index, series) in panel.series.iter().enumerate() {
        let series_color = series.color.unwrap_or_else(|| config.series_color(index));
        let mut bars = Vec::new();
        let mut labels = Vec::new();

        for (category, value) in series.values.iter().enumerate() {
            let left = category as f64 - BAR_GROUP_WIDTH / 2.0 + index as f64 * width;
            let center = left + width / 2.0;
            match value.filter(|&v| drawable(log, v)) {
                Some(top) => {
                    let color = match (panel.color_by_sign, top >= 0.0) {
                        (true, true) => POSITIVE_COLOR,
                        (true, false) => NEGATIVE_COLOR,
                        (false, _) if !panel.category_colors.is_empty() => {
                            panel.category_colors[category % panel.category_colors.len()]
                        }
                        (false, _) => series_color,
                    };
                    bars.push(Rectangle::new([(left, baseline), (left + width, top)], color.filled()));
                    if let Some(format) = panel.value_format {
                        labels.push((center, top, format(top)));
                    }
                }
                None if panel.value_format.is_some() => {
                    labels.push((center, baseline, "n/a".to_string()));
                }
                None => {}
            }
        }

        let anno = chart.draw_series(bars).map_err(PerfvizError::render)?;
        if panel.series.len() > 1 && !panel.color_by_sign && panel.category_colors.is_empty() {
            has_legend = true;
            anno.label(series.name.as_str()).legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 12, y + 5)], series_color.filled())
            });
        }

        chart
            .draw_series(labels.into_iter().map(|(x, y, text)| {
                EmptyElement::at((x, y)) + Text::new(text, (-14, -16), (FONT, 13).into_font())
            }))
            .map_err(PerfvizError::render)?;
    }

    if let Some(reference) = panel.reference.as_ref().filter(|r| drawable(log, r.value)) {
        has_legend = true;
        chart
            .draw_series(LineSeries::new(
                vec![(x_range.start, reference.value), (x_range.end, reference.value)],
                BLACK.stroke_width(2),
            ))
            .map_err(PerfvizError::render)?
            .label(reference.label.as_str())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));
    }

    if has_legend {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(PerfvizError::render)?;
    }
    Ok(())
}

/// Drawable points of a line panel, per series, plus the axis extents.
struct LineLayout {
    points: Vec<Vec<(f64, f64)>>,
    marker_x: Option<f64>,
    y_range: Range<f64>,
    fill_base: f64,
}

fn draw_lines<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &LinePanel,
    config: &RenderConfig,
) -> Result<()> {
    let log_x = panel.log_x && panel.categories.is_none();
    let log_y = panel.log_y;

    let points: Vec<Vec<(f64, f64)>> = panel
        .series
        .iter()
        .map(|s| {
            s.points
                .iter()
                .copied()
                .filter(|&(x, y)| drawable(log_x, x) && drawable(log_y, y))
                .collect()
        })
        .collect();
    let marker_x = panel.marker.as_ref().map(|m| m.x).filter(|&x| drawable(log_x, x));

    let xs: Vec<f64> = points.iter().flatten().map(|p| p.0).chain(marker_x).collect();
    let ys: Vec<f64> = points.iter().flatten().map(|p| p.1).collect();

    let x_range = match &panel.categories {
        Some(categories) => -0.5..(categories.len().max(1) as f64 - 0.5),
        None if log_x => log_range(&xs),
        None => padded_range(&xs, false),
    };
    let y_range = if log_y { log_range(&ys) } else { padded_range(&ys, panel.fill) };
    let layout = LineLayout {
        points,
        marker_x,
        fill_base: if log_y { y_range.start } else { 0.0 },
        y_range: y_range.clone(),
    };

    let mut builder = chart_builder(area, &panel.title);
    match (log_x, log_y) {
        (false, false) => plot_lines(
            builder.build_cartesian_2d(x_range, y_range).map_err(PerfvizError::render)?,
            panel,
            config,
            &layout,
        ),
        (true, false) => plot_lines(
            builder
                .build_cartesian_2d(x_range.log_scale(), y_range)
                .map_err(PerfvizError::render)?,
            panel,
            config,
            &layout,
        ),
        (false, true) => plot_lines(
            builder
                .build_cartesian_2d(x_range, y_range.log_scale())
                .map_err(PerfvizError::render)?,
            panel,
            config,
            &layout,
        ),
        (true, true) => plot_lines(
            builder
                .build_cartesian_2d(x_range.log_scale(), y_range.log_scale())
                .map_err(PerfvizError::render)?,
            panel,
            config,
            &layout,
        ),
    }
}

fn plot_lines<'a, DB, X, Y>(
    mut chart: ChartContext<'a, DB, Cartesian2d<X, Y>>,
    panel: &LinePanel,
    config: &RenderConfig,
    layout: &LineLayout,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    X: Ranged<ValueType = f64> + ValueFormatter<f64>,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let x_fmt = |v: &f64| match &panel.categories {
        Some(categories) => category_label(categories, *v),
        None => format_tick(*v),
    };
    let y_fmt = |v: &f64| format_tick(*v);
    {
        let mut mesh = chart.configure_mesh();
        mesh.x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .x_desc(panel.x_label.as_str())
            .y_desc(panel.y_label.as_str());
        if let Some(categories) = &panel.categories {
            mesh.x_labels(categories.len().max(1));
        }
        mesh.draw().map_err(PerfvizError::render)?;
    }

    let mut has_legend = false;
    for (index, (series, line)) in panel.series.iter().zip(&layout.points).enumerate() {
        if line.is_empty() {
            continue;
        }
        let color = series.color.unwrap_or_else(|| config.series_color(index));

        if panel.fill {
            chart
                .draw_series(AreaSeries::new(line.clone(), layout.fill_base, color.mix(0.2).filled()))
                .map_err(PerfvizError::render)?;
        }

        let anno = chart
            .draw_series(LineSeries::new(line.clone(), color.stroke_width(2)))
            .map_err(PerfvizError::render)?;
        if !series.name.is_empty() {
            has_legend = true;
            anno.label(series.name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        chart
            .draw_series(line.iter().map(|&point| Circle::new(point, 4, color.filled())))
            .map_err(PerfvizError::render)?;

        if panel.annotate {
            chart
                .draw_series(line.iter().map(|&(x, y)| {
                    EmptyElement::at((x, y)) + Text::new(format_tick(y), (6, -16), (FONT, 12).into_font())
                }))
                .map_err(PerfvizError::render)?;
        }
    }

    if let (Some(marker), Some(x)) = (&panel.marker, layout.marker_x) {
        has_legend = true;
        chart
            .draw_series(LineSeries::new(
                vec![(x, layout.y_range.start), (x, layout.y_range.end)],
                RED.stroke_width(2),
            ))
            .map_err(PerfvizError::render)?
            .label(marker.label.as_str())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
    }

    if has_legend {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(PerfvizError::render)?;
    }
    Ok(())
}

fn draw_roofline<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &RooflinePanel,
    config: &RenderConfig,
) -> Result<()> {
    let curve: Vec<(f64, f64)> = panel
        .model
        .curve(ROOFLINE_SAMPLES)
        .into_iter()
        .filter(|&(ai, gflops)| drawable(true, ai) && drawable(true, gflops))
        .collect();
    let measured: Vec<(f64, f64, &str)> = panel
        .points
        .iter()
        .filter(|p| drawable(true, p.x) && drawable(true, p.y))
        .map(|p| (p.x, p.y, p.label.as_str()))
        .collect();

    let xs: Vec<f64> = curve.iter().map(|p| p.0).chain(measured.iter().map(|p| p.0)).collect();
    let ys: Vec<f64> = curve.iter().map(|p| p.1).chain(measured.iter().map(|p| p.1)).collect();
    let x_range = log_range(&xs);
    let y_range = log_range(&ys);
    let floor = y_range.start;
    let ridge = panel.model.ridge_point();
    let show_ridge = x_range.contains(&ridge);

    let mut chart = chart_builder(area, &panel.title)
        .build_cartesian_2d(x_range.log_scale(), y_range.log_scale())
        .map_err(PerfvizError::render)?;

    let tick = |v: &f64| format_tick(*v);
    chart
        .configure_mesh()
        .x_label_formatter(&tick)
        .y_label_formatter(&tick)
        .x_desc("Arithmetic Intensity (FLOP/byte)")
        .y_desc("Performance (GFLOP/s)")
        .draw()
        .map_err(PerfvizError::render)?;

    let shade = config.series_color(0);
    chart
        .draw_series(AreaSeries::new(curve.clone(), floor, shade.mix(0.2).filled()))
        .map_err(PerfvizError::render)?;
    chart
        .draw_series(LineSeries::new(curve, BLACK.stroke_width(2)))
        .map_err(PerfvizError::render)?
        .label("Theoretical Roofline")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));

    if show_ridge {
        let ridge_style = BLACK.mix(0.5).stroke_width(1);
        chart
            .draw_series(LineSeries::new(
                vec![(ridge, floor), (ridge, panel.model.peak_gflops)],
                ridge_style,
            ))
            .map_err(PerfvizError::render)?
            .label(format!("Ridge point ({} FLOP/byte)", format_tick(ridge)))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], ridge_style));
    }

    if !measured.is_empty() {
        let point_color = config.series_color(1);
        chart
            .draw_series(
                measured
                    .iter()
                    .map(|&(x, y, _)| Circle::new((x, y), 7, point_color.mix(0.7).filled())),
            )
            .map_err(PerfvizError::render)?
            .label(panel.measured_name.as_str())
            .legend(move |(x, y)| Circle::new((x + 10, y), 5, point_color.filled()));
        chart
            .draw_series(measured.iter().map(|&(x, y, label)| {
                EmptyElement::at((x, y)) + Text::new(label.to_string(), (5, -16), (FONT, 12).into_font())
            }))
            .map_err(PerfvizError::render)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(PerfvizError::render)
}

/// Whether `value` has a position on a linear or log axis.
fn drawable(log: bool, value: f64) -> bool {
    value.is_finite() && (!log || value > 0.0)
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Whole decades covering the positive `values`.
fn log_range(values: &[f64]) -> Range<f64> {
    let positive: Vec<f64> = values.iter().copied().filter(|&v| drawable(true, v)).collect();
    let (lo, hi) = bounds(&positive).unwrap_or((1.0, 10.0));
    let start = 10f64.powi(lo.log10().floor() as i32);
    let end = 10f64.powi(hi.log10().ceil() as i32);
    if end > start {
        start..end
    } else {
        start..start * 10.0
    }
}

/// Data bounds plus padding; with `anchor_zero` the range always includes 0
/// and is not padded past it.
fn padded_range(values: &[f64], anchor_zero: bool) -> Range<f64> {
    let (mut lo, mut hi) = bounds(values).unwrap_or((0.0, 1.0));
    if anchor_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    let span = hi - lo;
    let pad = if span > 0.0 {
        span * RANGE_PADDING
    } else {
        hi.abs().max(1.0) * 0.5
    };
    let start = if anchor_zero && lo == 0.0 { 0.0 } else { lo - pad };
    let end = if anchor_zero && hi == 0.0 && lo < 0.0 { 0.0 } else { hi + pad };
    start..end
}

fn category_label(categories: &[String], position: f64) -> String {
    let index = position.round();
    if (position - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    categories.get(index as usize).cloned().unwrap_or_default()
}

/// Compact tick label: plain for moderate magnitudes, exponent otherwise.
fn format_tick(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude == 0.0 {
        "0".to_string()
    } else if !(1e-2..1e5).contains(&magnitude) {
        format!("{:.0e}", value)
    } else if magnitude >= 10.0 {
        format!("{:.0}", value)
    } else {
        let decimals = if magnitude >= 1.0 { 1 } else { 2 };
        let text = format!("{:.*}", decimals, value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(range: Range<f64>, start: f64, end: f64) -> bool {
        (range.start / start - 1.0).abs() < 1e-12 && (range.end / end - 1.0).abs() < 1e-12
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(100.0), "100");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(1.0), "1");
        assert_eq!(format_tick(0.25), "0.25");
        assert_eq!(format_tick(0.5), "0.5");
        assert_eq!(format_tick(1e6), "1e6");
        assert_eq!(format_tick(0.001), "1e-3");
        assert_eq!(format_tick(-40.0), "-40");
    }

    #[test]
    fn test_drawable() {
        assert!(drawable(true, 1e-10));
        assert!(!drawable(true, 0.0));
        assert!(!drawable(true, -3.0));
        assert!(drawable(false, -3.0));
        assert!(!drawable(false, f64::NAN));
        assert!(!drawable(true, f64::INFINITY));
    }

    #[test]
    fn test_log_range_covers_decades() {
        assert!(close(log_range(&[0.03, 15.0]), 0.01, 100.0));
        assert!(close(log_range(&[20.0]), 10.0, 100.0));
        assert!(close(log_range(&[2e-7, 3e-6]), 1e-7, 1e-5));
        assert!(close(log_range(&[0.0, -1.0, 5.0]), 1.0, 10.0));
        assert!(close(log_range(&[]), 1.0, 10.0));
    }

    #[test]
    fn test_padded_range_anchors_zero() {
        let range = padded_range(&[2.0, 10.0], true);
        assert_eq!(range.start, 0.0);
        assert!(range.end > 10.0);

        let range = padded_range(&[-5.0, 10.0], true);
        assert!(range.start < -5.0);

        let range = padded_range(&[3.0, 3.0], false);
        assert!(range.start < 3.0 && range.end > 3.0);

        let range = padded_range(&[], true);
        assert!(range.end > range.start);
    }

    #[test]
    fn test_category_label() {
        let categories = vec!["scalar".to_string(), "simd".to_string()];
        assert_eq!(category_label(&categories, 1.0), "simd");
        assert_eq!(category_label(&categories, 0.5), "");
        assert_eq!(category_label(&categories, 5.0), "");
        assert_eq!(category_label(&categories, -1.0), "");
    }
}
