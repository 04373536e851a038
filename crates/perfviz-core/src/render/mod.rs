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

//! Chart rendering.
//!
//! Pipelines describe charts as [`Figure`] values and persist them with
//! [`render_figure`]. All styling comes from an explicit [`RenderConfig`];
//! there is no global plot state.
//!
//! # Example
//!
//! ```no_run
//! use perfviz_core::render::{render_figure, BarPanel, Figure, ImageFormat, RenderConfig};
//!
//! let config = RenderConfig::new("out").with_format(ImageFormat::Svg);
//! let figure = Figure::new(
//!     BarPanel::new("Single-Threaded Performance Comparison", ["scalar", "simd"])
//!         .series("GFLOP/s", vec![Some(1.2), Some(4.8)])
//!         .y_label("GFLOP/s"),
//! );
//! let path = render_figure(&config, "simd_threading_speedup", &figure).unwrap();
//! assert!(path.ends_with("simd_threading_speedup.svg"));
//! ```

mod chart;
mod figure;

pub use figure::{
    BarPanel, BarSeries, Figure, LinePanel, Marker, Panel, PointLabel, ReferenceLine, RooflinePanel,
    Series, ValueFormat,
};

use crate::error::{PerfvizError, Result};
use plotters::prelude::*;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

/// Default image width in pixels.
pub const DEFAULT_WIDTH: u32 = 1400;

/// Default image height in pixels.
pub const DEFAULT_HEIGHT: u32 = 700;

/// Hardware series color (#2E86AB).
pub const HARDWARE_COLOR: RGBColor = RGBColor(0x2E, 0x86, 0xAB);

/// Software series color (#A23B72).
pub const SOFTWARE_COLOR: RGBColor = RGBColor(0xA2, 0x3B, 0x72);

/// Bar color for non-negative values under sign coloring (#18A558).
pub const POSITIVE_COLOR: RGBColor = RGBColor(0x18, 0xA5, 0x58);

/// Bar color for negative values under sign coloring (#E63946).
pub const NEGATIVE_COLOR: RGBColor = RGBColor(0xE6, 0x39, 0x46);

/// Series palette used when a series has no fixed color.
pub const DEFAULT_PALETTE: [RGBColor; 8] = [
    RGBColor(0x1F, 0x77, 0xB4),
    RGBColor(0xFF, 0x7F, 0x0E),
    RGBColor(0x2C, 0xA0, 0x2C),
    RGBColor(0xD6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xBD),
    RGBColor(0x8C, 0x56, 0x4B),
    RGBColor(0xE3, 0x77, 0xC2),
    RGBColor(0x17, 0xBE, 0xCF),
];

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// Raster PNG.
    #[default]
    Png,
    /// Vector SVG.
    Svg,
}

impl ImageFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "svg" => Ok(ImageFormat::Svg),
            other => Err(format!("Unknown image format: '{}'. Expected png or svg", other)),
        }
    }
}

/// Rendering settings passed to every chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Directory images are written to.
    pub output_dir: PathBuf,
    /// Image format.
    pub format: ImageFormat,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Colors cycled through for series without a fixed color.
    pub palette: Vec<RGBColor>,
    /// Color of hardware series in storage charts.
    pub hardware_color: RGBColor,
    /// Color of software series in storage charts.
    pub software_color: RGBColor,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

impl RenderConfig {
    /// Creates a PNG configuration writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: ImageFormat::Png,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            palette: DEFAULT_PALETTE.to_vec(),
            hardware_color: HARDWARE_COLOR,
            software_color: SOFTWARE_COLOR,
        }
    }

    /// Sets the output directory.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Sets the image format.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the pixel size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Color for the `index`-th series.
    pub fn series_color(&self, index: usize) -> RGBColor {
        if self.palette.is_empty() {
            BLACK
        } else {
            self.palette[index % self.palette.len()]
        }
    }

    /// Path of the image for `file_stem`, which may include subdirectories.
    pub fn output_path(&self, file_stem: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", file_stem, self.format.extension()))
    }

    /// Checks the pixel size.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PerfvizError::invalid_config(
                "size",
                format!("must be non-zero, got {}x{}", self.width, self.height),
            ));
        }
        Ok(())
    }
}

/// Renders `figure` to `<output_dir>/<file_stem>.<ext>` and returns the path.
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the backend fails.
pub fn render_figure(config: &RenderConfig, file_stem: &str, figure: &Figure) -> Result<PathBuf> {
    config.validate()?;
    let path = config.output_path(file_stem);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PerfvizError::io_error(parent, e))?;
    }

    let size = (config.width, config.height);
    match config.format {
        ImageFormat::Png => {
            let root = BitMapBackend::new(&path, size).into_drawing_area();
            chart::draw_figure(&root, figure, config)?;
        }
        ImageFormat::Svg => {
            let root = SVGBackend::new(&path, size).into_drawing_area();
            chart::draw_figure(&root, figure, config)?;
        }
    }

    debug!(path = %path.display(), panels = figure.panels.len(), "rendered figure");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roofline::RooflineModel;
    use tempfile::TempDir;

    fn sample_figure() -> Figure {
        Figure::with_panels(vec![
            BarPanel::new("Latency Comparison (Log Scale)", ["p95", "p99", "avg"])
                .colored_series("Hardware", vec![Some(1.5), Some(2.0), None], HARDWARE_COLOR)
                .colored_series("Software", vec![Some(900.0), Some(1200.0), Some(450.0)], SOFTWARE_COLOR)
                .log_y()
                .value_labels(|v| format!("{:.2}", v))
                .into(),
            LinePanel::new("Thread Scaling Analysis")
                .series(Series::new("simd", vec![(2.0, 3.0), (4.0, 5.5)]))
                .marker(3.0, "Break-even: 3.000")
                .into(),
            RooflinePanel::new("Roofline", RooflineModel::default())
                .measured(
                    "Dense GEMM",
                    vec![PointLabel {
                        x: 2.0,
                        y: 30.0,
                        label: "512".to_string(),
                    }],
                )
                .into(),
        ])
        .with_title("Sample")
    }

    #[test]
    fn test_image_format_parsing() {
        assert_eq!("PNG".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        assert_eq!("svg".parse::<ImageFormat>().unwrap(), ImageFormat::Svg);
        assert!("gif".parse::<ImageFormat>().is_err());
        assert_eq!(ImageFormat::default().to_string(), "png");
    }

    #[test]
    fn test_output_path_and_palette() {
        let config = RenderConfig::new("out").with_format(ImageFormat::Svg);
        assert_eq!(
            config.output_path("Figures/latency_comparison"),
            PathBuf::from("out/Figures/latency_comparison.svg")
        );
        assert_eq!(config.series_color(0), config.series_color(DEFAULT_PALETTE.len()));
        let empty = RenderConfig {
            palette: Vec::new(),
            ..RenderConfig::default()
        };
        assert_eq!(empty.series_color(3), BLACK);
    }

    #[test]
    fn test_zero_size_rejected() {
        let dir = TempDir::new().unwrap();
        let config = RenderConfig::new(dir.path()).with_size(0, 100);
        let result = render_figure(&config, "empty", &Figure::placeholder("t", "m"));
        assert!(matches!(result, Err(PerfvizError::InvalidConfig { .. })));
    }

    #[test]
    fn test_render_svg_creates_nested_file() {
        let dir = TempDir::new().unwrap();
        let config = RenderConfig::new(dir.path()).with_format(ImageFormat::Svg);
        let path = render_figure(&config, "Figures/sample", &sample_figure()).unwrap();
        assert!(path.exists());
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Ridge point (4 FLOP/byte)"));
    }

    #[test]
    fn test_render_log_axes_skip_non_positive() {
        let dir = TempDir::new().unwrap();
        let config = RenderConfig::new(dir.path()).with_format(ImageFormat::Svg);
        let figure = Figure::with_panels(vec![
            LinePanel::new("Density Break-even Analysis")
                .series(Series::new("CSR SpMM", vec![(0.0, 1.0), (0.5, 3.0), (0.9, 14.0)]))
                .log_x()
                .log_y()
                .marker(0.9, "Break-even: 0.900")
                .into(),
            BarPanel::new("Max Relative Error", ["n=64 s=0"])
                .series("simd", vec![Some(0.0)])
                .log_y()
                .value_labels(|v| format!("{:e}", v))
                .reference(1e-5, "Tolerance (1e-5)")
                .into(),
        ]);

        let path = render_figure(&config, "log_axes", &figure).unwrap();
        let svg = fs::read_to_string(path).unwrap();
        assert!(svg.contains("Break-even: 0.900"));
        assert!(svg.contains("Tolerance (1e-5)"));
        assert!(svg.contains("n/a"));
    }

    #[test]
    fn test_render_png_placeholder() {
        let dir = TempDir::new().unwrap();
        let config = RenderConfig::new(dir.path()).with_size(320, 200);
        let figure = Figure::placeholder("Working Set Transitions", "No working set transitions data found");
        let path = render_figure(&config, "working_set_transitions", &figure).unwrap();
        assert!(path.ends_with("working_set_transitions.png"));
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_render_png_panels() {
        let dir = TempDir::new().unwrap();
        let config = RenderConfig::new(dir.path()).with_size(900, 300);
        let path = render_figure(&config, "sample", &sample_figure()).unwrap();
        assert!(path.exists());
    }
}
