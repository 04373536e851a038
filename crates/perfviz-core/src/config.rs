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

//! Centralized report configuration.
//!
//! One [`ReportConfig`] carries everything a pipeline needs: where inputs
//! live, where outputs go, how charts look, and the analysis parameters.
//! Defaults reproduce the fixed file names the benchmark harness writes.

use crate::breakeven::BreakEvenPolicy;
use crate::error::{PerfvizError, Result};
use crate::render::{ImageFormat, RenderConfig};
use crate::roofline::RooflineModel;
use crate::validator::ValidationConfig;
use std::path::{Path, PathBuf};

/// Default hardware storage report, relative to the input directory.
pub const DEFAULT_HARDWARE_REPORT: &str = "Outputs/hardware_output.txt";

/// Default software storage report, relative to the input directory.
pub const DEFAULT_SOFTWARE_REPORT: &str = "Outputs/software_output.txt";

/// Subdirectory of the output directory receiving storage charts.
pub const DEFAULT_FIGURES_DIR: &str = "Figures";

/// Configuration shared by all pipelines.
///
/// # Example
///
/// ```no_run
/// use perfviz_core::config::ReportConfig;
/// use perfviz_core::breakeven::BreakEvenPolicy;
/// use perfviz_core::render::ImageFormat;
///
/// let config = ReportConfig::default()
///     .with_input_dir("results")
///     .with_output_dir("plots")
///     .with_format(ImageFormat::Svg)
///     .with_policy(BreakEvenPolicy::ResetOnRegression);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// Directory holding benchmark CSVs and the `Outputs/` reports.
    pub input_dir: PathBuf,
    /// Chart settings, including the output directory.
    pub render: RenderConfig,
    /// Roofline used for the roofline experiment.
    pub roofline: RooflineModel,
    /// Break-even policy used by every caller.
    pub policy: BreakEvenPolicy,
    /// Correctness validation sweep.
    pub validation: ValidationConfig,
    /// Hardware storage report, relative to `input_dir` unless absolute.
    pub hardware_report: PathBuf,
    /// Software storage report, relative to `input_dir` unless absolute.
    pub software_report: PathBuf,
    /// Storage chart subdirectory, relative to the output directory.
    pub figures_dir: PathBuf,
}

impl ReportConfig {
    /// Creates a configuration reading from and writing to the current directory.
    pub fn new() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            render: RenderConfig::new("."),
            roofline: RooflineModel::default(),
            policy: BreakEvenPolicy::default(),
            validation: ValidationConfig::default(),
            hardware_report: PathBuf::from(DEFAULT_HARDWARE_REPORT),
            software_report: PathBuf::from(DEFAULT_SOFTWARE_REPORT),
            figures_dir: PathBuf::from(DEFAULT_FIGURES_DIR),
        }
    }

    /// Sets the input directory.
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Sets the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.render.output_dir = dir.into();
        self
    }

    /// Sets the image format.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.render.format = format;
        self
    }

    /// Replaces the chart settings, keeping the output directory.
    pub fn with_render(mut self, render: RenderConfig) -> Self {
        let output_dir = std::mem::take(&mut self.render.output_dir);
        self.render = render.with_output_dir(output_dir);
        self
    }

    /// Sets the break-even policy.
    pub fn with_policy(mut self, policy: BreakEvenPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the roofline model.
    pub fn with_roofline(mut self, roofline: RooflineModel) -> Self {
        self.roofline = roofline;
        self
    }

    /// Sets the validation sweep.
    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    /// Sets the storage report paths.
    pub fn with_reports(mut self, hardware: impl Into<PathBuf>, software: impl Into<PathBuf>) -> Self {
        self.hardware_report = hardware.into();
        self.software_report = software.into();
        self
    }

    /// Output directory.
    pub fn output_dir(&self) -> &Path {
        &self.render.output_dir
    }

    /// Resolves an input file name against the input directory.
    pub fn input_path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.input_dir.join(name)
    }

    /// Resolves an output file name against the output directory.
    pub fn output_path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.render.output_dir.join(name)
    }

    /// Chart stem for a storage figure, inside the figures subdirectory.
    pub fn figure_stem(&self, name: &str) -> String {
        self.figures_dir.join(name).to_string_lossy().into_owned()
    }

    /// Checks every nested parameter.
    ///
    /// # Errors
    ///
    /// Returns [`PerfvizError::InvalidConfig`] naming the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        self.render.validate()?;
        self.validation.validate()?;
        RooflineModel::new(self.roofline.peak_gflops, self.roofline.memory_bandwidth_gbs)?;
        if self.figures_dir.is_absolute() {
            return Err(PerfvizError::invalid_config(
                "figures_dir",
                "must be relative to the output directory",
            ));
        }
        Ok(())
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert_eq!(config.input_dir, PathBuf::from("."));
        assert_eq!(config.output_dir(), Path::new("."));
        assert_eq!(config.policy, BreakEvenPolicy::LatchFirst);
        assert_eq!(config.render.format, ImageFormat::Png);
        assert_eq!(config.roofline, RooflineModel::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_paths() {
        let config = ReportConfig::default()
            .with_input_dir("in")
            .with_output_dir("out");
        assert_eq!(config.input_path("speedup_analysis.csv"), PathBuf::from("in/speedup_analysis.csv"));
        assert_eq!(config.input_path(&config.hardware_report), PathBuf::from("in/Outputs/hardware_output.txt"));
        assert_eq!(config.output_path("performance_summary.csv"), PathBuf::from("out/performance_summary.csv"));
        assert_eq!(config.figure_stem("speedup_comparison"), format!("Figures{}speedup_comparison", std::path::MAIN_SEPARATOR));
    }

    #[test]
    fn test_with_render_keeps_output_dir() {
        let config = ReportConfig::default()
            .with_output_dir("plots")
            .with_render(RenderConfig::new("elsewhere").with_size(800, 600));
        assert_eq!(config.output_dir(), Path::new("plots"));
        assert_eq!(config.render.width, 800);
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let config = ReportConfig::default().with_roofline(RooflineModel {
            peak_gflops: 0.0,
            memory_bandwidth_gbs: 25.0,
        });
        assert!(config.validate().is_err());

        let config = ReportConfig::default().with_validation(ValidationConfig::default().with_workers(0));
        assert!(config.validate().is_err());
    }
}
