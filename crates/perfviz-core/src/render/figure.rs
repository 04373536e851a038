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

//! Figure description types.
//!
//! A [`Figure`] is plain data: pipelines build one from reduced results and
//! hand it to [`render_figure`](super::render_figure). Nothing here knows
//! about backends or pixel coordinates.

use crate::roofline::RooflineModel;
use plotters::style::RGBColor;

/// Formats a bar's value label.
pub type ValueFormat = fn(f64) -> String;

/// A chart image made of one or more side-by-side panels.
#[derive(Debug, Clone)]
pub struct Figure {
    /// Title drawn above all panels.
    pub title: Option<String>,
    /// Panels, left to right.
    pub panels: Vec<Panel>,
    /// Message drawn instead of panels when there is no data.
    pub notice: Option<String>,
}

impl Figure {
    /// Creates a single-panel figure.
    pub fn new(panel: impl Into<Panel>) -> Self {
        Self {
            title: None,
            panels: vec![panel.into()],
            notice: None,
        }
    }

    /// Creates a figure with several side-by-side panels.
    pub fn with_panels(panels: Vec<Panel>) -> Self {
        Self {
            title: None,
            panels,
            notice: None,
        }
    }

    /// Creates a "no data" figure.
    pub fn placeholder(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            panels: Vec::new(),
            notice: Some(message.into()),
        }
    }

    /// Sets the overall title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Returns whether this figure has no panels to draw.
    pub fn is_placeholder(&self) -> bool {
        self.panels.is_empty()
    }
}

/// One chart within a figure.
#[derive(Debug, Clone)]
pub enum Panel {
    /// Categorical bars, optionally grouped.
    Bars(BarPanel),
    /// Line series over a numeric or categorical x axis.
    Lines(LinePanel),
    /// Theoretical roofline with measured points.
    Roofline(RooflinePanel),
}

impl From<BarPanel> for Panel {
    fn from(panel: BarPanel) -> Self {
        Panel::Bars(panel)
    }
}

impl From<LinePanel> for Panel {
    fn from(panel: LinePanel) -> Self {
        Panel::Lines(panel)
    }
}

impl From<RooflinePanel> for Panel {
    fn from(panel: RooflinePanel) -> Self {
        Panel::Roofline(panel)
    }
}

/// One named series of bar heights, aligned with the panel's categories.
///
/// A `None` height is not drawn; with value labels enabled it is marked `n/a`.
#[derive(Debug, Clone)]
pub struct BarSeries {
    /// Legend label.
    pub name: String,
    /// One height per category.
    pub values: Vec<Option<f64>>,
    /// Fixed color; the palette is used when unset.
    pub color: Option<RGBColor>,
}

/// Horizontal reference line across a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    /// Y value of the line.
    pub value: f64,
    /// Legend label.
    pub label: String,
}

/// Categorical bar chart.
#[derive(Debug, Clone)]
pub struct BarPanel {
    /// Panel title.
    pub title: String,
    /// X axis categories, one bar group each.
    pub categories: Vec<String>,
    /// Bar series; several series are drawn side by side within a group.
    pub series: Vec<BarSeries>,
    /// X axis caption.
    pub x_label: String,
    /// Y axis caption.
    pub y_label: String,
    /// Log-scale y axis. Non-positive heights are not drawn.
    pub log_y: bool,
    /// Colors each bar green or red by the sign of its value.
    pub color_by_sign: bool,
    /// Per-category bar colors, cycled; overrides series colors when set.
    pub category_colors: Vec<RGBColor>,
    /// Formatter for labels above each bar; no labels when unset.
    pub value_format: Option<ValueFormat>,
    /// Horizontal line drawn across the panel.
    pub reference: Option<ReferenceLine>,
}

impl BarPanel {
    /// Creates an empty bar panel over `categories`.
    pub fn new<S: Into<String>>(title: impl Into<String>, categories: impl IntoIterator<Item = S>) -> Self {
        Self {
            title: title.into(),
            categories: categories.into_iter().map(Into::into).collect(),
            series: Vec::new(),
            x_label: String::new(),
            y_label: String::new(),
            log_y: false,
            color_by_sign: false,
            category_colors: Vec::new(),
            value_format: None,
            reference: None,
        }
    }

    /// Adds a series colored from the palette.
    pub fn series(mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        self.series.push(BarSeries {
            name: name.into(),
            values,
            color: None,
        });
        self
    }

    /// Adds a series with a fixed color.
    pub fn colored_series(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
        color: RGBColor,
    ) -> Self {
        self.series.push(BarSeries {
            name: name.into(),
            values,
            color: Some(color),
        });
        self
    }

    /// Sets the x axis caption.
    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = label.into();
        self
    }

    /// Sets the y axis caption.
    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    /// Switches the y axis to log scale.
    pub fn log_y(mut self) -> Self {
        self.log_y = true;
        self
    }

    /// Colors bars green when positive and red otherwise.
    pub fn color_by_sign(mut self) -> Self {
        self.color_by_sign = true;
        self
    }

    /// Sets per-category bar colors.
    pub fn category_colors(mut self, colors: Vec<RGBColor>) -> Self {
        self.category_colors = colors;
        self
    }

    /// Draws a label above each bar.
    pub fn value_labels(mut self, format: ValueFormat) -> Self {
        self.value_format = Some(format);
        self
    }

    /// Draws a labeled horizontal line at `value`.
    pub fn reference(mut self, value: f64, label: impl Into<String>) -> Self {
        self.reference = Some(ReferenceLine {
            value,
            label: label.into(),
        });
        self
    }
}

/// One named line series.
#[derive(Debug, Clone)]
pub struct Series {
    /// Legend label.
    pub name: String,
    /// `(x, y)` points in drawing order.
    pub points: Vec<(f64, f64)>,
    /// Fixed color; the palette is used when unset.
    pub color: Option<RGBColor>,
}

impl Series {
    /// Creates a series colored from the palette.
    pub fn new(name: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self {
            name: name.into(),
            points,
            color: None,
        }
    }

    /// Fixes the series color.
    pub fn with_color(mut self, color: RGBColor) -> Self {
        self.color = Some(color);
        self
    }
}

/// Vertical marker line.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// X value of the line.
    pub x: f64,
    /// Legend label.
    pub label: String,
}

/// Line chart.
///
/// With `categories` set, x values are category indices and the axis is
/// labeled with the category names.
#[derive(Debug, Clone)]
pub struct LinePanel {
    /// Panel title.
    pub title: String,
    /// Line series, drawn in order.
    pub series: Vec<Series>,
    /// Category names for a categorical x axis.
    pub categories: Option<Vec<String>>,
    /// X axis caption.
    pub x_label: String,
    /// Y axis caption.
    pub y_label: String,
    /// Log-scale x axis.
    pub log_x: bool,
    /// Log-scale y axis.
    pub log_y: bool,
    /// Shades the area under each series.
    pub fill: bool,
    /// Labels each point with its y value.
    pub annotate: bool,
    /// Vertical line, e.g. at a break-even point.
    pub marker: Option<Marker>,
}

impl LinePanel {
    /// Creates an empty line panel.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            series: Vec::new(),
            categories: None,
            x_label: String::new(),
            y_label: String::new(),
            log_x: false,
            log_y: false,
            fill: false,
            annotate: false,
            marker: None,
        }
    }

    /// Adds a series.
    pub fn series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Uses a categorical x axis.
    pub fn categories<S: Into<String>>(mut self, categories: impl IntoIterator<Item = S>) -> Self {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the x axis caption.
    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = label.into();
        self
    }

    /// Sets the y axis caption.
    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    /// Switches the x axis to log scale.
    pub fn log_x(mut self) -> Self {
        self.log_x = true;
        self
    }

    /// Switches the y axis to log scale.
    pub fn log_y(mut self) -> Self {
        self.log_y = true;
        self
    }

    /// Shades the area under each series.
    pub fn fill(mut self) -> Self {
        self.fill = true;
        self
    }

    /// Labels each point with its y value.
    pub fn annotate(mut self) -> Self {
        self.annotate = true;
        self
    }

    /// Draws a labeled vertical line at `x`.
    pub fn marker(mut self, x: f64, label: impl Into<String>) -> Self {
        self.marker = Some(Marker {
            x,
            label: label.into(),
        });
        self
    }
}

/// A measured point with its annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLabel {
    /// Arithmetic intensity in FLOP/byte.
    pub x: f64,
    /// Throughput in GFLOP/s.
    pub y: f64,
    /// Text drawn next to the point.
    pub label: String,
}

/// Roofline chart on log-log axes.
#[derive(Debug, Clone)]
pub struct RooflinePanel {
    /// Panel title.
    pub title: String,
    /// Machine model the ceiling and ridge point are drawn from.
    pub model: RooflineModel,
    /// Legend label of the measured points.
    pub measured_name: String,
    /// Measured `(arithmetic intensity, GFLOP/s)` points.
    pub points: Vec<PointLabel>,
}

impl RooflinePanel {
    /// Creates a panel showing only the theoretical roofline.
    pub fn new(title: impl Into<String>, model: RooflineModel) -> Self {
        Self {
            title: title.into(),
            model,
            measured_name: "Measured".to_string(),
            points: Vec::new(),
        }
    }

    /// Sets the measured points and their legend label.
    pub fn measured(mut self, name: impl Into<String>, points: Vec<PointLabel>) -> Self {
        self.measured_name = name.into();
        self.points = points;
        self
    }
}
