use chrono::NaiveDate;
use serde::Serialize;

use crate::color::{ColorScale, Rgba};

// ---------------------------------------------------------------------------
// Declarative chart specifications
// ---------------------------------------------------------------------------
//
// Builders produce these; the UI (or the JSON export) consumes them. Nothing
// here knows how to draw.

/// Which table column an axis shows, and how it is labelled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisBinding {
    pub field: &'static str,
    pub label: &'static str,
}

impl AxisBinding {
    pub const fn new(field: &'static str, label: &'static str) -> Self {
        Self { field, label }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartSpec {
    Donut(DonutChart),
    Bar(BarChart),
    Scatter(ScatterChart),
    Line(LineChart),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Donut(c) => &c.title,
            ChartSpec::Bar(c) => &c.title,
            ChartSpec::Scatter(c) => &c.title,
            ChartSpec::Line(c) => &c.title,
        }
    }
}

// -- Donut --

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutChart {
    pub title: String,
    /// Inner radius as a fraction of the outer radius.
    pub hole: f32,
    pub value_field: &'static str,
    pub label_field: &'static str,
    pub slices: Vec<Slice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub color: Rgba,
}

impl DonutChart {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Share of the whole for each slice, in slice order.
    pub fn fractions(&self) -> Vec<f64> {
        let total = self.total();
        self.slices
            .iter()
            .map(|s| if total > 0.0 { s.value / total } else { 0.0 })
            .collect()
    }
}

// -- Bar --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    /// One bar per category.
    Single,
    /// Series side by side within each category.
    Grouped,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x: AxisBinding,
    pub y: AxisBinding,
    pub mode: BarMode,
    /// X-axis categories, in display order.
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
    /// Set when bar colours encode the y value.
    pub color_scale: Option<ColorScale>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    /// Index into [`BarChart::categories`].
    pub category: usize,
    pub value: f64,
    pub color: Rgba,
}

// -- Scatter --

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x: AxisBinding,
    pub y: AxisBinding,
    pub size_field: &'static str,
    pub color_field: &'static str,
    /// One group per colour category.
    pub groups: Vec<ScatterGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterGroup {
    pub name: String,
    pub color: Rgba,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Marker radius in points.
    pub radius: f32,
    pub label: String,
}

// -- Line --

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x: AxisBinding,
    pub y: AxisBinding,
    pub band: Band,
    pub lines: Vec<LineSeries>,
}

/// Shaded region between an upper and a lower bound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Band {
    pub name: String,
    pub fill: Rgba,
    pub dates: Vec<NaiveDate>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub color: Rgba,
    pub width: f32,
    pub points: Vec<(NaiveDate, f64)>,
}
