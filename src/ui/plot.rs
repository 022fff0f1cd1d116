use std::f32::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, Pos2, RichText, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{
    Bar as PlotBar, BarChart as PlotBarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints,
    Points, Polygon, Text,
};

use crate::charts::spec::{BarChart, BarMode, ChartSpec, DonutChart, LineChart, ScatterChart};

const PLOT_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Chart dispatch
// ---------------------------------------------------------------------------

/// Draw a chart spec. `id` must be unique within the frame.
pub fn chart(ui: &mut Ui, id: &str, spec: &ChartSpec) {
    match spec {
        ChartSpec::Donut(c) => donut(ui, c),
        ChartSpec::Bar(c) => bar_chart(ui, id, c),
        ChartSpec::Scatter(c) => scatter(ui, id, c),
        ChartSpec::Line(c) => line_chart(ui, id, c),
    }
}

// ---------------------------------------------------------------------------
// Line chart with confidence band
// ---------------------------------------------------------------------------

fn day_number(d: NaiveDate) -> f64 {
    d.num_days_from_ce() as f64
}

fn date_label(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
        .map(|d| d.format("%d %b %Y").to_string())
        .unwrap_or_default()
}

fn line_chart(ui: &mut Ui, id: &str, chart: &LineChart) {
    let band = &chart.band;
    let fill = Color32::from(band.fill);

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(chart.x.label)
        .y_axis_label(chart.y.label)
        .x_axis_formatter(date_label)
        .show(ui, |plot_ui| {
            // One convex quad per interval; egui only fills convex shapes.
            for i in 1..band.dates.len() {
                let (x0, x1) = (day_number(band.dates[i - 1]), day_number(band.dates[i]));
                let quad = PlotPoints::new(vec![
                    [x0, band.lower[i - 1]],
                    [x1, band.lower[i]],
                    [x1, band.upper[i]],
                    [x0, band.upper[i - 1]],
                ]);
                plot_ui.polygon(
                    Polygon::new(quad)
                        .fill_color(fill)
                        .stroke(Stroke::NONE)
                        .name(&band.name),
                );
            }

            for series in &chart.lines {
                let points: PlotPoints = series
                    .points
                    .iter()
                    .map(|&(d, v)| [day_number(d), v])
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .name(&series.name)
                        .color(Color32::from(series.color))
                        .width(series.width),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Bar charts (single and grouped)
// ---------------------------------------------------------------------------

fn category_label(categories: &[String], value: f64) -> String {
    let idx = value.round();
    if idx < 0.0 || (value - idx).abs() > 1e-6 {
        return String::new();
    }
    categories.get(idx as usize).cloned().unwrap_or_default()
}

fn bar_chart(ui: &mut Ui, id: &str, chart: &BarChart) {
    let n_series = chart.series.len().max(1);
    let grouped = chart.mode == BarMode::Grouped;
    let width = if grouped { 0.8 / n_series as f64 } else { 0.7 };
    let categories = chart.categories.clone();

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(chart.x.label)
        .y_axis_label(chart.y.label)
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&categories, mark.value)
        })
        .show(ui, |plot_ui| {
            for (j, series) in chart.series.iter().enumerate() {
                let offset = if grouped {
                    (j as f64 - (n_series as f64 - 1.0) / 2.0) * width
                } else {
                    0.0
                };
                let bars: Vec<PlotBar> = series
                    .bars
                    .iter()
                    .map(|b| {
                        PlotBar::new(b.category as f64 + offset, b.value)
                            .width(width)
                            .fill(Color32::from(b.color))
                            .name(chart.categories.get(b.category).cloned().unwrap_or_default())
                    })
                    .collect();
                let mut plot_bars = PlotBarChart::new(bars).name(&series.name);
                if let Some(first) = series.bars.first() {
                    plot_bars = plot_bars.color(Color32::from(first.color));
                }
                plot_ui.bar_chart(plot_bars);
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter with size encoding
// ---------------------------------------------------------------------------

fn scatter(ui: &mut Ui, id: &str, chart: &ScatterChart) {
    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(chart.x.label)
        .y_axis_label(chart.y.label)
        .show(ui, |plot_ui| {
            for group in &chart.groups {
                let color = Color32::from(group.color).gamma_multiply(0.8);
                for p in &group.points {
                    plot_ui.points(
                        Points::new(PlotPoints::new(vec![[p.x, p.y]]))
                            .radius(p.radius)
                            .filled(true)
                            .color(color)
                            .name(&group.name),
                    );
                    plot_ui.text(Text::new(
                        PlotPoint::new(p.x, p.y),
                        RichText::new(&p.label).small(),
                    ));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Donut (painted directly; egui_plot has no pie)
// ---------------------------------------------------------------------------

fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + Vec2::angled(angle) * radius
}

fn donut(ui: &mut Ui, chart: &DonutChart) {
    if chart.slices.is_empty() {
        ui.label(RichText::new("No customers to show.").weak());
        return;
    }
    let fractions = chart.fractions();

    ui.horizontal(|ui: &mut Ui| {
        let side = PLOT_HEIGHT.min(ui.available_width() * 0.6).max(80.0);
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(side), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let outer = side / 2.0 - 4.0;
        let inner = outer * chart.hole;

        // Slices run clockwise from twelve o'clock.
        let mut start = -FRAC_PI_2;
        for (slice, frac) in chart.slices.iter().zip(&fractions) {
            let sweep = *frac as f32 * TAU;
            let steps = (sweep.to_degrees() / 2.0).ceil().max(1.0) as usize;
            let fill = Color32::from(slice.color);
            for k in 0..steps {
                let a0 = start + sweep * k as f32 / steps as f32;
                let a1 = start + sweep * (k + 1) as f32 / steps as f32;
                let quad = vec![
                    polar(center, outer, a0),
                    polar(center, outer, a1),
                    polar(center, inner, a1),
                    polar(center, inner, a0),
                ];
                painter.add(Shape::convex_polygon(quad, fill, Stroke::NONE));
            }
            start += sweep;
        }

        if let Some(pos) = response.hover_pos() {
            let v = pos - center;
            let dist = v.length();
            if dist >= inner && dist <= outer {
                let turn = (v.y.atan2(v.x) + FRAC_PI_2).rem_euclid(TAU) / TAU;
                let mut acc = 0.0_f64;
                let hit = chart.slices.iter().zip(&fractions).find(|(_, f)| {
                    acc += **f;
                    (turn as f64) < acc
                });
                if let Some((slice, frac)) = hit {
                    response.on_hover_text_at_pointer(format!(
                        "{}: {} ({:.1}%)",
                        slice.label,
                        slice.value,
                        frac * 100.0
                    ));
                }
            }
        }

        ui.vertical(|ui: &mut Ui| {
            for (slice, frac) in chart.slices.iter().zip(&fractions) {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new("■").color(Color32::from(slice.color)));
                    ui.label(format!("{}  {:.1}%", slice.label, frac * 100.0));
                });
            }
        });
    });
}
