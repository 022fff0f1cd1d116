use serde::Serialize;

use super::spec::{
    AxisBinding, Band, Bar, BarChart, BarMode, BarSeries, ChartSpec, DonutChart, LineChart,
    LineSeries, ScatterChart, ScatterGroup, ScatterPoint, Slice,
};
use crate::color::{ColorMap, ColorScale, Rgba};
use crate::data::aggregate::profit_multiplier;
use crate::data::filter::{find_segment, resolve_scenarios, Scenario};
use crate::data::model::{ForecastTable, RoiRow, RoiTable, SegmentTable};
use crate::data::Result;

/// Smallest scatter marker; zero-customer clusters are drawn at this size.
pub const MIN_MARKER_RADIUS: f32 = 3.0;
pub const MAX_MARKER_RADIUS: f32 = 20.0;

const BAND_FILL: Rgba = Rgba::rgba(100, 100, 100, 26);
const INVESTMENT_COLOR: Rgba = Rgba::rgb(205, 92, 92);
const GAIN_COLOR: Rgba = Rgba::rgb(32, 178, 170);

fn scenario_color(sc: Scenario) -> Rgba {
    match sc {
        Scenario::BaseForecast => Rgba::rgb(0x1f, 0x77, 0xb4),
        Scenario::BestCase => Rgba::rgb(0x2c, 0xa0, 0x2c),
        Scenario::WorstCase => Rgba::rgb(0xd6, 0x27, 0x28),
    }
}

/// Colours for Decision_Action, shared by every segment chart so a label
/// keeps its colour across views.
pub fn action_colors(segments: &SegmentTable) -> ColorMap {
    ColorMap::new(&segments.decision_actions())
}

// ---------------------------------------------------------------------------
// Executive summary
// ---------------------------------------------------------------------------

/// Customers per Decision_Action as a donut. Actions whose customers sum to
/// zero (or less) get no slice.
pub fn segment_pie(segments: &SegmentTable) -> ChartSpec {
    let colors = action_colors(segments);
    let slices = segments
        .decision_actions()
        .into_iter()
        .map(|action| {
            let value: f64 = segments
                .rows
                .iter()
                .filter(|r| r.decision_action == action)
                .map(|r| r.customer_count)
                .sum();
            Slice {
                label: action.to_string(),
                value,
                color: colors.color_for(action),
            }
        })
        .filter(|s| s.value > 0.0)
        .collect();

    ChartSpec::Donut(DonutChart {
        title: "Customers by Strategic Action".to_string(),
        hole: 0.4,
        value_field: "Customer_Count",
        label_field: "Decision_Action",
        slices,
    })
}

/// ROI per segment, highest first. Equal ROIs keep table order.
pub fn roi_bar(roi: &RoiTable) -> ChartSpec {
    let mut order: Vec<usize> = (0..roi.len()).collect();
    order.sort_by(|&a, &b| roi.rows[b].roi.total_cmp(&roi.rows[a].roi));

    let (min, max) = roi
        .rows
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.roi), hi.max(r.roi))
        });
    let scale = ColorScale::GN_BU;

    let categories = order.iter().map(|&i| roi.rows[i].segment.clone()).collect();
    let bars = order
        .iter()
        .enumerate()
        .map(|(pos, &i)| Bar {
            category: pos,
            value: roi.rows[i].roi,
            color: scale.map(roi.rows[i].roi, min, max),
        })
        .collect();

    ChartSpec::Bar(BarChart {
        title: "ROI Efficiency per Segment".to_string(),
        x: AxisBinding::new("Segment", "Segment"),
        y: AxisBinding::new("ROI", "ROI"),
        mode: BarMode::Single,
        categories,
        series: vec![BarSeries {
            name: "ROI".to_string(),
            bars,
        }],
        color_scale: Some(scale),
    })
}

// ---------------------------------------------------------------------------
// Customer segmentation
// ---------------------------------------------------------------------------

/// Recency vs frequency, marker area proportional to Customer_Count.
pub fn segment_scatter(segments: &SegmentTable) -> ChartSpec {
    let colors = action_colors(segments);
    let max_count = segments
        .rows
        .iter()
        .map(|r| r.customer_count)
        .fold(0.0_f64, f64::max);

    let groups = segments
        .decision_actions()
        .into_iter()
        .map(|action| ScatterGroup {
            name: action.to_string(),
            color: colors.color_for(action),
            points: segments
                .rows
                .iter()
                .filter(|r| r.decision_action == action)
                .map(|r| ScatterPoint {
                    x: r.avg_recency,
                    y: r.avg_frequency,
                    radius: marker_radius(r.customer_count, max_count),
                    label: r.cluster.clone(),
                })
                .collect(),
        })
        .collect();

    ChartSpec::Scatter(ScatterChart {
        title: "RFM: Recency vs Frequency".to_string(),
        x: AxisBinding::new("Avg_Recency", "Avg Recency"),
        y: AxisBinding::new("Avg_Frequency", "Avg Frequency"),
        size_field: "Customer_Count",
        color_field: "Decision_Action",
        groups,
    })
}

fn marker_radius(count: f64, max_count: f64) -> f32 {
    if max_count <= 0.0 || !count.is_finite() || count <= 0.0 {
        return MIN_MARKER_RADIUS;
    }
    let share = (count / max_count).clamp(0.0, 1.0).sqrt() as f32;
    MIN_MARKER_RADIUS + (MAX_MARKER_RADIUS - MIN_MARKER_RADIUS) * share
}

/// Avg_Monetary per cluster; one series per Decision_Action.
pub fn segment_monetary_bar(segments: &SegmentTable) -> ChartSpec {
    let colors = action_colors(segments);
    let categories = segments.rows.iter().map(|r| r.cluster.clone()).collect();
    let series = segments
        .decision_actions()
        .into_iter()
        .map(|action| BarSeries {
            name: action.to_string(),
            bars: segments
                .rows
                .iter()
                .enumerate()
                .filter(|(_, r)| r.decision_action == action)
                .map(|(i, r)| Bar {
                    category: i,
                    value: r.avg_monetary,
                    color: colors.color_for(action),
                })
                .collect(),
        })
        .collect();

    ChartSpec::Bar(BarChart {
        title: "Monetary Value by Cluster".to_string(),
        x: AxisBinding::new("Cluster", "Cluster"),
        y: AxisBinding::new("Avg_Monetary", "Avg Monetary ($)"),
        mode: BarMode::Single,
        categories,
        series,
        color_scale: None,
    })
}

// ---------------------------------------------------------------------------
// Revenue forecasting
// ---------------------------------------------------------------------------

/// "6-Month Revenue Projection" for six calendar months of data.
pub fn forecast_title(forecast: &ForecastTable) -> String {
    match forecast.month_span() {
        0 => "Revenue Projection".to_string(),
        n => format!("{n}-Month Revenue Projection"),
    }
}

/// One line per selected scenario over the confidence band. An empty
/// selection shows the base forecast; the band is always present.
pub fn forecast_line<S: AsRef<str>>(forecast: &ForecastTable, selected: &[S]) -> Result<ChartSpec> {
    let scenarios = resolve_scenarios(selected)?;

    let band = Band {
        name: "95% Confidence Interval".to_string(),
        fill: BAND_FILL,
        dates: forecast.rows.iter().map(|r| r.date).collect(),
        upper: forecast.rows.iter().map(|r| r.upper_ci).collect(),
        lower: forecast.rows.iter().map(|r| r.lower_ci).collect(),
    };

    let lines = scenarios
        .into_iter()
        .map(|sc| LineSeries {
            name: sc.column().to_string(),
            color: scenario_color(sc),
            width: 3.0,
            points: forecast.rows.iter().map(|r| (r.date, sc.value(r))).collect(),
        })
        .collect();

    Ok(ChartSpec::Line(LineChart {
        title: forecast_title(forecast),
        x: AxisBinding::new("Date", "Timeline"),
        y: AxisBinding::new("Revenue", "Revenue ($)"),
        band,
        lines,
    }))
}

// ---------------------------------------------------------------------------
// ROI analysis
// ---------------------------------------------------------------------------

/// Investment next to projected gain for every segment, in table order.
pub fn roi_grouped_bar(roi: &RoiTable) -> ChartSpec {
    let categories = roi.rows.iter().map(|r| r.segment.clone()).collect();
    ChartSpec::Bar(BarChart {
        title: "Investment Efficiency (Investment vs Gain)".to_string(),
        x: AxisBinding::new("Segment", "Segment"),
        y: AxisBinding::new("Amount", "Amount ($)"),
        mode: BarMode::Grouped,
        categories,
        series: vec![
            amount_series(roi, "Investment", INVESTMENT_COLOR, |r| r.investment),
            amount_series(roi, "Projected Gain", GAIN_COLOR, |r| r.projected_gain),
        ],
        color_scale: None,
    })
}

fn amount_series(roi: &RoiTable, name: &str, color: Rgba, value: fn(&RoiRow) -> f64) -> BarSeries {
    BarSeries {
        name: name.to_string(),
        bars: roi
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| Bar {
                category: i,
                value: value(r),
                color,
            })
            .collect(),
    }
}

/// Headline figures for one segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoiDetail {
    pub segment: String,
    pub roi: f64,
    pub break_even_revenue: f64,
    pub profit_multiplier: f64,
}

pub fn roi_detail(roi: &RoiTable, segment: &str) -> Result<RoiDetail> {
    let row = find_segment(roi, segment)?;
    Ok(RoiDetail {
        segment: row.segment.clone(),
        roi: row.roi,
        break_even_revenue: row.break_even_revenue,
        profit_multiplier: profit_multiplier(row)?,
    })
}
