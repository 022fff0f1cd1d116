//! View router: navigation key → rendered view description.
//!
//! `render` is pure dispatch. Each view pulls only the tables it needs and
//! wraps every builder result in its own [`Panel`], so a failing chart turns
//! into an error panel while the rest of the view still renders.

pub mod format;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::charts::{builders, ChartSpec};
use crate::color::{ColorScale, Rgba};
use crate::data::aggregate;
use crate::data::filter::{find_segment, segment_names};
use crate::data::model::{Datasets, SegmentTable};
use crate::data::{DashboardError, Result};

// ---------------------------------------------------------------------------
// ViewKey
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ViewKey {
    #[default]
    ExecutiveSummary,
    CustomerSegmentation,
    RevenueForecasting,
    RoiAnalysis,
}

impl ViewKey {
    pub const ALL: [ViewKey; 4] = [
        ViewKey::ExecutiveSummary,
        ViewKey::CustomerSegmentation,
        ViewKey::RevenueForecasting,
        ViewKey::RoiAnalysis,
    ];

    /// Navigation label.
    pub fn label(self) -> &'static str {
        match self {
            ViewKey::ExecutiveSummary => "Executive Summary",
            ViewKey::CustomerSegmentation => "Customer Segmentation",
            ViewKey::RevenueForecasting => "Revenue Forecasting",
            ViewKey::RoiAnalysis => "ROI Analysis",
        }
    }

    fn ident(self) -> &'static str {
        match self {
            ViewKey::ExecutiveSummary => "ExecutiveSummary",
            ViewKey::CustomerSegmentation => "CustomerSegmentation",
            ViewKey::RevenueForecasting => "RevenueForecasting",
            ViewKey::RoiAnalysis => "ROIAnalysis",
        }
    }

    /// Page heading.
    pub fn title(self) -> &'static str {
        match self {
            ViewKey::ExecutiveSummary => "Executive Summary",
            ViewKey::CustomerSegmentation => "Customer Segmentation Analysis",
            ViewKey::RevenueForecasting => "Revenue Forecasting Scenarios",
            ViewKey::RoiAnalysis => "Investment & ROI Simulation",
        }
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ViewKey {
    type Err = DashboardError;

    /// Accepts the identifier (`RoiAnalysis` / `ROIAnalysis`) or the label
    /// (`ROI Analysis`).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        ViewKey::ALL
            .into_iter()
            .find(|k| k.label() == s || k.ident().eq_ignore_ascii_case(s))
            .ok_or_else(|| DashboardError::UnknownView { key: s.to_string() })
    }
}

// ---------------------------------------------------------------------------
// User selections
// ---------------------------------------------------------------------------

/// Widget state that feeds the builders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserSelections {
    /// Forecast scenario column names; empty means the base forecast.
    pub scenarios: Vec<String>,
    /// ROI segment for the deep dive; `None` means the first segment.
    pub segment: Option<String>,
}

// ---------------------------------------------------------------------------
// Rendered output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub label: String,
    /// Formatted value, or the reason it could not be computed.
    pub value: std::result::Result<String, String>,
}

impl Kpi {
    fn new(label: &str, value: Result<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.map_err(|e| e.to_string()),
        }
    }
}

/// The segment summary as display rows, with a gradient colour per row for
/// the Avg_Monetary cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentGrid {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    pub monetary_colors: Vec<Rgba>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum PanelContent {
    Kpis(Vec<Kpi>),
    Chart(ChartSpec),
    Table(SegmentGrid),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub heading: String,
    pub content: PanelContent,
}

impl Panel {
    fn new(heading: &str, content: PanelContent) -> Self {
        Self {
            heading: heading.to_string(),
            content,
        }
    }

    /// Wrap a builder result; failures stay inside this panel.
    fn from_result(heading: &str, result: Result<PanelContent>) -> Self {
        let content = result.unwrap_or_else(|e| {
            log::warn!("panel '{heading}' failed: {e}");
            PanelContent::Error(e.to_string())
        });
        Self::new(heading, content)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.content, PanelContent::Error(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedView {
    pub key: ViewKey,
    pub title: String,
    pub panels: Vec<Panel>,
    pub notes: Vec<String>,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn render(key: ViewKey, data: &Datasets, selections: &UserSelections) -> RenderedView {
    log::debug!("rendering view {key}");
    let (panels, notes) = match key {
        ViewKey::ExecutiveSummary => (executive_summary(data), Vec::new()),
        ViewKey::CustomerSegmentation => (customer_segmentation(&data.segments), Vec::new()),
        ViewKey::RevenueForecasting => (
            revenue_forecasting(data, selections),
            vec!["Shaded area represents the statistical variance of the Base Forecast.".to_string()],
        ),
        ViewKey::RoiAnalysis => (roi_analysis(data, selections), Vec::new()),
    };
    RenderedView {
        key,
        title: key.title().to_string(),
        panels,
        notes,
    }
}

/// Like [`render`], for a key that arrives as text.
pub fn render_named(key: &str, data: &Datasets, selections: &UserSelections) -> Result<RenderedView> {
    Ok(render(key.parse()?, data, selections))
}

fn executive_summary(data: &Datasets) -> Vec<Panel> {
    let kpis = vec![
        Kpi::new(
            "Total Customers",
            aggregate::total_customers(&data.segments).map(format::thousands),
        ),
        Kpi::new(
            "Projected Gain",
            Ok(format::currency(aggregate::total_projected_gain(&data.roi), 0)),
        ),
        Kpi::new(
            "Avg ROI Multiplier",
            aggregate::average_roi(&data.roi).map(|v| format::multiplier(v, 1)),
        ),
        Kpi::new(
            "Total Investment",
            Ok(format::currency(aggregate::total_investment(&data.roi), 0)),
        ),
    ];

    vec![
        Panel::new("Key Metrics", PanelContent::Kpis(kpis)),
        Panel::new(
            "Customers by Strategic Action",
            PanelContent::Chart(builders::segment_pie(&data.segments)),
        ),
        Panel::new(
            "ROI Efficiency per Segment",
            PanelContent::Chart(builders::roi_bar(&data.roi)),
        ),
    ]
}

fn customer_segmentation(segments: &SegmentTable) -> Vec<Panel> {
    vec![
        Panel::new("Segment Performance Data", PanelContent::Table(segment_grid(segments))),
        Panel::new(
            "RFM: Recency vs Frequency",
            PanelContent::Chart(builders::segment_scatter(segments)),
        ),
        Panel::new(
            "Monetary Value by Cluster",
            PanelContent::Chart(builders::segment_monetary_bar(segments)),
        ),
    ]
}

fn revenue_forecasting(data: &Datasets, selections: &UserSelections) -> Vec<Panel> {
    vec![Panel::from_result(
        &builders::forecast_title(&data.forecast),
        builders::forecast_line(&data.forecast, &selections.scenarios).map(PanelContent::Chart),
    )]
}

fn roi_analysis(data: &Datasets, selections: &UserSelections) -> Vec<Panel> {
    let segment = selections
        .segment
        .as_deref()
        .or_else(|| segment_names(&data.roi).first().copied());
    // Only the lookup fails the whole panel; a zero investment breaks one tile.
    let detail = match segment {
        Some(seg) => find_segment(&data.roi, seg).map(|row| {
            PanelContent::Kpis(vec![
                Kpi::new("ROI Ratio", Ok(format::multiplier(row.roi, 2))),
                Kpi::new("Break-Even Revenue", Ok(format::currency(row.break_even_revenue, 2))),
                Kpi::new(
                    "Profit Multiplier",
                    aggregate::profit_multiplier(row).map(|m| format::multiplier(m, 1)),
                ),
            ])
        }),
        None => Err(DashboardError::EmptyInput {
            what: "segment detail",
        }),
    };

    vec![
        Panel::new(
            "Investment Efficiency (Investment vs Gain)",
            PanelContent::Chart(builders::roi_grouped_bar(&data.roi)),
        ),
        Panel::from_result("Segment Deep Dive", detail),
    ]
}

fn segment_grid(segments: &SegmentTable) -> SegmentGrid {
    let (min, max) = segments
        .rows
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.avg_monetary), hi.max(r.avg_monetary))
        });
    SegmentGrid {
        headers: vec![
            "Cluster",
            "Decision_Action",
            "Customer_Count",
            "Avg_Recency",
            "Avg_Frequency",
            "Avg_Monetary",
        ],
        rows: segments
            .rows
            .iter()
            .map(|r| {
                vec![
                    r.cluster.clone(),
                    r.decision_action.clone(),
                    format!("{}", r.customer_count),
                    format!("{:.2}", r.avg_recency),
                    format!("{:.2}", r.avg_frequency),
                    format!("{:.2}", r.avg_monetary),
                ]
            })
            .collect(),
        monetary_colors: segments
            .rows
            .iter()
            .map(|r| ColorScale::BLUES.map(r.avg_monetary, min, max))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{RoiRow, RoiTable};

    #[test]
    fn test_view_key_parsing() {
        assert_eq!("Executive Summary".parse::<ViewKey>().unwrap(), ViewKey::ExecutiveSummary);
        assert_eq!("ROIAnalysis".parse::<ViewKey>().unwrap(), ViewKey::RoiAnalysis);
        assert_eq!("RevenueForecasting".parse::<ViewKey>().unwrap(), ViewKey::RevenueForecasting);
        for key in ViewKey::ALL {
            assert_eq!(key.label().parse::<ViewKey>().unwrap(), key);
        }
        assert!(matches!(
            "Settings".parse::<ViewKey>(),
            Err(DashboardError::UnknownView { .. })
        ));
    }

    #[test]
    fn test_render_named_unknown_view() {
        let data = Datasets::default();
        let err = render_named("Pricing", &data, &UserSelections::default()).unwrap_err();
        assert!(matches!(err, DashboardError::UnknownView { key } if key == "Pricing"));
    }

    #[test]
    fn test_empty_data_errors_stay_in_their_panel() {
        let data = Datasets::default();
        let view = render(ViewKey::RoiAnalysis, &data, &UserSelections::default());
        assert_eq!(view.panels.len(), 2);
        assert!(!view.panels[0].is_error());
        assert!(view.panels[1].is_error());

        let summary = render(ViewKey::ExecutiveSummary, &data, &UserSelections::default());
        let PanelContent::Kpis(kpis) = &summary.panels[0].content else {
            panic!("expected KPI tiles");
        };
        assert_eq!(kpis[0].value, Ok("0".to_string()));
        assert!(kpis[2].value.is_err());
        assert_eq!(kpis[3].value, Ok("$0".to_string()));
    }

    #[test]
    fn test_zero_investment_breaks_only_the_multiplier_tile() {
        let data = Datasets {
            roi: RoiTable {
                rows: vec![RoiRow {
                    segment: "Free".to_string(),
                    investment: 0.0,
                    projected_gain: 500.0,
                    roi: 0.0,
                    break_even_revenue: 0.0,
                }],
            },
            ..Datasets::default()
        };
        let selections = UserSelections {
            scenarios: Vec::new(),
            segment: Some("Free".to_string()),
        };
        let view = render(ViewKey::RoiAnalysis, &data, &selections);
        let PanelContent::Kpis(tiles) = &view.panels[1].content else {
            panic!("expected detail tiles, got {:?}", view.panels[1].content);
        };
        assert_eq!(tiles[0].value, Ok("0.00x".to_string()));
        assert_eq!(tiles[1].value, Ok("$0.00".to_string()));
        assert!(tiles[2].value.is_err());
    }

    #[test]
    fn test_forecast_view_bad_scenario_is_scoped() {
        let data = Datasets::default();
        let selections = UserSelections {
            scenarios: vec!["Nope".to_string()],
            segment: None,
        };
        let view = render(ViewKey::RevenueForecasting, &data, &selections);
        assert!(view.panels[0].is_error());
        assert_eq!(view.notes.len(), 1);
    }
}
