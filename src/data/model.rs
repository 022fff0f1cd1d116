use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ForecastRow – one dated point of the revenue forecast
// ---------------------------------------------------------------------------

/// Revenue forecast scenarios for one date, with the confidence band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub date: NaiveDate,
    pub base_forecast: f64,
    pub best_case: f64,
    pub worst_case: f64,
    pub upper_ci: f64,
    pub lower_ci: f64,
}

impl ForecastRow {
    /// `Upper_CI >= Base_Forecast >= Lower_CI`.
    pub fn band_is_consistent(&self) -> bool {
        self.upper_ci >= self.base_forecast && self.base_forecast >= self.lower_ci
    }
}

// ---------------------------------------------------------------------------
// RoiRow – simulated investment outcome per segment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiRow {
    #[serde(rename = "Segment")]
    pub segment: String,
    #[serde(rename = "Investment")]
    pub investment: f64,
    #[serde(rename = "Projected_Gain")]
    pub projected_gain: f64,
    /// Multiplier, nominally `projected_gain / investment`.
    #[serde(rename = "ROI")]
    pub roi: f64,
    #[serde(rename = "BreakEven_Revenue")]
    pub break_even_revenue: f64,
}

// ---------------------------------------------------------------------------
// SegmentRow – RFM summary of one customer cluster
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRow {
    /// Cluster identifier; numeric clusters keep their textual form.
    #[serde(rename = "Cluster")]
    pub cluster: String,
    #[serde(rename = "Decision_Action")]
    pub decision_action: String,
    /// Kept as read; [`crate::data::aggregate::total_customers`] checks that
    /// every count is a non-negative integer.
    #[serde(rename = "Customer_Count")]
    pub customer_count: f64,
    #[serde(rename = "Avg_Recency")]
    pub avg_recency: f64,
    #[serde(rename = "Avg_Frequency")]
    pub avg_frequency: f64,
    #[serde(rename = "Avg_Monetary")]
    pub avg_monetary: f64,
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastTable {
    pub rows: Vec<ForecastRow>,
}

impl ForecastTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Dates whose confidence band does not contain the base forecast.
    pub fn band_violations(&self) -> Vec<NaiveDate> {
        self.rows
            .iter()
            .filter(|r| !r.band_is_consistent())
            .map(|r| r.date)
            .collect()
    }

    /// Number of distinct calendar months covered by the forecast.
    pub fn month_span(&self) -> usize {
        let mut months: Vec<(i32, u32)> = self
            .rows
            .iter()
            .map(|r| (r.date.year(), r.date.month()))
            .collect();
        months.sort_unstable();
        months.dedup();
        months.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoiTable {
    pub rows: Vec<RoiRow>,
}

impl RoiTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Segment names that occur more than once, with their counts.
    pub fn duplicate_segments(&self) -> BTreeMap<&str, usize> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.segment.as_str()).or_default() += 1;
        }
        counts.retain(|_, n| *n > 1);
        counts
    }

    pub fn negative_investments(&self) -> impl Iterator<Item = &RoiRow> {
        self.rows.iter().filter(|r| r.investment < 0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SegmentTable {
    pub rows: Vec<SegmentRow>,
}

impl SegmentTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct Decision_Action labels in order of first appearance.
    pub fn decision_actions(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.decision_action.as_str()) {
                seen.push(&row.decision_action);
            }
        }
        seen
    }
}

// ---------------------------------------------------------------------------
// Datasets – everything the dashboard reads, loaded together
// ---------------------------------------------------------------------------

/// The three tables, loaded as one unit and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Datasets {
    pub forecast: ForecastTable,
    pub roi: RoiTable,
    pub segments: SegmentTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roi_row(segment: &str, investment: f64) -> RoiRow {
        RoiRow {
            segment: segment.to_string(),
            investment,
            projected_gain: 100.0,
            roi: 1.0,
            break_even_revenue: 50.0,
        }
    }

    fn forecast_row(y: i32, m: u32, d: u32) -> ForecastRow {
        ForecastRow {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            base_forecast: 100.0,
            best_case: 120.0,
            worst_case: 80.0,
            upper_ci: 110.0,
            lower_ci: 90.0,
        }
    }

    #[test]
    fn test_negative_investments_are_flagged() {
        let table = RoiTable {
            rows: vec![roi_row("A", 100.0), roi_row("B", -5.0), roi_row("C", 0.0)],
        };
        let flagged: Vec<&str> = table
            .negative_investments()
            .map(|r| r.segment.as_str())
            .collect();
        assert_eq!(flagged, vec!["B"]);
    }

    #[test]
    fn test_month_span_counts_calendar_months() {
        let table = ForecastTable {
            rows: vec![
                forecast_row(2025, 1, 31),
                forecast_row(2025, 2, 1),
                forecast_row(2025, 2, 28),
                forecast_row(2026, 1, 31),
            ],
        };
        assert_eq!(table.month_span(), 3);
        assert_eq!(ForecastTable::default().month_span(), 0);
    }
}
