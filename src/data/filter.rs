use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::{DashboardError, Result};
use super::model::{ForecastRow, RoiRow, RoiTable};

// ---------------------------------------------------------------------------
// Scenario – the forecast columns a user may plot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Scenario {
    BaseForecast,
    BestCase,
    WorstCase,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::BaseForecast, Scenario::BestCase, Scenario::WorstCase];

    /// Column name in the forecast file.
    pub fn column(self) -> &'static str {
        match self {
            Scenario::BaseForecast => "Base_Forecast",
            Scenario::BestCase => "Best_Case",
            Scenario::WorstCase => "Worst_Case",
        }
    }

    /// Read this scenario's value from a row.
    pub fn value(self, row: &ForecastRow) -> f64 {
        match self {
            Scenario::BaseForecast => row.base_forecast,
            Scenario::BestCase => row.best_case,
            Scenario::WorstCase => row.worst_case,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Scenario {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        Scenario::ALL
            .into_iter()
            .find(|sc| sc.column() == s.trim())
            .ok_or_else(|| DashboardError::InvalidSelection {
                name: s.to_string(),
            })
    }
}

/// Validate a user's scenario multi-select.
///
/// * Empty selection → `[BaseForecast]`
/// * Unknown name → `InvalidSelection`
/// * Repeated names collapse onto their first occurrence
pub fn resolve_scenarios<S: AsRef<str>>(selected: &[S]) -> Result<Vec<Scenario>> {
    let mut out: Vec<Scenario> = Vec::with_capacity(selected.len());
    for name in selected {
        let sc: Scenario = name.as_ref().parse()?;
        if !out.contains(&sc) {
            out.push(sc);
        }
    }
    if out.is_empty() {
        out.push(Scenario::BaseForecast);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Segment lookup
// ---------------------------------------------------------------------------

/// Find the single ROI row for `segment`. Zero or several matches both fail.
pub fn find_segment<'a>(roi: &'a RoiTable, segment: &str) -> Result<&'a RoiRow> {
    let mut matches = roi.rows.iter().filter(|r| r.segment == segment);
    match (matches.next(), matches.count()) {
        (Some(row), 0) => Ok(row),
        (first, rest) => Err(DashboardError::SegmentNotFound {
            segment: segment.to_string(),
            matches: usize::from(first.is_some()) + rest,
        }),
    }
}

/// Distinct segment names in table order (the segment picker's options).
pub fn segment_names(roi: &RoiTable) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::with_capacity(roi.len());
    for row in &roi.rows {
        if !names.contains(&row.segment.as_str()) {
            names.push(&row.segment);
        }
    }
    names
}
