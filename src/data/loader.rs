use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use csv::StringRecord;
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::{DashboardError, Result};
use super::model::{
    Datasets, ForecastRow, ForecastTable, RoiRow, RoiTable, SegmentRow, SegmentTable,
};

pub const FORECAST_FILE: &str = "revenue_forecast_scenarios.csv";
pub const ROI_FILE: &str = "roi_simulation_results.csv";
pub const SEGMENT_FILE: &str = "segment_decision_summary.csv";

const FORECAST_COLUMNS: &[&str] = &[
    "Date",
    "Base_Forecast",
    "Best_Case",
    "Worst_Case",
    "Upper_CI",
    "Lower_CI",
];
const ROI_COLUMNS: &[&str] = &[
    "Segment",
    "Investment",
    "Projected_Gain",
    "ROI",
    "BreakEven_Revenue",
];
const SEGMENT_COLUMNS: &[&str] = &[
    "Cluster",
    "Decision_Action",
    "Customer_Count",
    "Avg_Recency",
    "Avg_Frequency",
    "Avg_Monetary",
];

/// Accepted date layouts, day before month wherever both are present.
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
/// Two-digit years: 00-68 are 20xx, 69-99 are 19xx.
const SHORT_YEAR_FORMATS: &[&str] = &["%d/%m/%y", "%d-%m-%y", "%d.%m.%y"];
const ISO_FORMATS: &[&str] = &["%Y-%m-%d"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read all three tables from `dir`. Either every table loads or an error is
/// returned; there is no partial result.
pub fn load(dir: &Path) -> Result<Datasets> {
    let forecast = load_forecast(&dir.join(FORECAST_FILE))?;
    let roi = load_roi(&dir.join(ROI_FILE))?;
    let segments = load_segments(&dir.join(SEGMENT_FILE))?;

    for date in forecast.band_violations() {
        log::warn!("{FORECAST_FILE}: base forecast outside confidence band on {date}");
    }
    for (segment, n) in roi.duplicate_segments() {
        log::warn!("{ROI_FILE}: segment '{segment}' appears {n} times");
    }
    for row in roi.negative_investments() {
        log::warn!(
            "{ROI_FILE}: segment '{}' has negative investment {}",
            row.segment,
            row.investment
        );
    }

    Ok(Datasets {
        forecast,
        roi,
        segments,
    })
}

/// Parse a day-first date such as `31/01/2025`. A trailing time-of-day
/// (`31/01/2025 00:00:00`, `2025-01-31T00:00:00`) is ignored.
pub fn parse_day_first(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let date_part = s.split(|c: char| c == ' ' || c == 'T').next().unwrap_or(s);

    // chrono's %Y takes any number of digits, so pick the layouts by the
    // width of the year field instead of letting `25` become year 0025.
    let first = date_part.split(is_date_separator).next().unwrap_or("");
    let last = date_part.rsplit(is_date_separator).next().unwrap_or("");
    let formats = if first.len() == 4 {
        ISO_FORMATS
    } else {
        match last.len() {
            4 => DATE_FORMATS,
            2 => SHORT_YEAR_FORMATS,
            _ => return None,
        }
    };
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

fn is_date_separator(c: char) -> bool {
    matches!(c, '/' | '-' | '.')
}

// ---------------------------------------------------------------------------
// Load-once cache
// ---------------------------------------------------------------------------

/// Caches the tables of one data directory.
///
/// The slot is filled by the first successful [`DatasetCache::load`]; later
/// calls hand out the same `Arc` without touching the disk. Concurrent first
/// callers run the read at most once. Failed loads leave the slot empty.
#[derive(Debug)]
pub struct DatasetCache {
    dir: PathBuf,
    slot: OnceCell<Arc<Datasets>>,
}

impl DatasetCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            slot: OnceCell::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_warm(&self) -> bool {
        self.slot.get().is_some()
    }

    pub fn load(&self) -> Result<Arc<Datasets>> {
        if let Some(data) = self.slot.get() {
            log::debug!("dataset cache hit for {}", self.dir.display());
            return Ok(Arc::clone(data));
        }
        self.slot
            .get_or_try_init(|| {
                let data = load(&self.dir)?;
                log::info!(
                    "Loaded {} forecast rows, {} ROI rows, {} segments from {}",
                    data.forecast.len(),
                    data.roi.len(),
                    data.segments.len(),
                    self.dir.display()
                );
                Ok(Arc::new(data))
            })
            .map(Arc::clone)
    }

    /// Drop the cached tables; the next `load` reads the files again.
    pub fn clear(&mut self) {
        if self.slot.take().is_some() {
            log::info!("dataset cache cleared for {}", self.dir.display());
        }
    }
}

// ---------------------------------------------------------------------------
// Per-file loaders
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawForecastRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Base_Forecast")]
    base_forecast: f64,
    #[serde(rename = "Best_Case")]
    best_case: f64,
    #[serde(rename = "Worst_Case")]
    worst_case: f64,
    #[serde(rename = "Upper_CI")]
    upper_ci: f64,
    #[serde(rename = "Lower_CI")]
    lower_ci: f64,
}

fn load_forecast(path: &Path) -> Result<ForecastTable> {
    let raw: Vec<(usize, RawForecastRow)> = read_rows(path, FORECAST_COLUMNS)?;
    let rows = raw
        .into_iter()
        .map(|(line, r)| -> Result<ForecastRow> {
            let date = parse_day_first(&r.date).ok_or_else(|| DashboardError::DataFormat {
                file: file_label(path),
                row: line,
                column: "Date".to_string(),
                value: r.date.clone(),
            })?;
            Ok(ForecastRow {
                date,
                base_forecast: r.base_forecast,
                best_case: r.best_case,
                worst_case: r.worst_case,
                upper_ci: r.upper_ci,
                lower_ci: r.lower_ci,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ForecastTable { rows })
}

fn load_roi(path: &Path) -> Result<RoiTable> {
    let rows: Vec<(usize, RoiRow)> = read_rows(path, ROI_COLUMNS)?;
    Ok(RoiTable {
        rows: rows.into_iter().map(|(_, r)| r).collect(),
    })
}

fn load_segments(path: &Path) -> Result<SegmentTable> {
    let rows: Vec<(usize, SegmentRow)> = read_rows(path, SEGMENT_COLUMNS)?;
    Ok(SegmentTable {
        rows: rows.into_iter().map(|(_, r)| r).collect(),
    })
}

// ---------------------------------------------------------------------------
// CSV helpers
// ---------------------------------------------------------------------------

/// Open `path`, check the header carries every `required` column, and
/// deserialize each record. Returns `(line_number, row)` pairs.
fn read_rows<T: DeserializeOwned>(path: &Path, required: &[&str]) -> Result<Vec<(usize, T)>> {
    let source_err = |reason: String| DashboardError::DataSource {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| source_err(e.to_string()))?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);
    let headers = reader
        .headers()
        .map_err(|e| source_err(format!("reading header: {e}")))?
        .clone();

    if let Some(missing) = required.iter().find(|c| !headers.iter().any(|h| h == **c)) {
        return Err(source_err(format!("missing required column '{missing}'")));
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| source_err(e.to_string()))?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(row_no + 2);
        let row = record
            .deserialize::<T>(Some(&headers))
            .map_err(|e| format_error(path, &headers, &record, line, &e))?;
        rows.push((line, row));
    }
    Ok(rows)
}

/// Map a per-record deserialize failure to the offending column and value.
fn format_error(
    path: &Path,
    headers: &StringRecord,
    record: &StringRecord,
    line: usize,
    err: &csv::Error,
) -> DashboardError {
    let field = match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err.field().map(|f| f as usize),
        _ => None,
    };
    match field {
        Some(idx) => DashboardError::DataFormat {
            file: file_label(path),
            row: line,
            column: headers.get(idx).unwrap_or("?").to_string(),
            value: record.get(idx).unwrap_or("").to_string(),
        },
        None => DashboardError::DataSource {
            path: path.to_path_buf(),
            reason: format!("line {line}: {err}"),
        },
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day_first_unambiguous() {
        let d = parse_day_first("31/01/2025").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
    }

    #[test]
    fn test_parse_day_first_ambiguous() {
        // 01/03 is the first of March, not the third of January
        let d = parse_day_first("01/03/2025").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn test_parse_day_first_other_layouts() {
        let expected = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
        assert_eq!(parse_day_first("28-02-2025"), Some(expected));
        assert_eq!(parse_day_first("28.02.2025"), Some(expected));
        assert_eq!(parse_day_first("2025-02-28"), Some(expected));
        assert_eq!(parse_day_first(" 28/02/2025 00:00:00"), Some(expected));
        assert_eq!(parse_day_first("2025-02-28T00:00:00"), Some(expected));
    }

    #[test]
    fn test_parse_day_first_two_digit_year() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(parse_day_first("31/01/25"), Some(expected));
        assert_eq!(parse_day_first("31-01-25"), Some(expected));
        assert_eq!(parse_day_first("31.01.25 00:00"), Some(expected));
    }

    #[test]
    fn test_parse_day_first_rejects_odd_year_widths() {
        assert_eq!(parse_day_first("31/01/025"), None);
        assert_eq!(parse_day_first("31/01/5"), None);
        assert_eq!(parse_day_first("31/01/20255"), None);
        assert_eq!(parse_day_first("25-01-31x"), None);
    }

    #[test]
    fn test_parse_day_first_rejects_garbage() {
        assert_eq!(parse_day_first("31/02/2025"), None);
        assert_eq!(parse_day_first("13/13/2025"), None);
        assert_eq!(parse_day_first("soon"), None);
        assert_eq!(parse_day_first(""), None);
    }
}
