//! Writes the three dashboard CSV files with plausible demo figures.
//!
//! Usage: `generate_sample [OUTPUT_DIR]` (defaults to `data`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, Months, NaiveDate};
use decision_dashboard::data::loader::{FORECAST_FILE, ROI_FILE, SEGMENT_FILE};

/// Last day of the month `months` after January 2025.
fn month_end(months: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(2025, 1, 1)?.checked_add_months(Months::new(months + 1))?;
    first.pred_opt()
}

fn write_forecast(path: &Path) -> Result<usize> {
    let mut w = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    w.write_record(["Date", "Base_Forecast", "Best_Case", "Worst_Case", "Upper_CI", "Lower_CI"])?;

    let mut rows = 0;
    for m in 0..6 {
        let date = month_end(m).context("date out of range")?;
        // Gentle growth with a seasonal wobble; the band widens with the horizon.
        let t = m as f64;
        let base = 420_000.0 * (1.0 + 0.03 * t) + 8_000.0 * (t * 1.3).sin();
        let spread = 0.04 + 0.015 * t;
        w.write_record([
            format!("{:02}/{:02}/{}", date.day(), date.month(), date.year()),
            format!("{base:.2}"),
            format!("{:.2}", base * (1.0 + spread * 1.5)),
            format!("{:.2}", base * (1.0 - spread * 1.5)),
            format!("{:.2}", base * (1.0 + spread)),
            format!("{:.2}", base * (1.0 - spread)),
        ])?;
        rows += 1;
    }
    w.flush()?;
    Ok(rows)
}

fn write_roi(path: &Path) -> Result<usize> {
    let segments = [
        ("Champions", 40_000.0, 3.8),
        ("Loyal Customers", 55_000.0, 2.6),
        ("Potential Loyalists", 30_000.0, 2.1),
        ("At Risk", 45_000.0, 1.4),
        ("Hibernating", 20_000.0, 0.7),
    ];
    let mut w = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    w.write_record(["Segment", "Investment", "Projected_Gain", "ROI", "BreakEven_Revenue"])?;
    for (segment, investment, roi) in segments {
        let gain: f64 = investment * roi;
        w.write_record([
            segment.to_string(),
            format!("{investment:.2}"),
            format!("{gain:.2}"),
            format!("{roi:.2}"),
            format!("{:.2}", investment * 1.25),
        ])?;
    }
    w.flush()?;
    Ok(segments.len())
}

fn write_segments(path: &Path) -> Result<usize> {
    let clusters = [
        (0, "Reward & Retain", 1_240, 12.5, 18.2, 2_450.0),
        (1, "Upsell", 2_310, 34.0, 7.6, 980.0),
        (2, "Win Back", 1_580, 148.0, 2.3, 410.0),
        (3, "Nurture", 3_020, 58.5, 3.9, 620.0),
        (4, "Win Back", 860, 260.0, 1.2, 150.0),
    ];
    let mut w = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    w.write_record([
        "Cluster",
        "Decision_Action",
        "Customer_Count",
        "Avg_Recency",
        "Avg_Frequency",
        "Avg_Monetary",
    ])?;
    for (cluster, action, count, recency, frequency, monetary) in clusters {
        w.write_record([
            cluster.to_string(),
            action.to_string(),
            count.to_string(),
            format!("{recency:.1}"),
            format!("{frequency:.1}"),
            format!("{monetary:.2}"),
        ])?;
    }
    w.flush()?;
    Ok(clusters.len())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let f = write_forecast(&out_dir.join(FORECAST_FILE))?;
    let r = write_roi(&out_dir.join(ROI_FILE))?;
    let s = write_segments(&out_dir.join(SEGMENT_FILE))?;

    println!(
        "Wrote {f} forecast rows, {r} ROI segments and {s} clusters to {}",
        out_dir.display()
    );
    Ok(())
}
