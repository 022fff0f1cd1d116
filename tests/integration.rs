//! Integration tests: CSV fixtures on disk → loader → aggregation → views

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use decision_dashboard::charts::builders;
use decision_dashboard::charts::ChartSpec;
use decision_dashboard::data::aggregate;
use decision_dashboard::data::loader::{self, FORECAST_FILE, ROI_FILE, SEGMENT_FILE};
use decision_dashboard::export;
use decision_dashboard::view::PanelContent;
use decision_dashboard::{render, DashboardError, DatasetCache, UserSelections, ViewKey};
use tempfile::TempDir;

const FORECAST_CSV: &str = "\
Date,Base_Forecast,Best_Case,Worst_Case,Upper_CI,Lower_CI
31/01/2025,1000.0,1200.0,800.0,1100.0,900.0
01/02/2025,1050.0,1260.0,840.0,1160.0,940.0
28/02/2025,1100.0,1320.0,880.0,1220.0,980.0
";

const ROI_CSV: &str = "\
Segment,Investment,Projected_Gain,ROI,BreakEven_Revenue
Champions,1000,2500,2.5,1250
At Risk,2000,3000,1.5,2500
Loyal,500,1250,2.5,625
";

const SEGMENT_CSV: &str = "\
Cluster,Decision_Action,Customer_Count,Avg_Recency,Avg_Frequency,Avg_Monetary
0,Retain,120,10.5,8.2,950.0
1,Win Back,45,120.0,1.5,210.0
2,Retain,30,22.0,5.0,600.0
3,Sunset,0,300.0,1.0,40.0
";

/// Write the three fixture files (optionally overriding one) into a temp dir.
fn fixture_dir(overrides: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, body) in [
        (FORECAST_FILE, FORECAST_CSV),
        (ROI_FILE, ROI_CSV),
        (SEGMENT_FILE, SEGMENT_CSV),
    ] {
        let body = overrides
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, b)| *b)
            .unwrap_or(body);
        fs::write(dir.path().join(name), body).unwrap();
    }
    dir
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_load_parses_tables_and_day_first_dates() {
    let dir = fixture_dir(&[]);
    let data = loader::load(dir.path()).unwrap();

    assert_eq!(data.forecast.len(), 3);
    assert_eq!(data.roi.len(), 3);
    assert_eq!(data.segments.len(), 4);

    // Unambiguous and ambiguous day-first strings
    assert_eq!(data.forecast.rows[0].date, date(2025, 1, 31));
    assert_eq!(data.forecast.rows[1].date, date(2025, 2, 1));
    assert_eq!(data.segments.rows[1].decision_action, "Win Back");
    assert_eq!(data.roi.rows[1].segment, "At Risk");
}

#[test]
fn test_aggregates_over_loaded_tables() {
    let dir = fixture_dir(&[]);
    let data = loader::load(dir.path()).unwrap();

    assert_eq!(aggregate::total_customers(&data.segments).unwrap(), 195);
    assert_eq!(aggregate::total_investment(&data.roi), 3500.0);
    assert_eq!(aggregate::total_projected_gain(&data.roi), 6750.0);
    let avg = aggregate::average_roi(&data.roi).unwrap();
    assert!((avg - 6.5 / 3.0).abs() < 1e-12);
}

#[test]
fn test_repeated_loads_are_identical() {
    let dir = fixture_dir(&[]);
    let first = loader::load(dir.path()).unwrap();
    let second = loader::load(dir.path()).unwrap();
    assert_eq!(first, second);

    let views_a: Vec<_> = ViewKey::ALL
        .into_iter()
        .map(|k| serde_json::to_string(&render(k, &first, &UserSelections::default())).unwrap())
        .collect();
    let views_b: Vec<_> = ViewKey::ALL
        .into_iter()
        .map(|k| serde_json::to_string(&render(k, &second, &UserSelections::default())).unwrap())
        .collect();
    assert_eq!(views_a, views_b);
}

#[test]
fn test_missing_file_is_data_source_error() {
    let dir = fixture_dir(&[]);
    fs::remove_file(dir.path().join(ROI_FILE)).unwrap();
    match loader::load(dir.path()) {
        Err(DashboardError::DataSource { path, .. }) => assert!(path.ends_with(ROI_FILE)),
        other => panic!("expected DataSource, got {other:?}"),
    }
}

#[test]
fn test_missing_column_is_data_source_error() {
    let dir = fixture_dir(&[(
        SEGMENT_FILE,
        "Cluster,Decision_Action,Customer_Count,Avg_Recency,Avg_Frequency\n0,Retain,1,2,3\n",
    )]);
    match loader::load(dir.path()) {
        Err(DashboardError::DataSource { reason, .. }) => assert!(reason.contains("Avg_Monetary")),
        other => panic!("expected DataSource, got {other:?}"),
    }
}

#[test]
fn test_ragged_row_is_data_source_error() {
    let dir = fixture_dir(&[(
        ROI_FILE,
        "Segment,Investment,Projected_Gain,ROI,BreakEven_Revenue\nChampions,1000,2500\n",
    )]);
    assert!(matches!(
        loader::load(dir.path()),
        Err(DashboardError::DataSource { .. })
    ));
}

#[test]
fn test_bad_date_is_data_format_error() {
    let dir = fixture_dir(&[(
        FORECAST_FILE,
        "Date,Base_Forecast,Best_Case,Worst_Case,Upper_CI,Lower_CI\n31/01/2025,1,1,1,1,1\n32/01/2025,1,1,1,1,1\n",
    )]);
    match loader::load(dir.path()) {
        Err(DashboardError::DataFormat {
            column, value, row, ..
        }) => {
            assert_eq!(column, "Date");
            assert_eq!(value, "32/01/2025");
            assert_eq!(row, 3);
        }
        other => panic!("expected DataFormat, got {other:?}"),
    }
}

#[test]
fn test_two_digit_years_load_as_this_century() {
    let dir = fixture_dir(&[(
        FORECAST_FILE,
        "Date,Base_Forecast,Best_Case,Worst_Case,Upper_CI,Lower_CI\n31/01/25,1,1,1,1,1\n",
    )]);
    let data = loader::load(dir.path()).unwrap();
    assert_eq!(data.forecast.rows[0].date, date(2025, 1, 31));
}

#[test]
fn test_bad_number_is_data_format_error() {
    let dir = fixture_dir(&[(
        ROI_FILE,
        "Segment,Investment,Projected_Gain,ROI,BreakEven_Revenue\nChampions,lots,2500,2.5,1250\n",
    )]);
    match loader::load(dir.path()) {
        Err(DashboardError::DataFormat { column, value, .. }) => {
            assert_eq!(column, "Investment");
            assert_eq!(value, "lots");
        }
        other => panic!("expected DataFormat, got {other:?}"),
    }
}

#[test]
fn test_cache_serves_without_disk_until_cleared() {
    let dir = fixture_dir(&[]);
    let mut cache = DatasetCache::new(dir.path());
    assert!(!cache.is_warm());

    let first = cache.load().unwrap();
    assert!(cache.is_warm());

    // Files gone: a warm cache still answers, with the very same tables.
    for name in [FORECAST_FILE, ROI_FILE, SEGMENT_FILE] {
        fs::remove_file(dir.path().join(name)).unwrap();
    }
    let second = cache.load().unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));

    cache.clear();
    assert!(!cache.is_warm());
    assert!(matches!(cache.load(), Err(DashboardError::DataSource { .. })));
    assert!(!cache.is_warm());
}

#[test]
fn test_cache_concurrent_first_load() {
    let dir = fixture_dir(&[]);
    let cache = DatasetCache::new(dir.path());
    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| cache.load().unwrap())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(results.windows(2).all(|w| std::sync::Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn test_roi_detail_from_file() {
    let dir = fixture_dir(&[]);
    let data = loader::load(dir.path()).unwrap();
    let detail = builders::roi_detail(&data.roi, "Champions").unwrap();
    assert!((detail.profit_multiplier - 2.5).abs() < 1e-12);
    assert_eq!(detail.break_even_revenue, 1250.0);
}

#[test]
fn test_roi_bar_ties_keep_file_order() {
    let dir = fixture_dir(&[]);
    let data = loader::load(dir.path()).unwrap();
    let ChartSpec::Bar(bar) = builders::roi_bar(&data.roi) else {
        panic!("expected bar chart");
    };
    assert_eq!(bar.categories, vec!["Champions", "Loyal", "At Risk"]);
}

#[test]
fn test_views_render_expected_panels() {
    let dir = fixture_dir(&[]);
    let data = loader::load(dir.path()).unwrap();
    let selections = UserSelections::default();

    let summary = render(ViewKey::ExecutiveSummary, &data, &selections);
    let PanelContent::Kpis(kpis) = &summary.panels[0].content else {
        panic!("expected KPI tiles first");
    };
    let values: Vec<&str> = kpis.iter().map(|k| k.value.as_deref().unwrap()).collect();
    assert_eq!(values, vec!["195", "$6,750", "2.2x", "$3,500"]);

    let segmentation = render(ViewKey::CustomerSegmentation, &data, &selections);
    assert_eq!(segmentation.panels.len(), 3);
    let PanelContent::Table(grid) = &segmentation.panels[0].content else {
        panic!("expected segment table");
    };
    assert_eq!(grid.rows.len(), 4);
    assert_eq!(grid.rows[0][5], "950.00");

    let forecast = render(ViewKey::RevenueForecasting, &data, &selections);
    let PanelContent::Chart(ChartSpec::Line(line)) = &forecast.panels[0].content else {
        panic!("expected line chart");
    };
    assert_eq!(line.lines.len(), 1);
    assert_eq!(line.band.dates.len(), 3);
    assert_eq!(forecast.panels[0].heading, "2-Month Revenue Projection");

    // No segment picked: the first segment in table order is shown
    let roi = render(ViewKey::RoiAnalysis, &data, &selections);
    let PanelContent::Kpis(detail) = &roi.panels[1].content else {
        panic!("expected segment detail");
    };
    assert_eq!(detail[0].value.as_deref(), Ok("2.50x"));
    assert_eq!(detail[1].value.as_deref(), Ok("$1,250.00"));
    assert_eq!(detail[2].value.as_deref(), Ok("2.5x"));
}

#[test]
fn test_unknown_segment_only_breaks_its_panel() {
    let dir = fixture_dir(&[]);
    let data = loader::load(dir.path()).unwrap();
    let selections = UserSelections {
        scenarios: Vec::new(),
        segment: Some("Nobody".to_string()),
    };
    let view = render(ViewKey::RoiAnalysis, &data, &selections);
    assert!(!view.panels[0].is_error());
    assert!(view.panels[1].is_error());
}

#[test]
fn test_export_writes_all_views() {
    let dir = fixture_dir(&[]);
    let out = dir.path().join("views.json");
    let cache = DatasetCache::new(dir.path());
    export::export_views(&cache, &out).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let views = json.as_array().unwrap();
    assert_eq!(views.len(), 4);
    assert_eq!(views[0]["key"], "ExecutiveSummary");
    assert_eq!(views[2]["panels"][0]["content"]["data"]["type"], "line");
}

#[test]
fn test_export_fails_without_data() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DatasetCache::new(dir.path());
    assert!(export::export_views(&cache, Path::new("unused.json")).is_err());
}
