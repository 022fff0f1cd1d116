use super::error::{DashboardError, Result};
use super::model::{RoiRow, RoiTable, SegmentTable};

// ---------------------------------------------------------------------------
// Scalar summaries for the KPI tiles
// ---------------------------------------------------------------------------

/// Sum of `Customer_Count`. Every count must be a finite, non-negative integer
/// and the total must fit in a `u64`.
pub fn total_customers(segments: &SegmentTable) -> Result<u64> {
    segments.rows.iter().try_fold(0u64, |acc, row| {
        let n = row.customer_count;
        // u64::MAX as f64 rounds up to 2^64, so `>=` excludes every saturating cast.
        if !n.is_finite() || n < 0.0 || n.fract() != 0.0 || n >= u64::MAX as f64 {
            return Err(DashboardError::Validation(format!(
                "cluster {} has customer count {n}, expected a non-negative integer",
                row.cluster
            )));
        }
        acc.checked_add(n as u64).ok_or_else(|| {
            DashboardError::Validation(format!(
                "total customer count overflows at cluster {}",
                row.cluster
            ))
        })
    })
}

pub fn total_projected_gain(roi: &RoiTable) -> f64 {
    roi.rows.iter().map(|r| r.projected_gain).sum()
}

pub fn total_investment(roi: &RoiTable) -> f64 {
    roi.rows.iter().map(|r| r.investment).sum()
}

/// Arithmetic mean of the ROI column.
pub fn average_roi(roi: &RoiTable) -> Result<f64> {
    if roi.is_empty() {
        return Err(DashboardError::EmptyInput { what: "average ROI" });
    }
    let sum: f64 = roi.rows.iter().map(|r| r.roi).sum();
    Ok(sum / roi.len() as f64)
}

/// `Projected_Gain / Investment` for one segment.
pub fn profit_multiplier(row: &RoiRow) -> Result<f64> {
    if row.investment == 0.0 {
        return Err(DashboardError::DivisionByZero {
            segment: row.segment.clone(),
        });
    }
    Ok(row.projected_gain / row.investment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SegmentRow;

    fn segment(cluster: &str, count: f64) -> SegmentRow {
        SegmentRow {
            cluster: cluster.to_string(),
            decision_action: "Retain".to_string(),
            customer_count: count,
            avg_recency: 10.0,
            avg_frequency: 4.0,
            avg_monetary: 250.0,
        }
    }

    fn roi_row(segment: &str, investment: f64, gain: f64, roi: f64) -> RoiRow {
        RoiRow {
            segment: segment.to_string(),
            investment,
            projected_gain: gain,
            roi,
            break_even_revenue: investment,
        }
    }

    #[test]
    fn test_total_customers_ignores_row_order() {
        let mut table = SegmentTable {
            rows: vec![segment("0", 120.0), segment("1", 30.0), segment("2", 7.0)],
        };
        assert_eq!(total_customers(&table).unwrap(), 157);
        table.rows.reverse();
        assert_eq!(total_customers(&table).unwrap(), 157);
        table.rows.swap(0, 1);
        assert_eq!(total_customers(&table).unwrap(), 157);
    }

    #[test]
    fn test_total_customers_empty_is_zero() {
        assert_eq!(total_customers(&SegmentTable::default()).unwrap(), 0);
    }

    #[test]
    fn test_total_customers_rejects_bad_counts() {
        for bad in [-1.0, 2.5, f64::NAN] {
            let table = SegmentTable {
                rows: vec![segment("0", 10.0), segment("1", bad)],
            };
            assert!(matches!(
                total_customers(&table),
                Err(DashboardError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_total_customers_rejects_counts_past_u64() {
        let huge = SegmentTable {
            rows: vec![segment("0", 1e30)],
        };
        assert!(matches!(
            total_customers(&huge),
            Err(DashboardError::Validation(_))
        ));

        // Each count fits on its own; the sum does not.
        let overflow = SegmentTable {
            rows: vec![segment("0", 1e19), segment("1", 1e19)],
        };
        match total_customers(&overflow) {
            Err(DashboardError::Validation(msg)) => assert!(msg.contains("overflows")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_roi_sums() {
        let table = RoiTable {
            rows: vec![
                roi_row("A", 1000.0, 2500.0, 2.5),
                roi_row("B", 500.0, 750.0, 1.5),
            ],
        };
        assert_eq!(total_investment(&table), 1500.0);
        assert_eq!(total_projected_gain(&table), 3250.0);
        assert!((average_roi(&table).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_average_roi_empty_fails() {
        assert!(matches!(
            average_roi(&RoiTable::default()),
            Err(DashboardError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_average_roi_single_row_is_exact() {
        let table = RoiTable {
            rows: vec![roi_row("Solo", 3.0, 1.0, 0.1 + 0.2)],
        };
        assert_eq!(average_roi(&table).unwrap(), 0.1 + 0.2);
    }

    #[test]
    fn test_profit_multiplier() {
        let row = roi_row("Champions", 1000.0, 2500.0, 2.5);
        assert!((profit_multiplier(&row).unwrap() - 2.5).abs() < 1e-12);

        let zero = roi_row("Dormant", 0.0, 100.0, 0.0);
        match profit_multiplier(&zero) {
            Err(DashboardError::DivisionByZero { segment }) => assert_eq!(segment, "Dormant"),
            other => panic!("expected DivisionByZero, got {other:?}"),
        }
    }
}
