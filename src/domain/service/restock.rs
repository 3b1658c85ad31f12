// src/domain/service/restock.rs
// Restock priority list and batch totals over per-product forecasts

use crate::domain::models::{round_one_decimal, ForecastResult, ForecastTotals};

pub const DEFAULT_RESTOCK_LIMIT: usize = 5;

/// Sort forecasts by recommended stock, highest first. Ties keep their order.
pub fn sort_by_recommended(results: &mut [ForecastResult]) {
    results.sort_by(|a, b| b.recommended_stock_units.total_cmp(&a.recommended_stock_units));
}

/// The top priority restock list: highest recommended stock first, only
/// products whose recommendation exceeds what is on the shelf, at most five.
pub fn rank_restock_needs(results: &[ForecastResult]) -> Vec<ForecastResult> {
    rank_restock_needs_with_limit(results, DEFAULT_RESTOCK_LIMIT)
}

pub fn rank_restock_needs_with_limit(results: &[ForecastResult], limit: usize) -> Vec<ForecastResult> {
    let mut sorted = results.to_vec();
    sort_by_recommended(&mut sorted);

    sorted
        .into_iter()
        .filter(ForecastResult::needs_restock)
        .take(limit)
        .collect()
}

/// Sum the unrounded figures of every forecast, rounding once at the end.
pub fn aggregate_totals(results: &[ForecastResult]) -> ForecastTotals {
    let (predicted, recommended, current) = results.iter().fold((0.0, 0.0, 0.0), |acc, r| {
        (
            acc.0 + r.estimate.predicted_monthly_units,
            acc.1 + r.estimate.recommended_stock_units,
            acc.2 + r.current_stock,
        )
    });

    ForecastTotals {
        total_predicted: round_one_decimal(predicted),
        total_recommended: round_one_decimal(recommended),
        total_current_stock: round_one_decimal(current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Confidence, DemandEstimate, Trend};
    use chrono::NaiveDate;

    fn forecast(id: u64, recommended: f64, current_stock: f64) -> ForecastResult {
        ForecastResult {
            product_id: id,
            product_name: format!("product-{}", id),
            predicted_monthly_units: round_one_decimal(recommended / 1.1),
            recommended_stock_units: round_one_decimal(recommended),
            current_stock,
            confidence: Confidence::Medium,
            trend: Trend::Stable,
            avg_daily_units: 1.0,
            as_of: NaiveDate::from_ymd_opt(2026, 1, 31)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            estimate: DemandEstimate {
                predicted_monthly_units: recommended / 1.1,
                recommended_stock_units: recommended,
                buffer: 1.1,
                ..DemandEstimate::default()
            },
        }
    }

    #[test]
    fn ranking_keeps_at_most_five_understocked() {
        let results: Vec<ForecastResult> = (1..=9)
            .map(|id| forecast(id, id as f64 * 10.0, 25.0))
            .collect();

        let ranked = rank_restock_needs(&results);

        assert_eq!(ranked.len(), 5);
        let ids: Vec<u64> = ranked.iter().map(|r| r.product_id).collect();
        assert_eq!(ids, vec![9, 8, 7, 6, 5]);
        assert!(ranked.iter().all(|r| r.recommended_stock_units > r.current_stock));
    }

    #[test]
    fn ranking_skips_well_stocked_and_keeps_tie_order() {
        let results = vec![
            forecast(1, 50.0, 10.0),
            forecast(2, 80.0, 100.0),
            forecast(3, 50.0, 0.0),
            forecast(4, 50.0, 50.0),
        ];

        let ranked = rank_restock_needs(&results);

        let ids: Vec<u64> = ranked.iter().map(|r| r.product_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn ranking_respects_custom_limit() {
        let results: Vec<ForecastResult> = (1..=4).map(|id| forecast(id, 100.0, 0.0)).collect();

        assert_eq!(rank_restock_needs_with_limit(&results, 2).len(), 2);
        assert!(rank_restock_needs_with_limit(&results, 0).is_empty());
        assert!(rank_restock_needs(&[]).is_empty());
    }

    #[test]
    fn totals_sum_raw_values() {
        let mut a = forecast(1, 10.04, 3.0);
        let mut b = forecast(2, 10.04, 4.5);
        a.estimate.predicted_monthly_units = 0.04;
        b.estimate.predicted_monthly_units = 0.04;

        let totals = aggregate_totals(&[a, b]);

        // rounded display values would give 20.0 and 0.0
        assert_eq!(totals.total_recommended, 20.1);
        assert_eq!(totals.total_predicted, 0.1);
        assert_eq!(totals.total_current_stock, 7.5);
    }

    #[test]
    fn totals_of_nothing_are_zero() {
        assert_eq!(aggregate_totals(&[]), ForecastTotals::default());
    }
}
