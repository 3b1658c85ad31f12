// src/domain/service/forecaster.rs
// Heuristic demand forecaster shared by the batch run and the report tool

use chrono::NaiveDateTime;
use std::collections::HashMap;

use crate::domain::models::{
    round_one_decimal, Confidence, DailyAggregate, DemandEstimate, ForecastResult, Product,
    SaleRecord, Trend,
};

const TREND_WINDOW: usize = 7;
const DAYS_PER_MONTH: f64 = 30.0;

/// Outcome of comparing the latest week of sale-days with the week before
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendAnalysis {
    pub trend: Trend,
    pub factor: f64,
    pub moving_avg: f64,
}

/// Turns a product's recent sale ledger into a monthly demand figure and a
/// recommended stock level.
///
/// The forecaster is stateless: every call is a pure function of its inputs,
/// so products can be forecast on independent tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemandForecaster;

impl DemandForecaster {
    pub fn new() -> Self {
        Self
    }

    /// Forecast next month's demand for `product`.
    ///
    /// `sales_window` holds the product's sales of the lookback window in
    /// ascending timestamp order, `prior_year_same_month` the sales of the
    /// same calendar month one year before `now`.
    pub fn forecast(
        &self,
        product: &Product,
        sales_window: &[SaleRecord],
        prior_year_same_month: &[SaleRecord],
        now: NaiveDateTime,
    ) -> ForecastResult {
        if sales_window.is_empty() {
            log::warn!("No sales in window for {}, using empty forecast", product.name);
            return ForecastResult {
                product_id: product.id,
                product_name: product.name.clone(),
                predicted_monthly_units: 0.0,
                recommended_stock_units: 0.0,
                current_stock: product.current_stock,
                confidence: Confidence::Low,
                trend: Trend::NoData,
                avg_daily_units: 0.0,
                as_of: now,
                estimate: DemandEstimate::default(),
            };
        }

        let values: Vec<f64> = aggregate_daily(sales_window)
            .iter()
            .map(|day| day.total_quantity)
            .collect();

        let trend = classify_trend(&values);
        let avg_daily = trend.moving_avg.max(0.0);
        let seasonal = seasonal_factor(prior_year_same_month, avg_daily);

        let predicted_monthly = avg_daily * DAYS_PER_MONTH * trend.factor * seasonal;
        let buffer = variability_buffer(&values, avg_daily);
        let recommended = predicted_monthly * buffer;
        let confidence = confidence_for(values.len());

        log::debug!(
            "{}: {} sale days, trend {} ({}), seasonal {}, buffer {}",
            product.name,
            values.len(),
            trend.trend,
            trend.factor,
            seasonal,
            buffer
        );

        ForecastResult {
            product_id: product.id,
            product_name: product.name.clone(),
            predicted_monthly_units: round_one_decimal(predicted_monthly),
            recommended_stock_units: round_one_decimal(recommended),
            current_stock: product.current_stock,
            confidence,
            trend: trend.trend,
            avg_daily_units: round_one_decimal(avg_daily),
            as_of: now,
            estimate: DemandEstimate {
                predicted_monthly_units: predicted_monthly,
                recommended_stock_units: recommended,
                avg_daily_units: avg_daily,
                trend_factor: trend.factor,
                seasonal_factor: seasonal,
                buffer,
                sale_days: values.len(),
            },
        }
    }
}

/// Group sales by calendar date, one entry per day that had a sale.
///
/// Days keep the order in which they are first seen, which is ascending
/// for a ledger window.
pub fn aggregate_daily(sales: &[SaleRecord]) -> Vec<DailyAggregate> {
    let mut index: HashMap<chrono::NaiveDate, usize> = HashMap::new();
    let mut days: Vec<DailyAggregate> = Vec::new();

    for sale in sales {
        let date = sale.date();
        match index.get(&date) {
            Some(&i) => days[i].total_quantity += sale.quantity,
            None => {
                index.insert(date, days.len());
                days.push(DailyAggregate {
                    date,
                    total_quantity: sale.quantity,
                });
            }
        }
    }

    days
}

/// Classify the trend of a sequence of daily totals.
///
/// Entries are sale-days, not calendar days: days without sales are absent,
/// so averages are per selling day.
pub fn classify_trend(values: &[f64]) -> TrendAnalysis {
    if values.len() > TREND_WINDOW {
        let moving_avg = window_sum(&values[values.len() - TREND_WINDOW..]) / TREND_WINDOW as f64;
        let previous_avg = if values.len() > 2 * TREND_WINDOW {
            let end = values.len() - TREND_WINDOW;
            window_sum(&values[end - TREND_WINDOW..end]) / TREND_WINDOW as f64
        } else {
            moving_avg
        };

        let (trend, factor) = if moving_avg > previous_avg * 1.1 {
            (Trend::Increasing, 1.2)
        } else if moving_avg < previous_avg * 0.9 {
            (Trend::Decreasing, 0.8)
        } else {
            (Trend::Stable, 1.0)
        };

        TrendAnalysis {
            trend,
            factor,
            moving_avg,
        }
    } else {
        let moving_avg = if values.is_empty() {
            0.0
        } else {
            window_sum(values) / values.len() as f64
        };

        TrendAnalysis {
            trend: Trend::LimitedData,
            factor: 1.0,
            moving_avg,
        }
    }
}

/// Compare last year's same-month demand with the current daily average.
/// The prior-year total is spread over a fixed 30 days.
pub fn seasonal_factor(prior_year_same_month: &[SaleRecord], avg_daily: f64) -> f64 {
    if prior_year_same_month.is_empty() {
        return 1.0;
    }

    let last_year_avg = prior_year_same_month.iter().map(|s| s.quantity).sum::<f64>() / DAYS_PER_MONTH;

    if last_year_avg > avg_daily * 1.2 {
        1.3
    } else if last_year_avg > avg_daily {
        1.1
    } else {
        1.0
    }
}

/// Safety-stock multiplier from the coefficient of variation of daily totals.
///
/// A single sale-day has no real spread, so `avg_daily * 0.3` stands in for
/// the standard deviation.
pub fn variability_buffer(values: &[f64], avg_daily: f64) -> f64 {
    if values.is_empty() {
        return 1.2;
    }

    let std_dev = if values.len() > 1 {
        population_std_dev(values)
    } else {
        avg_daily * 0.3
    };

    let cv = if avg_daily > 0.0 { std_dev / avg_daily } else { 0.5 };

    if cv > 0.5 {
        1.4
    } else if cv > 0.3 {
        1.2
    } else {
        1.1
    }
}

/// Confidence from the number of distinct sale-days in the window
pub fn confidence_for(sale_days: usize) -> Confidence {
    if sale_days > 60 {
        Confidence::High
    } else if sale_days > 30 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

fn window_sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

fn population_std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = window_sum(values) / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
