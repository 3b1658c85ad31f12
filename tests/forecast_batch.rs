use approx::assert_relative_eq;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal_macros::dec;
use std::sync::Arc;

use shop_forecast::application::usecase::{ForecastBatchProcessor, ForecastUseCase};
use shop_forecast::config::{Config, ForecastConfig};
use shop_forecast::domain::errors::{AppError, LedgerError, LedgerResult};
use shop_forecast::domain::models::{Confidence, Product, SaleRecord, Trend};
use shop_forecast::domain::repository::SalesLedger;
use shop_forecast::infrastructure::ledger::{InMemoryShop, ShopSnapshot};

fn march(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, day)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Rice doubles in the second week, tea sold once, candles never
fn three_product_shop() -> Arc<InMemoryShop> {
    let mut sales = Vec::new();
    for day in 1..=15 {
        let quantity = if day <= 8 { 10.0 } else { 20.0 };
        sales.push(SaleRecord::new(day as u64, 1, quantity, dec!(60), march(day)));
    }
    sales.push(SaleRecord::new(100, 2, 5.0, dec!(250), march(14)));

    let snapshot = ShopSnapshot {
        shop_name: "Test Store".to_string(),
        products: vec![
            Product::new(1, "Basmati Rice", "Grocery", dec!(60), dec!(48)).with_stock(100.0),
            Product::new(2, "Tata Tea", "Beverages", dec!(250), dec!(200)).with_stock(200.0),
            Product::new(3, "Candles", "Household", dec!(20), dec!(15)),
        ],
        sales,
        stock_ins: Vec::new(),
    };
    Arc::new(InMemoryShop::from_snapshot(snapshot))
}

fn processor(shop: Arc<InMemoryShop>, settings: &ForecastConfig) -> ForecastBatchProcessor {
    ForecastBatchProcessor::new(shop.clone(), shop, settings)
}

#[tokio::test]
async fn batch_forecasts_sorts_and_ranks() {
    let shop = three_product_shop();
    let report = processor(shop, &Config::default().forecast)
        .run_forecast(now())
        .await
        .unwrap();

    let order: Vec<u64> = report.predictions.iter().map(|p| p.product_id).collect();
    assert_eq!(order, vec![1, 2, 3]);

    let rice = &report.predictions[0];
    assert_eq!(rice.trend, Trend::Increasing);
    assert_eq!(rice.confidence, Confidence::Low);
    assert_relative_eq!(rice.avg_daily_units, 20.0);
    assert_relative_eq!(rice.predicted_monthly_units, 720.0);
    assert_relative_eq!(rice.recommended_stock_units, 792.0);
    assert_eq!(rice.as_of, now());

    let tea = &report.predictions[1];
    assert_eq!(tea.trend, Trend::LimitedData);
    assert_relative_eq!(tea.predicted_monthly_units, 150.0);
    assert_relative_eq!(tea.recommended_stock_units, 165.0);

    let candles = &report.predictions[2];
    assert_eq!(candles.trend, Trend::NoData);
    assert_eq!(candles.confidence, Confidence::Low);
    assert_eq!(candles.recommended_stock_units, 0.0);

    assert_eq!(report.need_restock.len(), 1);
    assert_eq!(report.need_restock[0].product_id, 1);
    assert_relative_eq!(report.need_restock[0].shortfall(), 692.0);

    assert_relative_eq!(report.totals.total_predicted, 870.0);
    assert_relative_eq!(report.totals.total_recommended, 957.0);
    assert_relative_eq!(report.totals.total_current_stock, 300.0);
}

#[tokio::test]
async fn short_lookback_only_sees_recent_days() {
    let shop = three_product_shop();
    let settings = ForecastConfig {
        lookback_days: 3,
        restock_limit: 5,
    };

    let report = processor(shop, &settings).run_forecast(now()).await.unwrap();
    let rice = report.predictions.iter().find(|p| p.product_id == 1).unwrap();

    // 13th to 15th only, all at 20 units
    assert_eq!(rice.trend, Trend::LimitedData);
    assert_relative_eq!(rice.avg_daily_units, 20.0);
    assert_relative_eq!(rice.predicted_monthly_units, 600.0);
}

#[tokio::test]
async fn restock_limit_zero_leaves_list_empty() {
    let shop = three_product_shop();
    let settings = ForecastConfig {
        lookback_days: 90,
        restock_limit: 0,
    };

    let report = processor(shop, &settings).run_forecast(now()).await.unwrap();

    assert!(report.need_restock.is_empty());
    assert_eq!(report.predictions.len(), 3);
}

#[tokio::test]
async fn empty_catalog_gives_empty_report() {
    let shop = Arc::new(InMemoryShop::new("Empty"));
    let report = processor(shop, &Config::default().forecast)
        .run_forecast(now())
        .await
        .unwrap();

    assert!(report.predictions.is_empty());
    assert!(report.need_restock.is_empty());
    assert_eq!(report.totals.total_recommended, 0.0);
}

#[tokio::test]
async fn single_product_matches_batch_entry() {
    let shop = three_product_shop();
    let processor = processor(shop, &Config::default().forecast);

    let tea = processor.forecast_product(2, now()).await.unwrap();
    let report = processor.run_forecast(now()).await.unwrap();

    assert_eq!(tea.product_name, "Tata Tea");
    assert_relative_eq!(tea.recommended_stock_units, 165.0);
    assert_eq!(Some(&tea), report.predictions.iter().find(|p| p.product_id == 2));
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let shop = three_product_shop();

    let err = processor(shop, &Config::default().forecast)
        .forecast_product(99, now())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Ledger(LedgerError::ProductNotFound(99))));
}

struct ClosedLedger;

#[async_trait]
impl SalesLedger for ClosedLedger {
    async fn sales_in_window(&self, _product_id: u64, _since: NaiveDateTime) -> LedgerResult<Vec<SaleRecord>> {
        Err(LedgerError::Unavailable("ledger closed".to_string()))
    }

    async fn sales_in_month_year(&self, _product_id: u64, _month: u32, _year: i32) -> LedgerResult<Vec<SaleRecord>> {
        Ok(Vec::new())
    }

    async fn all_sales(&self) -> LedgerResult<Vec<SaleRecord>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn ledger_failure_fails_the_batch() {
    let shop = three_product_shop();
    let processor = ForecastBatchProcessor::new(shop, Arc::new(ClosedLedger), &Config::default().forecast);

    let err = processor.run_forecast(now()).await.unwrap_err();

    assert!(matches!(err, AppError::Ledger(LedgerError::Unavailable(_))));
}
