use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal_macros::dec;
use std::sync::Arc;

use shop_forecast::application::service::ReportService;
use shop_forecast::application::usecase::{AnalyticsProcessor, AnalyticsUseCase};
use shop_forecast::config::Config;
use shop_forecast::domain::models::Product;
use shop_forecast::infrastructure::fixtures::{CatalogFixture, SyntheticShopBuilder};
use shop_forecast::infrastructure::ledger::InMemoryShop;

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 2, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn analytics_follow_recorded_sales() {
    let shop = Arc::new(InMemoryShop::new("Corner Store"));
    shop.add_product(Product::new(1, "Amul Butter", "Dairy", dec!(55), dec!(45)).with_stock(20.0))
        .unwrap();
    shop.add_product(Product::new(2, "Maggi", "Snacks", dec!(14), dec!(10)).with_stock(50.0))
        .unwrap();

    shop.record_sale(1, 2.0, at(10, 9)).unwrap();
    shop.record_sale(2, 5.0, at(10, 18)).unwrap();
    shop.record_sale(1, 1.0, at(12, 11)).unwrap();

    let config = Config::default();
    let processor = AnalyticsProcessor::new(shop.clone(), shop.clone(), &config.analytics);
    let summary = processor.summarize(at(12, 20)).await.unwrap();

    assert_eq!(summary.today_transactions, 1);
    assert_eq!(summary.today_revenue, dec!(55));
    assert_eq!(summary.month_revenue, dec!(235));
    // (55 - 45) * 3 + (14 - 10) * 5
    assert_eq!(summary.month_profit, dec!(50));
    assert_eq!(summary.total_transactions, 3);
    assert_eq!(summary.unique_days, 2);
    assert_eq!(summary.total_products, 2);
    // butter is down to 17, noodles to 45
    assert_eq!(summary.low_stock, 0);

    let best = summary.best_day.unwrap();
    assert_eq!(best.date, NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());
    assert_eq!(best.revenue, dec!(180));
}

#[tokio::test]
async fn demo_store_report_is_complete() {
    let end = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    let snapshot = SyntheticShopBuilder::new(CatalogFixture::demo_store(end), 7).build();
    let shop = Arc::new(InMemoryShop::from_snapshot(snapshot));

    let config = Config::default();
    let now = end.and_hms_opt(22, 0, 0).unwrap();
    let report = ReportService::new(shop, &config).build_report(now).await.unwrap();

    assert_eq!(report.forecast.predictions.len(), 30);
    assert_eq!(report.analytics.total_products, 30);
    assert!(report.forecast.need_restock.len() <= config.forecast.restock_limit);
    assert!(report
        .forecast
        .predictions
        .windows(2)
        .all(|w| w[0].recommended_stock_units >= w[1].recommended_stock_units));
    assert!(report
        .forecast
        .need_restock
        .iter()
        .all(|p| p.recommended_stock_units > p.current_stock));

    let rendered = report.forecast.to_string();
    assert!(rendered.contains("Next month predictions"));
}

#[test]
fn snapshot_survives_a_file_round_trip() {
    let shop = InMemoryShop::new("Corner Store");
    shop.add_product(Product::new(1, "Amul Butter", "Dairy", dec!(55), dec!(45)).with_unit("grams"))
        .unwrap();
    shop.stock_in(1, 24.0, dec!(45), at(1, 8)).unwrap();
    shop.record_sale(1, 3.0, at(2, 10)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shop.json");
    shop.save_snapshot(&path).unwrap();

    let restored = InMemoryShop::load_snapshot(&path).unwrap();
    assert_eq!(restored.snapshot().unwrap(), shop.snapshot().unwrap());
    assert_eq!(restored.shop_name(), "Corner Store");

    // ids continue after the restored ones
    let next = restored.record_sale(1, 1.0, at(3, 10)).unwrap();
    assert_eq!(next.id, 2);
}

#[test]
fn unreadable_snapshot_is_an_error() {
    assert!(InMemoryShop::load_snapshot("/nonexistent/shop.json").is_err());
}
