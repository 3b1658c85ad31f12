// src/main.rs
use shop_forecast::application::dto::ShopReport;
use shop_forecast::application::service::ReportService;
use shop_forecast::config::Config;
use shop_forecast::domain::errors::AppResult;
use shop_forecast::infrastructure::fixtures::{CatalogFixture, SyntheticShopBuilder};
use shop_forecast::infrastructure::ledger::InMemoryShop;

use chrono::Local;
use std::sync::Arc;

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    config.init_logging()?;

    log::info!("Starting shop_forecast v{}", env!("CARGO_PKG_VERSION"));

    let now = Local::now().naive_local();
    let shop = Arc::new(load_shop(&config, now)?);

    let service = ReportService::new(shop, &config);
    let report = service.build_report(now).await?;

    print_report(&report);

    log::info!("Report complete");
    Ok(())
}

/// Open the configured snapshot, or generate the demo store
fn load_shop(config: &Config, now: chrono::NaiveDateTime) -> AppResult<InMemoryShop> {
    match &config.data.snapshot_path {
        Some(path) => {
            log::info!("Loading shop snapshot from {}", path);
            InMemoryShop::load_snapshot(path)
        }
        None => {
            log::info!("No snapshot configured, generating demo store (seed {})", config.data.demo_seed);
            let fixture = CatalogFixture::demo_store(now.date());
            let snapshot = SyntheticShopBuilder::new(fixture, config.data.demo_seed).build();
            Ok(InMemoryShop::from_snapshot(snapshot))
        }
    }
}

fn print_report(report: &ShopReport) {
    let analytics = &report.analytics;

    println!("=== {} ===", report.shop_name);
    println!(
        "Today: {} from {} sales | This month: {} revenue, {} profit ({:.1}% margin)",
        analytics.today_revenue.round_dp(2),
        analytics.today_transactions,
        analytics.month_revenue.round_dp(2),
        analytics.month_profit.round_dp(2),
        analytics.profit_margin
    );
    println!(
        "Year to date: {} | Avg daily (30d): {} | Low stock products: {}/{}",
        analytics.ytd_revenue.round_dp(2),
        analytics.avg_daily_revenue.round_dp(2),
        analytics.low_stock,
        analytics.total_products
    );
    if let Some(best) = &analytics.best_day {
        println!("Best day: {} with {}", best.date, best.revenue.round_dp(2));
    }
    println!();
    print!("{}", report.forecast);
}
