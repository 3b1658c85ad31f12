// src/application/usecase/forecast_usecase.rs
// Forecast batch over a shop's catalog

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDateTime};
use futures_util::future::join_all;
use std::sync::Arc;

use crate::application::dto::ForecastReport;
use crate::config::ForecastConfig;
use crate::domain::errors::AppResult;
use crate::domain::models::{ForecastResult, Product};
use crate::domain::repository::{ProductCatalog, SalesLedger};
use crate::domain::service::{aggregate_totals, rank_restock_needs_with_limit, sort_by_recommended, DemandForecaster};

/// Forecast batch use case
#[async_trait]
pub trait ForecastUseCase {
    async fn run_forecast(&self, now: NaiveDateTime) -> AppResult<ForecastReport>;

    /// Forecast a single catalog product
    async fn forecast_product(&self, product_id: u64, now: NaiveDateTime) -> AppResult<ForecastResult>;
}

pub struct ForecastBatchProcessor {
    catalog: Arc<dyn ProductCatalog + Send + Sync>,
    ledger: Arc<dyn SalesLedger + Send + Sync>,
    forecaster: DemandForecaster,
    lookback_days: i64,
    restock_limit: usize,
}

impl ForecastBatchProcessor {
    pub fn new(
        catalog: Arc<dyn ProductCatalog + Send + Sync>,
        ledger: Arc<dyn SalesLedger + Send + Sync>,
        settings: &ForecastConfig,
    ) -> Self {
        Self {
            catalog,
            ledger,
            forecaster: DemandForecaster::new(),
            lookback_days: settings.lookback_days,
            restock_limit: settings.restock_limit,
        }
    }

    /// Forecast every product on its own task, keeping catalog order
    pub async fn forecast_all(&self, products: Vec<Product>, now: NaiveDateTime) -> AppResult<Vec<ForecastResult>> {
        let since = now - Duration::days(self.lookback_days);

        let handles = products.into_iter().map(|product| {
            let ledger = Arc::clone(&self.ledger);
            let forecaster = self.forecaster;
            tokio::spawn(async move { forecast_from_ledger(ledger.as_ref(), forecaster, &product, since, now).await })
        });

        let mut results = Vec::new();
        for joined in join_all(handles).await {
            results.push(joined??);
        }
        Ok(results)
    }
}

async fn forecast_from_ledger(
    ledger: &(dyn SalesLedger + Send + Sync),
    forecaster: DemandForecaster,
    product: &Product,
    since: NaiveDateTime,
    now: NaiveDateTime,
) -> AppResult<ForecastResult> {
    let window = ledger.sales_in_window(product.id, since).await?;
    let last_year = ledger
        .sales_in_month_year(product.id, now.month(), now.year() - 1)
        .await?;

    Ok(forecaster.forecast(product, &window, &last_year, now))
}

#[async_trait]
impl ForecastUseCase for ForecastBatchProcessor {
    async fn run_forecast(&self, now: NaiveDateTime) -> AppResult<ForecastReport> {
        let products = self.catalog.products().await?;
        log::info!("Forecasting {} products over the last {} days", products.len(), self.lookback_days);

        let mut predictions = self.forecast_all(products, now).await?;

        let totals = aggregate_totals(&predictions);
        sort_by_recommended(&mut predictions);
        let need_restock = rank_restock_needs_with_limit(&predictions, self.restock_limit);

        for item in &need_restock {
            log::warn!(
                "{} needs restocking: recommended {:.1}, in stock {:.1}",
                item.product_name,
                item.recommended_stock_units,
                item.current_stock
            );
        }
        log::info!("Forecast complete, {} products need restocking", need_restock.len());

        Ok(ForecastReport {
            generated_at: now,
            predictions,
            need_restock,
            totals,
        })
    }

    async fn forecast_product(&self, product_id: u64, now: NaiveDateTime) -> AppResult<ForecastResult> {
        let product = self.catalog.product(product_id).await?;
        let since = now - Duration::days(self.lookback_days);

        forecast_from_ledger(self.ledger.as_ref(), self.forecaster, &product, since, now).await
    }
}
