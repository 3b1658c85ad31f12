// src/application/usecase/analytics_usecase.rs
// Dashboard figures for a shop

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;

use crate::config::AnalyticsConfig;
use crate::domain::errors::AppResult;
use crate::domain::repository::{ProductCatalog, SalesLedger};
use crate::domain::service::{AnalyticsSummary, SalesAnalytics};

#[async_trait]
pub trait AnalyticsUseCase {
    async fn summarize(&self, now: NaiveDateTime) -> AppResult<AnalyticsSummary>;
}

pub struct AnalyticsProcessor {
    catalog: Arc<dyn ProductCatalog + Send + Sync>,
    ledger: Arc<dyn SalesLedger + Send + Sync>,
    low_stock_threshold: f64,
}

impl AnalyticsProcessor {
    pub fn new(
        catalog: Arc<dyn ProductCatalog + Send + Sync>,
        ledger: Arc<dyn SalesLedger + Send + Sync>,
        settings: &AnalyticsConfig,
    ) -> Self {
        Self {
            catalog,
            ledger,
            low_stock_threshold: settings.low_stock_threshold,
        }
    }
}

#[async_trait]
impl AnalyticsUseCase for AnalyticsProcessor {
    async fn summarize(&self, now: NaiveDateTime) -> AppResult<AnalyticsSummary> {
        let products = self.catalog.products().await?;
        let sales = self.ledger.all_sales().await?;
        log::debug!("Summarizing {} sales across {} products", sales.len(), products.len());

        let summary = SalesAnalytics::new(&products, &sales, now).summarize(self.low_stock_threshold);
        if summary.low_stock > 0 {
            log::warn!("{} products are below {} units", summary.low_stock, self.low_stock_threshold);
        }
        Ok(summary)
    }
}
