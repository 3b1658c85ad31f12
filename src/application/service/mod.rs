// src/application/service/mod.rs
// Application services

use chrono::NaiveDateTime;
use std::sync::Arc;

use crate::application::dto::ShopReport;
use crate::application::usecase::{AnalyticsProcessor, AnalyticsUseCase, ForecastBatchProcessor, ForecastUseCase};
use crate::config::Config;
use crate::domain::errors::AppResult;
use crate::infrastructure::ledger::InMemoryShop;

/// Runs the forecast batch and the dashboards against one shop
pub struct ReportService {
    shop: Arc<InMemoryShop>,
    forecast: ForecastBatchProcessor,
    analytics: AnalyticsProcessor,
}

impl ReportService {
    pub fn new(shop: Arc<InMemoryShop>, config: &Config) -> Self {
        let forecast = ForecastBatchProcessor::new(shop.clone(), shop.clone(), &config.forecast);
        let analytics = AnalyticsProcessor::new(shop.clone(), shop.clone(), &config.analytics);
        Self {
            shop,
            forecast,
            analytics,
        }
    }

    pub async fn build_report(&self, now: NaiveDateTime) -> AppResult<ShopReport> {
        let (forecast, analytics) = tokio::try_join!(
            self.forecast.run_forecast(now),
            self.analytics.summarize(now)
        )?;

        Ok(ShopReport {
            shop_name: self.shop.shop_name().to_string(),
            forecast,
            analytics,
        })
    }
}
