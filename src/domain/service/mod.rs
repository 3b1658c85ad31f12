// src/domain/service/mod.rs
// Domain services

pub mod analytics;
pub mod forecaster;
pub mod restock;

pub use analytics::{AnalyticsSummary, SalesAnalytics};
pub use forecaster::{aggregate_daily, classify_trend, DemandForecaster, TrendAnalysis};
pub use restock::{aggregate_totals, rank_restock_needs, rank_restock_needs_with_limit, sort_by_recommended};
