// src/domain/mod.rs
pub mod errors;
pub mod models;
pub mod repository;
pub mod service;

// Re-export common types for convenience
pub use errors::{AppError, AppResult, LedgerError, LedgerResult};
pub use models::{
    Confidence, DailyAggregate, DemandEstimate, ForecastResult, ForecastTotals, Product,
    SaleRecord, StockIn, Trend,
};
