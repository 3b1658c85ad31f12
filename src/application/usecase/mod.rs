pub mod analytics_usecase;
pub mod forecast_usecase;

// Re-export public API
pub use analytics_usecase::{AnalyticsProcessor, AnalyticsUseCase};
pub use forecast_usecase::{ForecastBatchProcessor, ForecastUseCase};
