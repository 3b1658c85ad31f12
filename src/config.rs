// src/config.rs
use crate::domain::errors::{AppError, AppResult};
use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Shop forecast configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Forecast batch configuration
    pub forecast: ForecastConfig,

    /// Dashboard configuration
    pub analytics: AnalyticsConfig,

    /// Where the shop data comes from
    pub data: DataConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Forecast batch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Days of sales history handed to the forecaster
    pub lookback_days: i64,

    /// Maximum length of the restock priority list
    pub restock_limit: usize,
}

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Products below this stock level count as low stock
    pub low_stock_threshold: f64,
}

/// Data source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON shop snapshot; the demo store is generated when unset
    pub snapshot_path: Option<String>,

    /// Seed for the generated demo store
    pub demo_seed: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "warn", "error")
    pub level: String,

    /// Log to file
    pub to_file: bool,

    /// Log file path
    pub file_path: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let config = Config {
            forecast: ForecastConfig {
                lookback_days: env_or("FORECAST_LOOKBACK_DAYS", 90),
                restock_limit: env_or("RESTOCK_LIMIT", 5),
            },
            analytics: AnalyticsConfig {
                low_stock_threshold: env_or("LOW_STOCK_THRESHOLD", 10.0),
            },
            data: DataConfig {
                snapshot_path: env::var("SHOP_SNAPSHOT_PATH").ok().filter(|p| !p.is_empty()),
                demo_seed: env_or("DEMO_SEED", 42),
            },
            logging: LoggingConfig {
                level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                to_file: env_or("LOG_TO_FILE", false),
                file_path: env::var("LOG_FILE_PATH").ok(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let mut file = File::open(path).map_err(|e| {
            AppError::Config(format!("Failed to open config file: {}", e))
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|e| {
            AppError::Config(format!("Failed to read config file: {}", e))
        })?;

        let config: Config = serde_json::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            AppError::Config(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, contents).map_err(|e| {
            AppError::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.forecast.lookback_days <= 0 {
            return Err(AppError::Config(format!(
                "Forecast lookback must be positive, got {} days",
                self.forecast.lookback_days
            )));
        }
        Ok(())
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self) -> AppResult<()> {
        let mut builder = env_logger::Builder::new();

        // Set log level
        let log_level = match self.logging.level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        };

        builder.filter_level(log_level);

        // Configure output
        if self.logging.to_file {
            if let Some(file_path) = &self.logging.file_path {
                let file = File::create(file_path).map_err(|e| {
                    AppError::Config(format!("Failed to create log file: {}", e))
                })?;

                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
        }

        builder.try_init().map_err(|e| {
            AppError::Config(format!("Failed to initialize logger: {}", e))
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            forecast: ForecastConfig {
                lookback_days: 90,
                restock_limit: 5,
            },
            analytics: AnalyticsConfig {
                low_stock_threshold: 10.0,
            },
            data: DataConfig {
                snapshot_path: None,
                demo_seed: 42,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                to_file: false,
                file_path: None,
            },
        }
    }
}

/// Parse an environment variable, falling back to `default` when unset or invalid
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_round_trip_keeps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.forecast.restock_limit = 3;
        config.data.snapshot_path = Some("shop.json".to_string());
        config.to_file(&path).unwrap();

        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn non_positive_lookback_is_rejected() {
        let mut config = Config::default();
        config.forecast.lookback_days = 0;

        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = Config::from_file("/nonexistent/shop_forecast.json");
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
