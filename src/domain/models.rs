// src/domain/models.rs
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog Components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub current_stock: f64,
    #[serde(with = "rust_decimal::serde::float")]
    pub selling_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost_price: Decimal,
}

impl Product {
    pub fn new(id: u64, name: &str, category: &str, selling_price: Decimal, cost_price: Decimal) -> Self {
        Self {
            id,
            name: name.to_string(),
            category: category.to_string(),
            unit: String::new(),
            current_stock: 0.0,
            selling_price,
            cost_price,
        }
    }

    pub fn with_stock(mut self, current_stock: f64) -> Self {
        self.current_stock = current_stock;
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = unit.to_string();
        self
    }

    /// Profit made on one unit at the current prices
    pub fn unit_margin(&self) -> Decimal {
        self.selling_price - self.cost_price
    }
}

/// A single point-of-sale transaction. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: u64,
    pub product_id: u64,
    pub quantity: f64,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub timestamp: NaiveDateTime,
}

impl SaleRecord {
    pub fn new(id: u64, product_id: u64, quantity: f64, unit_price: Decimal, timestamp: NaiveDateTime) -> Self {
        Self {
            id,
            product_id,
            quantity,
            unit_price,
            timestamp,
        }
    }

    pub fn total_amount(&self) -> Decimal {
        quantity_to_decimal(self.quantity) * self.unit_price
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockIn {
    pub id: u64,
    pub product_id: u64,
    pub quantity: f64,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost_price: Decimal,
    pub timestamp: NaiveDateTime,
}

/// Total quantity sold on one calendar day that had at least one sale
#[derive(Debug, Clone, PartialEq)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub total_quantity: f64,
}

/// Forecast Components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Confidence::Low => write!(f, "Low"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
    NoData,
    LimitedData,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Trend::Increasing => write!(f, "Increasing"),
            Trend::Decreasing => write!(f, "Decreasing"),
            Trend::Stable => write!(f, "Stable"),
            Trend::NoData => write!(f, "No data"),
            Trend::LimitedData => write!(f, "Limited data"),
        }
    }
}

/// Unrounded figures behind a forecast, kept for totals and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DemandEstimate {
    pub predicted_monthly_units: f64,
    pub recommended_stock_units: f64,
    pub avg_daily_units: f64,
    pub trend_factor: f64,
    pub seasonal_factor: f64,
    pub buffer: f64,
    pub sale_days: usize,
}

/// Forecast for one product. Display quantities are rounded to one decimal place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub product_id: u64,
    pub product_name: String,
    pub predicted_monthly_units: f64,
    pub recommended_stock_units: f64,
    pub current_stock: f64,
    pub confidence: Confidence,
    pub trend: Trend,
    pub avg_daily_units: f64,
    pub as_of: NaiveDateTime,
    pub estimate: DemandEstimate,
}

impl ForecastResult {
    pub fn needs_restock(&self) -> bool {
        self.recommended_stock_units > self.current_stock
    }

    /// Units to order to reach the recommended level, never negative
    pub fn shortfall(&self) -> f64 {
        round_one_decimal((self.estimate.recommended_stock_units - self.current_stock).max(0.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastTotals {
    pub total_predicted: f64,
    pub total_recommended: f64,
    pub total_current_stock: f64,
}

/// Round half to even on the exact binary value, one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

pub(crate) fn quantity_to_decimal(quantity: f64) -> Decimal {
    Decimal::from_f64(quantity).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_like_display_formatting() {
        assert_eq!(round_one_decimal(720.0000000000001), 720.0);
        assert_eq!(round_one_decimal(165.00000000000003), 165.0);
        assert_eq!(round_one_decimal(0.25), 0.2);
        assert_eq!(round_one_decimal(0.35), 0.3);
        assert_eq!(round_one_decimal(12.36), 12.4);
        assert_eq!(round_one_decimal(0.0), 0.0);
    }

    #[test]
    fn sale_total_uses_unit_price() {
        let at = NaiveDate::from_ymd_opt(2025, 11, 3)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        let sale = SaleRecord::new(1, 7, 3.0, dec!(45), at);

        assert_eq!(sale.total_amount(), dec!(135));
        assert_eq!(sale.date(), NaiveDate::from_ymd_opt(2025, 11, 3).unwrap());
    }

    #[test]
    fn trend_labels() {
        assert_eq!(Trend::NoData.to_string(), "No data");
        assert_eq!(Trend::LimitedData.to_string(), "Limited data");
        assert_eq!(Confidence::Medium.to_string(), "Medium");
    }
}
