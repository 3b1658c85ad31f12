// src/application/dto/mod.rs
// Report objects handed to the presentation side

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

use crate::domain::models::{ForecastResult, ForecastTotals};
use crate::domain::service::AnalyticsSummary;

/// Result of one forecast batch over a shop's catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    pub generated_at: NaiveDateTime,
    /// Every product, highest recommended stock first
    pub predictions: Vec<ForecastResult>,
    pub need_restock: Vec<ForecastResult>,
    pub totals: ForecastTotals,
}

/// Forecast and dashboards together, as produced by the report tool
#[derive(Debug, Clone, Serialize)]
pub struct ShopReport {
    pub shop_name: String,
    pub forecast: ForecastReport,
    pub analytics: AnalyticsSummary,
}

impl fmt::Display for ForecastReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Next month predictions ({})", self.generated_at.format("%d %B %Y"))?;
        writeln!(
            f,
            "  Predicted: {:.1} units, recommended stock: {:.1}, on hand: {:.1}",
            self.totals.total_predicted, self.totals.total_recommended, self.totals.total_current_stock
        )?;

        if self.need_restock.is_empty() {
            writeln!(f, "  Nothing needs restocking")?;
        } else {
            writeln!(f, "  Restock first:")?;
            for (i, p) in self.need_restock.iter().enumerate() {
                writeln!(
                    f,
                    "   {}. {}: recommended {:.1}, in stock {:.1}, order {:.1}",
                    i + 1,
                    p.product_name,
                    p.recommended_stock_units,
                    p.current_stock,
                    p.shortfall()
                )?;
            }
        }

        writeln!(f, "  {:<20} {:>10} {:>12} {:>8} {:<12} {:>6}", "Product", "Predicted", "Recommended", "Stock", "Trend", "Conf.")?;
        for p in &self.predictions {
            writeln!(
                f,
                "  {:<20} {:>10.1} {:>12.1} {:>8.1} {:<12} {:>6}",
                p.product_name,
                p.predicted_monthly_units,
                p.recommended_stock_units,
                p.current_stock,
                p.trend.to_string(),
                p.confidence.to_string()
            )?;
        }
        Ok(())
    }
}
