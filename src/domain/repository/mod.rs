// src/domain/repository/mod.rs
// Repository interfaces for domain entities

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::domain::errors::LedgerResult;
use crate::domain::models::{Product, SaleRecord};

/// Read-only view over the recorded sales of one shop
#[async_trait]
pub trait SalesLedger {
    /// Sales of a product with `timestamp >= since`, ordered by ascending timestamp
    async fn sales_in_window(&self, product_id: u64, since: NaiveDateTime) -> LedgerResult<Vec<SaleRecord>>;

    /// Sales of a product in one calendar month. No ordering guarantee.
    async fn sales_in_month_year(&self, product_id: u64, month: u32, year: i32) -> LedgerResult<Vec<SaleRecord>>;

    /// Every sale of the shop, ordered by ascending timestamp
    async fn all_sales(&self) -> LedgerResult<Vec<SaleRecord>>;
}

/// Product listing for one shop
#[async_trait]
pub trait ProductCatalog {
    async fn products(&self) -> LedgerResult<Vec<Product>>;
    async fn product(&self, product_id: u64) -> LedgerResult<Product>;
}
