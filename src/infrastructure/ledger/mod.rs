// src/infrastructure/ledger/mod.rs
// In-memory shop store: product catalog, sale ledger and stock intake

use async_trait::async_trait;
use chrono::{Datelike, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::errors::{AppError, AppResult, LedgerError, LedgerResult};
use crate::domain::models::{Product, SaleRecord, StockIn};
use crate::domain::repository::{ProductCatalog, SalesLedger};

/// Serialized form of a whole shop
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopSnapshot {
    pub shop_name: String,
    pub products: Vec<Product>,
    #[serde(default)]
    pub sales: Vec<SaleRecord>,
    #[serde(default)]
    pub stock_ins: Vec<StockIn>,
}

#[derive(Debug, Default)]
struct ShopState {
    products: Vec<Product>,
    // kept sorted by timestamp
    sales: Vec<SaleRecord>,
    stock_ins: Vec<StockIn>,
    next_sale_id: u64,
    next_stock_id: u64,
}

pub struct InMemoryShop {
    shop_name: String,
    state: RwLock<ShopState>,
}

impl InMemoryShop {
    pub fn new(shop_name: &str) -> Self {
        Self {
            shop_name: shop_name.to_string(),
            state: RwLock::new(ShopState {
                next_sale_id: 1,
                next_stock_id: 1,
                ..ShopState::default()
            }),
        }
    }

    pub fn from_snapshot(snapshot: ShopSnapshot) -> Self {
        let mut sales = snapshot.sales;
        sales.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        let next_sale_id = sales.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let next_stock_id = snapshot.stock_ins.iter().map(|s| s.id).max().unwrap_or(0) + 1;

        Self {
            shop_name: snapshot.shop_name,
            state: RwLock::new(ShopState {
                products: snapshot.products,
                sales,
                stock_ins: snapshot.stock_ins,
                next_sale_id,
                next_stock_id,
            }),
        }
    }

    /// Load a shop from a JSON snapshot file
    pub fn load_snapshot<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            AppError::Config(format!(
                "Failed to read snapshot {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let snapshot: ShopSnapshot = serde_json::from_str(&contents)?;

        log::info!(
            "Loaded {} products and {} sales for {}",
            snapshot.products.len(),
            snapshot.sales.len(),
            snapshot.shop_name
        );
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        let contents = serde_json::to_string_pretty(&self.snapshot()?)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn snapshot(&self) -> LedgerResult<ShopSnapshot> {
        let state = self.read()?;
        Ok(ShopSnapshot {
            shop_name: self.shop_name.clone(),
            products: state.products.clone(),
            sales: state.sales.clone(),
            stock_ins: state.stock_ins.clone(),
        })
    }

    pub fn shop_name(&self) -> &str {
        &self.shop_name
    }

    pub fn add_product(&self, product: Product) -> LedgerResult<()> {
        let mut state = self.write()?;
        if state.products.iter().any(|p| p.id == product.id) {
            return Err(LedgerError::DuplicateProduct(product.id));
        }
        state.products.push(product);
        Ok(())
    }

    /// Record a point-of-sale transaction at the product's selling price
    /// and take the quantity off the shelf.
    pub fn record_sale(&self, product_id: u64, quantity: f64, at: NaiveDateTime) -> LedgerResult<SaleRecord> {
        if !(quantity > 0.0) {
            return Err(LedgerError::InvalidQuantity(quantity));
        }

        let mut state = self.write()?;
        let sale_id = state.next_sale_id;
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or(LedgerError::ProductNotFound(product_id))?;

        if product.current_stock < quantity {
            log::warn!(
                "Rejected sale of {} {}: only {} in stock",
                quantity,
                product.name,
                product.current_stock
            );
            return Err(LedgerError::InsufficientStock {
                product: product.name.clone(),
                available: product.current_stock,
                requested: quantity,
            });
        }

        product.current_stock -= quantity;
        let sale = SaleRecord::new(sale_id, product_id, quantity, product.selling_price, at);

        let position = state.sales.partition_point(|s| s.timestamp <= at);
        state.sales.insert(position, sale.clone());
        state.next_sale_id += 1;

        Ok(sale)
    }

    /// Receive stock for a product
    pub fn stock_in(&self, product_id: u64, quantity: f64, cost_price: Decimal, at: NaiveDateTime) -> LedgerResult<StockIn> {
        if !(quantity > 0.0) {
            return Err(LedgerError::InvalidQuantity(quantity));
        }

        let mut state = self.write()?;
        let entry_id = state.next_stock_id;
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or(LedgerError::ProductNotFound(product_id))?;

        product.current_stock += quantity;

        let entry = StockIn {
            id: entry_id,
            product_id,
            quantity,
            cost_price,
            timestamp: at,
        };
        state.stock_ins.push(entry.clone());
        state.next_stock_id += 1;

        Ok(entry)
    }

    /// Latest sales first
    pub fn recent_sales(&self, limit: usize) -> LedgerResult<Vec<SaleRecord>> {
        let state = self.read()?;
        Ok(state.sales.iter().rev().take(limit).cloned().collect())
    }

    /// Latest stock deliveries first
    pub fn recent_stock_in(&self, limit: usize) -> LedgerResult<Vec<StockIn>> {
        let state = self.read()?;
        let mut entries = state.stock_ins.clone();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(limit);
        Ok(entries)
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, ShopState>> {
        self.state
            .read()
            .map_err(|e| LedgerError::Unavailable(e.to_string()))
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, ShopState>> {
        self.state
            .write()
            .map_err(|e| LedgerError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl SalesLedger for InMemoryShop {
    async fn sales_in_window(&self, product_id: u64, since: NaiveDateTime) -> LedgerResult<Vec<SaleRecord>> {
        let state = self.read()?;
        Ok(state
            .sales
            .iter()
            .filter(|s| s.product_id == product_id && s.timestamp >= since)
            .cloned()
            .collect())
    }

    async fn sales_in_month_year(&self, product_id: u64, month: u32, year: i32) -> LedgerResult<Vec<SaleRecord>> {
        let state = self.read()?;
        Ok(state
            .sales
            .iter()
            .filter(|s| {
                s.product_id == product_id && s.timestamp.month() == month && s.timestamp.year() == year
            })
            .cloned()
            .collect())
    }

    async fn all_sales(&self) -> LedgerResult<Vec<SaleRecord>> {
        Ok(self.read()?.sales.clone())
    }
}

#[async_trait]
impl ProductCatalog for InMemoryShop {
    async fn products(&self) -> LedgerResult<Vec<Product>> {
        Ok(self.read()?.products.clone())
    }

    async fn product(&self, product_id: u64) -> LedgerResult<Product> {
        self.read()?
            .products
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
            .ok_or(LedgerError::ProductNotFound(product_id))
    }
}
