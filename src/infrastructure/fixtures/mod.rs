// src/infrastructure/fixtures/mod.rs
// Synthetic sales history for demos and tests

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use crate::domain::models::{Product, SaleRecord, StockIn};
use crate::infrastructure::ledger::ShopSnapshot;

const BUSINESS_HOURS: [u32; 14] = [8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21];
const HOUR_WEIGHTS: [f64; 14] = [
    0.03, 0.04, 0.06, 0.08, 0.10, 0.08, 0.07, 0.07, 0.08, 0.09, 0.12, 0.10, 0.06, 0.02,
];

/// A catalog entry together with its typical daily demand
#[derive(Debug, Clone)]
pub struct FixtureProduct {
    pub product: Product,
    pub avg_daily: f64,
}

/// Everything the builder needs to fake a shop's history
#[derive(Debug, Clone)]
pub struct CatalogFixture {
    pub shop_name: String,
    pub products: Vec<FixtureProduct>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Demand multiplier by calendar month (1-12)
    pub month_factors: HashMap<u32, f64>,
    /// Demand multiplier by weekday, Monday first
    pub weekday_factors: [f64; 7],
    pub special_days: HashMap<NaiveDate, f64>,
    pub restock_dates: Vec<NaiveDateTime>,
}

impl CatalogFixture {
    /// A small general store with six months of history ending on `end`
    pub fn demo_store(end: NaiveDate) -> Self {
        let start = end - Duration::days(183);

        let catalog: [(&str, &str, &str, Decimal, Decimal, f64); 30] = [
            ("Lux Soap", "Personal Care", "piece", dec!(45), dec!(38), 12.0),
            ("Dove Soap", "Personal Care", "piece", dec!(65), dec!(52), 8.0),
            ("Lifebuoy Soap", "Personal Care", "piece", dec!(35), dec!(28), 15.0),
            ("Dove Shampoo", "Personal Care", "ml", dec!(180), dec!(140), 5.0),
            ("Clinic Plus", "Personal Care", "ml", dec!(120), dec!(95), 7.0),
            ("Colgate", "Personal Care", "grams", dec!(85), dec!(70), 10.0),
            ("Pepsodent", "Personal Care", "grams", dec!(75), dec!(60), 8.0),
            ("Amul Butter", "Dairy", "grams", dec!(55), dec!(45), 15.0),
            ("Amul Cheese", "Dairy", "grams", dec!(120), dec!(95), 8.0),
            ("Nestle Milk", "Dairy", "liter", dec!(70), dec!(58), 25.0),
            ("Amul Milk", "Dairy", "liter", dec!(68), dec!(55), 22.0),
            ("Curd", "Dairy", "kg", dec!(50), dec!(40), 12.0),
            ("Dairy Milk", "Snacks", "piece", dec!(50), dec!(40), 20.0),
            ("5 Star", "Snacks", "piece", dec!(40), dec!(32), 15.0),
            ("KitKat", "Snacks", "piece", dec!(60), dec!(48), 12.0),
            ("Lays Chips", "Snacks", "piece", dec!(20), dec!(15), 35.0),
            ("Kurkure", "Snacks", "piece", dec!(20), dec!(15), 30.0),
            ("Maggi", "Snacks", "piece", dec!(14), dec!(10), 28.0),
            ("Parle-G", "Snacks", "piece", dec!(10), dec!(7), 50.0),
            ("Tata Salt", "Grocery", "kg", dec!(25), dec!(18), 18.0),
            ("Aashirvaad Atta", "Grocery", "kg", dec!(55), dec!(45), 15.0),
            ("Fortune Oil", "Grocery", "liter", dec!(120), dec!(100), 10.0),
            ("Sugar", "Grocery", "kg", dec!(45), dec!(38), 12.0),
            ("Red Label Tea", "Grocery", "grams", dec!(240), dec!(190), 8.0),
            ("Surf Excel", "Household", "kg", dec!(280), dec!(230), 5.0),
            ("Vim Bar", "Household", "piece", dec!(15), dec!(10), 25.0),
            ("Harpic", "Household", "ml", dec!(120), dec!(90), 6.0),
            ("Coca Cola", "Beverages", "ml", dec!(40), dec!(30), 18.0),
            ("Pepsi", "Beverages", "ml", dec!(40), dec!(30), 18.0),
            ("Bisleri", "Beverages", "liter", dec!(20), dec!(12), 30.0),
        ];

        let products = catalog
            .iter()
            .enumerate()
            .map(|(i, &(name, category, unit, price, cost, avg_daily))| FixtureProduct {
                product: Product::new(i as u64 + 1, name, category, price, cost).with_unit(unit),
                avg_daily,
            })
            .collect();

        let month_factors = HashMap::from([
            (1, 1.2),
            (8, 1.0),
            (9, 1.1),
            (10, 1.15),
            (11, 1.4),
            (12, 1.35),
        ]);

        // festival dates by month and day, for every year the window touches
        let festivals = [
            ((10, 2), 1.3),
            ((10, 24), 2.0),
            ((11, 1), 1.4),
            ((11, 15), 1.3),
            ((12, 25), 2.0),
            ((12, 31), 1.8),
            ((1, 1), 1.5),
            ((1, 15), 1.3),
            ((1, 26), 1.2),
        ];
        let special_days = (start.year()..=end.year())
            .flat_map(|year| {
                festivals.iter().filter_map(move |&((m, d), factor)| {
                    NaiveDate::from_ymd_opt(year, m, d).map(|date| (date, factor))
                })
            })
            .filter(|(date, _)| *date >= start && *date <= end)
            .collect();

        // first of every month after the opening, plus a mid-month top-up in the last one
        let mut restock_dates: Vec<NaiveDateTime> = Vec::new();
        let mut cursor = first_of_next_month(start);
        while cursor <= end {
            restock_dates.extend(cursor.and_hms_opt(10, 0, 0));
            cursor = first_of_next_month(cursor);
        }
        if let Some(mid) = NaiveDate::from_ymd_opt(end.year(), end.month(), 15) {
            if mid > start && mid <= end {
                restock_dates.extend(mid.and_hms_opt(10, 0, 0));
            }
        }

        Self {
            shop_name: "Daily Sales Store".to_string(),
            products,
            start,
            end,
            month_factors,
            weekday_factors: [0.9, 0.95, 1.0, 1.0, 1.2, 1.5, 1.4],
            special_days,
            restock_dates,
        }
    }

    /// Combined demand multiplier for one day
    pub fn day_multiplier(&self, date: NaiveDate) -> f64 {
        let month = self.month_factors.get(&date.month()).copied().unwrap_or(1.0);
        let weekday = self.weekday_factors[date.weekday().num_days_from_monday() as usize];
        let special = self.special_days.get(&date).copied().unwrap_or(1.0);
        month * weekday * special
    }
}

/// Generates a reproducible shop history from a [`CatalogFixture`]
pub struct SyntheticShopBuilder {
    fixture: CatalogFixture,
    rng: StdRng,
}

impl SyntheticShopBuilder {
    pub fn new(fixture: CatalogFixture, seed: u64) -> Self {
        Self {
            fixture,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn build(mut self) -> ShopSnapshot {
        let stock_ins = self.generate_stock_in();
        let sales = self.generate_sales();

        let products = self
            .fixture
            .products
            .iter()
            .map(|entry| {
                let id = entry.product.id;
                let received: f64 = stock_ins.iter().filter(|s| s.product_id == id).map(|s| s.quantity).sum();
                let sold: f64 = sales.iter().filter(|s| s.product_id == id).map(|s| s.quantity).sum();
                entry.product.clone().with_stock(received - sold)
            })
            .collect();

        log::debug!(
            "Generated {} sales and {} deliveries for {}",
            sales.len(),
            stock_ins.len(),
            self.fixture.shop_name
        );

        ShopSnapshot {
            shop_name: self.fixture.shop_name,
            products,
            sales,
            stock_ins,
        }
    }

    fn generate_sales(&mut self) -> Vec<SaleRecord> {
        let mut sales = Vec::new();
        if self.fixture.products.is_empty() {
            return sales;
        }

        let hours = match WeightedIndex::new(HOUR_WEIGHTS) {
            Ok(hours) => hours,
            Err(_) => return sales,
        };

        let mut date = self.fixture.start;
        let mut next_id = 1;
        while date <= self.fixture.end {
            let multiplier = self.fixture.day_multiplier(date);
            let transactions = (self.rng.gen_range(25..=40) as f64 * multiplier) as usize;

            let mut day_sales = Vec::with_capacity(transactions);
            for _ in 0..transactions {
                let Some(entry) = self.fixture.products.choose(&mut self.rng) else {
                    break;
                };
                let hour = BUSINESS_HOURS[hours.sample(&mut self.rng)];
                let base = base_quantity(&mut self.rng, &entry.product.category, date);
                let quantity = ((base as f64 * multiplier.sqrt()) as u32).max(1);

                let Some(timestamp) =
                    date.and_hms_opt(hour, self.rng.gen_range(0..60), self.rng.gen_range(0..60))
                else {
                    continue;
                };

                day_sales.push(SaleRecord::new(
                    next_id,
                    entry.product.id,
                    quantity as f64,
                    entry.product.selling_price,
                    timestamp,
                ));
                next_id += 1;
            }

            day_sales.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
            sales.extend(day_sales);
            date += Duration::days(1);
        }

        sales
    }

    fn generate_stock_in(&mut self) -> Vec<StockIn> {
        let mut entries = Vec::new();
        let Some(opening) = self.fixture.start.and_hms_opt(9, 0, 0) else {
            return entries;
        };

        // two months of opening stock
        for entry in &self.fixture.products {
            entries.push(StockIn {
                id: entries.len() as u64 + 1,
                product_id: entry.product.id,
                quantity: entry.avg_daily * 60.0,
                cost_price: entry.product.cost_price,
                timestamp: opening,
            });
        }

        // about 70% of the catalog gets six weeks of stock on each restock day
        for &at in &self.fixture.restock_dates {
            for entry in &self.fixture.products {
                if self.rng.gen::<f64>() < 0.7 {
                    entries.push(StockIn {
                        id: entries.len() as u64 + 1,
                        product_id: entry.product.id,
                        quantity: entry.avg_daily * 45.0,
                        cost_price: entry.product.cost_price,
                        timestamp: at,
                    });
                }
            }
        }

        entries
    }
}

fn base_quantity<R: Rng>(rng: &mut R, category: &str, date: NaiveDate) -> u32 {
    let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);

    match category {
        "Dairy" => {
            let quantity = rng.gen_range(1..=3);
            if weekend {
                quantity + rng.gen_range(1..=2)
            } else {
                quantity
            }
        }
        "Grocery" if weekend => rng.gen_range(2..=5),
        "Grocery" => rng.gen_range(1..=2),
        "Snacks" if weekend => rng.gen_range(3..=8),
        "Snacks" => rng.gen_range(1..=4),
        "Beverages" if matches!(date.month(), 8 | 9) => rng.gen_range(1..=3) + rng.gen_range(1..=3),
        "Beverages" => rng.gen_range(1..=3),
        _ => rng.gen_range(1..=2),
    }
}

fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}
