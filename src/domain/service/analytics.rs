// src/domain/service/analytics.rs
// Sales dashboards: revenue, profit, weekday, product and category summaries

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use rust_decimal::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::domain::models::{quantity_to_decimal, round_one_decimal, Product, SaleRecord};

const CHART_DAYS: i64 = 30;
const CHART_MONTHS: u32 = 6;
const DETAIL_DAYS: i64 = 7;
const TOP_PRODUCTS: usize = 5;
const RECENT_SALES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub label: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub revenue: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayStats {
    pub weekday: Weekday,
    pub avg_sale: Decimal,
    pub transactions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSales {
    pub product_id: u64,
    pub name: String,
    pub quantity: f64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayDetail {
    pub date: NaiveDate,
    pub label: String,
    pub day_name: String,
    pub transactions: usize,
    pub items: f64,
    pub revenue: Decimal,
    pub profit: Decimal,
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySales {
    pub category: String,
    pub units: f64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentSale {
    pub product_name: String,
    pub quantity: f64,
    pub total: Decimal,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestDay {
    pub date: NaiveDate,
    pub revenue: Decimal,
}

/// Everything the dashboards show for one shop at one point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub generated_at: NaiveDateTime,
    pub today_revenue: Decimal,
    pub today_transactions: usize,
    pub month_revenue: Decimal,
    pub month_profit: Decimal,
    pub profit_margin: f64,
    pub ytd_revenue: Decimal,
    pub avg_daily_revenue: Decimal,
    pub best_day: Option<BestDay>,
    pub daily: Vec<DailyRevenue>,
    pub months: Vec<MonthSummary>,
    pub weekdays: Vec<WeekdayStats>,
    pub max_avg_sales: Decimal,
    pub top_products: Vec<ProductSales>,
    pub last_days: Vec<DayDetail>,
    pub categories: Vec<CategorySales>,
    pub max_category_revenue: Decimal,
    pub unique_days: usize,
    pub total_transactions: usize,
    pub avg_transaction: Decimal,
    pub total_products: usize,
    pub low_stock: usize,
    pub recent_sales: Vec<RecentSale>,
}

/// Aggregates a shop's sale ledger into dashboard figures.
///
/// Profit is always computed from the products' current selling and cost
/// prices, not the price recorded on the sale.
pub struct SalesAnalytics<'a> {
    products: &'a [Product],
    by_id: HashMap<u64, &'a Product>,
    sales: &'a [SaleRecord],
    now: NaiveDateTime,
}

impl<'a> SalesAnalytics<'a> {
    pub fn new(products: &'a [Product], sales: &'a [SaleRecord], now: NaiveDateTime) -> Self {
        let by_id = products.iter().map(|p| (p.id, p)).collect();
        Self {
            products,
            by_id,
            sales,
            now,
        }
    }

    pub fn summarize(&self, low_stock_threshold: f64) -> AnalyticsSummary {
        let today = self.now.date();
        let today_sales: Vec<&SaleRecord> = self.sales.iter().filter(|s| s.date() == today).collect();
        let month_sales = self.month_sales(self.now.year(), self.now.month());

        let month_revenue = revenue(&month_sales);
        let month_profit = self.profit(&month_sales);
        let total_transactions = self.sales.len();

        let weekdays = self.weekday_breakdown();
        let max_avg_sales = weekdays
            .iter()
            .map(|w| w.avg_sale)
            .fold(Decimal::ONE, Decimal::max);

        let categories = self.category_breakdown();
        let max_category_revenue = categories
            .iter()
            .map(|c| c.revenue)
            .fold(Decimal::ONE, Decimal::max);

        AnalyticsSummary {
            generated_at: self.now,
            today_revenue: revenue(&today_sales),
            today_transactions: today_sales.len(),
            month_revenue,
            month_profit,
            profit_margin: margin_percent(month_profit, month_revenue),
            ytd_revenue: self.ytd_revenue(),
            avg_daily_revenue: self.avg_daily_revenue(),
            best_day: self.best_day(),
            daily: self.daily_revenue(),
            months: self.monthly_summaries(),
            weekdays,
            max_avg_sales,
            top_products: self.top_products(),
            last_days: self.recent_days(),
            categories,
            max_category_revenue,
            unique_days: self.unique_days(),
            total_transactions,
            // this month's revenue over the all-time transaction count
            avg_transaction: if total_transactions > 0 {
                month_revenue / Decimal::from(total_transactions)
            } else {
                Decimal::ZERO
            },
            total_products: self.products.len(),
            low_stock: self
                .products
                .iter()
                .filter(|p| p.current_stock < low_stock_threshold)
                .count(),
            recent_sales: self.recent_sales(),
        }
    }

    /// Revenue of the last 30 days spread over a fixed 30 days
    pub fn avg_daily_revenue(&self) -> Decimal {
        let since = self.now - Duration::days(CHART_DAYS);
        let window: Vec<&SaleRecord> = self.sales.iter().filter(|s| s.timestamp >= since).collect();
        revenue(&window) / Decimal::from(CHART_DAYS)
    }

    /// Highest-revenue day ever; the earliest one wins a tie
    pub fn best_day(&self) -> Option<BestDay> {
        let mut totals: Vec<(NaiveDate, Decimal)> = Vec::new();
        let mut index: HashMap<NaiveDate, usize> = HashMap::new();
        for sale in self.sales {
            let date = sale.date();
            match index.get(&date) {
                Some(&i) => totals[i].1 += sale.total_amount(),
                None => {
                    index.insert(date, totals.len());
                    totals.push((date, sale.total_amount()));
                }
            }
        }
        totals.sort_by_key(|(date, _)| *date);

        let mut best: Option<BestDay> = None;
        for (date, total) in totals {
            if best.as_ref().map_or(true, |b| total > b.revenue) {
                best = Some(BestDay { date, revenue: total });
            }
        }
        best
    }

    /// Zero-filled revenue for each of the last 30 calendar days, oldest first
    pub fn daily_revenue(&self) -> Vec<DailyRevenue> {
        (0..CHART_DAYS)
            .rev()
            .map(|i| {
                let date = (self.now - Duration::days(i)).date();
                let day: Vec<&SaleRecord> = self.sales.iter().filter(|s| s.date() == date).collect();
                DailyRevenue {
                    date,
                    label: date.format("%d %b").to_string(),
                    revenue: revenue(&day),
                }
            })
            .collect()
    }

    /// Revenue and profit of the current month and the five before it
    pub fn monthly_summaries(&self) -> Vec<MonthSummary> {
        (0..CHART_MONTHS)
            .rev()
            .map(|back| {
                let (year, month) = months_back(self.now.year(), self.now.month(), back);
                let sales = self.month_sales(year, month);
                MonthSummary {
                    year,
                    month,
                    label: month_abbr(year, month),
                    revenue: revenue(&sales),
                    profit: self.profit(&sales),
                }
            })
            .collect()
    }

    /// Average sale amount and transaction count per weekday, Monday first
    pub fn weekday_breakdown(&self) -> Vec<WeekdayStats> {
        let mut totals: [(Decimal, usize); 7] = [(Decimal::ZERO, 0); 7];
        for sale in self.sales {
            let slot = &mut totals[sale.timestamp.weekday().num_days_from_monday() as usize];
            slot.0 += sale.total_amount();
            slot.1 += 1;
        }

        totals
            .iter()
            .enumerate()
            .map(|(i, &(sum, transactions))| WeekdayStats {
                weekday: weekday_from_monday(i),
                avg_sale: if transactions > 0 {
                    sum / Decimal::from(transactions)
                } else {
                    Decimal::ZERO
                },
                transactions,
            })
            .collect()
    }

    /// Best sellers by revenue, at most five
    pub fn top_products(&self) -> Vec<ProductSales> {
        let mut ranked: Vec<ProductSales> = self
            .products
            .iter()
            .filter_map(|product| {
                let sales: Vec<&SaleRecord> = self.sales.iter().filter(|s| s.product_id == product.id).collect();
                if sales.is_empty() {
                    return None;
                }
                Some(ProductSales {
                    product_id: product.id,
                    name: product.name.clone(),
                    quantity: sales.iter().map(|s| s.quantity).sum(),
                    revenue: revenue(&sales),
                })
            })
            .collect();

        ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        ranked.truncate(TOP_PRODUCTS);
        ranked
    }

    /// Per-day details for the last seven calendar days, oldest first
    pub fn recent_days(&self) -> Vec<DayDetail> {
        (0..DETAIL_DAYS)
            .rev()
            .map(|i| {
                let at = self.now - Duration::days(i);
                let date = at.date();
                let day: Vec<&SaleRecord> = self.sales.iter().filter(|s| s.date() == date).collect();
                let day_revenue = revenue(&day);
                let profit = self.profit(&day);

                DayDetail {
                    date,
                    label: date.format("%d %b").to_string(),
                    day_name: date.format("%A").to_string(),
                    transactions: day.len(),
                    items: day.iter().map(|s| s.quantity).sum(),
                    revenue: day_revenue,
                    profit,
                    margin: margin_percent(profit, day_revenue),
                }
            })
            .collect()
    }

    /// Units and revenue per category for the current month
    pub fn category_breakdown(&self) -> Vec<CategorySales> {
        let mut categories: Vec<CategorySales> = Vec::new();
        for sale in self.month_sales(self.now.year(), self.now.month()) {
            let Some(product) = self.by_id.get(&sale.product_id) else {
                continue;
            };
            if product.category.is_empty() {
                continue;
            }

            match categories.iter_mut().find(|c| c.category == product.category) {
                Some(entry) => {
                    entry.units += sale.quantity;
                    entry.revenue += sale.total_amount();
                }
                None => categories.push(CategorySales {
                    category: product.category.clone(),
                    units: sale.quantity,
                    revenue: sale.total_amount(),
                }),
            }
        }
        categories
    }

    pub fn ytd_revenue(&self) -> Decimal {
        let year = self.now.year();
        self.sales
            .iter()
            .filter(|s| s.timestamp.year() == year)
            .map(SaleRecord::total_amount)
            .sum()
    }

    pub fn unique_days(&self) -> usize {
        self.sales.iter().map(SaleRecord::date).collect::<HashSet<_>>().len()
    }

    /// Most recent sales first
    pub fn recent_sales(&self) -> Vec<RecentSale> {
        let mut latest: Vec<&SaleRecord> = self.sales.iter().collect();
        latest.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        latest
            .into_iter()
            .take(RECENT_SALES)
            .map(|sale| RecentSale {
                product_name: self
                    .by_id
                    .get(&sale.product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                quantity: sale.quantity,
                total: sale.total_amount(),
                time: sale.timestamp.format("%H:%M").to_string(),
            })
            .collect()
    }

    fn month_sales(&self, year: i32, month: u32) -> Vec<&'a SaleRecord> {
        self.sales
            .iter()
            .filter(|s| s.timestamp.year() == year && s.timestamp.month() == month)
            .collect()
    }

    fn profit(&self, sales: &[&SaleRecord]) -> Decimal {
        sales
            .iter()
            .filter_map(|sale| {
                self.by_id
                    .get(&sale.product_id)
                    .map(|p| quantity_to_decimal(sale.quantity) * p.unit_margin())
            })
            .sum()
    }
}

fn revenue(sales: &[&SaleRecord]) -> Decimal {
    sales.iter().map(|s| s.total_amount()).sum()
}

/// Profit as a percentage of revenue, one decimal place, 0 without revenue
fn margin_percent(profit: Decimal, revenue: Decimal) -> f64 {
    if revenue > Decimal::ZERO {
        let percent = (profit / revenue * Decimal::ONE_HUNDRED).to_f64().unwrap_or_default();
        round_one_decimal(percent)
    } else {
        0.0
    }
}

fn months_back(year: i32, month: u32, back: u32) -> (i32, u32) {
    let offset = month as i32 - back as i32;
    if offset <= 0 {
        (year - 1, (offset + 12) as u32)
    } else {
        (year, offset as u32)
    }
}

fn month_abbr(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b").to_string())
        .unwrap_or_default()
}

fn weekday_from_monday(i: usize) -> Weekday {
    match i {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}
