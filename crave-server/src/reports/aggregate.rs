//! Report sections
//!
//! Every function except [`order_status_counts`] expects delivered orders.
//! Sums use checked decimal arithmetic; any failure aborts the section.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::models::{
    CategorySales, DailySales, NO_CATEGORY, Order, OrderStatus, ProductSales, SalesSummary,
    StatusCount, UNCATEGORIZED,
};

use super::CatalogSnapshot;
use super::money::{MoneyError, MoneyResult, checked_add, line_total, to_decimal, to_f64};

/// Trailing window for the daily series
pub const SALES_WINDOW_DAYS: i64 = 30;

#[derive(Default)]
struct Bucket {
    sales: Decimal,
    count: u64,
}

impl Bucket {
    fn add(&mut self, amount: Decimal, count: u64) -> MoneyResult<()> {
        self.sales = checked_add(self.sales, amount)?;
        self.count += count;
        Ok(())
    }
}

/// Descending by sales, then ascending by key
fn ranked(buckets: HashMap<String, Bucket>) -> Vec<(String, Bucket)> {
    let mut ranked: Vec<_> = buckets.into_iter().collect();
    ranked.sort_by(|(a_key, a), (b_key, b)| b.sales.cmp(&a.sales).then_with(|| a_key.cmp(b_key)));
    ranked
}

pub fn summary(delivered: &[&Order], by_category: &[CategorySales]) -> MoneyResult<SalesSummary> {
    let total = delivered.iter().try_fold(Decimal::ZERO, |acc, o| {
        checked_add(acc, to_decimal(o.total_amount)?)
    })?;
    let count = delivered.len() as u64;
    let average = if count == 0 {
        Decimal::ZERO
    } else {
        total
            .checked_div(Decimal::from(count))
            .ok_or(MoneyError::Overflow)?
    };

    // by_category is ranked already
    let top_selling_category = by_category
        .iter()
        .find(|c| c.category != UNCATEGORIZED)
        .map(|c| c.category.clone())
        .unwrap_or_else(|| NO_CATEGORY.to_string());

    Ok(SalesSummary {
        total_sales: to_f64(total),
        total_orders: count,
        average_order_value: to_f64(average),
        top_selling_category,
    })
}

/// Daily totals for orders created in the last 30 days, oldest day first
pub fn sales_by_date(
    delivered: &[&Order],
    now: DateTime<Utc>,
    tz: Tz,
) -> MoneyResult<Vec<DailySales>> {
    let since = now - Duration::days(SALES_WINDOW_DAYS);
    let mut days: BTreeMap<String, Bucket> = BTreeMap::new();

    for order in delivered.iter().filter(|o| o.created_at >= since) {
        let day = order
            .created_at
            .with_timezone(&tz)
            .date_naive()
            .format("%Y-%m-%d")
            .to_string();
        days.entry(day)
            .or_default()
            .add(to_decimal(order.total_amount)?, 1)?;
    }

    Ok(days
        .into_iter()
        .map(|(date, b)| DailySales {
            date,
            sales: to_f64(b.sales),
            orders: b.count,
        })
        .collect())
}

/// Line-item sales per category; `orders` counts contributing items
pub fn sales_by_category(
    delivered: &[&Order],
    catalog: &CatalogSnapshot,
) -> MoneyResult<Vec<CategorySales>> {
    let mut buckets: HashMap<String, Bucket> = HashMap::new();

    for item in delivered.iter().flat_map(|o| &o.order_items) {
        let name = catalog.category_name(item).unwrap_or(UNCATEGORIZED);
        buckets
            .entry(name.to_string())
            .or_default()
            .add(line_total(item.quantity, item.price)?, 1)?;
    }

    Ok(ranked(buckets)
        .into_iter()
        .map(|(category, b)| CategorySales {
            category,
            sales: to_f64(b.sales),
            orders: b.count,
        })
        .collect())
}

/// Line-item sales and quantity per product name
pub fn sales_by_product(
    delivered: &[&Order],
    catalog: &CatalogSnapshot,
) -> MoneyResult<Vec<ProductSales>> {
    let mut buckets: HashMap<String, Bucket> = HashMap::new();

    for item in delivered.iter().flat_map(|o| &o.order_items) {
        buckets
            .entry(catalog.product_name(item).to_string())
            .or_default()
            .add(line_total(item.quantity, item.price)?, u64::from(item.quantity))?;
    }

    Ok(ranked(buckets)
        .into_iter()
        .map(|(name, b)| ProductSales {
            name,
            sales: to_f64(b.sales),
            quantity: b.count,
        })
        .collect())
}

/// Count and total per status over all orders, in lifecycle order
pub fn order_status_counts(orders: &[Order]) -> MoneyResult<Vec<StatusCount>> {
    let mut buckets: BTreeMap<OrderStatus, Bucket> = BTreeMap::new();
    for order in orders {
        buckets
            .entry(order.status)
            .or_default()
            .add(to_decimal(order.total_amount)?, 1)?;
    }

    Ok(buckets
        .into_iter()
        .map(|(status, b)| StatusCount {
            status,
            count: b.count,
            total_sales: to_f64(b.sales),
        })
        .collect())
}
