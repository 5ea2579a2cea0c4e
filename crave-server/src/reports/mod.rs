//! Sales reporting
//!
//! Reports are computed on demand from the stored orders and a snapshot of
//! the catalog. Nothing is cached.

pub mod aggregate;
pub mod money;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use shared::models::{Category, Order, OrderItem, OrderStatus, Product, SalesReport};

pub use aggregate::{
    order_status_counts, sales_by_category, sales_by_date, sales_by_product, summary,
};
pub use money::{MoneyError, MoneyResult};

/// Id-indexed catalog used to resolve line items
///
/// Holds every category, including soft-deleted ones, so old orders keep
/// their category in reports.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    products: HashMap<String, Product>,
    categories: HashMap<String, Category>,
}

impl CatalogSnapshot {
    pub fn new(
        products: impl IntoIterator<Item = Product>,
        categories: impl IntoIterator<Item = Category>,
    ) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
            categories: categories.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.get(id)
    }

    /// Catalog product behind a line item, if it still exists
    pub fn product_for(&self, item: &OrderItem) -> Option<&Product> {
        item.product.catalog_id().and_then(|id| self.product(id))
    }

    /// Category name of a line item; `None` for ad-hoc or dangling items
    pub fn category_name(&self, item: &OrderItem) -> Option<&str> {
        self.product_for(item)
            .and_then(|p| self.category(&p.category_id))
            .map(|c| c.name.as_str())
    }

    /// Product name used for grouping: catalog name when resolvable,
    /// otherwise the name stored on the item
    pub fn product_name<'a>(&'a self, item: &'a OrderItem) -> &'a str {
        self.product_for(item)
            .map(|p| p.name.as_str())
            .unwrap_or(item.name.as_str())
    }
}

/// Build the full report
///
/// `orders` may contain every status; filtering happens per section. An
/// amount that cannot be summed fails the whole report.
pub fn build_report(
    orders: &[Order],
    catalog: &CatalogSnapshot,
    now: DateTime<Utc>,
    tz: Tz,
) -> MoneyResult<SalesReport> {
    let delivered: Vec<&Order> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Delivered)
        .collect();

    let by_category = sales_by_category(&delivered, catalog)?;
    Ok(SalesReport {
        summary: summary(&delivered, &by_category)?,
        sales_by_date: sales_by_date(&delivered, now, tz)?,
        sales_by_product: sales_by_product(&delivered, catalog)?,
        sales_by_category: by_category,
        order_status_counts: order_status_counts(orders)?,
    })
}
