//! Sales Report Model
//!
//! Figures are computed from delivered orders only, except
//! [`StatusCount`] which covers every order.

use serde::{Deserialize, Serialize};

use super::order::OrderStatus;

/// Category name used when the top category cannot be determined
pub const NO_CATEGORY: &str = "N/A";
/// Bucket for items whose product or category cannot be resolved
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Headline figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_sales: f64,
    pub total_orders: u64,
    pub average_order_value: f64,
    pub top_selling_category: String,
}

/// One calendar day of sales (`date` is YYYY-MM-DD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySales {
    pub date: String,
    pub sales: f64,
    pub orders: u64,
}

/// Sales attributed to a category; `orders` counts line items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySales {
    pub category: String,
    pub sales: f64,
    pub orders: u64,
}

/// Sales attributed to a product name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSales {
    pub name: String,
    pub sales: f64,
    pub quantity: u64,
}

/// Orders in one status, with their summed totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: u64,
    pub total_sales: f64,
}

/// Response of the reports endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub summary: SalesSummary,
    pub sales_by_date: Vec<DailySales>,
    pub sales_by_category: Vec<CategorySales>,
    pub sales_by_product: Vec<ProductSales>,
    pub order_status_counts: Vec<StatusCount>,
}
