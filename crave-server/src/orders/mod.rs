//! Order management
//!
//! - **number**: order number formatting
//! - **normalizer**: payload validation and catalog/ad-hoc tagging
//! - [`OrderService`]: composes normalizer, repositories and reports for the
//!   HTTP handlers
//!
//! # Data Flow
//!
//! ```text
//! OrderCreate → normalize_order → NewOrder → OrderRepository::create (redb txn)
//!                     ↑                              ↓
//!              ProductRepository                Order (ORDxxxx)
//! ```

pub mod normalizer;
pub mod number;

pub use normalizer::{NewOrder, ProductCatalog, normalize_order};
pub use number::{ORDER_NUMBER_PREFIX, format_order_number};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Order, OrderCreate, OrderDetail, OrderStatus, PaymentResult, ProductSummary,
    ResolvedOrderItem, SalesReport,
};

use crate::db::DbService;
use crate::db::repository::{OrderRepository, ProductRepository, RepoError};
use crate::reports::{self, CatalogSnapshot};

fn order_error(err: RepoError) -> AppError {
    err.into_app_error(ErrorCode::OrderNotFound, ErrorCode::OrderNumberConflict)
}

/// Order operations as exposed over HTTP
#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    products: ProductRepository,
    timezone: Tz,
}

impl OrderService {
    pub fn new(db: DbService, timezone: Tz) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            products: ProductRepository::new(db),
            timezone,
        }
    }

    pub fn create(&self, payload: OrderCreate) -> AppResult<Order> {
        let order = normalize_order(payload, &self.products)?;
        self.orders.create(order).map_err(order_error)
    }

    pub fn list(&self) -> AppResult<Vec<Order>> {
        self.orders.find_all().map_err(order_error)
    }

    /// Single order with catalog details joined into catalog items
    pub fn get_detail(&self, id: &str) -> AppResult<OrderDetail> {
        let order = self.orders.find_by_id(id).map_err(order_error)?;
        let catalog = self.products.snapshot()?;
        Ok(resolve_items(order, &catalog))
    }

    /// `status` is the raw wire value; unknown or missing values are rejected
    pub fn update_status(&self, id: &str, status: Option<&str>) -> AppResult<OrderDetail> {
        let status = match status.map(str::trim) {
            None | Some("") => return Err(AppError::invalid_state("Status is required")),
            Some(raw) => raw
                .parse::<OrderStatus>()
                .map_err(|_| {
                    AppError::invalid_state(format!("Invalid status: {raw}"))
                        .with_detail("status", raw)
                })?,
        };
        let order = self
            .orders
            .update_status(id, status)
            .map_err(order_error)?;
        let catalog = self.products.snapshot()?;
        Ok(resolve_items(order, &catalog))
    }

    pub fn mark_paid(&self, id: &str, payment: PaymentResult) -> AppResult<Order> {
        self.orders.mark_paid(id, payment).map_err(order_error)
    }

    pub fn sales_report(&self, now: DateTime<Utc>) -> AppResult<SalesReport> {
        let orders = self.orders.find_all().map_err(order_error)?;
        let catalog = self.products.snapshot()?;
        Ok(reports::build_report(&orders, &catalog, now, self.timezone)?)
    }
}

fn resolve_items(order: Order, catalog: &CatalogSnapshot) -> OrderDetail {
    order.map_items(|item| ResolvedOrderItem {
        product_details: catalog.product_for(&item).map(ProductSummary::from),
        item,
    })
}
