//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::product::ProductSummary;

/// Error returned when a wire string does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Order lifecycle status
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "status",
                value: s.to_string(),
            })
    }
}

/// Payment method chosen at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Upi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Upi => "upi",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "payment method",
                value: s.to_string(),
            })
    }
}

pub const GUEST_NAME: &str = "Guest";
pub const GUEST_PHONE: &str = "0000000000";

/// Customer contact; guest checkout uses placeholder values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: String,
}

impl Default for Customer {
    fn default() -> Self {
        Self {
            name: GUEST_NAME.to_string(),
            phone: GUEST_PHONE.to_string(),
        }
    }
}

/// What a line item points at
///
/// Serialized inline in the item as `productKind` + `productRef`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "productKind", rename_all = "snake_case")]
pub enum ProductRef {
    /// A product id in the catalog
    Catalog {
        #[serde(rename = "productRef")]
        product_id: String,
    },
    /// Free-form product carried inline; the item's name/price are authoritative
    AdHoc {
        #[serde(rename = "productRef")]
        reference: String,
    },
}

impl ProductRef {
    pub fn catalog_id(&self) -> Option<&str> {
        match self {
            Self::Catalog { product_id } => Some(product_id),
            Self::AdHoc { .. } => None,
        }
    }
}

/// Stored order line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(flatten)]
    pub product: ProductRef,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Line item with catalog details joined in (catalog items only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOrderItem {
    #[serde(flatten)]
    pub item: OrderItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_details: Option<ProductSummary>,
}

/// Payment provider confirmation (provider field names kept as-is)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
}

/// Order document
///
/// `I` is the line item representation: [`OrderItem`] as stored,
/// [`ResolvedOrderItem`] when read with catalog details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order<I = OrderItem> {
    pub id: String,
    pub order_number: String,
    pub customer: Customer,
    pub order_items: Vec<I>,
    pub payment_method: PaymentMethod,
    pub subtotal: f64,
    pub cgst: f64,
    pub sgst: f64,
    #[serde(default)]
    pub delivery_charge: f64,
    pub total_amount: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_result: Option<PaymentResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order as returned by the single-order read
pub type OrderDetail = Order<ResolvedOrderItem>;

impl<I> Order<I> {
    /// Replace the line items, keeping every other field
    pub fn map_items<J>(self, f: impl FnMut(I) -> J) -> Order<J> {
        Order {
            id: self.id,
            order_number: self.order_number,
            customer: self.customer,
            order_items: self.order_items.into_iter().map(f).collect(),
            payment_method: self.payment_method,
            subtotal: self.subtotal,
            cgst: self.cgst,
            sgst: self.sgst,
            delivery_charge: self.delivery_charge,
            total_amount: self.total_amount,
            status: self.status,
            is_paid: self.is_paid,
            paid_at: self.paid_at,
            payment_result: self.payment_result,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// ==================== Request payloads ====================

/// Customer as submitted; blanks fall back to guest values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerInput {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Line item as submitted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    #[serde(alias = "product")]
    pub product_ref: Option<String>,
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub image: Option<String>,
}

/// Create order payload
///
/// Every field is optional at the wire level so that missing fields are
/// reported together as validation messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub customer: Option<CustomerInput>,
    pub order_items: Option<Vec<OrderItemInput>>,
    pub payment_method: Option<String>,
    pub subtotal: Option<f64>,
    pub cgst: Option<f64>,
    pub sgst: Option<f64>,
    pub delivery_charge: Option<f64>,
    pub total_amount: Option<f64>,
}

/// Update status payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: Option<String>,
}
