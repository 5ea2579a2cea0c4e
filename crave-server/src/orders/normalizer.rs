//! Order payload normalization
//!
//! Turns a raw [`OrderCreate`] into a [`NewOrder`] ready for persistence:
//! every rule is checked and all failures are reported together.
//!
//! Line items whose `productRef` has the shape of a catalog id are tagged
//! [`ProductRef::Catalog`] and must exist in the catalog; missing name,
//! price or image are filled from the product. Anything else is tagged
//! [`ProductRef::AdHoc`] and its submitted fields are kept as-is.

use shared::error::{AppError, ErrorCode};
use shared::models::{
    Customer, CustomerInput, OrderCreate, OrderItem, OrderItemInput, PaymentMethod, Product,
    ProductRef,
};
use shared::util::is_record_id;

use crate::db::repository::{ProductRepository, RepoResult};
use crate::reports::money::{MAX_AMOUNT, MAX_PRICE, MAX_QUANTITY};

/// Catalog read access needed while normalizing
pub trait ProductCatalog {
    fn find_product(&self, id: &str) -> RepoResult<Option<Product>>;
}

impl ProductCatalog for ProductRepository {
    fn find_product(&self, id: &str) -> RepoResult<Option<Product>> {
        self.find_by_id(id)
    }
}

/// Validated order, minus the fields assigned on insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer: Customer,
    pub order_items: Vec<OrderItem>,
    pub payment_method: PaymentMethod,
    pub subtotal: f64,
    pub cgst: f64,
    pub sgst: f64,
    pub delivery_charge: f64,
    pub total_amount: f64,
}

/// Collected validation failures
#[derive(Debug, Default)]
struct Issues(Vec<(ErrorCode, String)>);

impl Issues {
    fn push(&mut self, code: ErrorCode, message: impl Into<String>) {
        self.0.push((code, message.into()));
    }

    fn invalid(&mut self, message: impl Into<String>) {
        self.push(ErrorCode::ValidationFailed, message);
    }

    /// A lone failure keeps its specific code; several become `ValidationFailed`
    fn into_error(self) -> Option<AppError> {
        let code = match self.0.as_slice() {
            [] => return None,
            [(code, _)] => *code,
            _ => ErrorCode::ValidationFailed,
        };
        let mut err = AppError::validation_errors(self.0.into_iter().map(|(_, m)| m).collect());
        err.code = code;
        Some(err)
    }
}

/// Validate and normalize an order creation payload
pub fn normalize_order(
    payload: OrderCreate,
    catalog: &impl ProductCatalog,
) -> Result<NewOrder, AppError> {
    let mut issues = Issues::default();

    let items = payload.order_items.unwrap_or_default();
    if items.is_empty() {
        issues.push(ErrorCode::OrderEmpty, ErrorCode::OrderEmpty.message());
    }
    let mut order_items = Vec::with_capacity(items.len());
    for item in items {
        if let Some(item) = normalize_item(item, catalog, &mut issues)? {
            order_items.push(item);
        }
    }

    let payment_method = match payload.payment_method.as_deref().map(str::trim) {
        None | Some("") => {
            issues.push(
                ErrorCode::PaymentInvalidMethod,
                ErrorCode::PaymentInvalidMethod.message(),
            );
            None
        }
        Some(raw) => match raw.parse::<PaymentMethod>() {
            Ok(method) => Some(method),
            Err(_) => {
                issues.push(
                    ErrorCode::PaymentInvalidMethod,
                    format!("Payment method must be one of cash, card, upi (got '{raw}')"),
                );
                None
            }
        },
    };

    let subtotal = required_amount(payload.subtotal, "Subtotal", &mut issues);
    let total_amount = required_amount(payload.total_amount, "Total amount", &mut issues);

    // Zero tax is treated the same as missing
    let cgst = payload.cgst.filter(|v| *v != 0.0);
    let sgst = payload.sgst.filter(|v| *v != 0.0);
    if cgst.is_none() || sgst.is_none() {
        issues.push(ErrorCode::OrderTaxMissing, ErrorCode::OrderTaxMissing.message());
    }
    let cgst = bounded_amount(cgst, "CGST", &mut issues);
    let sgst = bounded_amount(sgst, "SGST", &mut issues);
    let delivery_charge =
        bounded_amount(payload.delivery_charge, "Delivery charge", &mut issues).unwrap_or(0.0);

    if let Some(err) = issues.into_error() {
        return Err(err);
    }

    match (payment_method, subtotal, total_amount, cgst, sgst) {
        (Some(payment_method), Some(subtotal), Some(total_amount), Some(cgst), Some(sgst)) => {
            Ok(NewOrder {
                customer: normalize_customer(payload.customer),
                order_items,
                payment_method,
                subtotal,
                cgst,
                sgst,
                delivery_charge,
                total_amount,
            })
        }
        _ => Err(AppError::validation("Order payload is incomplete")),
    }
}

fn normalize_item(
    item: OrderItemInput,
    catalog: &impl ProductCatalog,
    issues: &mut Issues,
) -> Result<Option<OrderItem>, AppError> {
    let Some(reference) = item
        .product_ref
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
    else {
        issues.push(ErrorCode::RequiredField, "Product ID is required");
        return Ok(None);
    };

    let (product, catalog_product) = if is_record_id(&reference) {
        match catalog.find_product(&reference)? {
            Some(found) => (
                ProductRef::Catalog {
                    product_id: reference,
                },
                Some(found),
            ),
            None => {
                issues.push(
                    ErrorCode::ProductNotFound,
                    format!("Product not found: {reference}"),
                );
                return Ok(None);
            }
        }
    } else {
        (ProductRef::AdHoc { reference }, None)
    };

    let name = item
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .or_else(|| catalog_product.as_ref().map(|p| p.name.clone()));
    let price = item.price.or_else(|| catalog_product.as_ref().map(|p| p.price));
    let image = item
        .image
        .filter(|i| !i.trim().is_empty())
        .or_else(|| {
            catalog_product
                .as_ref()
                .map(|p| p.image.clone())
                .filter(|i| !i.is_empty())
        });

    let mut valid = true;
    if name.is_none() {
        issues.push(ErrorCode::RequiredField, "Product name is required");
        valid = false;
    }
    let quantity = match item.quantity {
        None => {
            issues.push(ErrorCode::RequiredField, "Quantity is required");
            None
        }
        Some(q) if q < 1 => {
            issues.push(ErrorCode::ValueOutOfRange, "Quantity must be at least 1");
            None
        }
        Some(q) if q > i64::from(MAX_QUANTITY) => {
            issues.push(
                ErrorCode::ValueOutOfRange,
                format!("Quantity cannot exceed {MAX_QUANTITY}"),
            );
            None
        }
        Some(q) => u32::try_from(q).ok(),
    };
    match price {
        None => {
            issues.push(ErrorCode::RequiredField, "Price is required");
            valid = false;
        }
        Some(p) if p.is_nan() || p < 0.0 => {
            issues.push(ErrorCode::ValueOutOfRange, "Price cannot be negative");
            valid = false;
        }
        Some(p) if p > MAX_PRICE => {
            issues.push(
                ErrorCode::ValueOutOfRange,
                format!("Price cannot exceed {MAX_PRICE}"),
            );
            valid = false;
        }
        Some(p) => {
            if let Some(q) = quantity
                && f64::from(q) * p > MAX_AMOUNT
            {
                issues.push(
                    ErrorCode::ValueOutOfRange,
                    format!("Line total cannot exceed {MAX_AMOUNT}"),
                );
                valid = false;
            }
        }
    }

    match (valid, name, quantity, price) {
        (true, Some(name), Some(quantity), Some(price)) => Ok(Some(OrderItem {
            product,
            name,
            quantity,
            price,
            image,
        })),
        _ => Ok(None),
    }
}

fn normalize_customer(input: Option<CustomerInput>) -> Customer {
    let input = input.unwrap_or_default();
    let defaults = Customer::default();
    Customer {
        name: input
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or(defaults.name),
        phone: input
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or(defaults.phone),
    }
}

fn required_amount(value: Option<f64>, field: &str, issues: &mut Issues) -> Option<f64> {
    if value.is_none() {
        issues.push(ErrorCode::RequiredField, format!("{field} is required"));
        return None;
    }
    bounded_amount(value, field, issues)
}

/// Money fields must lie in `0..=MAX_AMOUNT`
fn bounded_amount(value: Option<f64>, field: &str, issues: &mut Issues) -> Option<f64> {
    match value {
        Some(v) if v.is_nan() || v < 0.0 => {
            issues.invalid(format!("{field} cannot be negative"));
            None
        }
        Some(v) if v > MAX_AMOUNT => {
            issues.invalid(format!("{field} cannot exceed {MAX_AMOUNT}"));
            None
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;

    const PANEER_ID: &str = "6f1c8d9e-0a4b-4c1f-9b1e-2d3f4a5b6c7d";

    struct MemoryCatalog(HashMap<String, Product>);

    impl ProductCatalog for MemoryCatalog {
        fn find_product(&self, id: &str) -> RepoResult<Option<Product>> {
            Ok(self.0.get(id).cloned())
        }
    }

    fn catalog() -> MemoryCatalog {
        let now = Utc::now();
        let product = Product {
            id: PANEER_ID.into(),
            name: "Paneer Tikka".into(),
            description: String::new(),
            price: 100.0,
            image: "https://img/paneer.png".into(),
            category_id: "c1".into(),
            is_veg: true,
            is_hot_deal: false,
            is_favorite: false,
            is_addon: false,
            created_at: now,
            updated_at: now,
        };
        MemoryCatalog(HashMap::from([(PANEER_ID.to_string(), product)]))
    }

    fn item(reference: &str, quantity: i64, price: f64) -> OrderItemInput {
        OrderItemInput {
            product_ref: Some(reference.into()),
            name: Some("Item".into()),
            quantity: Some(quantity),
            price: Some(price),
            image: None,
        }
    }

    fn payload(items: Vec<OrderItemInput>) -> OrderCreate {
        OrderCreate {
            customer: None,
            order_items: Some(items),
            payment_method: Some("cash".into()),
            subtotal: Some(200.0),
            cgst: Some(9.0),
            sgst: Some(9.0),
            delivery_charge: None,
            total_amount: Some(218.0),
        }
    }

    #[test]
    fn test_catalog_and_adhoc_tagging() {
        let order = normalize_order(
            payload(vec![item(PANEER_ID, 2, 100.0), item("combo-7", 1, 250.0)]),
            &catalog(),
        )
        .unwrap();

        assert_eq!(
            order.order_items[0].product,
            ProductRef::Catalog {
                product_id: PANEER_ID.into()
            }
        );
        assert_eq!(
            order.order_items[1].product,
            ProductRef::AdHoc {
                reference: "combo-7".into()
            }
        );
        // Submitted fields win over the catalog
        assert_eq!(order.order_items[0].name, "Item");
        assert_eq!(order.order_items[1].price, 250.0);
        assert_eq!(order.delivery_charge, 0.0);
        assert_eq!(order.customer, Customer::default());
    }

    #[test]
    fn test_catalog_item_fills_missing_fields() {
        let sparse = OrderItemInput {
            product_ref: Some(PANEER_ID.into()),
            quantity: Some(1),
            ..Default::default()
        };
        let order = normalize_order(payload(vec![sparse]), &catalog()).unwrap();
        let item = &order.order_items[0];
        assert_eq!(item.name, "Paneer Tikka");
        assert_eq!(item.price, 100.0);
        assert_eq!(item.image.as_deref(), Some("https://img/paneer.png"));
    }

    #[test]
    fn test_unknown_catalog_id_rejected() {
        let err = normalize_order(
            payload(vec![item("00000000-0000-4000-8000-000000000000", 1, 10.0)]),
            &catalog(),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);
        assert_eq!(err.message, "Validation Error");
        assert_eq!(
            err.errors,
            vec!["Product not found: 00000000-0000-4000-8000-000000000000"]
        );
    }

    #[test]
    fn test_empty_items_rejected() {
        let err = normalize_order(payload(vec![]), &catalog()).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderEmpty);
        assert_eq!(err.errors, vec!["Order items are required"]);

        let mut missing = payload(vec![]);
        missing.order_items = None;
        let err = normalize_order(missing, &catalog()).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderEmpty);
    }

    #[test]
    fn test_zero_or_missing_tax_rejected() {
        let mut zero = payload(vec![item("tea", 1, 20.0)]);
        zero.cgst = Some(0.0);
        let err = normalize_order(zero, &catalog()).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderTaxMissing);
        assert_eq!(err.errors, vec!["CGST and SGST are required"]);

        let mut missing = payload(vec![item("tea", 1, 20.0)]);
        missing.sgst = None;
        assert!(normalize_order(missing, &catalog()).is_err());
    }

    #[test]
    fn test_item_bounds_collected() {
        let err = normalize_order(
            payload(vec![item("tea", 0, 20.0), item("coffee", 1, -5.0)]),
            &catalog(),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(
            err.errors,
            vec!["Quantity must be at least 1", "Price cannot be negative"]
        );
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let err = normalize_order(
            OrderCreate {
                order_items: Some(vec![OrderItemInput::default()]),
                ..Default::default()
            },
            &catalog(),
        )
        .unwrap_err();
        assert_eq!(
            err.errors,
            vec![
                "Product ID is required",
                "Payment method is required",
                "Subtotal is required",
                "Total amount is required",
                "CGST and SGST are required",
            ]
        );
    }

    #[test]
    fn test_invalid_payment_method() {
        let mut bad = payload(vec![item("tea", 1, 20.0)]);
        bad.payment_method = Some("paypal".into());
        let err = normalize_order(bad, &catalog()).unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentInvalidMethod);
    }

    #[test]
    fn test_negative_money_rejected() {
        let mut bad = payload(vec![item("tea", 1, 20.0)]);
        bad.delivery_charge = Some(-1.0);
        let err = normalize_order(bad, &catalog()).unwrap_err();
        assert_eq!(err.errors, vec!["Delivery charge cannot be negative"]);
    }

    #[test]
    fn test_amounts_beyond_limits_rejected() {
        let err = normalize_order(payload(vec![item("feast", 1, 5e25)]), &catalog()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert_eq!(err.errors, vec!["Price cannot exceed 1000000"]);

        let err = normalize_order(payload(vec![item("feast", 4_000_000_000, 10.0)]), &catalog())
            .unwrap_err();
        assert_eq!(err.errors, vec!["Quantity cannot exceed 9999"]);

        let err = normalize_order(payload(vec![item("feast", 9999, 1_000_000.0)]), &catalog())
            .unwrap_err();
        assert_eq!(err.errors, vec!["Line total cannot exceed 100000000"]);

        let mut huge = payload(vec![item("tea", 1, 20.0)]);
        huge.total_amount = Some(1e30);
        let err = normalize_order(huge, &catalog()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.errors, vec!["Total amount cannot exceed 100000000"]);

        let mut at_limit = payload(vec![item("platter", 100, 1_000_000.0)]);
        at_limit.total_amount = Some(MAX_AMOUNT);
        assert!(normalize_order(at_limit, &catalog()).is_ok());
    }

    #[test]
    fn test_customer_blank_fields_default() {
        let mut order = payload(vec![item("tea", 1, 20.0)]);
        order.customer = Some(CustomerInput {
            name: Some("  Asha ".into()),
            phone: Some("   ".into()),
        });
        let normalized = normalize_order(order, &catalog()).unwrap();
        assert_eq!(normalized.customer.name, "Asha");
        assert_eq!(normalized.customer.phone, "0000000000");
    }
}
