//! Product Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    /// Category reference (id, required)
    pub category_id: String,
    #[serde(default)]
    pub is_veg: bool,
    #[serde(default)]
    pub is_hot_deal: bool,
    #[serde(default, alias = "isCravebitesFavorite")]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_addon: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Populated category reference on product reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: String,
    pub name: String,
}

/// Product with its category populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<CategoryRef>,
}

/// Product fields joined into order line items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub image: String,
    pub category_id: String,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            category_id: product.category_id.clone(),
        }
    }
}

/// Create product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    #[validate(
        required(message = "Product name is required"),
        length(min = 1, max = 100, message = "Product name must be 1-100 characters")
    )]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description is too long"))]
    pub description: Option<String>,
    #[validate(
        required(message = "Price is required"),
        range(min = 0.0, message = "Price cannot be negative")
    )]
    pub price: Option<f64>,
    pub image: Option<String>,
    #[serde(alias = "category")]
    #[validate(required(message = "Category is required"))]
    pub category_id: Option<String>,
    pub is_veg: Option<bool>,
    pub is_hot_deal: Option<bool>,
    #[serde(alias = "isCravebitesFavorite")]
    pub is_favorite: Option<bool>,
    pub is_addon: Option<bool>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 100, message = "Product name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description is too long"))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    pub image: Option<String>,
    #[serde(alias = "category")]
    pub category_id: Option<String>,
    pub is_veg: Option<bool>,
    pub is_hot_deal: Option<bool>,
    #[serde(alias = "isCravebitesFavorite")]
    pub is_favorite: Option<bool>,
    pub is_addon: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_payload_validation() {
        let payload: ProductCreate = serde_json::from_value(json!({
            "name": "Masala Dosa",
            "price": -1.0,
            "category": "c1"
        }))
        .unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
        assert!(!errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_create_payload_requires_fields() {
        let errors = ProductCreate::default().validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("category_id"));
    }

    #[test]
    fn test_favorite_alias() {
        let payload: ProductUpdate =
            serde_json::from_value(json!({"isCravebitesFavorite": true})).unwrap();
        assert_eq!(payload.is_favorite, Some(true));
        assert!(payload.validate().is_ok());
    }
}
