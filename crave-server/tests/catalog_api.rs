//! Category and product HTTP API integration tests

mod common;

use common::{send, test_app};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_category_crud_with_soft_delete() {
    let app = test_app();

    let (status, mains) = send(&app, "POST", "/api/categories", Some(json!({ "name": " Mains ", "order": 2 }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(mains["name"], "Mains");
    assert_eq!(mains["active"], true);
    send(&app, "POST", "/api/categories", Some(json!({ "name": "Starters", "order": 1 }))).await;

    let (_, list) = send(&app, "GET", "/api/categories", None).await;
    let names: Vec<&str> = list.as_array().unwrap().iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Starters", "Mains"]);

    let uri = format!("/api/categories/{}", mains["id"].as_str().unwrap());
    let (status, updated) = send(&app, "PUT", &uri, Some(json!({ "featured": true }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["featured"], true);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Category removed");

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category not found");
    let (_, list) = send(&app, "GET", "/api/categories", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_category_duplicate_and_validation() {
    let app = test_app();
    send(&app, "POST", "/api/categories", Some(json!({ "name": "Desserts" }))).await;

    let (status, body) = send(&app, "POST", "/api/categories", Some(json!({ "name": "Desserts" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Category with this name already exists");

    let (status, body) = send(&app, "POST", "/api/categories", Some(json!({ "description": "no name" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation Error");
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "POST", "/api/categories", Some(json!({ "name": "Uncategorized" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["Category name 'Uncategorized' is reserved"]));
}

#[tokio::test]
async fn test_product_crud() {
    let app = test_app();
    let (_, category) = send(&app, "POST", "/api/categories", Some(json!({ "name": "Breads" }))).await;
    let category_id = category["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({ "name": "Naan", "price": 40, "category": "missing" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["Invalid category"]));

    let (status, naan) = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({ "name": "Naan", "price": 40, "category": category_id, "isCravebitesFavorite": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(naan["category"]["name"], "Breads");
    assert_eq!(naan["isFavorite"], true);

    let (status, body) = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({ "name": "Naan", "price": 45, "category": category_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Product with this name already exists");

    let (_, by_category) = send(&app, "GET", &format!("/api/products/category/{category_id}"), None).await;
    assert_eq!(by_category.as_array().unwrap().len(), 1);

    let uri = format!("/api/products/{}", naan["id"].as_str().unwrap());
    let (status, updated) = send(&app, "PUT", &uri, Some(json!({ "price": 50 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 50.0);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_negative_price_rejected() {
    let app = test_app();
    let (_, category) = send(&app, "POST", "/api/categories", Some(json!({ "name": "Drinks" }))).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({ "name": "Lassi", "price": -5, "category": category["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["Price cannot be negative"]));
}
