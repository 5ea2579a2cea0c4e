//! 商品 API 处理器

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use http::StatusCode;
use serde_json::{Value, json};
use shared::models::{Product, ProductCreate, ProductUpdate, ProductView};

use crate::core::ServerState;
use crate::db::repository::{ProductRepository, RepoError};
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult, ErrorCode};

fn product_error(err: RepoError) -> AppError {
    err.into_app_error(ErrorCode::ProductNotFound, ErrorCode::ProductNameExists)
}

/// GET /api/products - 所有商品 (最新在前, 含分类)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ProductView>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find_all().map_err(product_error)?;
    Ok(Json(repo.populate(products).map_err(product_error)?))
}

/// GET /api/products/category/:category_id - 按分类获取商品
pub async fn list_by_category(
    State(state): State<ServerState>,
    Path(category_id): Path<String>,
) -> AppResult<Json<Vec<ProductView>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find_by_category(&category_id).map_err(product_error)?;
    Ok(Json(repo.populate(products).map_err(product_error)?))
}

/// GET /api/products/:id - 商品详情 (含分类)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductView>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .map_err(product_error)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(Json(populate_one(&repo, product)?))
}

/// POST /api/products - 创建商品 (名称唯一, 分类必须存在)
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<ProductCreate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ProductView>)> {
    let payload = validate_payload(payload)?;
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.create(payload).map_err(product_error)?;
    let view = populate_one(&repo, product)?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// PUT /api/products/:id - 更新商品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductUpdate>, JsonRejection>,
) -> AppResult<Json<ProductView>> {
    let payload = validate_payload(payload)?;
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.update(&id, payload).map_err(product_error)?;
    Ok(Json(populate_one(&repo, product)?))
}

/// DELETE /api/products/:id - 硬删除
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let repo = ProductRepository::new(state.db.clone());
    if !repo.delete(&id).map_err(product_error)? {
        return Err(AppError::new(ErrorCode::ProductNotFound));
    }
    Ok(Json(json!({ "message": "Product removed" })))
}

fn populate_one(repo: &ProductRepository, product: Product) -> AppResult<ProductView> {
    repo.populate(vec![product])
        .map_err(product_error)?
        .pop()
        .ok_or_else(|| AppError::internal("Product disappeared while populating"))
}
