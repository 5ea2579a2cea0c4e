//! 分类 API 处理器

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use http::StatusCode;
use serde_json::{Value, json};
use shared::models::{Category, CategoryCreate, CategoryUpdate};

use crate::core::ServerState;
use crate::db::repository::{CategoryRepository, RepoError};
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult, ErrorCode};

fn category_error(err: RepoError) -> AppError {
    err.into_app_error(ErrorCode::CategoryNotFound, ErrorCode::CategoryNameExists)
}

/// GET /api/categories - 启用的分类 (按 order, name 排序)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.db.clone());
    Ok(Json(repo.find_all().map_err(category_error)?))
}

/// GET /api/categories/:id - 已停用的分类视为不存在
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo
        .find_by_id(&id)
        .map_err(category_error)?
        .filter(|c| c.active)
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    Ok(Json(category))
}

/// POST /api/categories - 创建分类 (名称唯一)
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CategoryCreate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let payload = validate_payload(payload)?;
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo.create(payload).map_err(category_error)?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/:id - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<CategoryUpdate>, JsonRejection>,
) -> AppResult<Json<Category>> {
    let payload = validate_payload(payload)?;
    let repo = CategoryRepository::new(state.db.clone());
    Ok(Json(repo.update(&id, payload).map_err(category_error)?))
}

/// DELETE /api/categories/:id - 软删除
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let repo = CategoryRepository::new(state.db.clone());
    if !repo.delete(&id).map_err(category_error)? {
        return Err(AppError::new(ErrorCode::CategoryNotFound));
    }
    Ok(Json(json!({ "message": "Category removed" })))
}
