//! 订单 API 处理器

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use chrono::Utc;
use http::StatusCode;
use shared::models::{Order, OrderCreate, OrderDetail, OrderStatusUpdate, PaymentResult, SalesReport};

use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::validation::json_body;

/// POST /api/orders - 创建订单
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<OrderCreate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let Json(payload) = json_body(payload)?;
    let order = state.orders().create(payload)?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders - 所有订单 (最新在前)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.orders().list()?))
}

/// GET /api/orders/:id - 订单详情 (含商品信息)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    Ok(Json(state.orders().get_detail(&id)?))
}

/// PUT /api/orders/:id/status - 更新订单状态 (不限制状态流转)
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<OrderStatusUpdate>, JsonRejection>,
) -> AppResult<Json<OrderDetail>> {
    let Json(payload) = json_body(payload)?;
    let order = state
        .orders()
        .update_status(&id, payload.status.as_deref())?;
    Ok(Json(order))
}

/// PUT /api/orders/:id/pay - 标记已支付 (重复调用覆盖支付结果)
pub async fn mark_paid(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<PaymentResult>, JsonRejection>,
) -> AppResult<Json<Order>> {
    let Json(payment) = json_body(payload)?;
    Ok(Json(state.orders().mark_paid(&id, payment)?))
}

/// GET /api/orders/stats/reports - 销售报表
pub async fn sales_report(State(state): State<ServerState>) -> AppResult<Json<SalesReport>> {
    Ok(Json(state.orders().sales_report(Utc::now())?))
}
