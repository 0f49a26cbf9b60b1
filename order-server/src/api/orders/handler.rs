//! Order API Handlers
//!
//! Placement and status changes go through the order engine; the read
//! endpoints compose repository rows with decimal-precise totals.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::order;
use crate::orders::{self, OrderError, money};
use crate::utils::{AppError, AppResult};
use shared::models::{
    Order, OrderCharges, OrderItemDetail, OrderStatus, OrderSummary, OrderWithItems,
};
use shared::util::{now_millis, utc_day_bounds};

#[derive(Debug, Deserialize)]
pub struct PlaceOrderPayload {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusPayload {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// Order detail: lines joined with catalog fields plus the flat charge
/// breakdown (subtotal, tax, delivery fee).
#[derive(Debug, Serialize)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
    #[serde(flatten)]
    pub charges: OrderCharges,
}

/// A user's in-flight order with its lines
#[derive(Debug, Serialize)]
pub struct CurrentOrder {
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
    pub total_amount: f64,
}

#[derive(Debug, Serialize)]
pub struct TodayRevenue {
    pub revenue: f64,
}

/// POST /api/orders - 下单 (购物车 → 订单，原子扣减库存)
pub async fn place(
    State(state): State<ServerState>,
    Json(payload): Json<PlaceOrderPayload>,
) -> AppResult<Json<OrderWithItems>> {
    let placed = orders::place_order(&state.pool, payload.user_id).await?;
    Ok(Json(placed))
}

/// PUT /api/orders/:id/status - 状态流转 (取消/恢复时补偿库存)
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SetStatusPayload>,
) -> AppResult<Json<Order>> {
    let status = OrderStatus::parse(&payload.status)
        .ok_or_else(|| OrderError::InvalidStatus(payload.status.clone()))?;
    let order = orders::set_status(&state.pool, id, status).await?;
    Ok(Json(order))
}

/// GET /api/orders - 订单列表 (管理端，可按状态过滤，含合计)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<OrderSummary>>> {
    let status = match &query.status {
        Some(s) => Some(OrderStatus::parse(s).ok_or_else(|| OrderError::InvalidStatus(s.clone()))?),
        None => None,
    };

    let orders = order::find_all(&state.pool, status).await?;
    let mut summaries = Vec::with_capacity(orders.len());
    for o in orders {
        summaries.push(summarize(&state, o).await?);
    }
    Ok(Json(summaries))
}

/// GET /api/orders/current/:user_id - 用户当前订单 (Pending/Processing/Ready)
pub async fn current(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Option<CurrentOrder>>> {
    let Some(order) = order::current_for_user(&state.pool, user_id).await? else {
        return Ok(Json(None));
    };
    let items = order::item_details_by_order(&state.pool, order.id).await?;
    let total_amount = money::detail_total(&items);
    Ok(Json(Some(CurrentOrder {
        order,
        items,
        total_amount,
    })))
}

/// GET /api/orders/history/:user_id - 用户历史订单 (含合计)
pub async fn history(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<OrderSummary>>> {
    let orders = order::find_by_user(&state.pool, user_id).await?;
    let mut summaries = Vec::with_capacity(orders.len());
    for o in orders {
        summaries.push(summarize(&state, o).await?);
    }
    Ok(Json(summaries))
}

/// GET /api/orders/:id - 订单详情 (含税费/配送费拆分)
pub async fn details(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetails>> {
    let order = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    let items = order::item_details_by_order(&state.pool, id).await?;
    let subtotal = money::detail_total(&items);
    let charges = money::compute_charges(
        subtotal,
        state.config.tax_rate_percent,
        state.config.delivery_fee,
    );
    Ok(Json(OrderDetails {
        order,
        items,
        charges,
    }))
}

/// GET /api/orders/revenue/today - 今日营收 (不含已取消订单)
pub async fn revenue_today(State(state): State<ServerState>) -> AppResult<Json<TodayRevenue>> {
    let (start, end) = utc_day_bounds(now_millis());
    let lines = order::item_lines_in_range(&state.pool, start, end).await?;
    Ok(Json(TodayRevenue {
        revenue: money::to_f64(money::sum_lines(lines)),
    }))
}

async fn summarize(state: &ServerState, order: Order) -> AppResult<OrderSummary> {
    let items = order::items_by_order(&state.pool, order.id).await?;
    Ok(OrderSummary {
        id: order.id,
        user_id: order.user_id,
        status: order.status,
        created_at: order.created_at,
        item_count: items.len() as i64,
        total_amount: money::order_total(&items),
    })
}
