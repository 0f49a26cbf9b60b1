//! Cart API Handlers
//!
//! Thin wrappers over the cart aggregator — identity is external, so the
//! caller-supplied `user_id` is trusted as-is.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::orders::cart;
use crate::utils::AppResult;
use shared::models::CartItemWithFood;

#[derive(Debug, Deserialize)]
pub struct CartAddPayload {
    pub user_id: i64,
    pub food_item_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CartQuantityPayload {
    pub quantity: i64,
}

/// GET /api/cart/:user_id - 获取用户购物车 (关联实时菜品数据)
pub async fn list(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<CartItemWithFood>>> {
    let items = cart::list_cart(&state.pool, user_id).await?;
    Ok(Json(items))
}

/// GET /api/cart/:user_id/count - 购物车行数
pub async fn count(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<i64>> {
    let count = cart::cart_count(&state.pool, user_id).await?;
    Ok(Json(count))
}

/// POST /api/cart - 加入购物车 (准入检查: 库存上限)
pub async fn add(
    State(state): State<ServerState>,
    Json(payload): Json<CartAddPayload>,
) -> AppResult<Json<CartItemWithFood>> {
    let row = cart::add_to_cart(
        &state.pool,
        payload.user_id,
        payload.food_item_id,
        payload.quantity,
    )
    .await?;
    Ok(Json(row))
}

/// PUT /api/cart/item/:id - 修改数量 (<1 等同删除，返回 null)
pub async fn set_quantity(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CartQuantityPayload>,
) -> AppResult<Json<Option<CartItemWithFood>>> {
    let row = cart::set_quantity(&state.pool, id, payload.quantity).await?;
    Ok(Json(row))
}

/// DELETE /api/cart/item/:id - 移除购物车行 (幂等)
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let removed = cart::remove_item(&state.pool, id).await?;
    Ok(Json(removed))
}
