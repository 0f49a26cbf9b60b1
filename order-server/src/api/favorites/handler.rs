//! Favorites API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::favorite;
use crate::utils::AppResult;
use shared::models::FoodItemWithCategory;

/// GET /api/favorites/:user_id - 用户收藏列表
pub async fn list(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<FoodItemWithCategory>>> {
    let items = favorite::list_for_user(&state.pool, user_id).await?;
    Ok(Json(items))
}

/// POST /api/favorites/:user_id/:food_item_id - 添加收藏
pub async fn add(
    State(state): State<ServerState>,
    Path((user_id, food_item_id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    favorite::add(&state.pool, user_id, food_item_id).await?;
    Ok(Json(true))
}

/// DELETE /api/favorites/:user_id/:food_item_id - 取消收藏 (幂等)
pub async fn remove(
    State(state): State<ServerState>,
    Path((user_id, food_item_id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    let removed = favorite::remove(&state.pool, user_id, food_item_id).await?;
    Ok(Json(removed))
}
