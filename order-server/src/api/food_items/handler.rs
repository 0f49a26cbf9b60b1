//! Food Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::food_item;
use crate::utils::{AppError, AppResult};
use shared::models::{FoodItem, FoodItemCreate, FoodItemUpdate, FoodItemWithCategory};

/// GET /api/food-items - 获取所有菜品 (管理端)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<FoodItemWithCategory>>> {
    let items = food_item::find_all(&state.pool).await?;
    Ok(Json(items))
}

/// GET /api/menu - 顾客菜单 (仅在售菜品)
pub async fn menu(State(state): State<ServerState>) -> AppResult<Json<Vec<FoodItemWithCategory>>> {
    let items = food_item::find_available(&state.pool).await?;
    Ok(Json(items))
}

/// GET /api/food-items/:id - 获取单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<FoodItem>> {
    let item = food_item::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Food item {id} not found")))?;
    Ok(Json(item))
}

/// POST /api/food-items - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FoodItemCreate>,
) -> AppResult<Json<FoodItem>> {
    let item = food_item::create(&state.pool, payload).await?;
    Ok(Json(item))
}

/// PUT /api/food-items/:id - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<FoodItemUpdate>,
) -> AppResult<Json<FoodItem>> {
    let item = food_item::update(&state.pool, id, payload).await?;
    Ok(Json(item))
}

/// DELETE /api/food-items/:id - 删除菜品
///
/// 被订单引用的菜品无法删除 (订单账本不可变)，返回 409
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = food_item::delete(&state.pool, id).await?;
    Ok(Json(result))
}
