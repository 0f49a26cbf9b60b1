//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`categories`] - 分类管理接口
//! - [`food_items`] - 菜品管理接口 (含 /api/menu)
//! - [`cart`] - 购物车接口
//! - [`orders`] - 订单接口 (下单、状态、历史、营收)
//! - [`favorites`] - 收藏接口

pub mod cart;
pub mod categories;
pub mod favorites;
pub mod food_items;
pub mod health;
pub mod orders;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::ServerState;

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(categories::router())
        .merge(food_items::router())
        .merge(cart::router())
        .merge(orders::router())
        .merge(favorites::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

// Re-export common types for handlers
pub use crate::utils::{AppResult, ok};
