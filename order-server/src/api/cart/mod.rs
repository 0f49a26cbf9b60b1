//! Cart API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::add))
        // item routes must come before /{user_id} to avoid path conflicts
        .route("/item/{id}", put(handler::set_quantity).delete(handler::remove))
        .route("/{user_id}", get(handler::list))
        .route("/{user_id}/count", get(handler::count))
}
