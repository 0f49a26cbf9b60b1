//! Order API 模块

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::place))
        // static segments must come before /{id} to avoid path conflicts
        .route("/current/{user_id}", get(handler::current))
        .route("/history/{user_id}", get(handler::history))
        .route("/revenue/today", get(handler::revenue_today))
        .route("/{id}", get(handler::details))
        .route("/{id}/status", put(handler::set_status))
}
