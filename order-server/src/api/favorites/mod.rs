//! Favorites API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/favorites", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{user_id}", get(handler::list))
        .route(
            "/{user_id}/{food_item_id}",
            post(handler::add).delete(handler::remove),
        )
}
