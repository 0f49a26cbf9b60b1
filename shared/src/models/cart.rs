//! Cart Model
//!
//! One row per `(user_id, food_item_id)`. The cart is a wish list, not a
//! stock reservation — availability is re-verified when the order is placed.

use serde::{Deserialize, Serialize};

/// Cart row (购物车行)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub food_item_id: i64,
    pub quantity: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Cart row joined with live food item fields, so callers always see
/// current pricing and availability rather than a stale copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItemWithFood {
    pub id: i64,
    pub user_id: i64,
    pub food_item_id: i64,
    pub quantity: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub availability: bool,
    pub stock_quantity: i64,
}
