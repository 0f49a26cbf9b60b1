//! Food Item Model

use serde::{Deserialize, Serialize};

/// Food item entity (菜品)
///
/// `stock_quantity` never goes negative: every debit goes through a
/// conditional compare-and-decrement in the order engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct FoodItem {
    pub id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i64,
    pub availability: bool,
    pub image_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create food item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: Option<i64>,
    pub stock_quantity: Option<i64>,
    pub availability: Option<bool>,
    pub image_url: Option<String>,
}

/// Update food item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<i64>,
    pub stock_quantity: Option<i64>,
    pub availability: Option<bool>,
    pub image_url: Option<String>,
}

/// Food item with category name (for menu/admin list views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct FoodItemWithCategory {
    pub id: i64,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i64,
    pub availability: bool,
    pub image_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
