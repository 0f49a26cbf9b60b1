//! Data Models
//!
//! Plain serde structs for every persisted entity plus the joined view
//! types the API returns. `sqlx::FromRow` / `sqlx::Type` derives are
//! enabled through the `db` feature.

pub mod cart;
pub mod category;
pub mod food_item;
pub mod order;

// Re-exports
pub use cart::{CartItem, CartItemWithFood};
pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use food_item::{FoodItem, FoodItemCreate, FoodItemUpdate, FoodItemWithCategory};
pub use order::{
    Order, OrderCharges, OrderItem, OrderItemDetail, OrderStatus, OrderSummary, OrderWithItems,
};
