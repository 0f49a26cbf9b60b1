//! Cart Aggregator
//!
//! Owns the `(user, food item) → quantity` mapping and enforces the stock
//! ceiling at admission time. Admission is a best-effort check, not a
//! reservation: stock is re-verified when the order is placed, and a
//! rejected add never touches stock.

use sqlx::SqlitePool;

use crate::db::repository::{cart, food_item};
use crate::orders::OrderError;
use shared::models::CartItemWithFood;

/// Add `quantity` units of a food item to the user's cart.
///
/// Fails with `NotFound` for an unknown item and with
/// `InsufficientStock` when the cart would exceed the live stock level
/// (`current_cart_qty + quantity > stock_quantity`).
pub async fn add_to_cart(
    pool: &SqlitePool,
    user_id: i64,
    food_item_id: i64,
    quantity: i64,
) -> Result<CartItemWithFood, OrderError> {
    if quantity < 1 {
        return Err(OrderError::InvalidQuantity(quantity));
    }

    let food = food_item::find_by_id(pool, food_item_id)
        .await?
        .ok_or_else(|| OrderError::NotFound(format!("Food item {food_item_id}")))?;

    let current = cart::find_row(pool, user_id, food_item_id)
        .await?
        .map(|row| row.quantity)
        .unwrap_or(0);

    if current + quantity > food.stock_quantity {
        return Err(OrderError::InsufficientStock {
            items: vec![food.name],
        });
    }

    cart::upsert_add(pool, user_id, food_item_id, quantity).await?;

    let row = cart::find_row(pool, user_id, food_item_id).await?.ok_or_else(|| {
        OrderError::Database("Cart row missing right after upsert".into())
    })?;
    cart::find_with_food_by_id(pool, row.id)
        .await?
        .ok_or_else(|| OrderError::Database("Cart row missing right after upsert".into()))
}

/// Replace a cart row's quantity. A target below 1 removes the row
/// (returns `None`); otherwise the stored quantity is replaced without a
/// stock re-check — the cart is a wish list, placement re-verifies.
pub async fn set_quantity(
    pool: &SqlitePool,
    cart_item_id: i64,
    quantity: i64,
) -> Result<Option<CartItemWithFood>, OrderError> {
    if quantity < 1 {
        cart::remove(pool, cart_item_id).await?;
        return Ok(None);
    }

    cart::set_quantity(pool, cart_item_id, quantity).await?;
    let row = cart::find_with_food_by_id(pool, cart_item_id)
        .await?
        .ok_or_else(|| OrderError::NotFound(format!("Cart item {cart_item_id}")))?;
    Ok(Some(row))
}

/// Remove a cart row. Removing twice is a no-op, not an error.
pub async fn remove_item(pool: &SqlitePool, cart_item_id: i64) -> Result<bool, OrderError> {
    Ok(cart::remove(pool, cart_item_id).await?)
}

/// Cart rows joined with live catalog fields
pub async fn list_cart(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<CartItemWithFood>, OrderError> {
    Ok(cart::find_by_user(pool, user_id).await?)
}

pub async fn cart_count(pool: &SqlitePool, user_id: i64) -> Result<i64, OrderError> {
    Ok(cart::count_by_user(pool, user_id).await?)
}
