//! Cart Repository
//!
//! Row-level SQL for the per-user cart. The admission rules (stock
//! ceiling, wish-list semantics) live in [`crate::orders::cart`].

use super::{RepoError, RepoResult};
use shared::models::{CartItem, CartItemWithFood};
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqlitePool};

const CART_SELECT: &str =
    "SELECT id, user_id, food_item_id, quantity, created_at, updated_at FROM cart_item";

const CART_WITH_FOOD_SELECT: &str = "SELECT c.id, c.user_id, c.food_item_id, c.quantity, f.name, f.description, f.price, f.image_url, f.availability, f.stock_quantity FROM cart_item c JOIN food_item f ON c.food_item_id = f.id";

/// Cart rows joined with live food item fields (price, availability, stock)
pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<CartItemWithFood>> {
    let sql = format!("{CART_WITH_FOOD_SELECT} WHERE c.user_id = ? ORDER BY c.created_at, c.id");
    let rows = sqlx::query_as::<_, CartItemWithFood>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn count_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_item WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn find_row(
    pool: &SqlitePool,
    user_id: i64,
    food_item_id: i64,
) -> RepoResult<Option<CartItem>> {
    let sql = format!("{CART_SELECT} WHERE user_id = ? AND food_item_id = ?");
    let row = sqlx::query_as::<_, CartItem>(&sql)
        .bind(user_id)
        .bind(food_item_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_with_food_by_id(
    pool: &SqlitePool,
    cart_item_id: i64,
) -> RepoResult<Option<CartItemWithFood>> {
    let sql = format!("{CART_WITH_FOOD_SELECT} WHERE c.id = ?");
    let row = sqlx::query_as::<_, CartItemWithFood>(&sql)
        .bind(cart_item_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert the row or add to its quantity — one statement, per-row atomic.
pub async fn upsert_add(
    pool: &SqlitePool,
    user_id: i64,
    food_item_id: i64,
    qty: i64,
) -> RepoResult<()> {
    let now = now_millis();
    sqlx::query(
        "INSERT INTO cart_item (user_id, food_item_id, quantity, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4) ON CONFLICT (user_id, food_item_id) DO UPDATE SET quantity = quantity + excluded.quantity, updated_at = excluded.updated_at",
    )
    .bind(user_id)
    .bind(food_item_id)
    .bind(qty)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Unconditional quantity replace (no stock re-check here)
pub async fn set_quantity(pool: &SqlitePool, cart_item_id: i64, qty: i64) -> RepoResult<()> {
    let now = now_millis();
    let rows = sqlx::query("UPDATE cart_item SET quantity = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(qty)
        .bind(now)
        .bind(cart_item_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Cart item {cart_item_id} not found"
        )));
    }
    Ok(())
}

/// Idempotent delete — removing an absent row is a no-op, not an error.
pub async fn remove(pool: &SqlitePool, cart_item_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM cart_item WHERE id = ?")
        .bind(cart_item_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Delete every cart row of a user. Transaction-scoped: order placement
/// clears the cart atomically with the order writes.
pub async fn clear_user(conn: &mut SqliteConnection, user_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM cart_item WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::{memory_pool, seed_food_item};

    #[tokio::test]
    async fn upsert_accumulates_quantity() {
        let pool = memory_pool().await;
        let item = seed_food_item(&pool, "Croquetas", 5.0, 10).await;

        upsert_add(&pool, 1, item, 2).await.unwrap();
        upsert_add(&pool, 1, item, 3).await.unwrap();

        let row = find_row(&pool, 1, item).await.unwrap().unwrap();
        assert_eq!(row.quantity, 5);

        // one row per (user, item)
        assert_eq!(count_by_user(&pool, 1).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let pool = memory_pool().await;
        let item = seed_food_item(&pool, "Pan", 1.0, 10).await;
        upsert_add(&pool, 1, item, 1).await.unwrap();
        let row = find_row(&pool, 1, item).await.unwrap().unwrap();

        assert!(remove(&pool, row.id).await.unwrap());
        assert!(!remove(&pool, row.id).await.unwrap());
    }

    #[tokio::test]
    async fn clear_user_only_touches_that_user() {
        let pool = memory_pool().await;
        let item = seed_food_item(&pool, "Agua", 1.5, 100).await;
        upsert_add(&pool, 1, item, 1).await.unwrap();
        upsert_add(&pool, 2, item, 2).await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(clear_user(&mut conn, 1).await.unwrap(), 1);
        drop(conn);

        assert_eq!(count_by_user(&pool, 1).await.unwrap(), 0);
        assert_eq!(count_by_user(&pool, 2).await.unwrap(), 1);
    }
}
