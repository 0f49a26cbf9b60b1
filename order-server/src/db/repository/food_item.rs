//! Food Item Repository
//!
//! Catalog CRUD plus the conditional stock writes the order engine builds
//! on. Stock never changes through a read-then-write pair: debits are a
//! single compare-and-decrement statement, so two concurrent transactions
//! cannot both take the last unit.

use super::{RepoError, RepoResult};
use shared::models::{FoodItem, FoodItemCreate, FoodItemUpdate, FoodItemWithCategory};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

const FOOD_ITEM_SELECT: &str = "SELECT id, category_id, name, description, price, stock_quantity, availability, image_url, created_at, updated_at FROM food_item";

const FOOD_WITH_CATEGORY_SELECT: &str = "SELECT f.id, f.category_id, c.name AS category_name, f.name, f.description, f.price, f.stock_quantity, f.availability, f.image_url, f.created_at, f.updated_at FROM food_item f LEFT JOIN category c ON f.category_id = c.id";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<FoodItemWithCategory>> {
    let sql = format!("{FOOD_WITH_CATEGORY_SELECT} ORDER BY f.name");
    let rows = sqlx::query_as::<_, FoodItemWithCategory>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Menu view: available items only
pub async fn find_available(pool: &SqlitePool) -> RepoResult<Vec<FoodItemWithCategory>> {
    let sql = format!("{FOOD_WITH_CATEGORY_SELECT} WHERE f.availability = 1 ORDER BY f.name");
    let rows = sqlx::query_as::<_, FoodItemWithCategory>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<FoodItem>> {
    let sql = format!("{FOOD_ITEM_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, FoodItem>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: FoodItemCreate) -> RepoResult<FoodItem> {
    if data.price < 0.0 || !data.price.is_finite() {
        return Err(RepoError::Validation(format!(
            "price must be a non-negative number, got {}",
            data.price
        )));
    }
    if data.stock_quantity.is_some_and(|q| q < 0) {
        return Err(RepoError::Validation(
            "stock_quantity must be non-negative".into(),
        ));
    }

    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO food_item (id, category_id, name, description, price, stock_quantity, availability, image_url, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
    )
    .bind(id)
    .bind(data.category_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.stock_quantity.unwrap_or(0))
    .bind(data.availability.unwrap_or(true))
    .bind(&data.image_url)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create food item".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: FoodItemUpdate) -> RepoResult<FoodItem> {
    if data.price.is_some_and(|p| p < 0.0 || !p.is_finite()) {
        return Err(RepoError::Validation(
            "price must be a non-negative number".into(),
        ));
    }
    if data.stock_quantity.is_some_and(|q| q < 0) {
        return Err(RepoError::Validation(
            "stock_quantity must be non-negative".into(),
        ));
    }

    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE food_item SET name = COALESCE(?1, name), description = COALESCE(?2, description), price = COALESCE(?3, price), category_id = COALESCE(?4, category_id), stock_quantity = COALESCE(?5, stock_quantity), availability = COALESCE(?6, availability), image_url = COALESCE(?7, image_url), updated_at = ?8 WHERE id = ?9",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.category_id)
    .bind(data.stock_quantity)
    .bind(data.availability)
    .bind(&data.image_url)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Food item {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Food item {id} not found")))
}

/// Hard delete. Fails with a conflict when the item is referenced by any
/// order line — the order ledger is permanent.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM food_item WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await;
    match result {
        Ok(rows) => Ok(rows.rows_affected() > 0),
        Err(e) => match RepoError::from(e) {
            RepoError::Conflict(_) => Err(RepoError::Conflict(format!(
                "Food item {id} is referenced by existing orders"
            ))),
            other => Err(other),
        },
    }
}

// ── Stock adjustments (transaction-scoped) ───────────────────

/// Compare-and-decrement: takes `qty` units only while enough stock
/// remains. Returns false (and writes nothing) when a concurrent
/// transaction got there first.
pub async fn try_decrement_stock(
    conn: &mut SqliteConnection,
    id: i64,
    qty: i64,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE food_item SET stock_quantity = stock_quantity - ?1, updated_at = ?2 WHERE id = ?3 AND stock_quantity >= ?1",
    )
    .bind(qty)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Return `qty` units to stock (order cancellation).
pub async fn restock(conn: &mut SqliteConnection, id: i64, qty: i64, now: i64) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE food_item SET stock_quantity = stock_quantity + ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(qty)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Food item {id} not found")));
    }
    Ok(())
}

/// Name lookup for error messages inside a failing transaction.
pub async fn name_of(conn: &mut SqliteConnection, id: i64) -> RepoResult<String> {
    let name: Option<String> = sqlx::query_scalar("SELECT name FROM food_item WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(name.unwrap_or_else(|| format!("food item {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::{memory_pool, seed_food_item, stock_of};
    use shared::util::now_millis;

    #[tokio::test]
    async fn decrement_respects_stock_floor() {
        let pool = memory_pool().await;
        let id = seed_food_item(&pool, "Paella", 14.5, 1).await;

        let mut conn = pool.acquire().await.unwrap();
        assert!(!try_decrement_stock(&mut conn, id, 2, now_millis()).await.unwrap());
        assert_eq!(stock_of(&pool, id).await, 1, "failed CAS must not change stock");

        assert!(try_decrement_stock(&mut conn, id, 1, now_millis()).await.unwrap());
        assert_eq!(stock_of(&pool, id).await, 0);

        // nothing left — a further decrement is refused, never negative
        assert!(!try_decrement_stock(&mut conn, id, 1, now_millis()).await.unwrap());
        assert_eq!(stock_of(&pool, id).await, 0);
    }

    #[tokio::test]
    async fn restock_adds_back() {
        let pool = memory_pool().await;
        let id = seed_food_item(&pool, "Gazpacho", 6.0, 3).await;

        let mut conn = pool.acquire().await.unwrap();
        restock(&mut conn, id, 2, now_millis()).await.unwrap();
        assert_eq!(stock_of(&pool, id).await, 5);
    }

    #[tokio::test]
    async fn delete_is_blocked_by_order_references() {
        let pool = memory_pool().await;
        let id = seed_food_item(&pool, "Tortilla", 8.0, 5).await;

        // Minimal order referencing the item
        let now = now_millis();
        sqlx::query("INSERT INTO orders (id, user_id, status, created_at, updated_at) VALUES (1, 7, 'Pending', ?1, ?1)")
            .bind(now)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO order_item (order_id, food_item_id, quantity, price_at_order) VALUES (1, ?, 1, 8.0)")
            .bind(id)
            .execute(&pool)
            .await
            .unwrap();

        let err = delete(&pool, id).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));

        // still present
        assert!(find_by_id(&pool, id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_unreferenced_item() {
        let pool = memory_pool().await;
        let id = seed_food_item(&pool, "Flan", 4.0, 2).await;
        assert!(delete(&pool, id).await.unwrap());
        assert!(!delete(&pool, id).await.unwrap());
    }
}
