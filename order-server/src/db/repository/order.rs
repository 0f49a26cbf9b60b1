//! Order Repository
//!
//! Reads and writes for the order ledger. `order_item` rows are
//! insert-only; `orders.status` is the single mutable column and is only
//! written through the checked compare-and-set below.

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderItem, OrderItemDetail, OrderStatus};
use sqlx::{SqliteConnection, SqlitePool};

const ORDER_SELECT: &str = "SELECT id, user_id, status, created_at, updated_at FROM orders";

const ITEM_SELECT: &str =
    "SELECT id, order_id, food_item_id, quantity, price_at_order FROM order_item";

const ITEM_DETAIL_SELECT: &str = "SELECT oi.id, oi.order_id, oi.food_item_id, f.name, f.image_url, oi.quantity, oi.price_at_order FROM order_item oi JOIN food_item f ON oi.food_item_id = f.id";

// ── Writes (transaction-scoped) ──────────────────────────────

pub async fn create_order(
    conn: &mut SqliteConnection,
    id: i64,
    user_id: i64,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, user_id, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
    )
    .bind(id)
    .bind(user_id)
    .bind(OrderStatus::Pending.as_str())
    .bind(now)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn insert_item(
    conn: &mut SqliteConnection,
    order_id: i64,
    food_item_id: i64,
    quantity: i64,
    price_at_order: f64,
) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO order_item (order_id, food_item_id, quantity, price_at_order) VALUES (?1, ?2, ?3, ?4) RETURNING id",
    )
    .bind(order_id)
    .bind(food_item_id)
    .bind(quantity)
    .bind(price_at_order)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

/// Compare-and-set status write: only succeeds while the row still holds
/// `from`, so a concurrent duplicate transition affects zero rows.
pub async fn update_status_checked(
    conn: &mut SqliteConnection,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4")
        .bind(to.as_str())
        .bind(now)
        .bind(id)
        .bind(from.as_str())
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected())
}

// ── Reads ────────────────────────────────────────────────────

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_id_conn(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row)
}

pub async fn items_by_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let mut conn = pool.acquire().await?;
    items_by_order_conn(&mut conn, order_id).await
}

pub async fn items_by_order_conn(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> RepoResult<Vec<OrderItem>> {
    let sql = format!("{ITEM_SELECT} WHERE order_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

pub async fn item_details_by_order(
    pool: &SqlitePool,
    order_id: i64,
) -> RepoResult<Vec<OrderItemDetail>> {
    let sql = format!("{ITEM_DETAIL_SELECT} WHERE oi.order_id = ? ORDER BY oi.id");
    let rows = sqlx::query_as::<_, OrderItemDetail>(&sql)
        .bind(order_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// All orders of a user, newest first
pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE user_id = ? ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// The user's most recent order still in the kitchen pipeline
pub async fn current_for_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Option<Order>> {
    let sql = format!(
        "{ORDER_SELECT} WHERE user_id = ? AND status IN ('Pending', 'Processing', 'Ready') ORDER BY created_at DESC, id DESC LIMIT 1"
    );
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Admin listing, optionally filtered by status, newest first
pub async fn find_all(pool: &SqlitePool, status: Option<OrderStatus>) -> RepoResult<Vec<Order>> {
    let rows = match status {
        Some(s) => {
            let sql = format!("{ORDER_SELECT} WHERE status = ? ORDER BY created_at DESC, id DESC");
            sqlx::query_as::<_, Order>(&sql)
                .bind(s.as_str())
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{ORDER_SELECT} ORDER BY created_at DESC, id DESC");
            sqlx::query_as::<_, Order>(&sql).fetch_all(pool).await?
        }
    };
    Ok(rows)
}

/// `(price_at_order, quantity)` pairs for every non-cancelled order
/// created in `[start, end)` — revenue reporting input.
pub async fn item_lines_in_range(
    pool: &SqlitePool,
    start: i64,
    end: i64,
) -> RepoResult<Vec<(f64, i64)>> {
    let rows = sqlx::query_as::<_, (f64, i64)>(
        "SELECT oi.price_at_order, oi.quantity FROM order_item oi JOIN orders o ON oi.order_id = o.id WHERE o.created_at >= ?1 AND o.created_at < ?2 AND o.status != 'Cancelled'",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Lookup that fails loudly — for callers that already know the id.
pub async fn require(pool: &SqlitePool, id: i64) -> RepoResult<Order> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::{memory_pool, seed_food_item};
    use shared::util::{now_millis, snowflake_id};

    async fn seed_order(pool: &SqlitePool, user_id: i64, status: OrderStatus, created_at: i64) -> i64 {
        let id = snowflake_id();
        sqlx::query("INSERT INTO orders (id, user_id, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)")
            .bind(id)
            .bind(user_id)
            .bind(status.as_str())
            .bind(created_at)
            .execute(pool)
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn current_picks_latest_active_order() {
        let pool = memory_pool().await;
        let now = now_millis();
        seed_order(&pool, 1, OrderStatus::Completed, now - 10).await;
        let older = seed_order(&pool, 1, OrderStatus::Pending, now - 5).await;
        let newer = seed_order(&pool, 1, OrderStatus::Processing, now).await;
        seed_order(&pool, 2, OrderStatus::Pending, now).await;

        let current = current_for_user(&pool, 1).await.unwrap().unwrap();
        assert_eq!(current.id, newer);
        assert_ne!(current.id, older);
    }

    #[tokio::test]
    async fn current_is_none_when_all_terminal() {
        let pool = memory_pool().await;
        let now = now_millis();
        seed_order(&pool, 1, OrderStatus::Completed, now).await;
        seed_order(&pool, 1, OrderStatus::Cancelled, now).await;

        assert!(current_for_user(&pool, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn status_filter_and_ordering() {
        let pool = memory_pool().await;
        let now = now_millis();
        seed_order(&pool, 1, OrderStatus::Pending, now - 2).await;
        seed_order(&pool, 2, OrderStatus::Completed, now - 1).await;
        let latest_pending = seed_order(&pool, 3, OrderStatus::Pending, now).await;

        let pending = find_all(&pool, Some(OrderStatus::Pending)).await.unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, latest_pending, "newest first");

        let all = find_all(&pool, None).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn revenue_lines_skip_cancelled_orders() {
        let pool = memory_pool().await;
        let item = seed_food_item(&pool, "Bocadillo", 4.5, 10).await;
        let now = now_millis();

        let kept = seed_order(&pool, 1, OrderStatus::Completed, now).await;
        let cancelled = seed_order(&pool, 1, OrderStatus::Cancelled, now).await;
        for (order_id, qty) in [(kept, 2_i64), (cancelled, 5)] {
            sqlx::query("INSERT INTO order_item (order_id, food_item_id, quantity, price_at_order) VALUES (?1, ?2, ?3, 4.5)")
                .bind(order_id)
                .bind(item)
                .bind(qty)
                .execute(&pool)
                .await
                .unwrap();
        }

        let lines = item_lines_in_range(&pool, now - 1000, now + 1000).await.unwrap();
        assert_eq!(lines, vec![(4.5, 2)]);
    }
}
