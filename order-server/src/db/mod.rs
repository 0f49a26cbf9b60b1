//! Database Module
//!
//! Handles the SQLite connection pool and migrations

pub mod repository;

use crate::utils::AppError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;

/// Embedded migrations — shared with the test pools so test schemas can
/// never drift from production.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Database service — owns a SQLite connection pool
#[derive(Clone, Debug)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Create a new database service with WAL mode and migrations applied
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        // Build connection options: WAL, foreign keys, normal sync
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON")
            // busy_timeout: 写冲突时等待 5s 而非立即失败
            // (set through the connect options so every pooled connection gets it)
            .pragma("busy_timeout", "5000")
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    //! Shared fixtures for repository and engine tests.

    use super::MIGRATOR;
    use shared::util::{now_millis, snowflake_id};
    use sqlx::SqlitePool;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    /// In-memory pool with the real schema. A bare `sqlite::memory:` URI
    /// gives every connection its own database, so a test that holds an
    /// acquired connection while also reading through the pool needs a
    /// *shared* in-memory database: a uniquely-named `cache=shared` memory
    /// DB that all pooled connections see. The unique name keeps parallel
    /// tests isolated; `min_connections(1)` keeps the database alive for
    /// the pool's lifetime.
    pub async fn memory_pool() -> SqlitePool {
        let uri = format!("file:memdb_{}?mode=memory&cache=shared", snowflake_id());
        let options = SqliteConnectOptions::from_str(&uri)
            .unwrap()
            .pragma("foreign_keys", "ON");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .min_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        MIGRATOR.run(&pool).await.unwrap();
        pool
    }

    pub async fn seed_category(pool: &SqlitePool, name: &str) -> i64 {
        let id = snowflake_id();
        let now = now_millis();
        sqlx::query(
            "INSERT INTO category (id, name, description, image_url, created_at, updated_at) VALUES (?1, ?2, NULL, NULL, ?3, ?3)",
        )
        .bind(id)
        .bind(name)
        .bind(now)
        .execute(pool)
        .await
        .unwrap();
        id
    }

    pub async fn seed_food_item(pool: &SqlitePool, name: &str, price: f64, stock: i64) -> i64 {
        let id = snowflake_id();
        let now = now_millis();
        sqlx::query(
            "INSERT INTO food_item (id, category_id, name, description, price, stock_quantity, availability, image_url, created_at, updated_at) VALUES (?1, NULL, ?2, NULL, ?3, ?4, 1, NULL, ?5, ?5)",
        )
        .bind(id)
        .bind(name)
        .bind(price)
        .bind(stock)
        .bind(now)
        .execute(pool)
        .await
        .unwrap();
        id
    }

    pub async fn seed_cart_row(pool: &SqlitePool, user_id: i64, food_item_id: i64, qty: i64) {
        let now = now_millis();
        sqlx::query(
            "INSERT INTO cart_item (user_id, food_item_id, quantity, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
        )
        .bind(user_id)
        .bind(food_item_id)
        .bind(qty)
        .bind(now)
        .execute(pool)
        .await
        .unwrap();
    }

    pub async fn stock_of(pool: &SqlitePool, food_item_id: i64) -> i64 {
        sqlx::query_scalar("SELECT stock_quantity FROM food_item WHERE id = ?")
            .bind(food_item_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }
}
