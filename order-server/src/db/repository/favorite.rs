//! Favorites Repository

use super::{RepoError, RepoResult};
use shared::models::FoodItemWithCategory;
use shared::util::now_millis;
use sqlx::SqlitePool;

/// A user's favorite food items, joined with catalog fields
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> RepoResult<Vec<FoodItemWithCategory>> {
    let rows = sqlx::query_as::<_, FoodItemWithCategory>(
        "SELECT f.id, f.category_id, c.name AS category_name, f.name, f.description, f.price, f.stock_quantity, f.availability, f.image_url, f.created_at, f.updated_at FROM food_item f JOIN user_favorite uf ON f.id = uf.food_item_id LEFT JOIN category c ON f.category_id = c.id WHERE uf.user_id = ? ORDER BY uf.created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn add(pool: &SqlitePool, user_id: i64, food_item_id: i64) -> RepoResult<()> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM food_item WHERE id = ?")
        .bind(food_item_id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(RepoError::NotFound(format!(
            "Food item {food_item_id} not found"
        )));
    }

    let result = sqlx::query(
        "INSERT INTO user_favorite (user_id, food_item_id, created_at) VALUES (?1, ?2, ?3)",
    )
    .bind(user_id)
    .bind(food_item_id)
    .bind(now_millis())
    .execute(pool)
    .await;
    match result {
        Ok(_) => Ok(()),
        Err(e) => match RepoError::from(e) {
            RepoError::Duplicate(_) => {
                Err(RepoError::Duplicate("Item already in favorites".into()))
            }
            other => Err(other),
        },
    }
}

pub async fn remove(pool: &SqlitePool, user_id: i64, food_item_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM user_favorite WHERE user_id = ? AND food_item_id = ?")
        .bind(user_id)
        .bind(food_item_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::{memory_pool, seed_food_item};

    #[tokio::test]
    async fn add_list_remove_roundtrip() {
        let pool = memory_pool().await;
        let item = seed_food_item(&pool, "Churros", 3.5, 10).await;

        add(&pool, 1, item).await.unwrap();
        let favs = list_for_user(&pool, 1).await.unwrap();
        assert_eq!(favs.len(), 1);
        assert_eq!(favs[0].name, "Churros");

        assert!(remove(&pool, 1, item).await.unwrap());
        assert!(!remove(&pool, 1, item).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_add_is_rejected() {
        let pool = memory_pool().await;
        let item = seed_food_item(&pool, "Cafe", 1.5, 10).await;

        add(&pool, 1, item).await.unwrap();
        let err = add(&pool, 1, item).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn unknown_food_item_is_not_found() {
        let pool = memory_pool().await;
        let err = add(&pool, 1, 999).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
