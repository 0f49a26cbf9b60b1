//! Order Placement Transaction
//!
//! Drains a user's cart into a new order as a single atomic unit:
//! order row + order lines + stock debits + cart clear all commit
//! together or not at all.
//!
//! The stock debit is a conditional compare-and-decrement per item. When
//! it reports zero rows affected another transaction consumed the stock
//! between our snapshot and our write — the whole transaction rolls back
//! and placement retries from a fresh snapshot, a bounded number of times.

use sqlx::SqlitePool;

use crate::db::repository::{cart, food_item, order};
use crate::orders::OrderError;
use shared::models::{CartItemWithFood, Order, OrderItem, OrderStatus, OrderWithItems};
use shared::util::{now_millis, snowflake_id};

/// Snapshot-validate-commit attempts before surfacing `Conflict`
const MAX_PLACEMENT_ATTEMPTS: u32 = 3;

/// Convert the user's cart into an order, deducting stock.
pub async fn place_order(pool: &SqlitePool, user_id: i64) -> Result<OrderWithItems, OrderError> {
    let mut attempt = 0;
    loop {
        attempt += 1;

        // Step 1: snapshot cart rows with live price and stock.
        // price_at_order is frozen from this snapshot — never re-read later.
        let snapshot = cart::find_by_user(pool, user_id).await?;
        if snapshot.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        // Step 2: validate against the snapshot. A cart that demands more
        // than exists fails outright — retrying cannot help.
        let short: Vec<String> = snapshot
            .iter()
            .filter(|row| row.quantity > row.stock_quantity)
            .map(|row| row.name.clone())
            .collect();
        if !short.is_empty() {
            return Err(OrderError::InsufficientStock { items: short });
        }

        // Steps 3-7: the atomic unit.
        match commit_order(pool, user_id, &snapshot).await? {
            Some(placed) => {
                tracing::info!(
                    order_id = placed.order.id,
                    user_id,
                    items = placed.items.len(),
                    "order placed"
                );
                return Ok(placed);
            }
            None => {
                // Lost a stock race after validation passed.
                if attempt >= MAX_PLACEMENT_ATTEMPTS {
                    return Err(OrderError::Conflict(format!(
                        "Order placement for user {user_id} kept losing the stock race"
                    )));
                }
                tracing::debug!(user_id, attempt, "stock moved under placement, retrying");
            }
        }
    }
}

/// One transactional attempt. `Ok(None)` means a compare-and-decrement
/// found the snapshot stale; the transaction is rolled back and nothing
/// was written.
pub(crate) async fn commit_order(
    pool: &SqlitePool,
    user_id: i64,
    snapshot: &[CartItemWithFood],
) -> Result<Option<OrderWithItems>, OrderError> {
    let now = now_millis();
    let order_id = snowflake_id();

    let mut tx = pool.begin().await?;

    order::create_order(&mut tx, order_id, user_id, now).await?;

    let mut items = Vec::with_capacity(snapshot.len());
    for row in snapshot {
        let item_id = order::insert_item(
            &mut tx,
            order_id,
            row.food_item_id,
            row.quantity,
            row.price, // snapshot price, not the live one at commit time
        )
        .await?;
        items.push(OrderItem {
            id: item_id,
            order_id,
            food_item_id: row.food_item_id,
            quantity: row.quantity,
            price_at_order: row.price,
        });

        if !food_item::try_decrement_stock(&mut tx, row.food_item_id, row.quantity, now).await? {
            // Dropping tx rolls back the order row, the lines inserted so
            // far and every earlier decrement.
            return Ok(None);
        }
    }

    cart::clear_user(&mut tx, user_id).await?;
    tx.commit().await?;

    Ok(Some(OrderWithItems {
        order: Order {
            id: order_id,
            user_id,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        },
        items,
    }))
}
