//! Order Status Machine
//!
//! Owns every write to `orders.status` and the compensating stock
//! adjustments tied to cancellation:
//!
//! - entering `Cancelled` restocks every order line;
//! - leaving `Cancelled` re-debits stock with the same
//!   compare-and-decrement discipline as placement;
//! - all other transitions touch no stock.
//!
//! The status write is a compare-and-set on the old status, executed in
//! one transaction with the stock writes, so duplicate or concurrent
//! transition requests restock/debit exactly once.

use sqlx::SqlitePool;

use crate::db::repository::{food_item, order};
use crate::orders::OrderError;
use shared::models::{Order, OrderItem, OrderStatus};
use shared::util::now_millis;

/// Position on the forward path; `Cancelled` sits outside it.
fn forward_rank(status: OrderStatus) -> Option<u8> {
    match status {
        OrderStatus::Pending => Some(0),
        OrderStatus::Processing => Some(1),
        OrderStatus::Ready => Some(2),
        OrderStatus::Completed => Some(3),
        OrderStatus::Cancelled => None,
    }
}

/// Whether `from -> to` is a legal transition (`from == to` is handled by
/// the caller as a no-op and is not asked here).
pub fn transition_allowed(from: OrderStatus, to: OrderStatus) -> bool {
    match (forward_rank(from), forward_rank(to)) {
        // Completed is terminal; otherwise cancellation is always open
        (Some(f), None) => f < 3,
        // un-cancel: back into any point of the forward path
        (None, Some(_)) => true,
        // forward path moves only forward (skips allowed)
        (Some(f), Some(t)) => f < t,
        (None, None) => false,
    }
}

/// Compensating stock deltas for a transition, one `(food_item_id, delta)`
/// per order line. Pure — storage-free and unit-testable.
pub fn stock_adjustments(
    from: OrderStatus,
    to: OrderStatus,
    items: &[OrderItem],
) -> Vec<(i64, i64)> {
    let entering_cancel = to == OrderStatus::Cancelled && from != OrderStatus::Cancelled;
    let leaving_cancel = from == OrderStatus::Cancelled && to != OrderStatus::Cancelled;

    if entering_cancel {
        items.iter().map(|i| (i.food_item_id, i.quantity)).collect()
    } else if leaving_cancel {
        items.iter().map(|i| (i.food_item_id, -i.quantity)).collect()
    } else {
        Vec::new()
    }
}

/// Transition an order to `new_status`, applying stock compensation
/// atomically with the status write.
pub async fn set_status(
    pool: &SqlitePool,
    order_id: i64,
    new_status: OrderStatus,
) -> Result<Order, OrderError> {
    let mut tx = pool.begin().await?;

    let current = order::find_by_id_conn(&mut tx, order_id)
        .await?
        .ok_or_else(|| OrderError::NotFound(format!("Order {order_id}")))?;

    // Duplicate request — already there, nothing to compensate.
    if current.status == new_status {
        return Ok(current);
    }

    if !transition_allowed(current.status, new_status) {
        return Err(OrderError::InvalidTransition {
            from: current.status,
            to: new_status,
        });
    }

    let now = now_millis();
    let rows =
        order::update_status_checked(&mut tx, order_id, current.status, new_status, now).await?;
    if rows == 0 {
        // A concurrent transition won the compare-and-set. Re-read: a
        // duplicate of the same request is a no-op, anything else is a
        // real conflict.
        drop(tx);
        let after = order::require(pool, order_id).await?;
        if after.status == new_status {
            return Ok(after);
        }
        return Err(OrderError::Conflict(format!(
            "Order {order_id} was moved to {} concurrently",
            after.status
        )));
    }

    let items = order::items_by_order_conn(&mut tx, order_id).await?;
    for (food_item_id, delta) in stock_adjustments(current.status, new_status, &items) {
        if delta > 0 {
            food_item::restock(&mut tx, food_item_id, delta, now).await?;
        } else if !food_item::try_decrement_stock(&mut tx, food_item_id, -delta, now).await? {
            // Not enough stock to revive this order; roll everything back.
            let name = food_item::name_of(&mut tx, food_item_id).await?;
            return Err(OrderError::InsufficientStock { items: vec![name] });
        }
    }

    tx.commit().await?;

    tracing::info!(
        order_id,
        from = %current.status,
        to = %new_status,
        "order status changed"
    );

    Ok(Order {
        status: new_status,
        updated_at: now,
        ..current
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::{memory_pool, seed_cart_row, seed_food_item, stock_of};
    use crate::orders::placement::place_order;

    fn line(food_item_id: i64, quantity: i64) -> OrderItem {
        OrderItem {
            id: 0,
            order_id: 0,
            food_item_id,
            quantity,
            price_at_order: 1.0,
        }
    }

    // ── pure transition logic ────────────────────────────────

    #[test]
    fn forward_moves_only_forward() {
        use OrderStatus::*;
        assert!(transition_allowed(Pending, Processing));
        assert!(transition_allowed(Processing, Ready));
        assert!(transition_allowed(Ready, Completed));
        assert!(transition_allowed(Pending, Completed), "skips allowed");

        assert!(!transition_allowed(Processing, Pending));
        assert!(!transition_allowed(Completed, Ready));
    }

    #[test]
    fn cancellation_edges() {
        use OrderStatus::*;
        assert!(transition_allowed(Pending, Cancelled));
        assert!(transition_allowed(Ready, Cancelled));
        assert!(!transition_allowed(Completed, Cancelled), "completed is terminal");

        // un-cancel into any non-cancelled state
        assert!(transition_allowed(Cancelled, Pending));
        assert!(transition_allowed(Cancelled, Processing));
        assert!(transition_allowed(Cancelled, Completed));
    }

    #[test]
    fn adjustments_only_cross_the_cancel_boundary() {
        use OrderStatus::*;
        let items = vec![line(7, 2), line(8, 1)];

        assert_eq!(
            stock_adjustments(Pending, Cancelled, &items),
            vec![(7, 2), (8, 1)]
        );
        assert_eq!(
            stock_adjustments(Cancelled, Processing, &items),
            vec![(7, -2), (8, -1)]
        );
        assert!(stock_adjustments(Pending, Processing, &items).is_empty());
        assert!(stock_adjustments(Ready, Completed, &items).is_empty());
    }

    // ── storage-backed flows ─────────────────────────────────

    async fn seeded_order(pool: &SqlitePool, stock: i64, qty: i64) -> (i64, i64) {
        let item = seed_food_item(pool, "Cochinillo", 21.0, stock).await;
        seed_cart_row(pool, 1, item, qty).await;
        let placed = place_order(pool, 1).await.unwrap();
        (placed.order.id, item)
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let pool = memory_pool().await;
        let err = set_status(&pool, 404, OrderStatus::Processing).await.unwrap_err();
        assert!(matches!(err, OrderError::NotFound(_)));
    }

    #[tokio::test]
    async fn forward_transition_touches_no_stock() {
        let pool = memory_pool().await;
        let (order_id, item) = seeded_order(&pool, 5, 2).await;
        assert_eq!(stock_of(&pool, item).await, 3);

        let order = set_status(&pool, order_id, OrderStatus::Processing).await.unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(stock_of(&pool, item).await, 3);
    }

    #[tokio::test]
    async fn cancel_restocks_exactly_once() {
        let pool = memory_pool().await;
        let (order_id, item) = seeded_order(&pool, 5, 2).await;
        assert_eq!(stock_of(&pool, item).await, 3);

        let order = set_status(&pool, order_id, OrderStatus::Cancelled).await.unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(stock_of(&pool, item).await, 5, "restocked");

        // second cancel is a no-op — restocks once, not twice
        let again = set_status(&pool, order_id, OrderStatus::Cancelled).await.unwrap();
        assert_eq!(again.status, OrderStatus::Cancelled);
        assert_eq!(stock_of(&pool, item).await, 5);
    }

    #[tokio::test]
    async fn cancel_uncancel_cancel_is_symmetric() {
        let pool = memory_pool().await;
        let (order_id, item) = seeded_order(&pool, 5, 2).await;
        let debited = stock_of(&pool, item).await;
        assert_eq!(debited, 3);

        set_status(&pool, order_id, OrderStatus::Cancelled).await.unwrap();
        assert_eq!(stock_of(&pool, item).await, 5);

        set_status(&pool, order_id, OrderStatus::Processing).await.unwrap();
        assert_eq!(stock_of(&pool, item).await, 3, "un-cancel re-debits");

        set_status(&pool, order_id, OrderStatus::Cancelled).await.unwrap();
        assert_eq!(stock_of(&pool, item).await, 5, "back to the original level");
    }

    #[tokio::test]
    async fn uncancel_fails_when_stock_is_gone() {
        let pool = memory_pool().await;
        let (order_id, item) = seeded_order(&pool, 2, 2).await;

        set_status(&pool, order_id, OrderStatus::Cancelled).await.unwrap();
        assert_eq!(stock_of(&pool, item).await, 2);

        // someone else takes the stock while the order sits cancelled
        sqlx::query("UPDATE food_item SET stock_quantity = 1 WHERE id = ?")
            .bind(item)
            .execute(&pool)
            .await
            .unwrap();

        let err = set_status(&pool, order_id, OrderStatus::Processing).await.unwrap_err();
        match err {
            OrderError::InsufficientStock { items } => assert_eq!(items, vec!["Cochinillo"]),
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // transition rolled back: still cancelled, stock untouched
        let order = order::require(&pool, order_id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(stock_of(&pool, item).await, 1);
    }

    #[tokio::test]
    async fn completed_is_terminal() {
        let pool = memory_pool().await;
        let (order_id, _) = seeded_order(&pool, 5, 1).await;

        set_status(&pool, order_id, OrderStatus::Completed).await.unwrap();

        let err = set_status(&pool, order_id, OrderStatus::Pending).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));
        let err = set_status(&pool, order_id, OrderStatus::Cancelled).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn backward_moves_are_rejected() {
        let pool = memory_pool().await;
        let (order_id, _) = seeded_order(&pool, 5, 1).await;

        set_status(&pool, order_id, OrderStatus::Ready).await.unwrap();
        let err = set_status(&pool, order_id, OrderStatus::Pending).await.unwrap_err();
        assert!(matches!(
            err,
            OrderError::InvalidTransition {
                from: OrderStatus::Ready,
                to: OrderStatus::Pending
            }
        ));
    }
}
