//! Money calculation utilities using rust_decimal for precision
//!
//! Prices are stored as `f64` (REAL); every computation converts to
//! `Decimal`, rounds to 2 decimal places half-away-from-zero, and converts
//! back for serialization. An order's total is always derived from the
//! frozen `price_at_order` snapshots, never from live catalog prices.

use rust_decimal::prelude::*;
use shared::models::{OrderCharges, OrderItem, OrderItemDetail};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Sum `(price, quantity)` lines with precise arithmetic
pub fn sum_lines(lines: impl IntoIterator<Item = (f64, i64)>) -> Decimal {
    lines
        .into_iter()
        .map(|(price, qty)| to_decimal(price) * Decimal::from(qty))
        .sum()
}

/// `Σ quantity × price_at_order` — fixed forever once the order exists
pub fn order_total(items: &[OrderItem]) -> f64 {
    to_f64(sum_lines(items.iter().map(|i| (i.price_at_order, i.quantity))))
}

/// Same total over the joined detail rows
pub fn detail_total(items: &[OrderItemDetail]) -> f64 {
    to_f64(sum_lines(items.iter().map(|i| (i.price_at_order, i.quantity))))
}

/// Flat charge breakdown: percentage tax plus a fixed delivery fee on top
/// of the item subtotal. The only pricing arithmetic in the system — no
/// promotions, no discounts.
pub fn compute_charges(subtotal: f64, tax_rate_percent: f64, delivery_fee: f64) -> OrderCharges {
    let subtotal_dec = to_decimal(subtotal);
    let tax = (subtotal_dec * to_decimal(tax_rate_percent) / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    let fee = to_decimal(delivery_fee);
    OrderCharges {
        subtotal: to_f64(subtotal_dec),
        tax: to_f64(tax),
        delivery_fee: to_f64(fee),
        total: to_f64(subtotal_dec + tax + fee),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, qty: i64) -> OrderItem {
        OrderItem {
            id: 0,
            order_id: 0,
            food_item_id: 0,
            quantity: qty,
            price_at_order: price,
        }
    }

    #[test]
    fn decimal_conversion_beats_f64() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let sum_f64 = 0.1_f64 + 0.2_f64;
        assert_ne!(sum_f64, 0.3);

        let sum_dec = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn accumulation_precision() {
        // 100 lines at 0.01 each
        let lines = (0..100).map(|_| (0.01, 1));
        assert_eq!(to_f64(sum_lines(lines)), 1.0);
    }

    #[test]
    fn order_total_sums_quantity_times_price() {
        // the cart {A: 2 @ 50, B: 1 @ 100} totals 200
        let items = vec![item(50.0, 2), item(100.0, 1)];
        assert_eq!(order_total(&items), 200.0);
    }

    #[test]
    fn order_total_empty_is_zero() {
        assert_eq!(order_total(&[]), 0.0);
    }

    #[test]
    fn charges_apply_flat_tax_and_fee() {
        let charges = compute_charges(200.0, 5.0, 50.0);
        assert_eq!(charges.subtotal, 200.0);
        assert_eq!(charges.tax, 10.0);
        assert_eq!(charges.delivery_fee, 50.0);
        assert_eq!(charges.total, 260.0);
    }

    #[test]
    fn charges_round_half_away_from_zero() {
        // 5% of 10.10 = 0.505 → 0.51
        let charges = compute_charges(10.10, 5.0, 0.0);
        assert_eq!(charges.tax, 0.51);
        assert_eq!(charges.total, 10.61);
    }

    #[test]
    fn zero_tax_rate_means_no_tax() {
        let charges = compute_charges(99.99, 0.0, 0.0);
        assert_eq!(charges.tax, 0.0);
        assert_eq!(charges.total, 99.99);
    }
}
