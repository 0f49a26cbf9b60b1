//! Order Model
//!
//! `Order.status` is the only mutable field once an order exists; the
//! `order_item` rows are the immutable pricing record (`price_at_order`
//! is frozen at placement time and never follows later catalog changes).

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// One canonical set — the forward path is
/// `Pending → Processing → Ready → Completed`, with `Cancelled` reachable
/// from any non-completed state and reversible back into the forward path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Parse a status string, case-insensitively (the canonical form is
    /// PascalCase; historical clients sent inconsistent casing).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "ready" => Some(Self::Ready),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Ready => "Ready",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// An active order still occupies the kitchen pipeline
    /// (used to pick a user's "current" order).
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Processing | Self::Ready)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or(())
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line — immutable once written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub food_item_id: i64,
    pub quantity: i64,
    /// Price snapshot taken when the order was placed
    pub price_at_order: f64,
}

/// Order line joined with catalog display fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItemDetail {
    pub id: i64,
    pub order_id: i64,
    pub food_item_id: i64,
    pub name: String,
    pub image_url: Option<String>,
    pub quantity: i64,
    pub price_at_order: f64,
}

/// A freshly placed order together with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Order list entry with computed totals (history/admin views)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub created_at: i64,
    pub item_count: i64,
    pub total_amount: f64,
}

/// Flat charge breakdown for an order detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCharges {
    pub subtotal: f64,
    pub tax: f64,
    pub delivery_fee: f64,
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_any_casing() {
        assert_eq!(OrderStatus::parse("Pending"), Some(OrderStatus::Pending));
        assert_eq!(OrderStatus::parse("pending"), Some(OrderStatus::Pending));
        assert_eq!(OrderStatus::parse("CANCELLED"), Some(OrderStatus::Cancelled));
        assert_eq!(OrderStatus::parse("ready"), Some(OrderStatus::Ready));
    }

    #[test]
    fn parse_rejects_unknown_status() {
        assert_eq!(OrderStatus::parse("Delivered"), None);
        assert_eq!(OrderStatus::parse(""), None);
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(OrderStatus::Processing.to_string(), "Processing");
        assert_eq!(OrderStatus::Cancelled.to_string(), "Cancelled");
    }

    #[test]
    fn active_states() {
        assert!(OrderStatus::Pending.is_active());
        assert!(OrderStatus::Processing.is_active());
        assert!(OrderStatus::Ready.is_active());
        assert!(!OrderStatus::Completed.is_active());
        assert!(!OrderStatus::Cancelled.is_active());
    }
}
