//! Order models, status machine, and request DTOs

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// Order status machine: pending → in_progress → {completed | rejected}.
/// Auto-delivery orders are created completed.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
    Rejected,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Rejected => "rejected",
        }
    }

    /// Whether staff may move an order from `self` to `to`.
    ///
    /// in_progress → in_progress is allowed so staff can update the
    /// response message without changing state.
    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, to),
            (Pending, InProgress)
                | (Pending, Rejected)
                | (InProgress, Completed)
                | (InProgress, Rejected)
                | (InProgress, InProgress)
        )
    }

    /// Completed and rejected orders are terminal; only those are
    /// eligible for refund requests.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Rejected)
    }
}

/// Order record. `amount` is fixed at creation (net of any coupon) and
/// never changes afterwards.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Order {
    pub id: Uuid,
    pub order_number: i64,
    pub token_id: Option<Uuid>,
    pub product_id: Uuid,
    pub option_id: Uuid,
    pub amount: i64,
    pub status: OrderStatus,
    pub email: Option<String>,
    pub password: Option<String>,
    pub verification_link: Option<String>,
    pub response_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Chat message sender
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "message_sender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    Customer,
    Admin,
}

/// Message in an order's support chat channel
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct OrderMessage {
    pub id: Uuid,
    pub order_id: Uuid,
    pub sender: MessageSender,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for placing an order.
///
/// Which fulfillment fields are required depends on the option's
/// fulfillment type; the service validates that.
#[derive(Debug, Deserialize, Validate)]
pub struct PlaceOrderRequest {
    #[validate(length(min = 1, message = "token value must not be empty"))]
    pub token: String,
    pub option_id: Uuid,
    pub coupon_code: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub verification_link: Option<String>,
    pub text: Option<String>,
}

/// Staff status update
#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
    pub response_message: Option<String>,
}

/// Customer posting into the order chat; token proves ownership
#[derive(Debug, Deserialize, Validate)]
pub struct PostMessageRequest {
    #[validate(length(min = 1, message = "token value must not be empty"))]
    pub token: String,
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub message: String,
}

/// Customer-facing order view; internal ids stay internal
#[derive(Debug, Serialize)]
pub struct OrderView {
    pub order_number: i64,
    pub status: OrderStatus,
    pub amount: i64,
    pub response_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            order_number: order.order_number,
            status: order.status,
            amount: order.amount,
            response_message: order.response_message.clone(),
            created_at: order.created_at,
        }
    }
}

/// Order events pushed over the change feed.
///
/// Delivery is best-effort: clients reconcile by re-fetching, never by
/// trusting the push alone.
#[derive(Debug, Serialize, Clone)]
#[serde(tag = "type")]
pub enum OrderEvent {
    OrderCreated {
        order_id: Uuid,
        order_number: i64,
    },
    OrderUpdated {
        order_id: Uuid,
        order_number: i64,
        status: OrderStatus,
    },
    MessagePosted {
        order_id: Uuid,
        order_number: i64,
    },
}

impl OrderEvent {
    pub fn order_id(&self) -> Uuid {
        match self {
            OrderEvent::OrderCreated { order_id, .. }
            | OrderEvent::OrderUpdated { order_id, .. }
            | OrderEvent::MessagePosted { order_id, .. } => *order_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OrderStatus::*;

    #[test]
    fn test_legal_transitions() {
        assert!(Pending.can_transition_to(InProgress));
        assert!(Pending.can_transition_to(Rejected));
        assert!(InProgress.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Rejected));
        assert!(InProgress.can_transition_to(InProgress));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Rejected));
        assert!(!Completed.can_transition_to(InProgress));
        assert!(!Rejected.can_transition_to(Completed));
        assert!(!Rejected.can_transition_to(InProgress));
    }

    #[test]
    fn test_terminal_states() {
        assert!(Completed.is_terminal());
        assert!(Rejected.is_terminal());
        assert!(!Pending.is_terminal());
        assert!(!InProgress.is_terminal());
    }
}
