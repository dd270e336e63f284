//! Refund models and request DTOs

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// Refund request state machine: pending → approved | rejected, both
/// terminal.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "refund_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RefundStatus {
    Pending,
    Approved,
    Rejected,
}

/// Refund request record.
///
/// `token_value` is an immutable snapshot of the token the customer
/// claimed at submission time. It is revalidated against the live token
/// store before any balance credit.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct RefundRequest {
    pub id: Uuid,
    pub order_id: Uuid,
    pub token_value: String,
    pub reason: Option<String>,
    pub status: RefundStatus,
    pub admin_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

/// Customer-facing submission
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRefundRequest {
    #[validate(length(min = 1, message = "token value must not be empty"))]
    pub token: String,
    pub order_number: i64,
    pub reason: Option<String>,
}

/// Staff approval. `refund_amount` is minor units and may be partial.
#[derive(Debug, Deserialize)]
pub struct ApproveRefundRequest {
    pub refund_amount: i64,
    pub admin_note: Option<String>,
}

/// Staff rejection
#[derive(Debug, Deserialize)]
pub struct RejectRefundRequest {
    pub admin_note: Option<String>,
}

/// Customer-facing status view
#[derive(Debug, Serialize)]
pub struct RefundStatusView {
    pub order_number: i64,
    pub status: RefundStatus,
    pub reason: Option<String>,
    pub admin_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}
