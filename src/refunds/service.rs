//! Refund service layer - submission, approval, rejection, status lookup

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::orders::Order;
use crate::tokens::{Token, TokenService};

use super::model::{
    ApproveRefundRequest, RefundRequest, RefundStatus, RefundStatusView, RejectRefundRequest,
    SubmitRefundRequest,
};

/// Refund workflow errors
#[derive(Debug, thiserror::Error)]
pub enum RefundError {
    #[error("Token is not valid")]
    InvalidToken,

    #[error("No such order for this token")]
    OrderNotFound,

    #[error("Order is not eligible for a refund")]
    OrderNotEligible,

    #[error("A refund request already exists for this order")]
    DuplicateRequest,

    #[error("Refund request not found")]
    NotFound,

    #[error("Refund request is not pending")]
    NotPending,

    #[error("Refund amount exceeds the order amount")]
    AmountExceedsOrder,

    #[error("Refund amount must be positive")]
    InvalidAmount,

    #[error("Token for this refund no longer exists")]
    TokenNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for RefundError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            // The UNIQUE index on order_id backs up the duplicate check.
            sqlx::Error::Database(db) if db.is_unique_violation() => RefundError::DuplicateRequest,
            _ => RefundError::DatabaseError(e.to_string()),
        }
    }
}

/// Refund workflow service
#[derive(Clone)]
pub struct RefundService {
    db_pool: PgPool,
}

impl RefundService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Submit a refund request against a finished order.
    ///
    /// Policy: exactly one refund request ever per order, regardless of
    /// the outcome of an earlier one.
    pub async fn submit(&self, request: SubmitRefundRequest) -> Result<RefundRequest, RefundError> {
        let token_value = request.token.trim();
        if token_value.is_empty() {
            return Err(RefundError::InvalidToken);
        }

        let token = sqlx::query_as::<_, Token>("SELECT * FROM tokens WHERE token = $1")
            .bind(token_value)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(RefundError::InvalidToken)?;

        let order = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE order_number = $1 AND token_id = $2",
        )
        .bind(request.order_number)
        .bind(token.id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(RefundError::OrderNotFound)?;

        // Refunds dispute an outcome; they cannot cancel active orders.
        if !order.status.is_terminal() {
            return Err(RefundError::OrderNotEligible);
        }

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM refund_requests WHERE order_id = $1",
        )
        .bind(order.id)
        .fetch_one(&self.db_pool)
        .await?;
        if existing > 0 {
            return Err(RefundError::DuplicateRequest);
        }

        let reason = request
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        let refund = sqlx::query_as::<_, RefundRequest>(
            r#"
            INSERT INTO refund_requests (id, order_id, token_value, reason, status, created_at)
            VALUES ($1, $2, $3, $4, 'pending', $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(order.id)
        .bind(token_value)
        .bind(reason)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(
            order_number = order.order_number,
            refund_id = %refund.id,
            "Refund request submitted"
        );

        Ok(refund)
    }

    pub async fn list(&self, status: Option<RefundStatus>) -> Result<Vec<RefundRequest>, RefundError> {
        let refunds = match status {
            Some(status) => {
                sqlx::query_as::<_, RefundRequest>(
                    "SELECT * FROM refund_requests WHERE status = $1 ORDER BY created_at DESC",
                )
                .bind(status)
                .fetch_all(&self.db_pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, RefundRequest>(
                    "SELECT * FROM refund_requests ORDER BY created_at DESC",
                )
                .fetch_all(&self.db_pool)
                .await?
            }
        };

        Ok(refunds)
    }

    /// Approve a pending refund, crediting the token by `refund_amount`.
    ///
    /// The credit and the approved transition commit together or not at
    /// all. Partial refunds are allowed; the amount may never exceed what
    /// the order debited.
    pub async fn approve(
        &self,
        refund_id: Uuid,
        request: ApproveRefundRequest,
    ) -> Result<RefundRequest, RefundError> {
        if request.refund_amount <= 0 {
            return Err(RefundError::InvalidAmount);
        }

        let mut tx = self.db_pool.begin().await?;

        // Lock the request so a second approval waits and then fails the
        // pending check: the credit happens exactly once.
        let refund = sqlx::query_as::<_, RefundRequest>(
            "SELECT * FROM refund_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(refund_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RefundError::NotFound)?;

        if refund.status != RefundStatus::Pending {
            return Err(RefundError::NotPending);
        }

        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(refund.order_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RefundError::OrderNotFound)?;

        if request.refund_amount > order.amount {
            return Err(RefundError::AmountExceedsOrder);
        }

        // The snapshot names the token; the live row decides whether the
        // credit can land.
        let token = sqlx::query_as::<_, Token>(
            "SELECT * FROM tokens WHERE token = $1 FOR UPDATE",
        )
        .bind(&refund.token_value)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RefundError::TokenNotFound)?;

        TokenService::credit_in_tx(&mut tx, token.id, request.refund_amount)
            .await
            .map_err(|e| RefundError::DatabaseError(e.to_string()))?;

        let updated = sqlx::query_as::<_, RefundRequest>(
            r#"
            UPDATE refund_requests
            SET status = 'approved', admin_note = $1, processed_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(normalize_note(request.admin_note))
        .bind(Utc::now())
        .bind(refund_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            refund_id = %refund_id,
            amount = request.refund_amount,
            "Refund approved and credited"
        );

        Ok(updated)
    }

    /// Reject a pending refund. No balance effect.
    pub async fn reject(
        &self,
        refund_id: Uuid,
        request: RejectRefundRequest,
    ) -> Result<RefundRequest, RefundError> {
        let mut tx = self.db_pool.begin().await?;

        let refund = sqlx::query_as::<_, RefundRequest>(
            "SELECT * FROM refund_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(refund_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RefundError::NotFound)?;

        if refund.status != RefundStatus::Pending {
            return Err(RefundError::NotPending);
        }

        let updated = sqlx::query_as::<_, RefundRequest>(
            r#"
            UPDATE refund_requests
            SET status = 'rejected', admin_note = $1, processed_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(normalize_note(request.admin_note))
        .bind(Utc::now())
        .bind(refund_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(refund_id = %refund_id, "Refund rejected");

        Ok(updated)
    }

    /// Customer status lookup, revalidating token ownership of the order.
    pub async fn check_status(
        &self,
        token_value: &str,
        order_number: i64,
    ) -> Result<RefundStatusView, RefundError> {
        let token_value = token_value.trim();
        if token_value.is_empty() {
            return Err(RefundError::InvalidToken);
        }

        let token = sqlx::query_as::<_, Token>("SELECT * FROM tokens WHERE token = $1")
            .bind(token_value)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(RefundError::InvalidToken)?;

        let order = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE order_number = $1 AND token_id = $2",
        )
        .bind(order_number)
        .bind(token.id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(RefundError::OrderNotFound)?;

        let refund = sqlx::query_as::<_, RefundRequest>(
            "SELECT * FROM refund_requests WHERE order_id = $1",
        )
        .bind(order.id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(RefundError::NotFound)?;

        Ok(RefundStatusView {
            order_number: order.order_number,
            status: refund.status,
            reason: refund.reason,
            admin_note: refund.admin_note,
            created_at: refund.created_at,
            processed_at: refund.processed_at,
        })
    }
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}
