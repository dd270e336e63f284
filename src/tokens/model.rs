//! Token models and request DTOs

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// Prepaid token record. `balance` is in minor units (cents).
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Token {
    pub id: Uuid,
    pub token: String,
    pub balance: i64,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a token
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTokenRequest {
    #[validate(length(min = 1, message = "token value must not be empty"))]
    pub token: String,
    #[validate(range(min = 0))]
    pub balance: i64,
}

/// Request DTO for updating a token.
///
/// `balance` is an explicit absolute override; when omitted the balance
/// is left untouched, so a rename can never clobber a concurrent
/// workflow debit or credit.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTokenRequest {
    #[validate(length(min = 1, message = "token value must not be empty"))]
    pub token: String,
    #[validate(range(min = 0))]
    pub balance: Option<i64>,
}

/// Customer-facing balance check
#[derive(Debug, Deserialize, Validate)]
pub struct RedeemTokenRequest {
    #[validate(length(min = 1, message = "token value must not be empty"))]
    pub token: String,
}

/// Balance view returned to customers. Never exposes the internal id.
#[derive(Debug, Serialize)]
pub struct TokenBalanceView {
    pub balance: i64,
}

impl From<&Token> for TokenBalanceView {
    fn from(token: &Token) -> Self {
        Self {
            balance: token.balance,
        }
    }
}
