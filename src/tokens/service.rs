//! Token service layer
//!
//! Balance mutations are single conditional UPDATE statements so that
//! concurrent debits and credits on the same token serialize on the row
//! and can never lose an update or drive the balance negative.

use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::model::{CreateTokenRequest, Token, UpdateTokenRequest};

/// Token store errors
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token not found")]
    NotFound,

    #[error("Token is blocked")]
    Blocked,

    #[error("Token value already exists")]
    DuplicateValue,

    #[error("Token value must not be empty")]
    EmptyValue,

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for TokenError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => TokenError::DuplicateValue,
            _ => TokenError::DatabaseError(e.to_string()),
        }
    }
}

/// Token store for prepaid balances
#[derive(Clone)]
pub struct TokenService {
    db_pool: PgPool,
}

impl TokenService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Look up a token by its value. Comparison is exact and case-sensitive.
    pub async fn find_by_value(&self, value: &str) -> Result<Option<Token>, TokenError> {
        if value.trim().is_empty() {
            return Err(TokenError::EmptyValue);
        }

        let token = sqlx::query_as::<_, Token>("SELECT * FROM tokens WHERE token = $1")
            .bind(value)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(token)
    }

    /// Customer-facing balance check. Blocked tokens are unusable.
    pub async fn redeem(&self, value: &str) -> Result<Token, TokenError> {
        let token = self
            .find_by_value(value)
            .await?
            .ok_or(TokenError::NotFound)?;

        if token.is_blocked {
            return Err(TokenError::Blocked);
        }

        Ok(token)
    }

    pub async fn list(&self) -> Result<Vec<Token>, TokenError> {
        let tokens = sqlx::query_as::<_, Token>("SELECT * FROM tokens ORDER BY created_at DESC")
            .fetch_all(&self.db_pool)
            .await?;

        Ok(tokens)
    }

    pub async fn create(&self, request: CreateTokenRequest) -> Result<Token, TokenError> {
        let value = request.token.trim();
        if value.is_empty() {
            return Err(TokenError::EmptyValue);
        }

        let token = sqlx::query_as::<_, Token>(
            r#"
            INSERT INTO tokens (id, token, balance, is_blocked, created_at, updated_at)
            VALUES ($1, $2, $3, FALSE, $4, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(value)
        .bind(request.balance.max(0))
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        Ok(token)
    }

    /// Rename a token and optionally set its balance.
    ///
    /// The balance column is only written when the request carries an
    /// explicit value; otherwise it is left to the workflows.
    pub async fn update(&self, id: Uuid, request: UpdateTokenRequest) -> Result<Token, TokenError> {
        let value = request.token.trim();
        if value.is_empty() {
            return Err(TokenError::EmptyValue);
        }

        let token = sqlx::query_as::<_, Token>(
            r#"
            UPDATE tokens
            SET token = $1, balance = COALESCE($2, balance), updated_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(value)
        .bind(request.balance.map(|b| b.max(0)))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(TokenError::NotFound)?;

        Ok(token)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), TokenError> {
        let result = sqlx::query("DELETE FROM tokens WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TokenError::NotFound);
        }

        Ok(())
    }

    /// Block or unblock a token. Blocked tokens cannot place orders.
    pub async fn set_blocked(&self, id: Uuid, blocked: bool) -> Result<Token, TokenError> {
        let token = sqlx::query_as::<_, Token>(
            r#"
            UPDATE tokens
            SET is_blocked = $1, updated_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(blocked)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(TokenError::NotFound)?;

        Ok(token)
    }

    /// Debit a token inside an existing workflow transaction.
    ///
    /// The `balance >= amount` guard re-checks under row lock, so a
    /// concurrent debit that slipped in first cannot overdraw the token.
    pub async fn debit_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        token_id: Uuid,
        amount: i64,
    ) -> Result<Token, TokenError> {
        let token = sqlx::query_as::<_, Token>(
            r#"
            UPDATE tokens
            SET balance = balance - $1, updated_at = $2
            WHERE id = $3 AND balance >= $1
            RETURNING *
            "#,
        )
        .bind(amount)
        .bind(Utc::now())
        .bind(token_id)
        .fetch_optional(&mut **tx)
        .await?;

        token.ok_or(TokenError::InsufficientBalance)
    }

    /// Credit a token inside an existing workflow transaction.
    pub async fn credit_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        token_id: Uuid,
        amount: i64,
    ) -> Result<Token, TokenError> {
        let token = sqlx::query_as::<_, Token>(
            r#"
            UPDATE tokens
            SET balance = balance + $1, updated_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(amount)
        .bind(Utc::now())
        .bind(token_id)
        .fetch_optional(&mut **tx)
        .await?;

        token.ok_or(TokenError::NotFound)
    }
}
