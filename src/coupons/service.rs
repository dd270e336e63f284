//! Coupon service layer

use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::model::{Coupon, CreateCouponRequest, DiscountType, UpdateCouponRequest};

/// Coupon errors
#[derive(Debug, thiserror::Error)]
pub enum CouponError {
    #[error("Coupon not found")]
    NotFound,

    #[error("Coupon code already exists")]
    DuplicateCode,

    #[error("Coupon code must not be empty")]
    EmptyCode,

    #[error("Percentage discount cannot exceed 100")]
    InvalidDiscount,

    #[error("{0}")]
    NotApplicable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CouponError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => CouponError::DuplicateCode,
            _ => CouponError::DatabaseError(e.to_string()),
        }
    }
}

/// Coupon store
#[derive(Clone)]
pub struct CouponService {
    db_pool: PgPool,
}

impl CouponService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    fn canonicalize(code: &str) -> String {
        code.trim().to_uppercase()
    }

    fn validate_discount(request: &CreateCouponRequest) -> Result<(), CouponError> {
        if request.discount_type == DiscountType::Percentage && request.discount_value > 100 {
            return Err(CouponError::InvalidDiscount);
        }
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Coupon>, CouponError> {
        let coupons = sqlx::query_as::<_, Coupon>("SELECT * FROM coupons ORDER BY created_at DESC")
            .fetch_all(&self.db_pool)
            .await?;

        Ok(coupons)
    }

    pub async fn create(&self, request: CreateCouponRequest) -> Result<Coupon, CouponError> {
        let code = Self::canonicalize(&request.code);
        if code.is_empty() {
            return Err(CouponError::EmptyCode);
        }
        Self::validate_discount(&request)?;

        let coupon = sqlx::query_as::<_, Coupon>(
            r#"
            INSERT INTO coupons
                (id, code, discount_type, discount_value, min_order_amount,
                 max_uses, used_count, is_active, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 0, TRUE, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&code)
        .bind(request.discount_type)
        .bind(request.discount_value)
        .bind(request.min_order_amount)
        .bind(request.max_uses)
        .bind(request.expires_at)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        Ok(coupon)
    }

    pub async fn update(&self, id: Uuid, request: UpdateCouponRequest) -> Result<Coupon, CouponError> {
        let code = Self::canonicalize(&request.code);
        if code.is_empty() {
            return Err(CouponError::EmptyCode);
        }
        Self::validate_discount(&request)?;

        let coupon = sqlx::query_as::<_, Coupon>(
            r#"
            UPDATE coupons
            SET code = $1, discount_type = $2, discount_value = $3,
                min_order_amount = $4, max_uses = $5, expires_at = $6
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(&code)
        .bind(request.discount_type)
        .bind(request.discount_value)
        .bind(request.min_order_amount)
        .bind(request.max_uses)
        .bind(request.expires_at)
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(CouponError::NotFound)?;

        Ok(coupon)
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<Coupon, CouponError> {
        let coupon = sqlx::query_as::<_, Coupon>(
            "UPDATE coupons SET is_active = $1 WHERE id = $2 RETURNING *",
        )
        .bind(active)
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(CouponError::NotFound)?;

        Ok(coupon)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), CouponError> {
        let result = sqlx::query("DELETE FROM coupons WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CouponError::NotFound);
        }

        Ok(())
    }

    /// Apply a coupon inside an order-placement transaction.
    ///
    /// Locks the coupon row, validates it against the order amount, bumps
    /// `used_count`, and returns the discounted price. The row lock keeps
    /// concurrent placements from overshooting `max_uses`.
    pub async fn apply_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
        order_amount: i64,
    ) -> Result<i64, CouponError> {
        let code = Self::canonicalize(code);

        let coupon =
            sqlx::query_as::<_, Coupon>("SELECT * FROM coupons WHERE code = $1 FOR UPDATE")
                .bind(&code)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| CouponError::NotApplicable("Coupon code is not valid".to_string()))?;

        if !coupon.is_active {
            return Err(CouponError::NotApplicable(
                "Coupon is no longer active".to_string(),
            ));
        }

        if let Some(expires_at) = coupon.expires_at {
            if Utc::now() >= expires_at {
                return Err(CouponError::NotApplicable("Coupon has expired".to_string()));
            }
        }

        if let Some(max_uses) = coupon.max_uses {
            if coupon.used_count >= max_uses {
                return Err(CouponError::NotApplicable(
                    "Coupon usage limit reached".to_string(),
                ));
            }
        }

        if order_amount < coupon.min_order_amount {
            return Err(CouponError::NotApplicable(
                "Order amount is below the coupon minimum".to_string(),
            ));
        }

        sqlx::query("UPDATE coupons SET used_count = used_count + 1 WHERE id = $1")
            .bind(coupon.id)
            .execute(&mut **tx)
            .await?;

        Ok(coupon.discounted_price(order_amount))
    }
}
