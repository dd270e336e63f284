//! Coupon models and request DTOs

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// Discount kind
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "discount_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

/// Discount coupon. `discount_value` is percent for percentage coupons,
/// minor units for fixed ones.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub min_order_amount: i64,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    /// Apply this coupon to a price in minor units.
    ///
    /// Percentage discounts floor; both arms clamp at zero so no coupon
    /// can ever produce a negative order amount.
    pub fn discounted_price(&self, amount: i64) -> i64 {
        match self.discount_type {
            DiscountType::Percentage => (amount - amount * self.discount_value / 100).max(0),
            DiscountType::Fixed => (amount - self.discount_value).max(0),
        }
    }
}

/// Request DTO for creating or updating a coupon
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCouponRequest {
    #[validate(length(min = 1, message = "code must not be empty"))]
    pub code: String,
    pub discount_type: DiscountType,
    #[validate(range(min = 0))]
    pub discount_value: i64,
    #[serde(default)]
    pub min_order_amount: i64,
    pub max_uses: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
}

pub type UpdateCouponRequest = CreateCouponRequest;

#[cfg(test)]
mod tests {
    use super::*;

    fn coupon(discount_type: DiscountType, value: i64) -> Coupon {
        Coupon {
            id: Uuid::new_v4(),
            code: "SAVE".to_string(),
            discount_type,
            discount_value: value,
            min_order_amount: 0,
            max_uses: None,
            used_count: 0,
            is_active: true,
            expires_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_percentage_discount_floors() {
        // 10% off 1999 cents = 199.9, floors to 199 off
        let c = coupon(DiscountType::Percentage, 10);
        assert_eq!(c.discounted_price(1999), 1800);
    }

    #[test]
    fn test_fixed_discount_clamps_at_zero() {
        let c = coupon(DiscountType::Fixed, 500);
        assert_eq!(c.discounted_price(300), 0);
        assert_eq!(c.discounted_price(800), 300);
    }

    #[test]
    fn test_full_percentage_discount() {
        let c = coupon(DiscountType::Percentage, 100);
        assert_eq!(c.discounted_price(2500), 0);
    }

    #[test]
    fn test_percentage_over_100_clamps_at_zero() {
        let c = coupon(DiscountType::Percentage, 150);
        assert_eq!(c.discounted_price(1000), 0);
    }
}
