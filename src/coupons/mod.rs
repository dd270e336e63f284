//! Discount coupon store
//!
//! Simple CRUD plus the apply step the order workflow runs at placement
//! time. Codes are canonicalized to upper-case and unique.

mod model;
mod service;

pub use model::{Coupon, CreateCouponRequest, DiscountType, UpdateCouponRequest};
pub use service::{CouponError, CouponService};

use crate::error::ApiError;

impl From<CouponError> for ApiError {
    fn from(err: CouponError) -> Self {
        match err {
            CouponError::NotFound => ApiError::NotFound("Coupon not found".to_string()),
            CouponError::DuplicateCode => {
                ApiError::Conflict("A coupon with this code already exists".to_string())
            }
            CouponError::EmptyCode => {
                ApiError::ValidationError("Coupon code must not be empty".to_string())
            }
            CouponError::InvalidDiscount => {
                ApiError::ValidationError("Percentage discount cannot exceed 100".to_string())
            }
            CouponError::NotApplicable(reason) => ApiError::Conflict(reason),
            CouponError::DatabaseError(msg) => ApiError::DatabaseError(msg),
        }
    }
}
