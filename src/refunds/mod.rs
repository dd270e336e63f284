//! Refund workflow
//!
//! A refund request is a customer dispute over a finished order. One
//! request ever per order, adjudicated exactly once by staff. Approval
//! credits the token inside the same transaction that flips the request
//! to approved, so a failed credit can never leave the request approved.

mod model;
mod service;

pub use model::{
    ApproveRefundRequest, RefundRequest, RefundStatus, RefundStatusView, RejectRefundRequest,
    SubmitRefundRequest,
};
pub use service::{RefundError, RefundService};

use crate::error::ApiError;

impl From<RefundError> for ApiError {
    fn from(err: RefundError) -> Self {
        match err {
            RefundError::InvalidToken => {
                ApiError::BadRequest("Token is not valid".to_string())
            }
            RefundError::OrderNotFound => {
                ApiError::NotFound("No such order for this token".to_string())
            }
            RefundError::OrderNotEligible => ApiError::Conflict(
                "Refunds can only be requested for finished orders".to_string(),
            ),
            RefundError::DuplicateRequest => ApiError::Conflict(
                "A refund request already exists for this order".to_string(),
            ),
            RefundError::NotFound => ApiError::NotFound("Refund request not found".to_string()),
            RefundError::NotPending => {
                ApiError::Conflict("Refund request has already been processed".to_string())
            }
            RefundError::AmountExceedsOrder => ApiError::Conflict(
                "Refund amount exceeds the order amount".to_string(),
            ),
            RefundError::InvalidAmount => {
                ApiError::ValidationError("Refund amount must be positive".to_string())
            }
            RefundError::TokenNotFound => {
                ApiError::NotFound("Token for this refund no longer exists".to_string())
            }
            RefundError::DatabaseError(msg) => ApiError::DatabaseError(msg),
        }
    }
}
