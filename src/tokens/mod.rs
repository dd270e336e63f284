//! Prepaid token store
//!
//! Tokens stand in for customer accounts: an opaque value carrying a
//! prepaid balance in minor units. Balance mutations happen through the
//! order and refund workflows; staff manage the records themselves.

mod model;
mod service;

pub use model::{CreateTokenRequest, RedeemTokenRequest, Token, TokenBalanceView, UpdateTokenRequest};
pub use service::{TokenError, TokenService};

use crate::error::ApiError;

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::NotFound => ApiError::NotFound("Token not found".to_string()),
            TokenError::Blocked => ApiError::Forbidden("Token is blocked".to_string()),
            TokenError::DuplicateValue => {
                ApiError::Conflict("A token with this value already exists".to_string())
            }
            TokenError::EmptyValue => {
                ApiError::ValidationError("Token value must not be empty".to_string())
            }
            TokenError::InsufficientBalance => {
                ApiError::InsufficientBalance("Token balance is too low".to_string())
            }
            TokenError::DatabaseError(msg) => ApiError::DatabaseError(msg),
        }
    }
}
