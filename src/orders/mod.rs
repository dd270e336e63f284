//! Order workflow
//!
//! Orders are placed against a token and a product option. Placement
//! debits the token balance and, for auto-delivery options, claims one
//! stock item — all inside a single transaction so a partial failure
//! never leaves a debit without an order or a claimed item without an
//! order. Staff drive the status machine afterwards.

mod model;
mod service;

pub use model::{
    MessageSender, Order, OrderEvent, OrderMessage, OrderStatus, OrderView, PlaceOrderRequest,
    PostMessageRequest, UpdateOrderStatusRequest,
};
pub use service::{OrderError, OrderService};

use crate::error::ApiError;

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::InvalidToken => {
                ApiError::BadRequest("Token is not valid or is blocked".to_string())
            }
            OrderError::OptionNotFound => {
                ApiError::NotFound("Product option not found".to_string())
            }
            OrderError::InactiveOption => {
                ApiError::Conflict("This option is not available for purchase".to_string())
            }
            OrderError::InsufficientBalance => {
                ApiError::InsufficientBalance("Token balance is too low for this order".to_string())
            }
            OrderError::OutOfStock => {
                ApiError::Conflict("This option is out of stock".to_string())
            }
            OrderError::MissingInput(field) => {
                ApiError::ValidationError(format!("Missing required field: {}", field))
            }
            OrderError::NotFound => ApiError::NotFound("Order not found".to_string()),
            OrderError::IllegalTransition { from, to } => ApiError::Conflict(format!(
                "Cannot move order from '{}' to '{}'",
                from.as_str(),
                to.as_str()
            )),
            OrderError::NotInProgress => {
                ApiError::Conflict("Order is not in progress".to_string())
            }
            OrderError::Coupon(e) => e.into(),
            OrderError::EmptyMessage => {
                ApiError::ValidationError("Message must not be empty".to_string())
            }
            OrderError::DatabaseError(msg) => ApiError::DatabaseError(msg),
        }
    }
}
