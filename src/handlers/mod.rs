//! HTTP handlers
//!
//! Thin translation between the HTTP surface and the domain services.
//! Storefront handlers are unauthenticated; admin handlers require a
//! staff session and the matching capability.

mod catalog;
mod coupons;
mod orders;
mod permissions;
mod refunds;
mod storefront;
mod tokens;

pub use catalog::*;
pub use coupons::*;
pub use orders::*;
pub use permissions::*;
pub use refunds::*;
pub use storefront::*;
pub use tokens::*;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /health - service and database health
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    crate::db::check_health(&state.db_pool)
        .await
        .map_err(|e| ApiError::ServiceUnavailable(e.to_string()))?;

    Ok(Json(json!({ "status": "ok" })))
}
