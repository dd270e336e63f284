//! Admin refund route definitions

use axum::Router;

use crate::handlers::*;
use crate::state::AppState;

pub fn refund_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/refunds", axum::routing::get(list_refunds))
        .route(
            "/api/admin/refunds/:id/approve",
            axum::routing::post(approve_refund),
        )
        .route(
            "/api/admin/refunds/:id/reject",
            axum::routing::post(reject_refund),
        )
}
