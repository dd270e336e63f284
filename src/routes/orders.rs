//! Admin order route definitions

use axum::Router;

use crate::handlers::*;
use crate::state::AppState;

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/orders", axum::routing::get(list_orders))
        .route(
            "/api/admin/orders/:id/status",
            axum::routing::put(update_order_status),
        )
        .route(
            "/api/admin/orders/:id",
            axum::routing::delete(delete_order),
        )
        .route(
            "/api/admin/orders/:id/request-resend",
            axum::routing::post(request_fulfillment_resend),
        )
        .route(
            "/api/admin/orders/:id/messages",
            axum::routing::post(post_admin_message),
        )
}
