//! Customer-facing storefront route definitions

use axum::Router;

use crate::handlers::*;
use crate::state::AppState;

pub fn storefront_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tokens/redeem", axum::routing::post(redeem_token))
        .route("/api/catalog", axum::routing::get(storefront_catalog))
        .route("/api/orders", axum::routing::post(place_order))
        .route("/api/orders/lookup", axum::routing::get(lookup_order))
        .route(
            "/api/orders/:id/messages",
            axum::routing::post(post_order_message),
        )
        .route(
            "/api/orders/:id/messages",
            axum::routing::get(list_order_messages),
        )
        .route("/api/refunds", axum::routing::post(submit_refund))
        .route("/api/refunds/status", axum::routing::get(refund_status))
}
