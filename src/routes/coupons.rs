//! Admin coupon route definitions

use axum::Router;

use crate::handlers::*;
use crate::state::AppState;

pub fn coupon_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/coupons", axum::routing::get(list_coupons))
        .route("/api/admin/coupons", axum::routing::post(create_coupon))
        .route("/api/admin/coupons/:id", axum::routing::put(update_coupon))
        .route(
            "/api/admin/coupons/:id",
            axum::routing::delete(delete_coupon),
        )
        .route(
            "/api/admin/coupons/:id/toggle",
            axum::routing::post(toggle_coupon),
        )
}
