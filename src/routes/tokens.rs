//! Admin token route definitions

use axum::Router;

use crate::handlers::*;
use crate::state::AppState;

pub fn token_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/tokens", axum::routing::get(list_tokens))
        .route("/api/admin/tokens", axum::routing::post(create_token))
        .route("/api/admin/tokens/:id", axum::routing::put(update_token))
        .route(
            "/api/admin/tokens/:id",
            axum::routing::delete(delete_token),
        )
        .route(
            "/api/admin/tokens/:id/block",
            axum::routing::post(block_token),
        )
}
