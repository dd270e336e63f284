//! Admin permission route definitions

use axum::Router;

use crate::handlers::*;
use crate::state::AppState;

pub fn permission_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/me", axum::routing::get(my_permissions))
        .route(
            "/api/admin/permissions/:user_id",
            axum::routing::get(get_permissions),
        )
        .route(
            "/api/admin/permissions/:user_id/grant",
            axum::routing::post(grant_capability),
        )
        .route(
            "/api/admin/permissions/:user_id/revoke",
            axum::routing::post(revoke_capability),
        )
        .route(
            "/api/admin/permissions/:user_id/all",
            axum::routing::put(set_all_capabilities),
        )
        .route(
            "/api/admin/permissions/:user_id",
            axum::routing::delete(delete_permissions),
        )
}
