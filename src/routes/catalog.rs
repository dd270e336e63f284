//! Admin catalog route definitions

use axum::Router;

use crate::handlers::*;
use crate::state::AppState;

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/products", axum::routing::get(list_products))
        .route("/api/admin/products", axum::routing::post(create_product))
        .route(
            "/api/admin/products/:id",
            axum::routing::put(update_product),
        )
        .route(
            "/api/admin/products/:id",
            axum::routing::delete(delete_product),
        )
        .route(
            "/api/admin/products/:id/options",
            axum::routing::get(list_options),
        )
        .route(
            "/api/admin/products/:id/options",
            axum::routing::post(create_option),
        )
        .route("/api/admin/options/:id", axum::routing::put(update_option))
        .route(
            "/api/admin/options/:id",
            axum::routing::delete(delete_option),
        )
        .route("/api/admin/stock", axum::routing::post(add_stock))
        .route("/api/admin/stock", axum::routing::get(list_stock))
}
