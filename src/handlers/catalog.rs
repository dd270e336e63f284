//! Admin catalog management handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::catalog::{
    AddStockRequest, CreateOptionRequest, CreateProductRequest, Product, ProductOption, StockItem,
    UpdateOptionRequest, UpdateProductRequest,
};
use crate::error::ApiResult;
use crate::middleware::AuthenticatedStaff;
use crate::permissions::Capability;
use crate::state::AppState;

/// GET /api/admin/products
pub async fn list_products(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
) -> ApiResult<Json<Vec<Product>>> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageProducts)
        .await?;

    let products = state.catalog_service.list_products().await?;

    Ok(Json(products))
}

/// POST /api/admin/products
pub async fn create_product(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Json(req): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageProducts)
        .await?;
    req.validate()?;

    let product = state.catalog_service.create_product(req).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/admin/products/:id
pub async fn update_product(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> ApiResult<Json<Product>> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageProducts)
        .await?;
    req.validate()?;

    let product = state.catalog_service.update_product(id, req).await?;

    Ok(Json(product))
}

/// DELETE /api/admin/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageProducts)
        .await?;

    state.catalog_service.delete_product(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/products/:id/options
pub async fn list_options(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(product_id): Path<Uuid>,
) -> ApiResult<Json<Vec<ProductOption>>> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageProducts)
        .await?;

    let options = state.catalog_service.list_options(product_id).await?;

    Ok(Json(options))
}

/// POST /api/admin/products/:id/options
pub async fn create_option(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(product_id): Path<Uuid>,
    Json(req): Json<CreateOptionRequest>,
) -> ApiResult<(StatusCode, Json<ProductOption>)> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageProducts)
        .await?;
    req.validate()?;

    let option = state.catalog_service.create_option(product_id, req).await?;

    Ok((StatusCode::CREATED, Json(option)))
}

/// PUT /api/admin/options/:id
pub async fn update_option(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOptionRequest>,
) -> ApiResult<Json<ProductOption>> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageProducts)
        .await?;
    req.validate()?;

    let option = state.catalog_service.update_option(id, req).await?;

    Ok(Json(option))
}

/// DELETE /api/admin/options/:id
pub async fn delete_option(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageProducts)
        .await?;

    state.catalog_service.delete_option(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct AddStockResponse {
    pub inserted: u64,
}

/// POST /api/admin/stock - bulk newline-delimited stock intake
pub async fn add_stock(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Json(req): Json<AddStockRequest>,
) -> ApiResult<(StatusCode, Json<AddStockResponse>)> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageProducts)
        .await?;
    req.validate()?;

    let inserted = state.catalog_service.add_stock(req).await?;

    Ok((StatusCode::CREATED, Json(AddStockResponse { inserted })))
}

/// GET /api/admin/stock - unsold stock items
pub async fn list_stock(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
) -> ApiResult<Json<Vec<StockItem>>> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageProducts)
        .await?;

    let items = state.catalog_service.list_unsold_stock().await?;

    Ok(Json(items))
}
