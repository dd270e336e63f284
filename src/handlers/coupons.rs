//! Admin coupon management handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::coupons::{Coupon, CreateCouponRequest, UpdateCouponRequest};
use crate::error::ApiResult;
use crate::middleware::AuthenticatedStaff;
use crate::permissions::Capability;
use crate::state::AppState;

/// GET /api/admin/coupons
pub async fn list_coupons(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
) -> ApiResult<Json<Vec<Coupon>>> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageCoupons)
        .await?;

    let coupons = state.coupon_service.list().await?;

    Ok(Json(coupons))
}

/// POST /api/admin/coupons
pub async fn create_coupon(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Json(req): Json<CreateCouponRequest>,
) -> ApiResult<(StatusCode, Json<Coupon>)> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageCoupons)
        .await?;
    req.validate()?;

    let coupon = state.coupon_service.create(req).await?;

    Ok((StatusCode::CREATED, Json(coupon)))
}

/// PUT /api/admin/coupons/:id
pub async fn update_coupon(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCouponRequest>,
) -> ApiResult<Json<Coupon>> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageCoupons)
        .await?;
    req.validate()?;

    let coupon = state.coupon_service.update(id, req).await?;

    Ok(Json(coupon))
}

#[derive(Debug, Deserialize)]
pub struct ToggleCouponRequest {
    pub is_active: bool,
}

/// POST /api/admin/coupons/:id/toggle
pub async fn toggle_coupon(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(req): Json<ToggleCouponRequest>,
) -> ApiResult<Json<Coupon>> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageCoupons)
        .await?;

    let coupon = state.coupon_service.set_active(id, req.is_active).await?;

    Ok(Json(coupon))
}

/// DELETE /api/admin/coupons/:id
pub async fn delete_coupon(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageCoupons)
        .await?;

    state.coupon_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
