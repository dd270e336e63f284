//! Permission management handlers
//!
//! Granting and revoking capabilities is itself gated: admins always
//! may; non-admins need the manage_users capability. `GET /api/admin/me`
//! is the dashboard gate — a non-admin with no capabilities is turned
//! away there.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::middleware::AuthenticatedStaff;
use crate::permissions::{Capability, GrantRequest, PermissionsView, SetAllRequest};
use crate::state::AppState;

/// GET /api/admin/me - the caller's own capability set
pub async fn my_permissions(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
) -> ApiResult<Json<PermissionsView>> {
    let capabilities = state
        .permission_service
        .require_any(staff.user_id, staff.role)
        .await?;

    let mut capabilities: Vec<Capability> = capabilities.into_iter().collect();
    capabilities.sort_by_key(|c| c.as_str());

    Ok(Json(PermissionsView {
        user_id: staff.user_id,
        role: staff.role,
        capabilities,
    }))
}

/// GET /api/admin/permissions/:user_id
pub async fn get_permissions(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Capability>>> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageUsers)
        .await?;

    let capabilities = state
        .permission_service
        .capabilities_for(user_id, crate::auth::StaffRole::Staff)
        .await?;

    let mut capabilities: Vec<Capability> = capabilities.into_iter().collect();
    capabilities.sort_by_key(|c| c.as_str());

    Ok(Json(capabilities))
}

/// POST /api/admin/permissions/:user_id/grant
pub async fn grant_capability(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(user_id): Path<Uuid>,
    Json(req): Json<GrantRequest>,
) -> ApiResult<StatusCode> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageUsers)
        .await?;

    state.permission_service.grant(user_id, req.capability).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/permissions/:user_id/revoke
pub async fn revoke_capability(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(user_id): Path<Uuid>,
    Json(req): Json<GrantRequest>,
) -> ApiResult<StatusCode> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageUsers)
        .await?;

    state
        .permission_service
        .revoke(user_id, req.capability)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/admin/permissions/:user_id/all
pub async fn set_all_capabilities(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(user_id): Path<Uuid>,
    Json(req): Json<SetAllRequest>,
) -> ApiResult<StatusCode> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageUsers)
        .await?;

    state.permission_service.set_all(user_id, req.enabled).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/admin/permissions/:user_id - on staff-user deletion
pub async fn delete_permissions(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(user_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageUsers)
        .await?;

    state.permission_service.remove_all(user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
