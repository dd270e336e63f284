//! Admin refund management handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::middleware::AuthenticatedStaff;
use crate::permissions::Capability;
use crate::refunds::{ApproveRefundRequest, RefundRequest, RefundStatus, RejectRefundRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListRefundsQuery {
    pub status: Option<RefundStatus>,
}

/// GET /api/admin/refunds
pub async fn list_refunds(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Query(query): Query<ListRefundsQuery>,
) -> ApiResult<Json<Vec<RefundRequest>>> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageRefunds)
        .await?;

    let refunds = state.refund_service.list(query.status).await?;

    Ok(Json(refunds))
}

/// POST /api/admin/refunds/:id/approve
pub async fn approve_refund(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(req): Json<ApproveRefundRequest>,
) -> ApiResult<Json<RefundRequest>> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageRefunds)
        .await?;

    let refund = state.refund_service.approve(id, req).await?;

    Ok(Json(refund))
}

/// POST /api/admin/refunds/:id/reject
pub async fn reject_refund(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(req): Json<RejectRefundRequest>,
) -> ApiResult<Json<RefundRequest>> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageRefunds)
        .await?;

    let refund = state.refund_service.reject(id, req).await?;

    Ok(Json(refund))
}
