//! Admin token management handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiResult;
use crate::middleware::AuthenticatedStaff;
use crate::permissions::Capability;
use crate::state::AppState;
use crate::tokens::{CreateTokenRequest, Token, UpdateTokenRequest};

/// GET /api/admin/tokens
pub async fn list_tokens(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
) -> ApiResult<Json<Vec<Token>>> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageTokens)
        .await?;

    let tokens = state.token_service.list().await?;

    Ok(Json(tokens))
}

/// POST /api/admin/tokens
pub async fn create_token(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Json(req): Json<CreateTokenRequest>,
) -> ApiResult<(StatusCode, Json<Token>)> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageTokens)
        .await?;
    req.validate()?;

    let token = state.token_service.create(req).await?;

    Ok((StatusCode::CREATED, Json(token)))
}

/// PUT /api/admin/tokens/:id
pub async fn update_token(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTokenRequest>,
) -> ApiResult<Json<Token>> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageTokens)
        .await?;
    req.validate()?;

    let token = state.token_service.update(id, req).await?;

    Ok(Json(token))
}

/// DELETE /api/admin/tokens/:id
pub async fn delete_token(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageTokens)
        .await?;

    state.token_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct BlockTokenRequest {
    pub blocked: bool,
}

/// POST /api/admin/tokens/:id/block
pub async fn block_token(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(req): Json<BlockTokenRequest>,
) -> ApiResult<Json<Token>> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageTokens)
        .await?;

    let token = state.token_service.set_blocked(id, req.blocked).await?;

    Ok(Json(token))
}
