//! Admin order management handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::middleware::AuthenticatedStaff;
use crate::orders::{Order, OrderEvent, OrderMessage, OrderStatus, UpdateOrderStatusRequest};
use crate::permissions::Capability;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<OrderStatus>,
}

/// GET /api/admin/orders
pub async fn list_orders(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Query(query): Query<ListOrdersQuery>,
) -> ApiResult<Json<Vec<Order>>> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageOrders)
        .await?;

    let orders = state.order_service.list(query.status).await?;

    Ok(Json(orders))
}

/// PUT /api/admin/orders/:id/status
pub async fn update_order_status(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> ApiResult<Json<Order>> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageOrders)
        .await?;

    let order = state.order_service.update_status(id, req).await?;

    state.feed.broadcast(OrderEvent::OrderUpdated {
        order_id: order.id,
        order_number: order.order_number,
        status: order.status,
    });

    Ok(Json(order))
}

/// DELETE /api/admin/orders/:id
pub async fn delete_order(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageOrders)
        .await?;

    state.order_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/orders/:id/request-resend
pub async fn request_fulfillment_resend(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<OrderMessage>)> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageOrders)
        .await?;

    let message = state.order_service.request_fulfillment_resend(id).await?;

    if let Some(order) = state.order_service.get(id).await? {
        state.feed.broadcast(OrderEvent::MessagePosted {
            order_id: order.id,
            order_number: order.order_number,
        });
    }

    Ok((StatusCode::CREATED, Json(message)))
}

#[derive(Debug, Deserialize)]
pub struct AdminMessageRequest {
    pub message: String,
}

/// POST /api/admin/orders/:id/messages - staff chat message
pub async fn post_admin_message(
    State(state): State<AppState>,
    staff: AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(req): Json<AdminMessageRequest>,
) -> ApiResult<(StatusCode, Json<OrderMessage>)> {
    state
        .permission_service
        .require(staff.user_id, staff.role, Capability::ManageOrders)
        .await?;

    let message = state
        .order_service
        .post_message(id, crate::orders::MessageSender::Admin, &req.message)
        .await?;

    if let Some(order) = state.order_service.get(id).await? {
        state.feed.broadcast(OrderEvent::MessagePosted {
            order_id: order.id,
            order_number: order.order_number,
        });
    }

    Ok((StatusCode::CREATED, Json(message)))
}
