//! Customer-facing storefront handlers
//!
//! No authentication: a valid token value is the customer's only handle.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::catalog::StorefrontProduct;
use crate::error::ApiResult;
use crate::orders::{
    MessageSender, OrderEvent, OrderMessage, OrderView, PlaceOrderRequest, PostMessageRequest,
};
use crate::refunds::{RefundStatusView, SubmitRefundRequest};
use crate::state::AppState;
use crate::tokens::{RedeemTokenRequest, TokenBalanceView};

/// POST /api/tokens/redeem - customer balance check
pub async fn redeem_token(
    State(state): State<AppState>,
    Json(req): Json<RedeemTokenRequest>,
) -> ApiResult<Json<TokenBalanceView>> {
    req.validate()?;

    let token = state.token_service.redeem(&req.token).await?;

    Ok(Json(TokenBalanceView::from(&token)))
}

/// GET /api/catalog - products with active options and stock counts
pub async fn storefront_catalog(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<StorefrontProduct>>> {
    let listing = state.catalog_service.storefront().await?;

    Ok(Json(listing))
}

/// POST /api/orders - place an order
pub async fn place_order(
    State(state): State<AppState>,
    Json(req): Json<PlaceOrderRequest>,
) -> ApiResult<(StatusCode, Json<OrderView>)> {
    req.validate()?;

    let order = state.order_service.place_order(req).await?;

    state.feed.broadcast(OrderEvent::OrderCreated {
        order_id: order.id,
        order_number: order.order_number,
    });

    Ok((StatusCode::CREATED, Json(OrderView::from(&order))))
}

/// Query parameters shared by the customer lookup endpoints
#[derive(Debug, Deserialize)]
pub struct OwnedOrderQuery {
    pub token: String,
    pub order_number: i64,
}

/// GET /api/orders/lookup - customer order status
pub async fn lookup_order(
    State(state): State<AppState>,
    Query(query): Query<OwnedOrderQuery>,
) -> ApiResult<Json<OrderView>> {
    let order = state
        .order_service
        .get_by_number_for_token(query.order_number, &query.token)
        .await?;

    Ok(Json(OrderView::from(&order)))
}

/// POST /api/orders/:id/messages - customer chat message
pub async fn post_order_message(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<PostMessageRequest>,
) -> ApiResult<(StatusCode, Json<OrderMessage>)> {
    req.validate()?;

    // The token must own the order before the customer may write to its
    // channel.
    let order = state.order_service.get(order_id).await?.ok_or_else(|| {
        crate::error::ApiError::NotFound("Order not found".to_string())
    })?;
    state
        .order_service
        .get_by_number_for_token(order.order_number, &req.token)
        .await?;

    let message = state
        .order_service
        .post_message(order_id, MessageSender::Customer, &req.message)
        .await?;

    state.feed.broadcast(OrderEvent::MessagePosted {
        order_id: order.id,
        order_number: order.order_number,
    });

    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /api/orders/:id/messages - order chat history
pub async fn list_order_messages(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Query(query): Query<MessagesQuery>,
) -> ApiResult<Json<Vec<OrderMessage>>> {
    let order = state.order_service.get(order_id).await?.ok_or_else(|| {
        crate::error::ApiError::NotFound("Order not found".to_string())
    })?;
    state
        .order_service
        .get_by_number_for_token(order.order_number, &query.token)
        .await?;

    let messages = state.order_service.list_messages(order_id).await?;

    Ok(Json(messages))
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub token: String,
}

/// POST /api/refunds - submit a refund request
pub async fn submit_refund(
    State(state): State<AppState>,
    Json(req): Json<SubmitRefundRequest>,
) -> ApiResult<StatusCode> {
    req.validate()?;

    state.refund_service.submit(req).await?;

    Ok(StatusCode::CREATED)
}

/// GET /api/refunds/status - customer refund status lookup
pub async fn refund_status(
    State(state): State<AppState>,
    Query(query): Query<OwnedOrderQuery>,
) -> ApiResult<Json<RefundStatusView>> {
    let view = state
        .refund_service
        .check_status(&query.token, query.order_number)
        .await?;

    Ok(Json(view))
}
