//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::catalog::CatalogService;
use crate::config::Config;
use crate::coupons::CouponService;
use crate::orders::OrderService;
use crate::permissions::PermissionService;
use crate::refunds::RefundService;
use crate::tokens::TokenService;
use crate::websocket::FeedState;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: sqlx::PgPool,
    pub token_service: Arc<TokenService>,
    pub catalog_service: Arc<CatalogService>,
    pub order_service: Arc<OrderService>,
    pub refund_service: Arc<RefundService>,
    pub permission_service: Arc<PermissionService>,
    pub coupon_service: Arc<CouponService>,
    pub feed: FeedState,
}

impl AppState {
    pub fn new(config: Config, db_pool: sqlx::PgPool) -> Self {
        Self {
            config: Arc::new(config),
            db_pool: db_pool.clone(),
            token_service: Arc::new(TokenService::new(db_pool.clone())),
            catalog_service: Arc::new(CatalogService::new(db_pool.clone())),
            order_service: Arc::new(OrderService::new(db_pool.clone())),
            refund_service: Arc::new(RefundService::new(db_pool.clone())),
            permission_service: Arc::new(PermissionService::new(db_pool.clone())),
            coupon_service: Arc::new(CouponService::new(db_pool)),
            feed: FeedState::new(),
        }
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for FeedState {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.feed.clone()
    }
}
