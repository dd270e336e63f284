//! Refund workflow tests
//!
//! Database-backed tests are ignored by default and run against
//! TEST_DATABASE_URL with migrations applied.

use sqlx::PgPool;
use uuid::Uuid;

use tokenshop_server::catalog::{
    AddStockRequest, CatalogService, CreateOptionRequest, CreateProductRequest, FulfillmentType,
};
use tokenshop_server::orders::{Order, OrderService, PlaceOrderRequest};
use tokenshop_server::refunds::{
    ApproveRefundRequest, RefundError, RefundService, RefundStatus, RejectRefundRequest,
    SubmitRefundRequest,
};
use tokenshop_server::tokens::{CreateTokenRequest, TokenService};

/// Helper to create a test database pool
async fn setup_test_db() -> PgPool {
    let database_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgresql://localhost/tokenshop_test".to_string());

    sqlx::postgres::PgPoolOptions::new()
        .max_connections(4)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database")
}

async fn balance_of(tokens: &TokenService, token_id: Uuid) -> i64 {
    tokens
        .list()
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.id == token_id)
        .unwrap()
        .balance
}

/// Seed a token with a completed auto-delivery order against it.
async fn seed_completed_order(pool: &PgPool, balance: i64, price: i64) -> (String, Uuid, Order) {
    let tokens = TokenService::new(pool.clone());
    let token_value = format!("TOK-{}", Uuid::new_v4());
    let token = tokens
        .create(CreateTokenRequest {
            token: token_value.clone(),
            balance,
        })
        .await
        .expect("Failed to seed token");

    let catalog = CatalogService::new(pool.clone());
    let product = catalog
        .create_product(CreateProductRequest {
            name: format!("Test product {}", Uuid::new_v4()),
            price,
            duration: None,
            available: 0,
            instant_delivery: true,
        })
        .await
        .expect("Failed to seed product");
    let option = catalog
        .create_option(
            product.id,
            CreateOptionRequest {
                name: "lifetime".to_string(),
                fulfillment: FulfillmentType::None,
                price,
                duration: None,
                estimated_time: None,
                description: None,
                is_active: true,
            },
        )
        .await
        .expect("Failed to seed option");
    catalog
        .add_stock(AddStockRequest {
            product_id: product.id,
            option_id: Some(option.id),
            content: "KEY-0001".to_string(),
        })
        .await
        .expect("Failed to seed stock");

    let orders = OrderService::new(pool.clone());
    let order = orders
        .place_order(PlaceOrderRequest {
            token: token_value.clone(),
            option_id: option.id,
            coupon_code: None,
            email: None,
            password: None,
            verification_link: None,
            text: None,
        })
        .await
        .expect("Auto-delivery order should complete");

    (token_value, token.id, order)
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_approve_credits_token_exactly_once() {
    let pool = setup_test_db().await;
    let (token_value, token_id, order) = seed_completed_order(&pool, 5000, 2000).await;
    let tokens = TokenService::new(pool.clone());
    assert_eq!(balance_of(&tokens, token_id).await, 3000);

    let refunds = RefundService::new(pool.clone());
    let refund = refunds
        .submit(SubmitRefundRequest {
            token: token_value,
            order_number: order.order_number,
            reason: Some("Key did not activate".to_string()),
        })
        .await
        .expect("Refund submission should succeed");
    assert_eq!(refund.status, RefundStatus::Pending);

    let approved = refunds
        .approve(
            refund.id,
            ApproveRefundRequest {
                refund_amount: 2000,
                admin_note: Some("Verified".to_string()),
            },
        )
        .await
        .expect("Approval should succeed");
    assert_eq!(approved.status, RefundStatus::Approved);
    assert!(approved.processed_at.is_some());
    assert_eq!(balance_of(&tokens, token_id).await, 5000);

    // A second approval must not credit again.
    let again = refunds
        .approve(
            refund.id,
            ApproveRefundRequest {
                refund_amount: 2000,
                admin_note: None,
            },
        )
        .await;
    assert!(matches!(again, Err(RefundError::NotPending)));
    assert_eq!(balance_of(&tokens, token_id).await, 5000);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_partial_refund_allowed_overdraft_rejected() {
    let pool = setup_test_db().await;
    let (token_value, token_id, order) = seed_completed_order(&pool, 5000, 2000).await;
    let tokens = TokenService::new(pool.clone());

    let refunds = RefundService::new(pool.clone());
    let refund = refunds
        .submit(SubmitRefundRequest {
            token: token_value,
            order_number: order.order_number,
            reason: None,
        })
        .await
        .unwrap();

    let too_much = refunds
        .approve(
            refund.id,
            ApproveRefundRequest {
                refund_amount: 2001,
                admin_note: None,
            },
        )
        .await;
    assert!(matches!(too_much, Err(RefundError::AmountExceedsOrder)));

    refunds
        .approve(
            refund.id,
            ApproveRefundRequest {
                refund_amount: 500,
                admin_note: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(balance_of(&tokens, token_id).await, 3500);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_one_refund_request_ever_per_order() {
    let pool = setup_test_db().await;
    let (token_value, token_id, order) = seed_completed_order(&pool, 5000, 2000).await;
    let tokens = TokenService::new(pool.clone());

    let refunds = RefundService::new(pool.clone());
    let refund = refunds
        .submit(SubmitRefundRequest {
            token: token_value.clone(),
            order_number: order.order_number,
            reason: None,
        })
        .await
        .unwrap();

    refunds
        .reject(
            refund.id,
            RejectRefundRequest {
                admin_note: Some("No evidence provided".to_string()),
            },
        )
        .await
        .unwrap();

    // Rejection has no balance effect and no second chance.
    assert_eq!(balance_of(&tokens, token_id).await, 3000);

    let second = refunds
        .submit(SubmitRefundRequest {
            token: token_value,
            order_number: order.order_number,
            reason: Some("Trying again".to_string()),
        })
        .await;
    assert!(matches!(second, Err(RefundError::DuplicateRequest)));
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_refund_requires_terminal_order() {
    let pool = setup_test_db().await;

    let tokens = TokenService::new(pool.clone());
    let token_value = format!("TOK-{}", Uuid::new_v4());
    tokens
        .create(CreateTokenRequest {
            token: token_value.clone(),
            balance: 5000,
        })
        .await
        .unwrap();

    let catalog = CatalogService::new(pool.clone());
    let product = catalog
        .create_product(CreateProductRequest {
            name: format!("Test product {}", Uuid::new_v4()),
            price: 2000,
            duration: None,
            available: 0,
            instant_delivery: false,
        })
        .await
        .unwrap();
    let option = catalog
        .create_option(
            product.id,
            CreateOptionRequest {
                name: "1 month".to_string(),
                fulfillment: FulfillmentType::Link,
                price: 2000,
                duration: None,
                estimated_time: None,
                description: None,
                is_active: true,
            },
        )
        .await
        .unwrap();

    let orders = OrderService::new(pool.clone());
    let order = orders
        .place_order(PlaceOrderRequest {
            token: token_value.clone(),
            option_id: option.id,
            coupon_code: None,
            email: None,
            password: None,
            verification_link: Some("https://example.com/verify".to_string()),
            text: None,
        })
        .await
        .unwrap();

    // Still pending: disputes wait until the order is settled.
    let refunds = RefundService::new(pool.clone());
    let result = refunds
        .submit(SubmitRefundRequest {
            token: token_value,
            order_number: order.order_number,
            reason: None,
        })
        .await;
    assert!(matches!(result, Err(RefundError::OrderNotEligible)));
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_status_lookup_revalidates_ownership() {
    let pool = setup_test_db().await;
    let (token_value, _, order) = seed_completed_order(&pool, 5000, 2000).await;

    let tokens = TokenService::new(pool.clone());
    let stranger = format!("TOK-{}", Uuid::new_v4());
    tokens
        .create(CreateTokenRequest {
            token: stranger.clone(),
            balance: 0,
        })
        .await
        .unwrap();

    let refunds = RefundService::new(pool.clone());
    refunds
        .submit(SubmitRefundRequest {
            token: token_value.clone(),
            order_number: order.order_number,
            reason: None,
        })
        .await
        .unwrap();

    let view = refunds
        .check_status(&token_value, order.order_number)
        .await
        .expect("Owner should see the refund status");
    assert_eq!(view.status, RefundStatus::Pending);

    let denied = refunds.check_status(&stranger, order.order_number).await;
    assert!(matches!(denied, Err(RefundError::OrderNotFound)));
}
