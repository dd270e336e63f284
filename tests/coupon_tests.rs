//! Coupon application tests
//!
//! Database-backed tests are ignored by default and run against
//! TEST_DATABASE_URL with migrations applied.

use sqlx::PgPool;
use uuid::Uuid;

use tokenshop_server::catalog::{
    CatalogService, CreateOptionRequest, CreateProductRequest, FulfillmentType,
};
use tokenshop_server::coupons::{CouponError, CouponService, CreateCouponRequest, DiscountType};
use tokenshop_server::orders::{OrderError, OrderService, PlaceOrderRequest};
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

async fn seed_option(pool: &PgPool, price: i64) -> Uuid {
    let catalog = CatalogService::new(pool.clone());
    let product = catalog
        .create_product(CreateProductRequest {
            name: format!("Test product {}", Uuid::new_v4()),
            price,
            duration: None,
            available: 0,
            instant_delivery: false,
        })
        .await
        .expect("Failed to seed product");

    catalog
        .create_option(
            product.id,
            CreateOptionRequest {
                name: "1 month".to_string(),
                fulfillment: FulfillmentType::Link,
                price,
                duration: None,
                estimated_time: None,
                description: None,
                is_active: true,
            },
        )
        .await
        .expect("Failed to seed option")
        .id
}

async fn seed_token(pool: &PgPool, balance: i64) -> String {
    let tokens = TokenService::new(pool.clone());
    let value = format!("TOK-{}", Uuid::new_v4());
    tokens
        .create(CreateTokenRequest {
            token: value.clone(),
            balance,
        })
        .await
        .expect("Failed to seed token");
    value
}

fn order_request(token: &str, option_id: Uuid, coupon: Option<&str>) -> PlaceOrderRequest {
    PlaceOrderRequest {
        token: token.to_string(),
        option_id,
        coupon_code: coupon.map(str::to_string),
        email: None,
        password: None,
        verification_link: Some("https://example.com/verify".to_string()),
        text: None,
    }
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_coupon_discounts_order_and_counts_use() {
    let pool = setup_test_db().await;
    let token_value = seed_token(&pool, 5000).await;
    let option_id = seed_option(&pool, 2000).await;

    let coupons = CouponService::new(pool.clone());
    let code = format!("SAVE-{}", Uuid::new_v4().simple());
    let coupon = coupons
        .create(CreateCouponRequest {
            code: code.clone(),
            discount_type: DiscountType::Percentage,
            discount_value: 25,
            min_order_amount: 0,
            max_uses: Some(10),
            expires_at: None,
        })
        .await
        .expect("Failed to seed coupon");

    let orders = OrderService::new(pool.clone());
    // Codes are canonicalized, so the lowercase spelling still matches.
    let order = orders
        .place_order(order_request(
            &token_value,
            option_id,
            Some(&code.to_lowercase()),
        ))
        .await
        .expect("Order with coupon should succeed");

    assert_eq!(order.amount, 1500);

    let used = coupons
        .list()
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.id == coupon.id)
        .unwrap();
    assert_eq!(used.used_count, 1);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_percentage_over_100_rejected_at_create() {
    let pool = setup_test_db().await;
    let coupons = CouponService::new(pool.clone());

    let result = coupons
        .create(CreateCouponRequest {
            code: format!("NEG-{}", Uuid::new_v4().simple()),
            discount_type: DiscountType::Percentage,
            discount_value: 150,
            min_order_amount: 0,
            max_uses: None,
            expires_at: None,
        })
        .await;
    assert!(matches!(result, Err(CouponError::InvalidDiscount)));

    // 100% stays valid: a free order is fine, a negative one is not.
    let full = coupons
        .create(CreateCouponRequest {
            code: format!("FREE-{}", Uuid::new_v4().simple()),
            discount_type: DiscountType::Percentage,
            discount_value: 100,
            min_order_amount: 0,
            max_uses: None,
            expires_at: None,
        })
        .await;
    assert!(full.is_ok());
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_oversized_fixed_discount_floors_order_at_zero() {
    let pool = setup_test_db().await;
    let token_value = seed_token(&pool, 5000).await;
    let option_id = seed_option(&pool, 1000).await;

    // Fixed discount larger than the price: the order lands at zero,
    // never below, and the balance is untouched.
    let coupons = CouponService::new(pool.clone());
    let code = format!("HUGE-{}", Uuid::new_v4().simple());
    coupons
        .create(CreateCouponRequest {
            code: code.clone(),
            discount_type: DiscountType::Fixed,
            discount_value: 5000,
            min_order_amount: 0,
            max_uses: None,
            expires_at: None,
        })
        .await
        .unwrap();

    let orders = OrderService::new(pool.clone());
    let order = orders
        .place_order(order_request(&token_value, option_id, Some(&code)))
        .await
        .expect("Zero-amount order should place");
    assert_eq!(order.amount, 0);

    let tokens = TokenService::new(pool.clone());
    let balance = tokens
        .list()
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.token == token_value)
        .unwrap()
        .balance;
    assert_eq!(balance, 5000);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_exhausted_coupon_rejected() {
    let pool = setup_test_db().await;
    let token_value = seed_token(&pool, 10000).await;
    let option_id = seed_option(&pool, 2000).await;

    let coupons = CouponService::new(pool.clone());
    let code = format!("ONCE-{}", Uuid::new_v4().simple());
    coupons
        .create(CreateCouponRequest {
            code: code.clone(),
            discount_type: DiscountType::Fixed,
            discount_value: 500,
            min_order_amount: 0,
            max_uses: Some(1),
            expires_at: None,
        })
        .await
        .unwrap();

    let orders = OrderService::new(pool.clone());
    orders
        .place_order(order_request(&token_value, option_id, Some(&code)))
        .await
        .expect("First use should succeed");

    let second = orders
        .place_order(order_request(&token_value, option_id, Some(&code)))
        .await;
    assert!(matches!(second, Err(OrderError::Coupon(_))));
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_minimum_order_amount_enforced() {
    let pool = setup_test_db().await;
    let token_value = seed_token(&pool, 5000).await;
    let option_id = seed_option(&pool, 1000).await;

    let coupons = CouponService::new(pool.clone());
    let code = format!("BIG-{}", Uuid::new_v4().simple());
    coupons
        .create(CreateCouponRequest {
            code: code.clone(),
            discount_type: DiscountType::Fixed,
            discount_value: 500,
            min_order_amount: 2000,
            max_uses: None,
            expires_at: None,
        })
        .await
        .unwrap();

    let orders = OrderService::new(pool.clone());
    let result = orders
        .place_order(order_request(&token_value, option_id, Some(&code)))
        .await;
    assert!(matches!(result, Err(OrderError::Coupon(_))));
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_inactive_coupon_rejected() {
    let pool = setup_test_db().await;
    let token_value = seed_token(&pool, 5000).await;
    let option_id = seed_option(&pool, 2000).await;

    let coupons = CouponService::new(pool.clone());
    let code = format!("OFF-{}", Uuid::new_v4().simple());
    let coupon = coupons
        .create(CreateCouponRequest {
            code: code.clone(),
            discount_type: DiscountType::Percentage,
            discount_value: 10,
            min_order_amount: 0,
            max_uses: None,
            expires_at: None,
        })
        .await
        .unwrap();
    coupons.set_active(coupon.id, false).await.unwrap();

    let orders = OrderService::new(pool.clone());
    let result = orders
        .place_order(order_request(&token_value, option_id, Some(&code)))
        .await;
    assert!(matches!(result, Err(OrderError::Coupon(_))));
}
