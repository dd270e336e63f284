//! Permission model tests
//!
//! Database-backed tests are ignored by default and run against
//! TEST_DATABASE_URL with migrations applied.

use std::collections::HashSet;

use sqlx::PgPool;
use uuid::Uuid;

use tokenshop_server::auth::StaffRole;
use tokenshop_server::permissions::{Capability, PermissionError, PermissionService};

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

#[tokio::test]
#[ignore] // Requires database setup
async fn test_admin_role_short_circuits() {
    let pool = setup_test_db().await;
    let service = PermissionService::new(pool);

    // No rows seeded for this user; the role claim alone grants everything.
    let user_id = Uuid::new_v4();
    let capabilities = service
        .capabilities_for(user_id, StaffRole::Admin)
        .await
        .unwrap();

    let full: HashSet<Capability> = Capability::ALL.into_iter().collect();
    assert_eq!(capabilities, full);

    for capability in Capability::ALL {
        assert!(service
            .require(user_id, StaffRole::Admin, capability)
            .await
            .is_ok());
    }
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_grant_and_revoke_are_idempotent() {
    let pool = setup_test_db().await;
    let service = PermissionService::new(pool);
    let user_id = Uuid::new_v4();

    service
        .grant(user_id, Capability::ManageOrders)
        .await
        .unwrap();
    service
        .grant(user_id, Capability::ManageOrders)
        .await
        .unwrap();

    let capabilities = service
        .capabilities_for(user_id, StaffRole::Staff)
        .await
        .unwrap();
    assert_eq!(capabilities.len(), 1);
    assert!(capabilities.contains(&Capability::ManageOrders));

    service
        .revoke(user_id, Capability::ManageOrders)
        .await
        .unwrap();
    service
        .revoke(user_id, Capability::ManageOrders)
        .await
        .unwrap();

    let capabilities = service
        .capabilities_for(user_id, StaffRole::Staff)
        .await
        .unwrap();
    assert!(capabilities.is_empty());
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_set_all_matches_individual_grants() {
    let pool = setup_test_db().await;
    let service = PermissionService::new(pool);

    let bulk_user = Uuid::new_v4();
    let manual_user = Uuid::new_v4();

    service.set_all(bulk_user, true).await.unwrap();
    for capability in Capability::ALL {
        service.grant(manual_user, capability).await.unwrap();
    }

    let bulk = service
        .capabilities_for(bulk_user, StaffRole::Staff)
        .await
        .unwrap();
    let manual = service
        .capabilities_for(manual_user, StaffRole::Staff)
        .await
        .unwrap();
    assert_eq!(bulk, manual);

    service.set_all(bulk_user, false).await.unwrap();
    let cleared = service
        .capabilities_for(bulk_user, StaffRole::Staff)
        .await
        .unwrap();
    assert!(cleared.is_empty());
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_empty_set_denies_dashboard_access() {
    let pool = setup_test_db().await;
    let service = PermissionService::new(pool);
    let user_id = Uuid::new_v4();

    let result = service.require_any(user_id, StaffRole::Staff).await;
    assert!(matches!(result, Err(PermissionError::NoAccess)));

    service
        .grant(user_id, Capability::ManageCoupons)
        .await
        .unwrap();
    let capabilities = service
        .require_any(user_id, StaffRole::Staff)
        .await
        .unwrap();
    assert_eq!(capabilities.len(), 1);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_missing_capability_denied() {
    let pool = setup_test_db().await;
    let service = PermissionService::new(pool);
    let user_id = Uuid::new_v4();

    service
        .grant(user_id, Capability::ManageOrders)
        .await
        .unwrap();

    let denied = service
        .require(user_id, StaffRole::Staff, Capability::ManageRefunds)
        .await;
    assert!(matches!(
        denied,
        Err(PermissionError::Denied(Capability::ManageRefunds))
    ));

    assert!(service
        .require(user_id, StaffRole::Staff, Capability::ManageOrders)
        .await
        .is_ok());
}
