//! Permission models

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::StaffRole;

/// A single named permission a non-admin staff user may hold.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq, Hash)]
#[sqlx(type_name = "capability", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ManageOrders,
    ManageProducts,
    ManageTokens,
    ManageRefunds,
    ManageUsers,
    ManageCoupons,
}

impl Capability {
    /// Every capability, in a stable order.
    pub const ALL: [Capability; 6] = [
        Capability::ManageOrders,
        Capability::ManageProducts,
        Capability::ManageTokens,
        Capability::ManageRefunds,
        Capability::ManageUsers,
        Capability::ManageCoupons,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManageOrders => "manage_orders",
            Capability::ManageProducts => "manage_products",
            Capability::ManageTokens => "manage_tokens",
            Capability::ManageRefunds => "manage_refunds",
            Capability::ManageUsers => "manage_users",
            Capability::ManageCoupons => "manage_coupons",
        }
    }
}

/// One granted capability row
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct CapabilityGrant {
    pub user_id: Uuid,
    pub capability: Capability,
    pub granted_at: DateTime<Utc>,
}

/// Grant or revoke a single capability
#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub capability: Capability,
}

/// Bulk grant/revoke of every capability
#[derive(Debug, Deserialize)]
pub struct SetAllRequest {
    pub enabled: bool,
}

/// What a staff user may do, as seen by the dashboard
#[derive(Debug, Serialize)]
pub struct PermissionsView {
    pub user_id: Uuid,
    pub role: StaffRole,
    pub capabilities: Vec<Capability>,
}
