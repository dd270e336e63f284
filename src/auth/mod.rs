//! Session-token plumbing
//!
//! Staff identity lives in an external auth service. This module only
//! verifies the session tokens that service issues and exposes the role
//! claim the permission model consumes.

mod jwt;

pub use jwt::{encode_session_token, verify_session_token, Claims, JwtError};

use serde::{Deserialize, Serialize};

/// Role claim carried by staff session tokens.
///
/// Admin is a role, not a capability: it short-circuits every capability
/// check in the permission model.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Admin,
    Staff,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Admin => "admin",
            StaffRole::Staff => "staff",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(StaffRole::Admin),
            "staff" => Some(StaffRole::Staff),
            _ => None,
        }
    }
}
