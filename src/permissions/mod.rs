//! Capability-based permission model
//!
//! Non-admin staff hold a set of capabilities, one per management area,
//! stored as rows rather than a fixed struct of booleans so new
//! capabilities are a new enum value and nothing else. The admin role
//! claim short-circuits every check.

mod model;
mod service;

pub use model::{Capability, CapabilityGrant, GrantRequest, PermissionsView, SetAllRequest};
pub use service::{PermissionError, PermissionService};

use crate::error::ApiError;

impl From<PermissionError> for ApiError {
    fn from(err: PermissionError) -> Self {
        match err {
            PermissionError::Denied(capability) => ApiError::Forbidden(format!(
                "Missing capability: {}",
                capability.as_str()
            )),
            PermissionError::NoAccess => {
                ApiError::Forbidden("No dashboard access".to_string())
            }
            PermissionError::DatabaseError(msg) => ApiError::DatabaseError(msg),
        }
    }
}
