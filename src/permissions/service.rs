//! Permission service layer

use std::collections::HashSet;

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::StaffRole;

use super::model::{Capability, CapabilityGrant};

/// Permission errors
#[derive(Debug, thiserror::Error)]
pub enum PermissionError {
    #[error("Missing capability: {}", .0.as_str())]
    Denied(Capability),

    #[error("No dashboard access")]
    NoAccess,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for PermissionError {
    fn from(e: sqlx::Error) -> Self {
        PermissionError::DatabaseError(e.to_string())
    }
}

/// Capability store and checks
#[derive(Clone)]
pub struct PermissionService {
    db_pool: PgPool,
}

impl PermissionService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// The capability set for a user. Admins get the full set without a
    /// lookup; a user with no rows gets the empty set.
    pub async fn capabilities_for(
        &self,
        user_id: Uuid,
        role: StaffRole,
    ) -> Result<HashSet<Capability>, PermissionError> {
        if role == StaffRole::Admin {
            return Ok(Capability::ALL.into_iter().collect());
        }

        let grants = sqlx::query_as::<_, CapabilityGrant>(
            "SELECT * FROM staff_capabilities WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(grants.into_iter().map(|g| g.capability).collect())
    }

    pub async fn has_capability(
        &self,
        user_id: Uuid,
        role: StaffRole,
        capability: Capability,
    ) -> Result<bool, PermissionError> {
        if role == StaffRole::Admin {
            return Ok(true);
        }

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM staff_capabilities WHERE user_id = $1 AND capability = $2",
        )
        .bind(user_id)
        .bind(capability)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(count > 0)
    }

    /// Gate for staff mutations: error unless the capability is held.
    pub async fn require(
        &self,
        user_id: Uuid,
        role: StaffRole,
        capability: Capability,
    ) -> Result<(), PermissionError> {
        if self.has_capability(user_id, role, capability).await? {
            Ok(())
        } else {
            Err(PermissionError::Denied(capability))
        }
    }

    /// Dashboard gate: a non-admin with an empty set has no access at all.
    pub async fn require_any(
        &self,
        user_id: Uuid,
        role: StaffRole,
    ) -> Result<HashSet<Capability>, PermissionError> {
        let capabilities = self.capabilities_for(user_id, role).await?;
        if capabilities.is_empty() {
            return Err(PermissionError::NoAccess);
        }
        Ok(capabilities)
    }

    /// Grant a capability. Idempotent.
    pub async fn grant(&self, user_id: Uuid, capability: Capability) -> Result<(), PermissionError> {
        sqlx::query(
            r#"
            INSERT INTO staff_capabilities (user_id, capability)
            VALUES ($1, $2)
            ON CONFLICT (user_id, capability) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(capability)
        .execute(&self.db_pool)
        .await?;

        Ok(())
    }

    /// Revoke a capability. Idempotent.
    pub async fn revoke(
        &self,
        user_id: Uuid,
        capability: Capability,
    ) -> Result<(), PermissionError> {
        sqlx::query("DELETE FROM staff_capabilities WHERE user_id = $1 AND capability = $2")
            .bind(user_id)
            .bind(capability)
            .execute(&self.db_pool)
            .await?;

        Ok(())
    }

    /// Bulk convenience: end state must equal granting or revoking each
    /// capability individually.
    pub async fn set_all(&self, user_id: Uuid, enabled: bool) -> Result<(), PermissionError> {
        if enabled {
            for capability in Capability::ALL {
                self.grant(user_id, capability).await?;
            }
        } else {
            self.remove_all(user_id).await?;
        }

        Ok(())
    }

    /// Drop every grant for a user; called when the staff user is deleted.
    pub async fn remove_all(&self, user_id: Uuid) -> Result<(), PermissionError> {
        sqlx::query("DELETE FROM staff_capabilities WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db_pool)
            .await?;

        Ok(())
    }
}
