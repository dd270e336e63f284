//! Staff authentication extractors
//!
//! Session tokens come from the external identity service; these
//! extractors verify the Bearer token and surface the user id and role
//! claim. Capability checks happen in the handlers against the
//! permission service.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{verify_session_token, JwtError, StaffRole};
use crate::config::Config;

/// Authenticated staff member extracted from the session token
#[derive(Debug, Clone)]
pub struct AuthenticatedStaff {
    pub user_id: Uuid,
    pub role: StaffRole,
}

impl AuthenticatedStaff {
    pub fn is_admin(&self) -> bool {
        self.role == StaffRole::Admin
    }
}

/// Error response for authentication failures
#[derive(Debug, Serialize)]
struct AuthRejection {
    error: AuthRejectionDetails,
}

#[derive(Debug, Serialize)]
struct AuthRejectionDetails {
    code: String,
    message: String,
}

impl AuthRejection {
    fn new(status: StatusCode, code: &str, message: &str) -> Response {
        let body = AuthRejection {
            error: AuthRejectionDetails {
                code: code.to_string(),
                message: message.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedStaff
where
    Arc<Config>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AuthRejection::new(
                        StatusCode::UNAUTHORIZED,
                        "MISSING_TOKEN",
                        "Authorization header with Bearer token required",
                    )
                })?;

        let config = Arc::<Config>::from_ref(state);

        let claims = verify_session_token(bearer.token(), &config.jwt_secret).map_err(|e| {
            let (code, message) = match e {
                JwtError::TokenExpired => ("TOKEN_EXPIRED", "Session token has expired"),
                _ => ("INVALID_TOKEN", "Invalid session token"),
            };
            AuthRejection::new(StatusCode::UNAUTHORIZED, code, message)
        })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            AuthRejection::new(
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid user ID in token",
            )
        })?;

        let role = StaffRole::parse(&claims.role).ok_or_else(|| {
            AuthRejection::new(
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Unknown role claim",
            )
        })?;

        Ok(AuthenticatedStaff { user_id, role })
    }
}
