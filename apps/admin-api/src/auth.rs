//! JWT authentication module.
//!
//! Bearer tokens are HS256 JWTs issued by the identity provider. The subject
//! is the caller's user id; what the caller may do is decided by
//! [`Capability`] grants in the backend, not by the token.
//!
//! ```text
//! Authorization: Bearer <jwt>
//!        │
//!        ▼
//! Caller extractor ── missing / bad / expired ──► 401
//!        │
//!        ▼
//! backend.has_capability(user, ProvisionTenants) ── false ──► 403
//! ```

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AdminError;
use crate::AppState;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    #[serde(default)]
    pub email: Option<String>,

    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Platform-level permissions, stored by name in `platform_roles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// May create companies, their first admin and a subscription.
    ProvisionTenants,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ProvisionTenants => "provision_tenants",
        }
    }
}

/// JWT token manager.
pub struct JwtManager {
    secret: String,
}

impl JwtManager {
    pub fn new(secret: impl Into<String>) -> Self {
        JwtManager {
            secret: secret.into(),
        }
    }

    /// Issue a token for `user_id`. Used by operators' tooling and tests.
    pub fn issue_token(
        &self,
        user_id: Uuid,
        email: Option<&str>,
        lifetime: Duration,
    ) -> Result<String, AdminError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.map(str::to_string),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AdminError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AdminError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| AdminError::AuthFailed(format!("Invalid token: {}", e)))
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// An authenticated caller.
///
/// Rejects with 401 when the `Authorization` header is missing, not a
/// bearer token, or fails validation.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AdminError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AdminError::AuthFailed("Missing bearer token".to_string()))?;

        let token = extract_bearer_token(header)
            .ok_or_else(|| AdminError::AuthFailed("Missing bearer token".to_string()))?;

        let claims = state.jwt.validate_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AdminError::AuthFailed("Invalid token subject".to_string()))?;

        Ok(Caller {
            user_id,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret");
        let user = Uuid::new_v4();

        let token = manager
            .issue_token(user, Some("ops@caixa.app"), Duration::hours(1))
            .unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user.to_string());
        assert_eq!(claims.email.as_deref(), Some("ops@caixa.app"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtManager::new("one")
            .issue_token(Uuid::new_v4(), None, Duration::hours(1))
            .unwrap();

        let result = JwtManager::new("two").validate_token(&token);
        assert!(matches!(result, Err(AdminError::AuthFailed(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = JwtManager::new("test-secret");
        let token = manager
            .issue_token(Uuid::new_v4(), None, Duration::hours(-2))
            .unwrap();

        assert!(manager.validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic dXNlcg=="), None);
    }
}
