//! Error types for the Admin API.
//!
//! Every error leaves the server as `{ "error": "<message>" }`.
//!
//! | Variant          | Status |
//! |------------------|--------|
//! | `AuthFailed`     | 401    |
//! | `Forbidden`      | 403    |
//! | `InvalidRequest` | 400    |
//! | `Backend`        | 400    |
//! | `Internal`       | 500    |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use caixa_core::ValidationError;
use serde::Serialize;

use crate::backend::BackendError;

/// Admin API errors.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A call to the tenant backend failed.
    #[error("{0}")]
    Backend(#[from] BackendError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdminError {
    pub fn status(&self) -> StatusCode {
        match self {
            AdminError::AuthFailed(_) => StatusCode::UNAUTHORIZED,
            AdminError::Forbidden(_) => StatusCode::FORBIDDEN,
            AdminError::InvalidRequest(_) | AdminError::Backend(_) => StatusCode::BAD_REQUEST,
            AdminError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for AdminError {
    fn from(err: ValidationError) -> Self {
        AdminError::InvalidRequest(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Admin request failed");
        }

        let error = match &self {
            AdminError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

pub type AdminResult<T> = Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AdminError::AuthFailed("no token".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AdminError::Forbidden("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AdminError::Backend(BackendError::Unavailable("down".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AdminError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_is_bad_request() {
        let err: AdminError = ValidationError::Required {
            field: "companyName".to_string(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid request: companyName is required");
    }
}
