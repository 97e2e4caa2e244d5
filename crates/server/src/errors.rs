use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::auth::errors::AuthError;
use service::identity::IdentityError;
use thiserror::Error;
use tracing::error;

/// Error returned by handlers; renders as `{"error": title, "detail": ...}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.title, self.detail))).into_response()
    }
}

impl From<IdentityError> for JsonApiError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string())),
            IdentityError::Conflict(_) => Self::new(StatusCode::CONFLICT, "Conflict", Some(e.to_string())),
            IdentityError::Repository(_) => {
                error!(err = %e, code = e.code(), "repository failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", None)
            }
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Identity(inner) => inner.into(),
            AuthError::Validation(_) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string())),
            AuthError::Unauthorized => Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(e.to_string())),
            AuthError::HashError(_) | AuthError::TokenError(_) => {
                error!(err = %e, code = e.code(), "auth failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", None)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::identity::UniqueField;

    #[test]
    fn registry_errors_map_to_http_status() {
        assert_eq!(JsonApiError::from(IdentityError::NotFound("x".into())).status, StatusCode::NOT_FOUND);
        let conflict = JsonApiError::from(IdentityError::Conflict(UniqueField::Phone));
        assert_eq!(conflict.status, StatusCode::CONFLICT);
        assert_eq!(conflict.detail.as_deref(), Some("phone already in use"));
        let repo = JsonApiError::from(IdentityError::Repository("boom".into()));
        assert_eq!(repo.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(repo.detail.is_none());
    }

    #[test]
    fn auth_errors_map_to_http_status() {
        assert_eq!(JsonApiError::from(AuthError::Validation("short".into())).status, StatusCode::BAD_REQUEST);
        assert_eq!(JsonApiError::from(AuthError::Unauthorized).status, StatusCode::UNAUTHORIZED);
        let wrapped = AuthError::Identity(IdentityError::Conflict(UniqueField::Email));
        assert_eq!(JsonApiError::from(wrapped).status, StatusCode::CONFLICT);
    }
}
