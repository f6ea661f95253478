//! Mapping from service errors to HTTP responses.

use crate::auth::domain::AuthError;
use crate::task::services::TaskCreationError;
use crate::task::validation::FieldErrors;
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

const BEARER_CHALLENGE: &str = r#"Bearer realm="api""#;
const TOKEN_NOT_VALID_CODE: &str = "token_not_valid";

/// Errors returned by HTTP handlers.
///
/// This is the only place where failures become status codes and bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No bearer credentials were sent to a protected route.
    #[error("Authentication credentials were not provided.")]
    NotAuthenticated,

    /// The access token was rejected.
    #[error("Given token not valid for any token type")]
    AccessTokenNotValid,

    /// The refresh token was rejected.
    #[error("Token is invalid or expired")]
    RefreshTokenNotValid,

    /// Login credentials matched no account.
    #[error("No active account found with the given credentials")]
    InvalidCredentials,

    /// A task creation rule refused the payload.
    #[error("{0}")]
    Rejected(String),

    /// Field-level schema errors.
    #[error("invalid fields")]
    Fields(FieldErrors),

    /// The body was JSON but not an object.
    #[error("Invalid data. Expected a dictionary, but got {0}.")]
    NotAnObject(&'static str),

    /// The body was not valid JSON.
    #[error("JSON parse error - {0}")]
    MalformedJson(String),

    /// An infrastructure failure; the cause is logged, not returned.
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Maps a failure to authenticate an access token.
    #[must_use]
    pub fn from_access_auth(err: &AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => Self::NotAuthenticated,
            rejection if rejection.is_token_rejection() => Self::AccessTokenNotValid,
            other => internal(other),
        }
    }

    /// Maps a failure to obtain a token pair.
    #[must_use]
    pub fn from_obtain(err: &AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            other => internal(other),
        }
    }

    /// Maps a failure to refresh an access token.
    #[must_use]
    pub fn from_refresh(err: &AuthError) -> Self {
        if err.is_token_rejection() {
            Self::RefreshTokenNotValid
        } else {
            internal(err)
        }
    }

    /// Returns the status code for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotAuthenticated
            | Self::AccessTokenNotValid
            | Self::RefreshTokenNotValid
            | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Rejected(_) | Self::Fields(_) | Self::NotAnObject(_) | Self::MalformedJson(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> serde_json::Value {
        match self {
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::MalformedJson(_)
            | Self::Internal => json!({ "detail": self.to_string() }),
            Self::AccessTokenNotValid | Self::RefreshTokenNotValid => {
                json!({ "detail": self.to_string(), "code": TOKEN_NOT_VALID_CODE })
            }
            Self::Rejected(message) => json!({ "error": message }),
            Self::Fields(errors) => json!(errors),
            Self::NotAnObject(_) => json!({ "non_field_errors": [self.to_string()] }),
        }
    }
}

fn internal(err: &impl std::fmt::Display) -> ApiError {
    error!(error = %err, "request failed");
    ApiError::Internal
}

impl From<TaskCreationError> for ApiError {
    fn from(err: TaskCreationError) -> Self {
        match err {
            TaskCreationError::Schema(errors) => Self::Fields(errors),
            // Already logged by the creation service.
            TaskCreationError::Repository(_) => Self::Internal,
            rejection => Self::Rejected(rejection.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, Json(self.body())).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(BEARER_CHALLENGE),
            );
        }
        response
    }
}
