//! Bearer authentication for protected routes.

use super::{AppState, error::ApiError};
use crate::auth::domain::{AuthError, AuthResult};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

const BEARER_SCHEME: &str = "Bearer";

/// Authenticates the request and stores the caller's
/// [`Identity`](crate::auth::domain::Identity) in its extensions.
///
/// # Errors
///
/// Returns [`ApiError::NotAuthenticated`] when no bearer token is sent and
/// [`ApiError::AccessTokenNotValid`] when the token is rejected.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authenticated =
        bearer_token(request.headers()).and_then(|token| state.access_tokens().validate(token));
    let identity = match authenticated {
        Ok(identity) => identity,
        Err(err) => {
            if err.is_token_rejection() {
                warn!(reason = %err, path = %request.uri().path(), "rejected access token");
            } else {
                debug!(path = %request.uri().path(), "request without credentials");
            }
            return Err(ApiError::from_access_auth(&err));
        }
    };
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
///
/// A missing header or another scheme counts as no credentials.
fn bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    let Some(header_value) = headers.get(header::AUTHORIZATION) else {
        return Err(AuthError::MissingCredentials);
    };
    let value = header_value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("authorization header is not ASCII".to_owned()))?;
    let mut parts = value.split_whitespace();
    if parts.next() != Some(BEARER_SCHEME) {
        return Err(AuthError::MissingCredentials);
    }
    match (parts.next(), parts.next()) {
        (Some(token), None) => Ok(token),
        _ => Err(AuthError::InvalidToken(
            "authorization header must contain two space-delimited values".to_owned(),
        )),
    }
}
