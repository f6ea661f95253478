//! Route handlers.

use super::{AppState, body::json_object, error::ApiError};
use crate::auth::domain::{Identity, TokenPair};
use crate::task::{
    domain::Task,
    validation::{FieldErrors, non_blank_string_field},
};
use axum::{Extension, Json, body::Bytes, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::warn;

/// Body returned by the refresh endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken {
    /// Newly issued access token.
    pub access: String,
}

/// `POST /tasks/`: validates and stores a task for the authenticated caller.
///
/// # Errors
///
/// Returns 400 for any rejected payload and 500 when the store fails.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Bytes,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let payload = json_object(&body)?;
    let task = state.tasks().create(&payload, &identity).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `POST /api/token/`: exchanges credentials for an access and refresh token.
///
/// # Errors
///
/// Returns 400 when `username` or `password` is missing or blank and 401
/// when no account matches.
pub async fn obtain_token(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TokenPair>, ApiError> {
    let payload = json_object(&body)?;
    let mut errors = FieldErrors::new();
    let username = non_blank_string_field(&payload, "username", &mut errors);
    let password = non_blank_string_field(&payload, "password", &mut errors);
    let (Some(username), Some(password)) = (username, password) else {
        return Err(ApiError::Fields(errors));
    };

    state
        .tokens()
        .obtain_pair(username, password)
        .await
        .map(Json)
        .map_err(|err| {
            warn!(username, "token request refused");
            ApiError::from_obtain(&err)
        })
}

/// `POST /api/token/refresh/`: exchanges a refresh token for an access token.
///
/// # Errors
///
/// Returns 400 when `refresh` is missing or blank and 401 when the token is
/// invalid, expired or not a refresh token.
pub async fn refresh_token(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AccessToken>, ApiError> {
    let payload = json_object(&body)?;
    let mut errors = FieldErrors::new();
    let Some(refresh) = non_blank_string_field(&payload, "refresh", &mut errors) else {
        return Err(ApiError::Fields(errors));
    };

    state
        .tokens()
        .refresh(refresh)
        .map(|access| Json(AccessToken { access }))
        .map_err(|err| {
            warn!(reason = %err, "refresh token refused");
            ApiError::from_refresh(&err)
        })
}
