//! Service layer for obtaining and refreshing bearer tokens.

use crate::auth::{
    domain::{AuthError, AuthResult, TokenPair},
    ports::{TokenIssuer, UserDirectory},
};
use std::sync::Arc;
use tracing::{debug, info};

/// Token issuance orchestration service.
pub struct TokenService<I, U>
where
    I: TokenIssuer + ?Sized,
    U: UserDirectory + ?Sized,
{
    issuer: Arc<I>,
    users: Arc<U>,
}

impl<I, U> Clone for TokenService<I, U>
where
    I: TokenIssuer + ?Sized,
    U: UserDirectory + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            issuer: Arc::clone(&self.issuer),
            users: Arc::clone(&self.users),
        }
    }
}

impl<I, U> TokenService<I, U>
where
    I: TokenIssuer + ?Sized,
    U: UserDirectory + ?Sized,
{
    /// Creates a new token service.
    #[must_use]
    pub const fn new(issuer: Arc<I>, users: Arc<U>) -> Self {
        Self { issuer, users }
    }

    /// Exchanges account credentials for an access and refresh token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when no account matches and
    /// propagates directory and signing failures.
    pub async fn obtain_pair(&self, username: &str, password: &str) -> AuthResult<TokenPair> {
        let Some(user_id) = self.users.authenticate(username, password).await? else {
            debug!(username, "rejected token request with invalid credentials");
            return Err(AuthError::InvalidCredentials);
        };
        let pair = self.issuer.issue_pair(user_id)?;
        info!(user_id = user_id.value(), "issued token pair");
        Ok(pair)
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns a token rejection when `refresh_token` is invalid, expired or
    /// not a refresh token.
    pub fn refresh(&self, refresh_token: &str) -> AuthResult<String> {
        self.issuer.refresh_access(refresh_token)
    }
}
