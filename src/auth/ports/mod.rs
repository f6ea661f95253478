//! Port contracts for authentication collaborators.

use crate::auth::domain::{AuthResult, Identity, TokenPair, UserId};
use async_trait::async_trait;

/// Validates access tokens presented by callers.
pub trait TokenValidator: Send + Sync {
    /// Resolves an access token to the caller's identity.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`](crate::auth::domain::AuthError::InvalidToken)
    /// for malformed, tampered or expired tokens and
    /// [`AuthError::WrongTokenType`](crate::auth::domain::AuthError::WrongTokenType)
    /// when a refresh token is presented.
    fn validate(&self, token: &str) -> AuthResult<Identity>;
}

/// Issues token pairs and exchanges refresh tokens.
pub trait TokenIssuer: Send + Sync {
    /// Issues a fresh access and refresh token for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Signing`](crate::auth::domain::AuthError::Signing)
    /// when encoding fails.
    fn issue_pair(&self, user_id: UserId) -> AuthResult<TokenPair>;

    /// Exchanges a valid refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns a token rejection when `refresh_token` is invalid, expired or
    /// not a refresh token.
    fn refresh_access(&self, refresh_token: &str) -> AuthResult<String>;
}

/// Looks up accounts by credentials.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns the user id when `username` and `password` match an account.
    ///
    /// Returns `Ok(None)` for unknown users and wrong passwords alike.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Directory`](crate::auth::domain::AuthError::Directory)
    /// when the directory cannot be read.
    async fn authenticate(&self, username: &str, password: &str) -> AuthResult<Option<UserId>>;
}
