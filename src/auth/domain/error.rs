//! Authentication error types.

use super::TokenKind;
use thiserror::Error;

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors raised while authenticating callers or issuing tokens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The request carried no bearer credentials.
    #[error("authentication credentials were not provided")]
    MissingCredentials,

    /// The token failed decoding, signature or expiry checks.
    #[error("token is invalid: {0}")]
    InvalidToken(String),

    /// The token is valid but of the wrong kind for this use.
    #[error("expected a {expected} token")]
    WrongTokenType {
        /// Kind the caller required.
        expected: TokenKind,
    },

    /// Username and password did not match an active account.
    #[error("no active account found with the given credentials")]
    InvalidCredentials,

    /// The token could not be encoded.
    #[error("failed to sign token: {0}")]
    Signing(String),

    /// The user directory could not be consulted.
    #[error("user directory failure: {0}")]
    Directory(String),
}

impl AuthError {
    /// Returns `true` for failures caused by the presented token.
    #[must_use]
    pub const fn is_token_rejection(&self) -> bool {
        matches!(self, Self::InvalidToken(_) | Self::WrongTokenType { .. })
    }
}
