//! Bearer token claims and issued token pairs.

use super::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Purpose of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived token accepted by protected endpoints.
    Access,
    /// Long-lived token exchanged for new access tokens.
    Refresh,
}

impl TokenKind {
    /// Returns the claim value for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims carried by every issued token.
///
/// Only the numeric user id identifies the holder; usernames and contact
/// details never enter a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Token purpose.
    pub token_type: TokenKind,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
    /// Issue time as seconds since the Unix epoch.
    pub iat: i64,
    /// Unique token identifier.
    pub jti: String,
    /// Holder of the token.
    pub user_id: UserId,
}

/// Access and refresh tokens issued together on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Encoded access token.
    pub access: String,
    /// Encoded refresh token.
    pub refresh: String,
}
