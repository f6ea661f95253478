//! Domain model for authentication.

mod error;
mod identity;
mod token;

pub use error::{AuthError, AuthResult};
pub use identity::{Identity, UserId};
pub use token::{TokenClaims, TokenKind, TokenPair};
