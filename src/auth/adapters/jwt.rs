//! HS256 JSON Web Token issuer and validator.

use crate::auth::{
    domain::{AuthError, AuthResult, Identity, TokenClaims, TokenKind, TokenPair, UserId},
    ports::{TokenIssuer, TokenValidator},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Default access token lifetime: five minutes.
pub const DEFAULT_ACCESS_LIFETIME_SECS: i64 = 5 * 60;

/// Default refresh token lifetime: one day.
pub const DEFAULT_REFRESH_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// Validity windows for issued tokens, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    /// Access token lifetime.
    pub access_secs: i64,
    /// Refresh token lifetime.
    pub refresh_secs: i64,
}

impl TokenLifetimes {
    const fn for_kind(self, kind: TokenKind) -> i64 {
        match kind {
            TokenKind::Access => self.access_secs,
            TokenKind::Refresh => self.refresh_secs,
        }
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access_secs: DEFAULT_ACCESS_LIFETIME_SECS,
            refresh_secs: DEFAULT_REFRESH_LIFETIME_SECS,
        }
    }
}

/// Token service signing HS256 JWTs with a shared secret.
///
/// Signature checks are delegated to `jsonwebtoken`; expiry is evaluated
/// against the injected clock rather than the system time so that lifetimes
/// can be exercised deterministically.
pub struct JwtTokenService<C>
where
    C: Clock + Send + Sync,
{
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetimes: TokenLifetimes,
    clock: Arc<C>,
}

impl<C> fmt::Debug for JwtTokenService<C>
where
    C: Clock + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("lifetimes", &self.lifetimes)
            .finish_non_exhaustive()
    }
}

impl<C> JwtTokenService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a token service signing with `secret`.
    #[must_use]
    pub fn new(secret: &[u8], lifetimes: TokenLifetimes, clock: Arc<C>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetimes,
            clock,
        }
    }

    /// Returns the configured token lifetimes.
    #[must_use]
    pub const fn lifetimes(&self) -> TokenLifetimes {
        self.lifetimes
    }

    fn issue(&self, kind: TokenKind, user_id: UserId) -> AuthResult<String> {
        let iat = self.clock.utc().timestamp();
        let exp = iat
            .checked_add(self.lifetimes.for_kind(kind))
            .ok_or_else(|| AuthError::Signing("token expiry overflows".to_owned()))?;
        let claims = TokenClaims {
            token_type: kind,
            exp,
            iat,
            jti: Uuid::new_v4().simple().to_string(),
            user_id,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| AuthError::Signing(err.to_string()))
    }

    fn verify(&self, token: &str, expected: TokenKind) -> AuthResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|err| AuthError::InvalidToken(err.to_string()))?
            .claims;

        if claims.exp <= self.clock.utc().timestamp() {
            return Err(AuthError::InvalidToken("token has expired".to_owned()));
        }
        if claims.token_type != expected {
            return Err(AuthError::WrongTokenType { expected });
        }
        Ok(claims)
    }
}

impl<C> TokenValidator for JwtTokenService<C>
where
    C: Clock + Send + Sync,
{
    fn validate(&self, token: &str) -> AuthResult<Identity> {
        let claims = self.verify(token, TokenKind::Access)?;
        Ok(Identity::new(claims.user_id))
    }
}

impl<C> TokenIssuer for JwtTokenService<C>
where
    C: Clock + Send + Sync,
{
    fn issue_pair(&self, user_id: UserId) -> AuthResult<TokenPair> {
        Ok(TokenPair {
            access: self.issue(TokenKind::Access, user_id)?,
            refresh: self.issue(TokenKind::Refresh, user_id)?,
        })
    }

    fn refresh_access(&self, refresh_token: &str) -> AuthResult<String> {
        let claims = self.verify(refresh_token, TokenKind::Refresh)?;
        self.issue(TokenKind::Access, claims.user_id)
    }
}
