//! Token issuance
//!
//! Builds the access/refresh pair for an authenticated user and applies the
//! lifetime policy, including the remember-me cap on refresh tokens.

use crate::models::User;

use super::jwt::{TokenCodec, TokenError, TokenKind};

/// Ceiling on the refresh-token lifetime for grants without remember-me.
/// Limits exposure of refresh tokens issued on shared or untrusted devices.
const UNREMEMBERED_REFRESH_CAP_SECONDS: i64 = 86_400;

/// An issued access/refresh token pair
///
/// Never persisted server-side; the tokens themselves are the only record of
/// the grant.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds, echoed to the caller
    pub expires_in: i64,
    /// Refresh-token lifetime actually granted, drives the cookie max-age
    pub refresh_expires_in: i64,
}

/// Produces token pairs under the configured lifetime policy
pub struct TokenIssuer {
    codec: TokenCodec,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl TokenIssuer {
    pub fn new(codec: TokenCodec, access_ttl_seconds: i64, refresh_ttl_seconds: i64) -> Self {
        Self {
            codec,
            access_ttl_seconds,
            refresh_ttl_seconds,
        }
    }

    /// Issue a fresh pair for `user`.
    ///
    /// The access TTL is fixed by configuration. The refresh TTL is the
    /// configured value when `remember` is set, otherwise capped at one day.
    pub fn issue(&self, user: &User, remember: bool) -> Result<TokenPair, TokenError> {
        let refresh_ttl = if remember {
            self.refresh_ttl_seconds
        } else {
            self.refresh_ttl_seconds.min(UNREMEMBERED_REFRESH_CAP_SECONDS)
        };

        let subject = user.id.to_string();
        let access_token = self.codec.encode(
            &subject,
            TokenKind::Access,
            &user.email,
            &user.name,
            self.access_ttl_seconds,
        )?;
        let refresh_token = self.codec.encode(
            &subject,
            TokenKind::Refresh,
            &user.email,
            &user.name,
            refresh_ttl,
        )?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_ttl_seconds,
            refresh_expires_in: refresh_ttl,
        })
    }

    /// Verify an access token against the codec.
    pub fn decode_access(&self, token: &str) -> Result<super::jwt::Claims, TokenError> {
        self.codec.decode_access(token)
    }
}
