//! JWT token codec
//!
//! Turns a claim set into an opaque HS256-signed token and back. The codec
//! owns the signing key for the process lifetime; encode and decode are pure
//! computations safe to call from any number of concurrent requests.

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token codec errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Wrong token kind")]
    WrongTokenKind,
}

/// Token kind discriminator, carried as a string inside the signed payload
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Signed claim set
///
/// Only ever produced by [`TokenCodec`]; email and name are denormalized
/// copies for client convenience, not authoritative.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id, stringified)
    pub sub: String,
    /// Token kind (`"access"` / `"refresh"` on the wire)
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub email: String,
    pub name: String,
    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,
    /// Expiration (Unix timestamp, seconds)
    pub exp: i64,
}

/// Encodes and decodes signed tokens with the process-wide symmetric key
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Exact second-granularity expiry; jsonwebtoken defaults to 60s leeway
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a claim set expiring `ttl_seconds` from now.
    pub fn encode(
        &self,
        subject: &str,
        kind: TokenKind,
        email: &str,
        name: &str,
        ttl_seconds: i64,
    ) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            kind,
            email: email.to_string(),
            name: name.to_string(),
            iat: now,
            exp: now + ttl_seconds,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify signature and expiry, returning the full claim set.
    ///
    /// Expiry is compared at second granularity with no leeway window. One
    /// deviation: a token presented at exactly `exp` is still accepted;
    /// rejection starts the second after.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
                    _ => TokenError::InvalidToken,
                }
            })?;
        Ok(data.claims)
    }

    /// Decode, additionally rejecting anything but an access token. This is
    /// what keeps a refresh token from being presented as an access
    /// credential.
    pub fn decode_access(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.decode(token)?;
        if claims.kind != TokenKind::Access {
            return Err(TokenError::WrongTokenKind);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-with-enough-bytes!!";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET)
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let codec = codec();
        let token = codec
            .encode("42", TokenKind::Access, "ada@example.com", "Ada", 900)
            .unwrap();

        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.name, "Ada");
        assert!(claims.iat < claims.exp);
        assert_eq!(claims.exp, claims.iat + 900);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let codec = codec();
        let token = codec
            .encode("42", TokenKind::Access, "ada@example.com", "Ada", -1)
            .unwrap();

        assert_eq!(codec.decode(&token).unwrap_err(), TokenError::ExpiredToken);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let codec = codec();
        let token = codec
            .encode("42", TokenKind::Refresh, "ada@example.com", "Ada", 900)
            .unwrap();

        // decode accepts it, decode_access does not
        assert_eq!(codec.decode(&token).unwrap().kind, TokenKind::Refresh);
        assert_eq!(
            codec.decode_access(&token).unwrap_err(),
            TokenError::WrongTokenKind
        );
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let codec = codec();
        assert_eq!(
            codec.decode("not.a.token").unwrap_err(),
            TokenError::InvalidToken
        );
        assert_eq!(codec.decode("").unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn test_wrong_key_is_invalid() {
        let token = codec()
            .encode("42", TokenKind::Access, "ada@example.com", "Ada", 900)
            .unwrap();

        let other = TokenCodec::new("another-secret-key-entirely-here!!!");
        assert_eq!(other.decode(&token).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn test_kind_is_a_string_in_the_payload() {
        let claims = Claims {
            sub: "42".to_string(),
            kind: TokenKind::Access,
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            iat: 0,
            exp: 900,
        };

        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains(r#""type":"access""#));

        let refresh = Claims {
            kind: TokenKind::Refresh,
            ..claims
        };
        let json = serde_json::to_string(&refresh).unwrap();
        assert!(json.contains(r#""type":"refresh""#));
    }
}
