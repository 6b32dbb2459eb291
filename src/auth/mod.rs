//! Authentication for Gatehouse
//!
//! Stateless JWT auth: the token lifecycle (codec, issuer), password
//! hashing, the signup/login service, and the per-request authentication
//! middleware.

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod service;
pub mod tokens;

pub use jwt::{Claims, TokenCodec, TokenError, TokenKind};
pub use middleware::{authenticate, CurrentUser};
pub use password::{BcryptHasher, PasswordHasher};
pub use service::{AuthError, AuthService};
pub use tokens::{TokenIssuer, TokenPair};
