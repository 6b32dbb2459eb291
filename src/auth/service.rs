//! Authentication service
//!
//! Signup and login use-cases, combining the credential store, the password
//! hasher, and the token issuer.

use std::sync::Arc;

use thiserror::Error;

use crate::error::ApiError;
use crate::models::{AuthUser, NewUser};
use crate::store::{StoreError, UserStore};

use super::jwt::{Claims, TokenError};
use super::password::{PasswordError, PasswordHasher};
use super::tokens::{TokenIssuer, TokenPair};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Email is already in use.")]
    EmailTaken,

    /// Unknown email and wrong password both land here so the response never
    /// reveals whether an account exists.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// A verified token referenced a user record that no longer exists.
    #[error("Invalid access token.")]
    InvalidAccessToken,

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            // A concurrent signup lost the race on the unique email index
            StoreError::DuplicateEmail => AuthError::EmailTaken,
            StoreError::Database(msg) => AuthError::Store(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::EmailTaken => ApiError::Conflict(e.to_string()),
            AuthError::InvalidCredentials | AuthError::InvalidAccessToken => {
                ApiError::Unauthorized(e.to_string())
            }
            AuthError::Token(_) | AuthError::Password(_) | AuthError::Store(_) => {
                ApiError::InternalError(e.to_string())
            }
        }
    }
}

/// Authentication service
pub struct AuthService {
    users: Arc<dyn UserStore>,
    passwords: Arc<dyn PasswordHasher>,
    issuer: TokenIssuer,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        passwords: Arc<dyn PasswordHasher>,
        issuer: TokenIssuer,
    ) -> Self {
        Self {
            users,
            passwords,
            issuer,
        }
    }

    /// Register a new user and issue their first token pair.
    ///
    /// Signup always grants the full refresh lifetime; the remember-me choice
    /// only exists at login.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(TokenPair, AuthUser), AuthError> {
        let email = normalize_email(email);
        if self.users.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.passwords.hash(password)?;
        let user = self
            .users
            .create(NewUser {
                name: name.trim().to_string(),
                email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, "New user signed up");

        let tokens = self.issuer.issue(&user, true)?;
        Ok((tokens, AuthUser::from(&user)))
    }

    /// Authenticate an email/password pair and issue tokens.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<(TokenPair, AuthUser), AuthError> {
        let email = normalize_email(email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.passwords.verify(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::debug!(user_id = user.id, remember, "User logged in");

        let tokens = self.issuer.issue(&user, remember)?;
        Ok((tokens, AuthUser::from(&user)))
    }

    /// Resolve the authenticated principal to a user record.
    pub async fn current_user(&self, user_id: i64) -> Result<AuthUser, AuthError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidAccessToken)?;
        Ok(AuthUser::from(&user))
    }

    /// Verify a presented access token. Used by the request-authentication
    /// middleware on every inbound request.
    pub fn authenticate_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.issuer.decode_access(token)
    }
}

/// Emails are unique under their trimmed, lowercased form.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
