//! Data models for Gatehouse
//!
//! User rows plus the request/response DTOs for the auth endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A user identity record
///
/// The email is stored in normalized form (trimmed, lowercased) and is unique
/// under that form. The password hash never leaves this crate; every outward
/// projection goes through [`AuthUser`].
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a user; ids and timestamps are assigned by the
/// store on first save.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Request body for POST /auth/signup
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(custom(
        function = "validate_display_name",
        message = "Name must be 1-100 characters"
    ))]
    pub name: String,

    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    // bcrypt truncates beyond 72 bytes, so longer passwords are rejected
    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,
}

/// Request body for POST /auth/login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Opts into the full configured refresh-token lifetime
    #[serde(default)]
    pub remember: bool,
}

/// Names are stored trimmed, so the length limits apply to the trimmed form.
fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if len == 0 || len > 100 {
        return Err(ValidationError::new("display_name_length"));
    }
    Ok(())
}

/// Public-safe projection of a user (never carries the password hash)
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Response body for signup and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access-token lifetime in seconds, for client refresh scheduling
    pub expires_in: i64,
    pub user: AuthUser,
    pub message: String,
}
