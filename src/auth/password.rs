//! Password hashing
//!
//! One-way, salted hash-and-verify. Hashing is CPU-bound and deliberately
//! slow; callers treat it as an opaque primitive.

use thiserror::Error;

/// Password hashing errors
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

/// Hash-and-verify contract
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plain: &str) -> Result<String, PasswordError>;

    /// A malformed or foreign digest verifies as `false`, never as an error,
    /// so a login failure stays indistinguishable from a wrong password.
    fn verify(&self, plain: &str, digest: &str) -> bool;
}

/// bcrypt-backed hasher
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Lower costs are only useful to keep tests fast.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plain: &str) -> Result<String, PasswordError> {
        bcrypt::hash(plain, self.cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    fn verify(&self, plain: &str, digest: &str) -> bool {
        bcrypt::verify(plain, digest).unwrap_or(false)
    }
}
