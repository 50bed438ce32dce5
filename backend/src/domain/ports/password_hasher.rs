//! Port abstraction for one-way password hashing.
use async_trait::async_trait;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised while producing a password hash.
    pub enum PasswordHasherError {
        /// The hashing backend rejected the input or failed to run.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Salted, one-way password hashing.
///
/// Verification answers only "does it match"; malformed stored hashes and
/// backend failures count as a mismatch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh random salt.
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError>;

    /// Check `password` against a stored hash.
    async fn verify(&self, password: &str, hash: &PasswordHash) -> bool;
}
