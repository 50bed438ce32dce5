//! Argon2id implementation of the password hasher port.
//!
//! Hashing is CPU and memory bound, so both operations run on Tokio's
//! blocking pool. Hashes are stored as PHC strings, which embed the salt and
//! parameters, so verification needs nothing but the stored value.

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use async_trait::async_trait;
use tracing::{error, warn};
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

const SALT_LEN: usize = 16;

/// Argon2id hasher with the crate's default parameters and a fresh random
/// salt per hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Create a hasher.
    pub fn new() -> Self {
        Self
    }
}

fn hash_blocking(password: &[u8]) -> Result<String, argon2::password_hash::Error> {
    let salt_bytes: [u8; SALT_LEN] = rand::random();
    let salt = SaltString::encode_b64(&salt_bytes)?;
    let hash = Argon2::default().hash_password(password, &salt)?;
    Ok(hash.to_string())
}

fn verify_blocking(password: &[u8], encoded: &str) -> bool {
    match PhcString::new(encoded) {
        Ok(parsed) => Argon2::default().verify_password(password, &parsed).is_ok(),
        Err(err) => {
            warn!(error = %err, "stored password hash is malformed");
            false
        }
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        let password = Zeroizing::new(password.to_owned());
        let encoded = tokio::task::spawn_blocking(move || hash_blocking(password.as_bytes()))
            .await
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?;
        Ok(PasswordHash::new(encoded))
    }

    async fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        let password = Zeroizing::new(password.to_owned());
        let encoded = hash.as_str().to_owned();
        tokio::task::spawn_blocking(move || verify_blocking(password.as_bytes(), &encoded))
            .await
            .unwrap_or_else(|err| {
                error!(error = %err, "password verification task failed");
                false
            })
    }
}
