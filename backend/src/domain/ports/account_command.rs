//! Driving ports for account use-cases: registration, sign-in and lookups.
//!
//! Inbound adapters call these without knowing which store or hasher backs
//! them, so handler tests can run against in-memory adapters.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, LoginCredentials, Registration, User, UserId};

/// Domain use-case port for creating accounts and signing in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Open an account with the starting balance.
    ///
    /// Fails with a conflict when the login is taken.
    async fn register(&self, registration: &Registration) -> Result<User, Error>;

    /// Verify credentials and return the identity a session should cache.
    ///
    /// Unknown logins and wrong passwords fail identically.
    async fn authenticate(&self, credentials: &LoginCredentials)
    -> Result<AuthenticatedUser, Error>;
}

/// Domain use-case port for reading accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Load the latest committed view of an account.
    async fn find_user(&self, id: UserId) -> Result<Option<User>, Error>;
}
