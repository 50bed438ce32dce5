//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Credits, DisplayName, Login, PasswordHash, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the login.
        DuplicateLogin { login: String } => "login already registered: {login}",
    }
}

/// Account to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name.
    pub name: DisplayName,
    /// Unique login.
    pub login: Login,
    /// Encoded password hash.
    pub password_hash: PasswordHash,
    /// Opening balance.
    pub balance: Credits,
}

/// Stored credential for a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Account the credential belongs to.
    pub user: User,
    /// Encoded password hash.
    pub password_hash: PasswordHash,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account and return its assigned id.
    ///
    /// Fails with [`UserPersistenceError::DuplicateLogin`] when the login is
    /// taken.
    async fn create(&self, user: &NewUser) -> Result<UserId, UserPersistenceError>;

    /// Fetch the account and credential registered under `login`.
    async fn find_credentials(
        &self,
        login: &Login,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Atomically add `amount` to the balance, returning the new balance, or
    /// `None` when the account does not exist.
    async fn credit(
        &self,
        id: UserId,
        amount: Credits,
    ) -> Result<Option<Credits>, UserPersistenceError>;
}
