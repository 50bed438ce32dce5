//! Driving ports for read models: the grid and a user's profile.

use async_trait::async_trait;

use crate::domain::{Cell, Error, OwnedCell, User, UserId};

/// Account details with the cells it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// The account.
    pub user: User,
    /// Held cells ordered by id.
    pub cells: Vec<OwnedCell>,
}

/// Domain use-case port for the grid view.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GridQuery: Send + Sync {
    /// Every cell ordered by id.
    async fn cells(&self) -> Result<Vec<Cell>, Error>;
}

/// Domain use-case port for the profile view.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Load a profile; `None` when the account no longer exists.
    async fn profile(&self, user: UserId) -> Result<Option<Profile>, Error>;
}
