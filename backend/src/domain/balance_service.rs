//! Balance top-ups.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::booking_service::ACCOUNT_GONE;
use super::persistence_errors::map_user_persistence_error;
use super::ports::{BalanceCommand, UserRepository};
use super::{Credits, Error, TOP_UP_AMOUNT, UserId};

/// Adds the fixed [`TOP_UP_AMOUNT`] to an account.
///
/// There is no upper bound and no rate limit; the store applies each credit
/// as a single atomic update.
#[derive(Clone)]
pub struct BalanceService<R> {
    users: Arc<R>,
}

impl<R> BalanceService<R> {
    /// Create a service over the given repository.
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<R> BalanceCommand for BalanceService<R>
where
    R: UserRepository,
{
    async fn top_up(&self, user: UserId) -> Result<Credits, Error> {
        let balance = self
            .users
            .credit(user, TOP_UP_AMOUNT)
            .await
            .map_err(map_user_persistence_error)?;
        match balance {
            Some(balance) => {
                info!(user_id = %user, amount = TOP_UP_AMOUNT.get(), balance = balance.get(), "balance topped up");
                Ok(balance)
            }
            None => {
                debug!(user_id = %user, "top-up for missing account");
                Err(Error::unauthorized(ACCOUNT_GONE))
            }
        }
    }
}
