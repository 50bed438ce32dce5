//! Driving ports for mutations: renting, releasing and topping up.

use async_trait::async_trait;

use crate::domain::{CellId, Credits, Error, ReleaseOutcome, RentReceipt, RentRequest, UserId};

/// Domain use-case port for cell rentals.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Rent a cell, debiting the renter atomically.
    ///
    /// Rejections surface as errors coded `unauthorized`,
    /// `insufficient_funds`, `not_found`, `already_occupied` or
    /// `quota_exceeded`.
    async fn rent(&self, request: &RentRequest) -> Result<RentReceipt, Error>;

    /// Release a cell. Cells owned by someone else, or already free, are
    /// reported through the outcome rather than as errors.
    async fn release(&self, requester: UserId, cell: CellId) -> Result<ReleaseOutcome, Error>;
}

/// Domain use-case port for balance changes outside rentals.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BalanceCommand: Send + Sync {
    /// Add the fixed top-up amount and return the new balance.
    async fn top_up(&self, user: UserId) -> Result<Credits, Error>;
}
