//! Port abstraction for cell persistence and atomic rental operations.
use async_trait::async_trait;

use crate::domain::{Cell, CellId, OwnedCell, ReleaseOutcome, RentOutcome, RentRequest, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by grid repository adapters.
    pub enum GridRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "grid repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "grid repository query failed: {message}",
    }
}

/// Cell storage.
///
/// `rent_cell` and `release_cell` are atomic: the decision and the mutation
/// happen under one lock or transaction, so concurrent callers can never
/// double-book a cell, exceed the quota, or overdraw a balance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GridRepository: Send + Sync {
    /// Create any missing cells so ids `1..=CELL_COUNT` exist, returning the
    /// number inserted. Existing cells are left untouched.
    async fn initialize(&self) -> Result<u32, GridRepositoryError>;

    /// Every cell ordered by id, with owner names resolved.
    async fn list_cells(&self) -> Result<Vec<Cell>, GridRepositoryError>;

    /// Cells held by `owner`, ordered by id.
    async fn cells_owned_by(&self, owner: UserId) -> Result<Vec<OwnedCell>, GridRepositoryError>;

    /// Evaluate and apply a rental, debiting the renter together with the
    /// cell update.
    async fn rent_cell(&self, request: &RentRequest) -> Result<RentOutcome, GridRepositoryError>;

    /// Release `cell` on behalf of `requester`; `None` when the cell does not
    /// exist.
    async fn release_cell(
        &self,
        requester: UserId,
        cell: CellId,
    ) -> Result<Option<ReleaseOutcome>, GridRepositoryError>;
}
