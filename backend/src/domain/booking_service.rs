//! Rental use-cases over a [`GridRepository`].
//!
//! The repository applies each decision atomically; this service turns
//! rejections into user-facing errors and logs every outcome.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use super::persistence_errors::map_grid_repository_error;
use super::ports::{BookingCommand, GridRepository};
use super::{
    CellId, Error, ReleaseOutcome, RentOutcome, RentReceipt, RentRejection, RentRequest, UserId,
};

/// Message used when a session outlives its account.
pub(crate) const ACCOUNT_GONE: &str = "Your account no longer exists. Please sign in again.";

/// Booking engine backed by a grid repository.
#[derive(Clone)]
pub struct BookingService<G> {
    grid: Arc<G>,
}

impl<G> BookingService<G> {
    /// Create a service over the given repository.
    pub fn new(grid: Arc<G>) -> Self {
        Self { grid }
    }
}

fn cell_not_found(cell: CellId) -> Error {
    Error::not_found(format!("Cell {cell} does not exist."))
}

fn rejection_error(request: &RentRequest, rejection: RentRejection) -> Error {
    let cell = request.cell();
    match rejection {
        RentRejection::UnknownAccount => Error::unauthorized(ACCOUNT_GONE),
        RentRejection::InsufficientFunds { price, balance } => Error::insufficient_funds(format!(
            "Not enough credits: a {} costs {price}, your balance is {balance}.",
            request.building().label()
        ))
        .with_details(json!({ "price": price.get(), "balance": balance.get() })),
        RentRejection::CellNotFound => cell_not_found(cell),
        RentRejection::AlreadyOccupied => {
            Error::already_occupied(format!("Cell {cell} is already occupied."))
        }
        RentRejection::QuotaExceeded { limit } => {
            Error::quota_exceeded(format!("You cannot rent more than {limit} cells."))
                .with_details(json!({ "limit": limit }))
        }
    }
}

#[async_trait]
impl<G> BookingCommand for BookingService<G>
where
    G: GridRepository,
{
    async fn rent(&self, request: &RentRequest) -> Result<RentReceipt, Error> {
        let outcome = self
            .grid
            .rent_cell(request)
            .await
            .map_err(map_grid_repository_error)?;
        match outcome {
            RentOutcome::Rented(receipt) => {
                info!(
                    user_id = %request.user(),
                    cell_id = %receipt.cell,
                    building = receipt.building.label(),
                    price = receipt.price.get(),
                    balance = receipt.balance.get(),
                    "cell rented"
                );
                Ok(receipt)
            }
            RentOutcome::Rejected(rejection) => {
                debug!(
                    user_id = %request.user(),
                    cell_id = %request.cell(),
                    ?rejection,
                    "rental rejected"
                );
                Err(rejection_error(request, rejection))
            }
        }
    }

    async fn release(&self, requester: UserId, cell: CellId) -> Result<ReleaseOutcome, Error> {
        let outcome = self
            .grid
            .release_cell(requester, cell)
            .await
            .map_err(map_grid_repository_error)?;
        let Some(outcome) = outcome else {
            debug!(user_id = %requester, cell_id = %cell, "release of unknown cell");
            return Err(cell_not_found(cell));
        };
        match &outcome {
            ReleaseOutcome::Released { building, .. } => {
                info!(
                    user_id = %requester,
                    cell_id = %cell,
                    building = building.label(),
                    "cell released"
                );
            }
            ReleaseOutcome::OwnedByOther { .. } | ReleaseOutcome::AlreadyFree { .. } => {
                debug!(user_id = %requester, cell_id = %cell, ?outcome, "release left cell unchanged");
            }
        }
        Ok(outcome)
    }
}
