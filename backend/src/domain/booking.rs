//! Rental rules shared by every storage adapter.
//!
//! Adapters read a [`RentSnapshot`] inside their lock or transaction, ask
//! [`RentRequest::evaluate`] for a decision, and only then mutate. The order
//! of checks is part of the contract: account, funds, cell existence,
//! occupancy, quota.

use super::grid::{BuildingType, CellId, CellOwner};
use super::user::{Credits, DisplayName, UserId};

/// Maximum number of cells a single account may hold.
pub const MAX_CELLS_PER_USER: u32 = 5;

/// Cell state as seen by a rental check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// No cell with the requested id exists.
    Missing,
    /// The cell exists and is free.
    Free,
    /// The cell exists and holds a building.
    Occupied,
}

/// Consistent read taken under the same lock as the mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentSnapshot {
    /// Renter's balance, or `None` when the account no longer exists.
    pub balance: Option<Credits>,
    /// Target cell state.
    pub cell: CellState,
    /// Cells currently held by the renter.
    pub owned_cells: u32,
}

/// Why a rental was refused. Nothing is mutated for any of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentRejection {
    /// The renter's account does not exist.
    UnknownAccount,
    /// The balance does not cover the price.
    InsufficientFunds {
        /// Fee for the requested building.
        price: Credits,
        /// Balance at decision time.
        balance: Credits,
    },
    /// The cell id does not exist.
    CellNotFound,
    /// The cell already holds a building.
    AlreadyOccupied,
    /// The renter already holds [`MAX_CELLS_PER_USER`] cells.
    QuotaExceeded {
        /// The per-account limit.
        limit: u32,
    },
}

/// Successful rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentReceipt {
    /// Rented cell.
    pub cell: CellId,
    /// Building placed on it.
    pub building: BuildingType,
    /// Amount debited.
    pub price: Credits,
    /// Renter's balance after the debit.
    pub balance: Credits,
}

/// Result of a rental attempt reported by a grid repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentOutcome {
    /// The cell was rented and the balance debited.
    Rented(RentReceipt),
    /// The rental was refused without mutation.
    Rejected(RentRejection),
}

/// Request to place `building` on `cell` on behalf of `user`.
///
/// # Examples
/// ```
/// use citygrid::domain::{
///     BuildingType, CellId, CellState, Credits, RentRejection, RentRequest, RentSnapshot, UserId,
/// };
///
/// let user = UserId::new(1).unwrap();
/// let request = RentRequest::new(user, CellId::new(7), BuildingType::Shop);
/// let snapshot = RentSnapshot {
///     balance: Some(Credits::new(50)),
///     cell: CellState::Free,
///     owned_cells: 0,
/// };
/// assert!(matches!(
///     request.evaluate(&snapshot),
///     Err(RentRejection::InsufficientFunds { .. })
/// ));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentRequest {
    user: UserId,
    cell: CellId,
    building: BuildingType,
}

impl RentRequest {
    /// Describe a rental.
    pub fn new(user: UserId, cell: CellId, building: BuildingType) -> Self {
        Self {
            user,
            cell,
            building,
        }
    }

    /// Renting account.
    pub fn user(&self) -> UserId {
        self.user
    }

    /// Target cell.
    pub fn cell(&self) -> CellId {
        self.cell
    }

    /// Requested building.
    pub fn building(&self) -> BuildingType {
        self.building
    }

    /// Fee charged on success.
    pub fn price(&self) -> Credits {
        self.building.price()
    }

    /// Decide the rental against `snapshot`, returning the balance after the
    /// debit on success.
    pub fn evaluate(&self, snapshot: &RentSnapshot) -> Result<Credits, RentRejection> {
        let Some(balance) = snapshot.balance else {
            return Err(RentRejection::UnknownAccount);
        };
        let price = self.price();
        let Some(remaining) = balance.debit(price) else {
            return Err(RentRejection::InsufficientFunds { price, balance });
        };
        match snapshot.cell {
            CellState::Missing => return Err(RentRejection::CellNotFound),
            CellState::Occupied => return Err(RentRejection::AlreadyOccupied),
            CellState::Free => {}
        }
        if snapshot.owned_cells >= MAX_CELLS_PER_USER {
            return Err(RentRejection::QuotaExceeded {
                limit: MAX_CELLS_PER_USER,
            });
        }
        Ok(remaining)
    }

    /// Build the receipt for an accepted rental.
    pub fn receipt(&self, balance: Credits) -> RentReceipt {
        RentReceipt {
            cell: self.cell,
            building: self.building,
            price: self.price(),
            balance,
        }
    }
}

/// Result of a release attempt on an existing cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The requester owned the cell; it is now free. No refund is issued.
    Released {
        /// Freed cell.
        cell: CellId,
        /// Building that was removed.
        building: BuildingType,
    },
    /// Another account owns the cell; nothing changed.
    OwnedByOther {
        /// Requested cell.
        cell: CellId,
        /// Owner's display name.
        owner: DisplayName,
    },
    /// The cell was already free; nothing changed.
    AlreadyFree {
        /// Requested cell.
        cell: CellId,
    },
}

impl ReleaseOutcome {
    /// Decide a release given the cell's current occupant.
    ///
    /// Callers clear the cell only when this returns
    /// [`ReleaseOutcome::Released`].
    pub fn decide(
        requester: UserId,
        cell: CellId,
        occupant: Option<(CellOwner, BuildingType)>,
    ) -> Self {
        match occupant {
            None => Self::AlreadyFree { cell },
            Some((owner, building)) if owner.id == requester => Self::Released { cell, building },
            Some((owner, _)) => Self::OwnedByOther {
                cell,
                owner: owner.name,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn alice() -> UserId {
        UserId::new(1).expect("valid id")
    }

    #[fixture]
    fn request(alice: UserId) -> RentRequest {
        RentRequest::new(alice, CellId::new(12), BuildingType::Hospital)
    }

    fn snapshot(balance: Option<i64>, cell: CellState, owned_cells: u32) -> RentSnapshot {
        RentSnapshot {
            balance: balance.map(Credits::new),
            cell,
            owned_cells,
        }
    }

    #[rstest]
    fn accepts_and_debits_exact_price(request: RentRequest) {
        let result = request.evaluate(&snapshot(Some(1000), CellState::Free, 4));
        assert_eq!(result, Ok(Credits::new(850)));
    }

    #[rstest]
    fn accepts_balance_equal_to_price(request: RentRequest) {
        let result = request.evaluate(&snapshot(Some(150), CellState::Free, 0));
        assert_eq!(result, Ok(Credits::new(0)));
    }

    #[rstest]
    #[case(snapshot(None, CellState::Missing, 9), RentRejection::UnknownAccount)]
    #[case(
        snapshot(Some(10), CellState::Missing, 9),
        RentRejection::InsufficientFunds { price: Credits::new(150), balance: Credits::new(10) }
    )]
    #[case(snapshot(Some(1000), CellState::Missing, 9), RentRejection::CellNotFound)]
    #[case(snapshot(Some(1000), CellState::Occupied, 9), RentRejection::AlreadyOccupied)]
    #[case(
        snapshot(Some(1000), CellState::Free, 5),
        RentRejection::QuotaExceeded { limit: MAX_CELLS_PER_USER }
    )]
    fn checks_run_in_order(
        request: RentRequest,
        #[case] snapshot: RentSnapshot,
        #[case] expected: RentRejection,
    ) {
        assert_eq!(request.evaluate(&snapshot), Err(expected));
    }

    #[rstest]
    fn quota_applies_regardless_of_balance(alice: UserId) {
        let cheap = RentRequest::new(alice, CellId::new(1), BuildingType::Shop);
        let result = cheap.evaluate(&snapshot(Some(i64::MAX), CellState::Free, 5));
        assert!(matches!(result, Err(RentRejection::QuotaExceeded { .. })));
    }

    #[rstest]
    fn release_by_owner_frees_cell(alice: UserId) {
        let owner = CellOwner {
            id: alice,
            name: DisplayName::new("Alice").expect("valid name"),
        };
        let outcome =
            ReleaseOutcome::decide(alice, CellId::new(3), Some((owner, BuildingType::Post)));
        assert_eq!(
            outcome,
            ReleaseOutcome::Released {
                cell: CellId::new(3),
                building: BuildingType::Post
            }
        );
    }

    #[rstest]
    fn release_by_other_reports_owner(alice: UserId) {
        let bob = CellOwner {
            id: UserId::new(2).expect("valid id"),
            name: DisplayName::new("Bob").expect("valid name"),
        };
        let outcome =
            ReleaseOutcome::decide(alice, CellId::new(3), Some((bob, BuildingType::Hotel)));
        assert!(matches!(
            outcome,
            ReleaseOutcome::OwnedByOther { ref owner, .. } if owner.as_str() == "Bob"
        ));
    }

    #[rstest]
    fn release_of_free_cell_is_distinct(alice: UserId) {
        let outcome = ReleaseOutcome::decide(alice, CellId::new(3), None);
        assert_eq!(
            outcome,
            ReleaseOutcome::AlreadyFree {
                cell: CellId::new(3)
            }
        );
    }
}
