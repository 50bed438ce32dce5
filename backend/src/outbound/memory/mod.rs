//! In-process store implementing the user and grid repositories.
//!
//! Used when no database is configured and by tests. Every operation runs
//! under one async mutex, which gives rentals, releases and top-ups the same
//! all-or-nothing behaviour the PostgreSQL adapter gets from transactions.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::ports::{
    GridRepository, GridRepositoryError, NewUser, StoredCredentials, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    BuildingType, Cell, CellId, CellOwner, CellState, Credits, DisplayName, Login, Occupancy,
    OwnedCell, PasswordHash, ReleaseOutcome, RentOutcome, RentRequest, RentSnapshot, User, UserId,
};

#[derive(Debug, Clone)]
struct UserRecord {
    name: DisplayName,
    login: Login,
    password_hash: PasswordHash,
    balance: Credits,
}

/// Owner and building are stored together so one is never set without the
/// other.
#[derive(Debug, Clone, Copy)]
struct Occupant {
    owner: UserId,
    building: BuildingType,
}

#[derive(Debug, Default)]
struct StoreState {
    users: BTreeMap<UserId, UserRecord>,
    cells: BTreeMap<CellId, Option<Occupant>>,
}

impl StoreState {
    fn user(&self, id: UserId) -> Option<User> {
        self.users.get(&id).map(|record| {
            User::new(
                id,
                record.name.clone(),
                record.login.clone(),
                record.balance,
            )
        })
    }

    fn owner(&self, occupant: Occupant) -> Option<CellOwner> {
        match self.users.get(&occupant.owner) {
            Some(record) => Some(CellOwner {
                id: occupant.owner,
                name: record.name.clone(),
            }),
            None => {
                warn!(user_id = %occupant.owner, "cell owner missing from user table");
                None
            }
        }
    }

    fn owned_count(&self, owner: UserId) -> u32 {
        let held = self
            .cells
            .values()
            .filter(|slot| matches!(slot, Some(occupant) if occupant.owner == owner))
            .count();
        u32::try_from(held).unwrap_or(u32::MAX)
    }

    fn snapshot(&self, request: &RentRequest) -> RentSnapshot {
        let cell = match self.cells.get(&request.cell()) {
            None => CellState::Missing,
            Some(None) => CellState::Free,
            Some(Some(_)) => CellState::Occupied,
        };
        RentSnapshot {
            balance: self.users.get(&request.user()).map(|record| record.balance),
            cell,
            owned_cells: self.owned_count(request.user()),
        }
    }
}

/// Mutex-guarded store holding users and cells in memory.
///
/// Starts empty; call [`GridRepository::initialize`] to create the cells.
///
/// # Examples
/// ```
/// use citygrid::domain::ports::GridRepository;
/// use citygrid::outbound::memory::InMemoryStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = InMemoryStore::new();
/// assert_eq!(store.initialize().await.unwrap(), 100);
/// assert_eq!(store.initialize().await.unwrap(), 0);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &NewUser) -> Result<UserId, UserPersistenceError> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|record| record.login == user.login) {
            return Err(UserPersistenceError::duplicate_login(user.login.as_str()));
        }
        let next = i32::try_from(state.users.len() + 1)
            .map_err(|_| UserPersistenceError::query("user id space exhausted"))?;
        let id = UserId::new(next).map_err(|err| UserPersistenceError::query(err.to_string()))?;
        state.users.insert(
            id,
            UserRecord {
                name: user.name.clone(),
                login: user.login.clone(),
                password_hash: user.password_hash.clone(),
                balance: user.balance,
            },
        );
        Ok(id)
    }

    async fn find_credentials(
        &self,
        login: &Login,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = self.state.lock().await;
        let found = state
            .users
            .iter()
            .find(|(_, record)| &record.login == login)
            .map(|(id, record)| StoredCredentials {
                user: User::new(
                    *id,
                    record.name.clone(),
                    record.login.clone(),
                    record.balance,
                ),
                password_hash: record.password_hash.clone(),
            });
        Ok(found)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.state.lock().await.user(id))
    }

    async fn credit(
        &self,
        id: UserId,
        amount: Credits,
    ) -> Result<Option<Credits>, UserPersistenceError> {
        let mut state = self.state.lock().await;
        let Some(record) = state.users.get_mut(&id) else {
            return Ok(None);
        };
        let balance = record
            .balance
            .checked_add(amount)
            .ok_or_else(|| UserPersistenceError::query("balance overflow"))?;
        record.balance = balance;
        Ok(Some(balance))
    }
}

#[async_trait]
impl GridRepository for InMemoryStore {
    async fn initialize(&self) -> Result<u32, GridRepositoryError> {
        let mut state = self.state.lock().await;
        let mut inserted = 0;
        for id in CellId::all() {
            if !state.cells.contains_key(&id) {
                state.cells.insert(id, None);
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn list_cells(&self) -> Result<Vec<Cell>, GridRepositoryError> {
        let state = self.state.lock().await;
        let cells = state
            .cells
            .iter()
            .map(|(id, slot)| {
                let occupancy = (*slot)
                    .and_then(|occupant| {
                        state
                            .owner(occupant)
                            .map(|owner| Occupancy::Occupied {
                                owner,
                                building: occupant.building,
                            })
                    })
                    .unwrap_or(Occupancy::Free);
                Cell { id: *id, occupancy }
            })
            .collect();
        Ok(cells)
    }

    async fn cells_owned_by(&self, owner: UserId) -> Result<Vec<OwnedCell>, GridRepositoryError> {
        let state = self.state.lock().await;
        let cells = state
            .cells
            .iter()
            .filter_map(|(id, slot)| match slot {
                Some(occupant) if occupant.owner == owner => Some(OwnedCell {
                    id: *id,
                    building: occupant.building,
                }),
                _ => None,
            })
            .collect();
        Ok(cells)
    }

    async fn rent_cell(&self, request: &RentRequest) -> Result<RentOutcome, GridRepositoryError> {
        let mut state = self.state.lock().await;
        let balance = match request.evaluate(&state.snapshot(request)) {
            Ok(balance) => balance,
            Err(rejection) => return Ok(RentOutcome::Rejected(rejection)),
        };

        let Some(record) = state.users.get_mut(&request.user()) else {
            return Err(GridRepositoryError::query("renter vanished during rental"));
        };
        record.balance = balance;
        state.cells.insert(
            request.cell(),
            Some(Occupant {
                owner: request.user(),
                building: request.building(),
            }),
        );
        Ok(RentOutcome::Rented(request.receipt(balance)))
    }

    async fn release_cell(
        &self,
        requester: UserId,
        cell: CellId,
    ) -> Result<Option<ReleaseOutcome>, GridRepositoryError> {
        let mut state = self.state.lock().await;
        let Some(slot) = state.cells.get(&cell).copied() else {
            return Ok(None);
        };
        let occupant = slot.and_then(|occupant| {
            state
                .owner(occupant)
                .map(|owner| (owner, occupant.building))
        });

        let outcome = ReleaseOutcome::decide(requester, cell, occupant);
        if matches!(outcome, ReleaseOutcome::Released { .. }) {
            state.cells.insert(cell, None);
        }
        Ok(Some(outcome))
    }
}
