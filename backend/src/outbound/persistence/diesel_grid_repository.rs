//! PostgreSQL-backed `GridRepository` implementation using Diesel ORM.
//!
//! Rentals lock the renter's row and then the cell row (`SELECT … FOR
//! UPDATE`) before deciding, so concurrent rentals of one cell serialise on
//! the cell lock and concurrent rentals by one user serialise on the user
//! lock. Releases lock only the cell row; the owner's name is read without a
//! lock. Every transaction takes the user lock before any cell lock.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{GridRepository, GridRepositoryError};
use crate::domain::{
    BuildingType, Cell, CellId, CellOwner, CellState, Credits, DisplayName, Occupancy, OwnedCell,
    ReleaseOutcome, RentOutcome, RentRequest, RentSnapshot, UserId,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CellRow, NewCellRow};
use super::pool::{DbPool, PoolError};
use super::schema::{cells, users};

/// Diesel-backed implementation of the grid repository port.
#[derive(Clone)]
pub struct DieselGridRepository {
    pool: DbPool,
}

impl DieselGridRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use citygrid::outbound::persistence::{DbPool, DieselGridRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/citygrid")).await?;
    /// let repository = DieselGridRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> GridRepositoryError {
    map_pool_error(error, GridRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> GridRepositoryError {
    map_diesel_error(
        error,
        GridRepositoryError::query,
        GridRepositoryError::connection,
    )
}

/// Resolve a stored occupant. Rows that fail validation are logged and read
/// as free rather than failing the whole grid.
fn occupant(
    cell: i32,
    owner_id: i32,
    owner_name: Option<String>,
    building_code: i16,
) -> Option<(CellOwner, BuildingType)> {
    let building = BuildingType::from_code(building_code)
        .map_err(|err| warn!(cell, code = err.0, "unknown building type on cell"))
        .ok()?;
    let id = UserId::new(owner_id)
        .map_err(|err| warn!(cell, error = %err, "invalid owner id on cell"))
        .ok()?;
    let Some(name) = owner_name else {
        warn!(cell, owner = owner_id, "cell owner missing from user table");
        return None;
    };
    let name = DisplayName::new(&name)
        .map_err(|err| warn!(cell, error = %err, "invalid owner name on cell"))
        .ok()?;
    Some((CellOwner { id, name }, building))
}

fn cell_from_row(row: CellRow, owner_name: Option<String>) -> Cell {
    let occupancy = match (row.user_id, row.building_type) {
        (Some(owner_id), Some(code)) => occupant(row.id, owner_id, owner_name, code)
            .map(|(owner, building)| Occupancy::Occupied { owner, building })
            .unwrap_or(Occupancy::Free),
        _ => Occupancy::Free,
    };
    Cell {
        id: CellId::new(row.id),
        occupancy,
    }
}

#[async_trait]
impl GridRepository for DieselGridRepository {
    async fn initialize(&self) -> Result<u32, GridRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<NewCellRow> = CellId::all()
            .map(|id| NewCellRow { id: id.get() })
            .collect();

        let inserted = diesel::insert_into(cells::table)
            .values(&rows)
            .on_conflict(cells::id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        u32::try_from(inserted).map_err(|_| GridRepositoryError::query("cell count overflow"))
    }

    async fn list_cells(&self) -> Result<Vec<Cell>, GridRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<(CellRow, Option<String>)> = cells::table
            .left_join(users::table)
            .select((CellRow::as_select(), users::name.nullable()))
            .order(cells::id.asc())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(row, owner_name)| cell_from_row(row, owner_name))
            .collect())
    }

    async fn cells_owned_by(&self, owner: UserId) -> Result<Vec<OwnedCell>, GridRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<CellRow> = cells::table
            .filter(cells::user_id.eq(owner.get()))
            .select(CellRow::as_select())
            .order(cells::id.asc())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let code = row.building_type?;
                BuildingType::from_code(code)
                    .map_err(|err| warn!(cell = row.id, code = err.0, "unknown building type on cell"))
                    .ok()
                    .map(|building| OwnedCell {
                        id: CellId::new(row.id),
                        building,
                    })
            })
            .collect())
    }

    async fn rent_cell(&self, request: &RentRequest) -> Result<RentOutcome, GridRepositoryError> {
        let request = *request;
        let user_id = request.user().get();
        let cell_id = request.cell().get();
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        conn.transaction(|conn| {
            async move {
                let balance: Option<i64> = users::table
                    .find(user_id)
                    .select(users::balance)
                    .for_update()
                    .get_result(conn)
                    .await
                    .optional()?;

                let cell: Option<CellRow> = cells::table
                    .find(cell_id)
                    .select(CellRow::as_select())
                    .for_update()
                    .get_result(conn)
                    .await
                    .optional()?;

                let owned: i64 = cells::table
                    .filter(cells::user_id.eq(user_id))
                    .count()
                    .get_result(conn)
                    .await?;

                let snapshot = RentSnapshot {
                    balance: balance.map(Credits::new),
                    cell: match cell {
                        None => CellState::Missing,
                        Some(row) if row.user_id.is_some() => CellState::Occupied,
                        Some(_) => CellState::Free,
                    },
                    owned_cells: u32::try_from(owned).unwrap_or(u32::MAX),
                };

                let remaining = match request.evaluate(&snapshot) {
                    Ok(remaining) => remaining,
                    Err(rejection) => return Ok(RentOutcome::Rejected(rejection)),
                };

                diesel::update(users::table.find(user_id))
                    .set(users::balance.eq(remaining.get()))
                    .execute(conn)
                    .await?;

                diesel::update(cells::table.find(cell_id))
                    .set((
                        cells::user_id.eq(Some(user_id)),
                        cells::building_type.eq(Some(request.building().code())),
                    ))
                    .execute(conn)
                    .await?;

                Ok(RentOutcome::Rented(request.receipt(remaining)))
            }
            .scope_boxed()
        })
        .await
        .map_err(diesel_error)
    }

    async fn release_cell(
        &self,
        requester: UserId,
        cell: CellId,
    ) -> Result<Option<ReleaseOutcome>, GridRepositoryError> {
        let cell_id = cell.get();
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        conn.transaction(|conn| {
            async move {
                let row: Option<CellRow> = cells::table
                    .find(cell_id)
                    .select(CellRow::as_select())
                    .for_update()
                    .get_result(conn)
                    .await
                    .optional()?;
                let Some(row) = row else {
                    return Ok(None);
                };

                let current = match (row.user_id, row.building_type) {
                    (Some(owner_id), Some(code)) => {
                        let owner_name: Option<String> = users::table
                            .find(owner_id)
                            .select(users::name)
                            .get_result(conn)
                            .await
                            .optional()?;
                        occupant(cell_id, owner_id, owner_name, code)
                    }
                    _ => None,
                };

                let outcome = ReleaseOutcome::decide(requester, cell, current);
                if matches!(outcome, ReleaseOutcome::Released { .. }) {
                    diesel::update(cells::table.find(cell_id))
                        .set((
                            cells::user_id.eq(None::<i32>),
                            cells::building_type.eq(None::<i16>),
                        ))
                        .execute(conn)
                        .await?;
                }
                Ok(Some(outcome))
            }
            .scope_boxed()
        })
        .await
        .map_err(diesel_error)
    }
}
