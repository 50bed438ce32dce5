//! Read models for the grid and profile views.

use std::sync::Arc;

use async_trait::async_trait;

use super::persistence_errors::{map_grid_repository_error, map_user_persistence_error};
use super::ports::{GridQuery, GridRepository, Profile, ProfileQuery, UserRepository};
use super::{Cell, Error, UserId};

/// Query service combining the grid and user repositories.
#[derive(Clone)]
pub struct GridQueryService<G, R> {
    grid: Arc<G>,
    users: Arc<R>,
}

impl<G, R> GridQueryService<G, R> {
    /// Create a service over the given repositories.
    pub fn new(grid: Arc<G>, users: Arc<R>) -> Self {
        Self { grid, users }
    }
}

#[async_trait]
impl<G, R> GridQuery for GridQueryService<G, R>
where
    G: GridRepository,
    R: UserRepository,
{
    async fn cells(&self) -> Result<Vec<Cell>, Error> {
        self.grid
            .list_cells()
            .await
            .map_err(map_grid_repository_error)
    }
}

#[async_trait]
impl<G, R> ProfileQuery for GridQueryService<G, R>
where
    G: GridRepository,
    R: UserRepository,
{
    async fn profile(&self, user: UserId) -> Result<Option<Profile>, Error> {
        let Some(account) = self
            .users
            .find_by_id(user)
            .await
            .map_err(map_user_persistence_error)?
        else {
            return Ok(None);
        };
        let cells = self
            .grid
            .cells_owned_by(user)
            .await
            .map_err(map_grid_repository_error)?;
        Ok(Some(Profile {
            user: account,
            cells,
        }))
    }
}
