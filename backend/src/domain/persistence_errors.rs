//! Mapping from driven-port failures to domain errors.
//!
//! Connection failures become `service_unavailable`; query failures become
//! `internal_error` so their details stay out of user-facing messages.

use tracing::error;

use super::Error;
use super::ports::{GridRepositoryError, UserPersistenceError};

/// Message shown when a registration reuses a login.
pub(crate) const LOGIN_TAKEN: &str = "That login is already taken.";

pub(crate) fn map_user_persistence_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::DuplicateLogin { .. } => Error::conflict(LOGIN_TAKEN),
        UserPersistenceError::Connection { message } => {
            error!(%message, "user store unavailable");
            Error::service_unavailable("The account store is unavailable. Try again shortly.")
        }
        UserPersistenceError::Query { message } => {
            error!(%message, "user store query failed");
            Error::internal("Something went wrong. Try again.")
        }
    }
}

pub(crate) fn map_grid_repository_error(err: GridRepositoryError) -> Error {
    match err {
        GridRepositoryError::Connection { message } => {
            error!(%message, "grid store unavailable");
            Error::service_unavailable("The grid is unavailable. Try again shortly.")
        }
        GridRepositoryError::Query { message } => {
            error!(%message, "grid store query failed");
            Error::internal("Something went wrong. Try again.")
        }
    }
}
