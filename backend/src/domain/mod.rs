//! Domain primitives, rules and services.
//!
//! Purpose: define the strongly typed entities of the rental grid and the
//! use-cases that act on them, independent of HTTP and storage. Types are
//! immutable once validated and document their invariants in Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, UserId, DisplayName, Login, Credits: account values.
//! - CellId, BuildingType, Occupancy, Cell, OwnedCell: grid values.
//! - RentRequest, RentSnapshot, ReleaseOutcome: rental rules.
//! - AccountService, BookingService, BalanceService, GridQueryService:
//!   implementations of the driving ports in [`ports`].

pub mod auth;
pub mod booking;
pub mod error;
pub mod grid;
pub mod ports;
pub mod trace_id;
pub mod user;

mod account_service;
mod balance_service;
mod booking_service;
mod grid_query_service;
mod persistence_errors;

pub use self::account_service::AccountService;
pub use self::auth::{
    AuthenticatedUser, LoginCredentials, LoginValidationError, PasswordHash, Registration,
    RegistrationValidationError,
};
pub use self::balance_service::BalanceService;
pub use self::booking::{
    CellState, MAX_CELLS_PER_USER, ReleaseOutcome, RentOutcome, RentReceipt, RentRejection,
    RentRequest, RentSnapshot,
};
pub use self::booking_service::BookingService;
pub(crate) use self::booking_service::ACCOUNT_GONE;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::grid::{
    BuildingType, CELL_COUNT, Cell, CellId, CellOwner, GRID_COLUMNS, GRID_ROWS, Occupancy,
    OwnedCell, UnknownBuildingType,
};
pub use self::grid_query_service::GridQueryService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Credits, DisplayName, Login, STARTING_BALANCE, TOP_UP_AMOUNT, User, UserId,
    UserValidationError,
};
