//! Domain ports.
//!
//! Driving ports (`*Command`, `*Query`) are implemented by domain services
//! and called by inbound adapters. Driven ports (`*Repository`,
//! `PasswordHasher`) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod booking_command;
mod grid_query;
mod grid_repository;
mod password_hasher;
mod user_repository;

#[cfg(test)]
pub use account_command::{MockAccountCommand, MockAccountQuery};
pub use account_command::{AccountCommand, AccountQuery};
#[cfg(test)]
pub use booking_command::{MockBalanceCommand, MockBookingCommand};
pub use booking_command::{BalanceCommand, BookingCommand};
#[cfg(test)]
pub use grid_query::{MockGridQuery, MockProfileQuery};
pub use grid_query::{GridQuery, Profile, ProfileQuery};
#[cfg(test)]
pub use grid_repository::MockGridRepository;
pub use grid_repository::{GridRepository, GridRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewUser, StoredCredentials, UserPersistenceError, UserRepository};
