//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: mutex-guarded in-process store for tests and database-less
//!   runs.
//! - **crypto**: Argon2id password hashing.
//!
//! Adapters translate between domain values and their storage form and hold
//! no business rules.

pub mod crypto;
pub mod memory;
pub mod persistence;
