//! PostgreSQL adapters built on Diesel, `diesel-async` and bb8.
//!
//! Row structs and the table schema stay private to this module; the
//! repositories translate them into domain values and map every database
//! failure onto the owning port's error type.
//!
//! ```rust,no_run
//! use citygrid::outbound::persistence::{
//!     DbPool, DieselGridRepository, DieselUserRepository, PoolConfig,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/citygrid")).await?;
//! let users = DieselUserRepository::new(pool.clone());
//! let grid = DieselGridRepository::new(pool);
//! # let _ = (users, grid);
//! # Ok(())
//! # }
//! ```

mod diesel_grid_repository;
mod diesel_user_repository;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_grid_repository::DieselGridRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
