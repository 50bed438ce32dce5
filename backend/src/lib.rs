//! City grid rental backend.
//!
//! A hexagonal layout: [`domain`] holds the rules and services, [`inbound`]
//! adapts HTTP requests onto them and [`outbound`] provides storage and
//! password hashing.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use domain::TraceId;
pub use middleware::Trace;
