//! Database layer - connection pool, schema bootstrap and repositories
//!
//! - One shared `PgPool`; repositories borrow it per request
//! - Admin mutations run in a single transaction each
//! - Integrity is enforced by constraints, conflicts surface as errors

pub mod maintenance;
pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;
