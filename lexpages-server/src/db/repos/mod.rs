//! Repository implementations for database access
//!
//! Each repository borrows the pool for one request:
//! - list operations are single queries (window counts, sub-selects)
//! - writes that touch several tables share one transaction
//! - uniqueness is left to constraints, conflicts surface as `DbError`

pub mod error;
pub mod jurists;
pub mod pages;
pub mod questions;
pub mod shortcodes;
pub mod tags;
pub mod users;

pub use error::DbError;
pub use jurists::{Jurist, JuristRepo};
pub use pages::{CategoryCounts, PageRepo};
pub use questions::QuestionRepo;
pub use shortcodes::ShortcodeRepo;
pub use tags::{TagRepo, Tagged};
pub use users::{hash_password, verify_password, NewUser, UserRepo};
