//! Command implementations for the lexpages CLI

pub mod config;
pub mod db;
pub mod serve;
pub mod slug;
pub mod user;

pub use config::run_config;
pub use db::run_db;
pub use serve::run_serve;
pub use slug::run_slug;
pub use user::run_user;
