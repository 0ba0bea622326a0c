//! lexpages-server: public site, admin API and lead intake
//!
//! Postgres storage through sqlx repositories, an axum router with
//! HTML rendering for the public pages and a JSON envelope for the
//! admin API, and outbound lead delivery over reqwest.

pub mod db;
pub mod http;
pub mod leads;
pub mod models;
pub mod render;

pub use db::{create_pool, DbError};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
pub use leads::{LeadDistributor, LeadError, LeadSink};
