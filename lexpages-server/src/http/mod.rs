//! HTTP server layer
//!
//! Axum server with:
//! - public pages, Q&A, sitemap and lead intake
//! - the admin JSON API under `/admin/api`
//! - CORS (localhost only by default), request tracing, graceful shutdown

pub mod cache;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::{ApiError, Envelope, SiteError};
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
