//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Static files for robots.txt, favicon.ico and /static
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{HeaderValue, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use lexpages_core::{Sanitizer, ShortcodeSet, SiteConfig};

use super::error::SiteError;
use super::routes;
use crate::db::ShortcodeRepo;
use crate::leads::{LeadDistributor, LeadError};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    pub cors_permissive: bool,

    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            cors_permissive: false,
            static_dir: PathBuf::from("static"),
        }
    }
}

impl ServerConfig {
    /// Server settings from the `[server]` section.
    pub fn from_site(config: &SiteConfig) -> Result<Self, ServerError> {
        let bind_addr = config
            .server
            .bind
            .parse()
            .map_err(|_| ServerError::BindAddr(config.server.bind.clone()))?;
        Ok(Self {
            bind_addr,
            cors_permissive: config.server.cors_permissive,
            static_dir: config.server.static_dir.clone(),
        })
    }
}

/// Shared application state
pub struct AppState {
    pub pool: PgPool,
    pub config: SiteConfig,
    /// Clean-up for rich text coming through the admin API
    pub sanitizer: Sanitizer,
    pub leads: LeadDistributor,
}

impl AppState {
    pub fn new(pool: PgPool, config: SiteConfig) -> Result<Self, ServerError> {
        let sanitizer = Sanitizer::new(&config.site.domain_name);
        let leads = LeadDistributor::from_config(&config)?;
        Ok(Self {
            pool,
            config,
            sanitizer,
            leads,
        })
    }

    /// Shortcodes for one render.
    pub async fn shortcodes(&self) -> ShortcodeSet {
        ShortcodeRepo::new(&self.pool).load_set().await
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }
    let port = config.bind_addr.port();
    let origins: Vec<HeaderValue> = ["localhost", "127.0.0.1"]
        .iter()
        .filter_map(|host| HeaderValue::from_str(&format!("http://{host}:{port}")).ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn not_found(uri: Uri) -> Response {
    routes::redirects::append_slash(&uri).unwrap_or_else(|| SiteError::NotFound.into_response())
}

/// Build the application router.
pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let static_dir = &config.static_dir;
    Router::new()
        .merge(routes::health::router())
        .merge(routes::site::router())
        .merge(routes::redirects::router())
        .merge(routes::leads::router())
        .merge(routes::sitemap::router())
        .nest(
            "/admin/api",
            routes::admin::router().merge(routes::lookups::router()),
        )
        .route_service("/robots.txt", ServeFile::new(static_dir.join("robots.txt")))
        .route_service("/favicon.ico", ServeFile::new(static_dir.join("favicon.ico")))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&site.database).await?;
/// let state = AppState::new(pool, site.clone())?;
/// run_server(state, ServerConfig::from_site(&site)?).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    tracing::info!(
        sinks = ?state.leads.sink_names(),
        static_dir = %config.static_dir.display(),
        "application state ready"
    );
    let app = build_router(Arc::new(state), &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid bind address '{0}'")]
    BindAddr(String),

    #[error(transparent)]
    Leads(#[from] LeadError),
}
