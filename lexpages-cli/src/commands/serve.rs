//! HTTP server command

use anyhow::{Context, Result};
use clap::Parser;

use lexpages_core::SiteConfig;
use lexpages_server::db::create_pool;
use lexpages_server::http::{run_server, AppState, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides [server].bind)
    #[arg(long, short = 'b')]
    pub bind: Option<String>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config/environment)
    #[arg(long)]
    pub database_url: Option<String>,
}

/// Run the HTTP server until shutdown.
pub async fn run_serve(args: ServeArgs, mut config: SiteConfig) -> Result<()> {
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if args.cors_permissive {
        config.server.cors_permissive = true;
    }
    if let Some(url) = args.database_url {
        config.database.url = url;
    }

    let server = ServerConfig::from_site(&config).context("Invalid server configuration")?;
    tracing::info!(bind = %server.bind_addr, domain = %config.site.domain_name, "starting lexpages");

    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;
    let state = AppState::new(pool, config).context("Failed to prepare application state")?;

    run_server(state, server).await.context("Server error")?;

    Ok(())
}
