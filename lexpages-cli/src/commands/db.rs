//! Database bootstrap and maintenance commands

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use lexpages_core::{Sanitizer, SiteConfig};
use lexpages_server::db::{create_pool, maintenance, migrations, JuristRepo, UserRepo};

#[derive(Parser, Debug)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// Create missing tables and seed reference data, the admin account
    /// and the default jurist
    Init {
        /// Drop every table first (destroys all content)
        #[arg(long)]
        reset: bool,
    },
    /// Rewrite absolute links to the own domain in stored content
    FixLinks,
}

pub async fn run_db(args: DbArgs, config: SiteConfig) -> Result<()> {
    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;

    match args.command {
        DbCommand::Init { reset } => {
            if reset {
                tracing::warn!("dropping all tables");
                migrations::reset(&pool).await.context("Failed to drop tables")?;
            }
            migrations::run(&pool).await.context("Failed to create schema")?;

            let admin = UserRepo::new(&pool)
                .seed_admin(&config.auth.default_admin_password, &config.site.domain_name)
                .await
                .context("Failed to create admin account")?;
            let jurist = JuristRepo::new(&pool)
                .seed_default()
                .await
                .context("Failed to add default jurist")?;

            println!("Schema ready.");
            if admin {
                println!("Created user 'admin' with the configured default password.");
            }
            if jurist {
                println!("Added the default jurist.");
            }
        }
        DbCommand::FixLinks => {
            let sanitizer = Sanitizer::new(&config.site.domain_name);
            let fixed = maintenance::fix_links(&pool, &sanitizer)
                .await
                .context("Failed to rewrite links")?;
            println!(
                "Rewrote {} page(s) and {} question(s).",
                fixed.pages, fixed.questions
            );
        }
    }
    Ok(())
}
