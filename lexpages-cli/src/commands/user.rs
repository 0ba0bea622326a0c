//! Admin account commands

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use lexpages_core::SiteConfig;
use lexpages_server::db::{create_pool, NewUser, UserRepo};

#[derive(Parser, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Create an account
    Add {
        /// Login name (at least 3 characters)
        login: String,

        /// Password (read from LEXPAGES_USER_PASSWORD when omitted)
        #[arg(long, env = "LEXPAGES_USER_PASSWORD", hide_env_values = true)]
        password: String,

        /// Display name
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "admin")]
        role: String,
    },
    /// Check a password against the stored hash
    Check {
        login: String,

        /// Password to check (read from LEXPAGES_USER_PASSWORD when omitted)
        #[arg(long, env = "LEXPAGES_USER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

pub async fn run_user(args: UserArgs, config: SiteConfig) -> Result<()> {
    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;
    let repo = UserRepo::new(&pool);

    match args.command {
        UserCommand::Add {
            login,
            password,
            name,
            email,
            role,
        } => {
            let user = NewUser {
                login,
                name,
                email,
                role,
                password,
            };
            let id = repo
                .create(&user)
                .await
                .with_context(|| format!("Failed to create user '{}'", user.login))?;
            println!("Created user '{}' (id {id}).", user.login);
        }
        UserCommand::Check { login, password } => {
            let matches = repo
                .check_password(&login, &password)
                .await
                .with_context(|| format!("Failed to check password of '{login}'"))?;
            if !matches {
                anyhow::bail!("password does not match for '{login}'");
            }
            println!("Password matches.");
        }
    }
    Ok(())
}
