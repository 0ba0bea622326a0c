//! lexpages CLI - legal-services site server and maintenance tool
//!
//! - `serve`: run the public site, admin API and lead intake
//! - `db init` / `db fix-links`: schema bootstrap and content clean-up
//! - `user add`: create admin accounts
//! - `slug`: preview the label generated for a page name
//! - `config show`: print the effective configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use lexpages_core::SiteConfig;

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "lexpages",
    author,
    version,
    about = "Legal-services site: page tree, Q&A, admin API and lead forwarding"
)]
struct Cli {
    /// Config file (default: $LEXPAGES_CONFIG or ./lexpages.toml)
    #[arg(long, short = 'c', global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
    /// Database bootstrap and maintenance
    Db(commands::db::DbArgs),
    /// Manage admin accounts
    User(commands::user::UserArgs),
    /// Print the label generated for a page name
    Slug(commands::slug::SlugArgs),
    /// Inspect configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

fn load_config(explicit: Option<&std::path::Path>) -> Result<SiteConfig> {
    let path = SiteConfig::resolve_path(explicit);
    let config = SiteConfig::load(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Slug(args) => commands::run_slug(args),
        Commands::Completions(args) => run_completions(args),
        Commands::Serve(args) => {
            let config = load_config(cli.config.as_deref())?;
            commands::run_serve(args, config).await
        }
        Commands::Db(args) => {
            let config = load_config(cli.config.as_deref())?;
            commands::run_db(args, config).await
        }
        Commands::User(args) => {
            let config = load_config(cli.config.as_deref())?;
            commands::run_user(args, config).await
        }
        Commands::Config(args) => {
            let config = load_config(cli.config.as_deref())?;
            commands::run_config(args, config)
        }
    }
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
