//! CLI entry and dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use portal_core::session::SessionResolver;
use portal_core::store::FileStore;
use portal_core::{config, logging};

mod commands;

#[derive(Parser)]
#[command(name = "portal")]
#[command(version)]
#[command(about = "Sign in with Google or as a guest, then see who you are")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in without the TUI and print the home screen
    Login {
        /// Continue as a guest
        #[arg(long)]
        guest: bool,
        /// Sign in with Google in the browser
        #[arg(long)]
        google: bool,
        /// Skip consent and resolve an existing Google access token
        #[arg(long, value_name = "TOKEN")]
        access_token: Option<String>,
    },

    /// Show the saved profile
    Whoami,

    /// Forget the saved profile (the Google session is not revoked)
    Logout,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = config::Config::load().context("load config")?;

    // Logging is best effort; the flow works without it.
    let _log_guard = match logging::init(&config.log) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    };

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli, config).await })
}

async fn dispatch(cli: Cli, config: config::Config) -> Result<()> {
    let store = Arc::new(FileStore::open_default());
    let resolver = SessionResolver::from_config(&config, store);

    // default to the interactive screens
    let Some(command) = cli.command else {
        return crate::modes::run_tui(&config, resolver).await;
    };

    match command {
        Commands::Login {
            guest,
            google,
            access_token,
        } => match (guest, google, access_token) {
            (true, false, None) => commands::auth::login_guest(&resolver).await,
            (false, true, None) => commands::auth::login_google(&config, &resolver).await,
            (false, false, Some(token)) => {
                commands::auth::login_with_token(&resolver, token).await
            }
            _ => anyhow::bail!("Please specify one of: --guest, --google, or --access-token"),
        },

        Commands::Whoami => commands::auth::whoami(&resolver),

        Commands::Logout => commands::auth::logout(&resolver),

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
