//! Storekeep CLI - Database migrations, seeding and admin provisioning.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! sk-cli migrate
//!
//! # Bootstrap the store and first admin (idempotent)
//! sk-cli seed
//!
//! # Create an admin user
//! sk-cli admin create -e admin@example.com -p 'long passphrase'
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Load defaults, ensure the store record and administrator
//! - `admin create` - Find or create an admin user

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::CommandError;

/// Log filter used when `RUST_LOG` is unset. Seeding progress is logged at
/// info level and must show up on a plain `sk-cli seed`.
const DEFAULT_LOG_FILTER: &str = "storekeep_admin=info,sk_cli=info";

#[derive(Parser)]
#[command(name = "sk-cli")]
#[command(author, version, about = "Storekeep CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Bootstrap the store record and administrator
    Seed {
        /// Run against an empty in-memory store instead of the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create an admin user unless one with this email exists
    Create {
        /// Admin email address (defaults to `ADMIN_EMAIL` or admin@<HOST>)
        #[arg(short, long)]
        email: Option<String>,

        /// Admin password (defaults to `ADMIN_PASSWORD` or the built-in default)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env first so RUST_LOG set there applies
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { dry_run } => commands::seed::run(dry_run).await?,
        Commands::Admin { action } => match action {
            AdminAction::Create { email, password } => {
                commands::admin::create_user(email.as_deref(), password).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_admin_create_flags_are_optional() {
        let cli = Cli::try_parse_from(["sk-cli", "admin", "create"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Admin {
                action: AdminAction::Create {
                    email: None,
                    password: None
                }
            })
        ));
    }

    #[test]
    fn test_default_log_filter_shows_info() {
        let filter = EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        assert_eq!(
            filter.max_level_hint(),
            Some(tracing_subscriber::filter::LevelFilter::INFO)
        );
        assert!(DEFAULT_LOG_FILTER.contains("storekeep_admin=info"));
        let this_crate = module_path!().split("::").next().unwrap();
        assert!(DEFAULT_LOG_FILTER.contains(&format!("{this_crate}=info")));
    }

    #[test]
    fn test_seed_dry_run_flag() {
        let cli = Cli::try_parse_from(["sk-cli", "seed", "--dry-run"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Seed { dry_run: true })
        ));
    }
}
