//! Bolt CLI - Database management for the storefront.
//!
//! # Usage
//!
//! ```bash
//! # Create or update the visitor session table
//! bolt-cli migrate sessions
//! ```
//!
//! # Commands
//!
//! - `migrate sessions` - Run the session store migration

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bolt-cli")]
#[command(author, version, about = "Bolt storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Create the visitor session table used by the storefront
    Sessions,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::migrate::MigrationError> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Sessions => commands::migrate::sessions().await,
        },
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_migrate_sessions() {
        let cli = Cli::try_parse_from(["bolt-cli", "migrate", "sessions"]);
        assert!(matches!(
            cli.map(|cli| cli.command),
            Ok(Commands::Migrate {
                target: MigrateTarget::Sessions
            })
        ));
    }
}
