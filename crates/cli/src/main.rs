//! Marom CLI - checks and maintenance for the admin dashboard's data.
//!
//! # Usage
//!
//! ```bash
//! # Check that the hosted ingredient schema is in place
//! marom-cli check-db
//!
//! # Strictly parse every storefront data file
//! marom-cli content verify
//!
//! # Create missing data files with empty collections
//! marom-cli content init --frontend-root ../marom-frontend
//! ```
//!
//! # Commands
//!
//! - `check-db` - Probe the `ingredients` table and `products.ingredient_ids`
//! - `content verify` - Report record counts or parse errors per data file
//! - `content init` - Create missing data files

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use marom_admin::config::AdminConfig;

mod commands;

#[derive(Parser)]
#[command(name = "marom-cli")]
#[command(author, version, about = "Marom admin CLI tools")]
struct Cli {
    /// Storefront checkout to operate on (defaults to `FRONTEND_ROOT`)
    #[arg(long, global = true)]
    frontend_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the hosted database schema used by the ingredient editor
    CheckDb,
    /// Manage storefront data files
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
}

#[derive(Subcommand)]
enum ContentAction {
    /// Parse every data file and report record counts
    Verify,
    /// Create missing data files with empty collections
    Init,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AdminConfig::from_env()?;
    if let Some(root) = cli.frontend_root {
        config.frontend_root = root;
    }

    match cli.command {
        Commands::CheckDb => commands::db::check(&config).await?,
        Commands::Content { action } => match action {
            ContentAction::Verify => commands::content::verify(&config).await?,
            ContentAction::Init => commands::content::init(&config).await?,
        },
    }
    Ok(())
}
