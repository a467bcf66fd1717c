//! NB Collection CLI - data directory and admin tooling.
//!
//! # Usage
//!
//! ```bash
//! # Create the data files and uploads directory
//! nb-cli init
//!
//! # Append products from a YAML file
//! nb-cli seed products catalog.yaml
//!
//! # Show stock per size/variant, only levels below 3
//! nb-cli stock --below 3
//!
//! # Issue an admin bearer token
//! nb-cli token
//! ```
//!
//! Paths come from the same `ADMIN_*` variables (and `.env`) as the server.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use nb_collection_admin::config::StorageConfig;

mod commands;

#[derive(Parser)]
#[command(name = "nb-cli")]
#[command(author, version, about = "NB Collection CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create missing data files and the uploads directory
    Init,
    /// Load records from YAML files
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// List stock for every size and variant
    Stock {
        /// Only show entries with stock below this level
        #[arg(short, long)]
        below: Option<u64>,
    },
    /// Issue an admin bearer token
    Token {
        /// Token subject, defaults to `ADMIN_USERNAME`
        #[arg(short, long)]
        subject: Option<String>,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Append products to the catalog
    Products {
        /// YAML file with a top-level `products` list
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let storage = StorageConfig::from_env();
    match cli.command {
        Commands::Init => commands::init::run(&storage).await?,
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => {
                commands::seed::products(&storage, &file).await?;
            }
        },
        Commands::Stock { below } => commands::stock::report(&storage, below).await?,
        Commands::Token { subject } => commands::token::issue(subject.as_deref())?,
    }
    Ok(())
}
