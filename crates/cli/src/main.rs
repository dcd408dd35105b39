//! Atelier CLI - Operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Create an admin account
//! atelier-cli admin create -e admin@example.com -p <password> -f Ada -l Lovelace
//!
//! # Seed the catalog with sample artworks
//! atelier-cli seed
//! ```
//!
//! # Commands
//!
//! - `admin create` - Create admin accounts
//! - `seed` - Seed the catalog with sample artworks

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "atelier-cli")]
#[command(author, version, about = "Atelier CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the catalog with sample artworks
    Seed,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin password (hashed before storage)
        #[arg(short, long)]
        password: String,

        /// First name
        #[arg(short, long)]
        first_name: String,

        /// Last name
        #[arg(short, long)]
        last_name: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                password,
                first_name,
                last_name,
            } => {
                let id = commands::admin::create_user(&email, &password, &first_name, &last_name)
                    .await?;
                tracing::info!("Created admin user {id}");
            }
        },
        Commands::Seed => {
            let count = commands::seed::catalog().await?;
            tracing::info!("Seeded {count} artworks");
        }
    }

    Ok(())
}
