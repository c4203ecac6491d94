//! Braindiff maintenance CLI
//!
//! Schema administration for the analytics database: dropping retired
//! schemas and listing what is droppable.

mod commands;
mod config;

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use braindiff_core::adapter::PostgresStore;

use crate::commands::DropOptions;

#[derive(Parser)]
#[command(name = "braindiff", about = "Braindiff database maintenance")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Drop database schemas and everything in them
    DropSchemas {
        /// Schema names to drop
        names: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
        /// Allow dropping the public schema
        #[arg(long)]
        force: bool,
    },
    /// List droppable (non-system) schemas
    ListSchemas,
    /// Apply pending schema migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,braindiff_cli=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::CliConfig::from_env()?;

    let store = PostgresStore::connect(&config.database_url).await?;

    match cli.command {
        Command::DropSchemas { names, yes, force } => {
            if !names.is_empty() && !yes && !confirm(&names)? {
                info!("Aborted, no schemas dropped");
                return Ok(());
            }

            let report = commands::drop_schemas(&store, &names, DropOptions { force }).await;
            std::process::exit(report.exit_code());
        }
        Command::ListSchemas => {
            commands::list_schemas(&store).await?;
        }
        Command::Migrate => {
            sqlx::migrate!("../migrations").run(store.pool()).await?;
            info!("Migrations applied");
        }
    }

    Ok(())
}

/// Ask for confirmation on stdin before destructive work
fn confirm(targets: &[String]) -> anyhow::Result<bool> {
    print!("Drop schemas {:?} with CASCADE? [y/N] ", targets);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
