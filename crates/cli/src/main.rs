//! `automation-builder` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`: start the API server.
//! - `migrate`: run pending database migrations.
//! - `validate`: check an automation JSON file.
//! - `render`: print the pipeline of an automation JSON file.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Settings;

#[derive(Parser)]
#[command(
    name = "automation-builder",
    about = "Build and serve trigger → action automations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the REST API server.
    Serve(Settings),
    /// Run pending database migrations.
    Migrate {
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },
    /// Validate an automation JSON file.
    Validate {
        /// Path to the automation JSON file.
        path: PathBuf,
    },
    /// Print the trigger → action pipeline of an automation JSON file.
    Render {
        path: PathBuf,
    },
}

fn read(path: &PathBuf) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read file {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(settings) => {
            info!("Starting API server on {}", settings.bind);
            let state = settings.app_state().await?;
            api::serve(settings.bind, state).await?;
        }
        Command::Migrate { database_url } => {
            info!("Running migrations");
            let store = db::PgStore::connect(&database_url, 2)
                .await
                .context("failed to connect to database")?;
            store.migrate().await.context("migration failed")?;
            info!("Migrations applied successfully");
        }
        Command::Validate { path } => {
            let draft = commands::parse_draft(&read(&path)?)?;
            match commands::check(&draft) {
                Ok(warnings) => {
                    for w in &warnings {
                        warn!("{w}");
                    }
                    println!(
                        "✅ Automation '{}' is valid ({} steps, {} warnings).",
                        draft.metadata.name,
                        draft.workflow_nodes.len(),
                        warnings.len()
                    );
                }
                Err(e) => {
                    eprintln!("❌ Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Command::Render { path } => {
            let draft = commands::parse_draft(&read(&path)?)?;
            print!("{}", commands::render(&draft));
        }
    }

    Ok(())
}
