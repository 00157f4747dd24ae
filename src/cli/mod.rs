mod output;
mod transcript;

#[cfg(test)]
mod tests;

pub use transcript::Transcript;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::analytics::{Dashboard, SessionRecorder};
use crate::core::config::{load_config, AppConfig};
use crate::core::error::StorageError;
use crate::core::ledger::Ledger;
use crate::storage::{Database, MemoryLedger};

#[derive(Parser, Debug)]
#[command(name = "companion", version, about = "Session analytics for the AI companion")]
struct Cli {
    /// Working directory (holds companion.json and the data directory)
    #[arg(short = 'c', long = "cwd", global = true)]
    working_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show aggregate statistics and one page of session history
    Dashboard {
        /// Page to show (1-based); out-of-range pages fall back to page 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        #[arg(short = 'f', long, default_value = "text")]
        format: OutputFormat,
    },
    /// Record a finished session from a transcript JSON file
    Record {
        transcript: PathBuf,
    },
    /// Delete every recorded session
    Clear,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.working_dir.clone()).map_err(|e| anyhow::anyhow!("{e}"))?;

    let filter = if cli.debug || config.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ledger = open_ledger(&config).await;

    match cli.command {
        Command::Dashboard { page, format } => {
            let mut dashboard = Dashboard::load(ledger.as_ref(), config.page_size).await;
            if !dashboard.go_to(page) {
                tracing::debug!(page, "page out of range; staying on page 1");
            }
            match format {
                OutputFormat::Text => print!("{}", output::render_text(&dashboard)),
                OutputFormat::Json => println!("{}", output::render_json(&dashboard)?),
            }
        }
        Command::Record { transcript } => {
            let transcript =
                Transcript::load(&transcript).map_err(|e| anyhow::anyhow!("{e}"))?;
            let start = transcript
                .resolved_start()
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            let id = transcript.resolved_id(start);

            let recorder = SessionRecorder::new(ledger);
            let record = recorder
                .record(&id, &transcript.messages, start, transcript.resolved_end())
                .await;
            println!("{}", output::render_recorded(&record));
        }
        Command::Clear => {
            ledger.clear().await.map_err(|e| anyhow::anyhow!("{e}"))?;
            println!("All sessions cleared.");
        }
    }

    Ok(())
}

/// Opens the on-disk ledger. If the database cannot be opened the process
/// continues against an empty in-memory ledger.
async fn open_ledger(config: &AppConfig) -> Arc<dyn Ledger> {
    let opened = async {
        let db = Database::open(config).await?;
        db.run_migrations().await?;
        Ok::<_, StorageError>(db)
    }
    .await;

    match opened {
        Ok(db) => Arc::new(db.ledger()),
        Err(e) => {
            tracing::warn!(error = %e, "session ledger unavailable; using empty in-memory ledger");
            Arc::new(MemoryLedger::new())
        }
    }
}
