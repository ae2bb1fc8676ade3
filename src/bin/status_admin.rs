// src/bin/status_admin.rs
use clap::{Parser, Subcommand};
use status_log::config::Settings;
use status_log::prelude::*;
use status_log::service::{StatusLogService, DEFAULT_DAYS_TO_KEEP};
use status_log::storage::LocalSheet;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "status-admin", version, about = "Maintenance commands for the status-log sheet")]
struct Args {
    /// Sheet file; defaults to `sheet.path` from the configuration
    #[arg(long, global = true)]
    sheet: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the styled header row. Existing records are kept.
    Init,
    /// Print the most recent records as a JSON array, oldest first
    Recent {
        /// Defaults to `recent.default_limit`
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Delete the leading records older than the given number of days
    Clean {
        #[arg(long, default_value_t = DEFAULT_DAYS_TO_KEEP)]
        days: u32,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();
    let settings = Settings::new()?;
    let path = args.sheet.unwrap_or_else(|| settings.sheet.path.clone());

    let service = StatusLogService::new(LocalSheet::open(&path)?, settings.utc_offset()?);

    match args.command {
        Command::Init => {
            service.initialize().await?;
            info!("Initialized {:?}", path);
        }
        Command::Recent { limit } => {
            let limit = limit.unwrap_or(settings.recent.default_limit);
            let records = service.recent(limit).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Clean { days } => {
            let deleted = service.clean_old_data(days).await?;
            println!("{}", deleted);
        }
    }

    Ok(())
}
