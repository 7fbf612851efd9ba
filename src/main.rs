mod app;

use anyhow::{Context, Result};
use app::{App, run_review};
use clap::{Parser, Subcommand};
use srs_engine::config::SrsConfig;
use srs_engine::export::json::{export_json_to_path, import_json};
use srs_engine::logging::init_tracing;
use srs_engine::models::{Clock, due_items};
use srs_engine::{RecordStore, ReviewSession};
use std::path::PathBuf;
use std::process;
use tracing::info;

#[derive(Parser)]
#[command(name = "srs", version, about = "Spaced repetition review scheduler")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add item ids to the catalog
    Add {
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// List the items due now
    Due,

    /// Review the due items interactively
    Review,

    /// Move the simulated date forward one day
    AdvanceDay,

    /// Write the catalog and records to a JSON file
    Export { path: PathBuf },

    /// Load a catalog and records from a JSON file
    Import { path: PathBuf },

    /// Show catalog and record counts
    Stats,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = SrsConfig::load_or_default(cli.config.as_deref())
        .context("failed to load config")?;
    init_tracing(&config.log_level);

    let mut app = App::open(&config)?;

    match cli.command {
        Commands::Add { items } => {
            let added = app.add_items(&items)?;
            println!("Added {added} new item(s)");
        }
        Commands::Due => {
            let catalog = app.catalog()?;
            let records = app.load_all_records()?;
            let due = due_items(catalog.items(), &records, app.clock()?.now());
            println!("{} item(s) due for review", due.len());
            for item_id in due {
                println!("  - {item_id}");
            }
        }
        Commands::Review => {
            let catalog = app.catalog()?;
            let clock = app.clock()?;
            let mut session = ReviewSession::new(&mut app, clock);
            let stdin = std::io::stdin();
            let summary =
                run_review(&mut session, catalog.items(), stdin.lock(), std::io::stdout())?;
            info!(rated = summary.rated, aborted = summary.aborted, "review finished");
        }
        Commands::AdvanceDay => app.advance_day()?,
        Commands::Export { path } => {
            let backup = app.backup()?;
            export_json_to_path(&backup, &path)
                .with_context(|| format!("failed to export to {}", path.display()))?;
            println!(
                "Exported {} item(s) and {} record(s) to {}",
                backup.catalog.len(),
                backup.records.len(),
                path.display()
            );
        }
        Commands::Import { path } => {
            let backup = import_json(&path)
                .with_context(|| format!("failed to import {}", path.display()))?;
            app.restore(&backup)?;
            println!(
                "Imported {} item(s) and {} record(s)",
                backup.catalog.len(),
                backup.records.len()
            );
        }
        Commands::Stats => {
            let catalog = app.catalog()?;
            let records = app.load_all_records()?;
            let due = due_items(catalog.items(), &records, app.clock()?.now());
            println!("Items: {}", catalog.len());
            println!("Records: {}", records.len());
            println!("Due: {}", due.len());
        }
    }

    Ok(())
}
