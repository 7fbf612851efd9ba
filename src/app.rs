//! Command-line application state and the interactive review loop.

use anyhow::{Context, Result, bail};
use srs_engine::config::{SrsConfig, StoreBackend};
use srs_engine::error::StoreResult;
use srs_engine::export::json::{Backup, read_catalog, write_catalog};
use srs_engine::models::sm2::preview_intervals;
use srs_engine::models::{
    Catalog, Clock, FixedClock, Rating, RecordMap, ScheduleRecord, SystemClock,
};
use srs_engine::{JsonFileStore, RecordStore, ReviewSession, SessionError, SqliteStore};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::info;

/// The learner's catalog and records behind the configured backend.
pub enum App {
    Sqlite(SqliteStore),
    Json {
        store: JsonFileStore,
        catalog_path: PathBuf,
    },
}

impl App {
    pub fn open(config: &SrsConfig) -> Result<Self> {
        let app = match config.backend {
            StoreBackend::Sqlite => App::Sqlite(
                SqliteStore::open(&config.database_path).with_context(|| {
                    format!("failed to open {}", config.database_path.display())
                })?,
            ),
            StoreBackend::Json => App::Json {
                store: JsonFileStore::open(&config.records_path).with_context(|| {
                    format!("failed to open {}", config.records_path.display())
                })?,
                catalog_path: config.catalog_path.clone(),
            },
        };
        Ok(app)
    }

    pub fn catalog(&self) -> Result<Catalog> {
        let catalog = match self {
            App::Sqlite(store) => store.load_catalog()?,
            App::Json { catalog_path, .. } => read_catalog(catalog_path)?,
        };
        Ok(catalog)
    }

    /// Adds new item ids to the catalog and returns how many were new.
    pub fn add_items(&mut self, item_ids: &[String]) -> Result<usize> {
        match self {
            App::Sqlite(store) => {
                let mut added = 0;
                for item_id in item_ids {
                    if store.add_item(item_id)? {
                        added += 1;
                    }
                }
                Ok(added)
            }
            App::Json { catalog_path, .. } => {
                let mut catalog = read_catalog(&*catalog_path)?;
                let added = catalog.extend(item_ids.iter().cloned());
                write_catalog(&catalog, &*catalog_path)?;
                Ok(added)
            }
        }
    }

    /// The simulated date for SQLite, the wall clock for JSON.
    pub fn clock(&self) -> Result<Box<dyn Clock>> {
        let clock: Box<dyn Clock> = match self {
            App::Sqlite(store) => Box::new(FixedClock::new(store.current_date()?)),
            App::Json { .. } => Box::new(SystemClock),
        };
        Ok(clock)
    }

    pub fn advance_day(&self) -> Result<()> {
        match self {
            App::Sqlite(store) => {
                let date = store.advance_day()?;
                println!("Current date is now {}", date.format("%Y-%m-%d"));
                Ok(())
            }
            App::Json { .. } => bail!("the simulated date is only kept by the sqlite backend"),
        }
    }

    pub fn backup(&self) -> Result<Backup> {
        Ok(Backup {
            catalog: self.catalog()?,
            records: self.load_all_records()?,
        })
    }

    pub fn restore(&mut self, backup: &Backup) -> Result<()> {
        let added = self.add_items(backup.catalog.items())?;
        for record in backup.records.values() {
            self.save_record(record)?;
        }
        info!(added, records = backup.records.len(), "restored backup");
        Ok(())
    }
}

impl RecordStore for App {
    fn load_all_records(&self) -> StoreResult<RecordMap> {
        match self {
            App::Sqlite(store) => store.load_all_records(),
            App::Json { store, .. } => store.load_all_records(),
        }
    }

    fn save_record(&mut self, record: &ScheduleRecord) -> StoreResult<()> {
        match self {
            App::Sqlite(store) => store.save_record(record),
            App::Json { store, .. } => store.save_record(record),
        }
    }

    fn load_record(&self, item_id: &str) -> StoreResult<Option<ScheduleRecord>> {
        match self {
            App::Sqlite(store) => store.load_record(item_id),
            App::Json { store, .. } => store.load_record(item_id),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    pub rated: usize,
    pub aborted: bool,
}

/// Runs one review session, reading ratings from `input`.
///
/// Typing `q` or reaching end of input aborts the session.
pub fn run_review<S, C, R, W>(
    session: &mut ReviewSession<S, C>,
    items: &[String],
    mut input: R,
    mut output: W,
) -> Result<ReviewSummary>
where
    S: RecordStore,
    C: Clock,
    R: BufRead,
    W: Write,
{
    let mut summary = ReviewSummary::default();

    match session.start_session(items) {
        Ok(queue) => writeln!(output, "{} items to review", queue.len())?,
        Err(SessionError::EmptyDueSet) => {
            writeln!(output, "Nothing to review")?;
            return Ok(summary);
        }
        Err(e) => return Err(e.into()),
    }

    while let Some(progress) = session.progress() {
        let item_id = session.current_item()?.clone();
        let prior = session.store().load_record(&item_id)?;
        let choices = Rating::ALL
            .iter()
            .zip(preview_intervals(prior.as_ref(), session.clock().now()))
            .map(|(rating, days)| format!("{} {} ({days}d)", rating.value(), rating.label()))
            .collect::<Vec<_>>()
            .join(", ");

        writeln!(
            output,
            "[{}/{}] {}",
            progress.position + 1,
            progress.total,
            item_id
        )?;

        loop {
            write!(output, "Rate {choices}, q to quit: ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 || line.trim().eq_ignore_ascii_case("q") {
                session.abort()?;
                summary.aborted = true;
                writeln!(output, "\nSession aborted")?;
                return Ok(summary);
            }

            let Ok(value) = line.trim().parse::<u8>() else {
                writeln!(output, "Please enter a number from 1 to 4")?;
                continue;
            };

            match session.rate_value(value) {
                Ok(outcome) => {
                    summary.rated += 1;
                    writeln!(
                        output,
                        "Next review in {} day(s) on {}",
                        outcome.record.interval,
                        outcome.record.due_at.format("%Y-%m-%d")
                    )?;
                    break;
                }
                Err(SessionError::InvalidRating(_)) => {
                    writeln!(output, "Please enter a number from 1 to 4")?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    writeln!(output, "Session complete: {} item(s) reviewed", summary.rated)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use srs_engine::MemoryStore;

    fn items(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_review_until_complete() {
        let clock = FixedClock::from_millis(1_700_000_000_000);
        let mut session = ReviewSession::new(MemoryStore::new(), clock);
        let mut output = Vec::new();

        let summary = run_review(
            &mut session,
            &items(&["a", "b"]),
            "3\nnope\n9\n1\n".as_bytes(),
            &mut output,
        )
        .unwrap();

        assert_eq!(summary, ReviewSummary { rated: 2, aborted: false });
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("[1/2] a"));
        assert!(text.contains("Rate 1 Fail (1d), 2 Hard (1d), 3 Good (1d), 4 Easy (1d), q to quit: "));
        assert!(text.contains("[2/2] b"));
        assert_eq!(text.matches("Please enter a number from 1 to 4").count(), 2);
        assert!(text.contains("Session complete: 2 item(s) reviewed"));
        assert_eq!(session.store().len(), 2);
    }

    #[test]
    fn test_quit_aborts() {
        let clock = FixedClock::from_millis(1_700_000_000_000);
        let mut session = ReviewSession::new(MemoryStore::new(), clock);
        let mut output = Vec::new();

        let summary = run_review(
            &mut session,
            &items(&["a", "b", "c"]),
            "4\nq\n".as_bytes(),
            &mut output,
        )
        .unwrap();

        assert_eq!(summary, ReviewSummary { rated: 1, aborted: true });
        assert!(!session.is_in_session());
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_nothing_due() {
        let clock = FixedClock::from_millis(1_700_000_000_000);
        let mut session = ReviewSession::new(MemoryStore::new(), clock);
        let mut output = Vec::new();

        let summary = run_review(&mut session, &[], "".as_bytes(), &mut output).unwrap();

        assert_eq!(summary, ReviewSummary::default());
        assert!(String::from_utf8(output).unwrap().contains("Nothing to review"));
    }
}
