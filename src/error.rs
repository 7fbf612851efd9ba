//! Error types for the scheduling core and its persistence adapters.

use thiserror::Error;

/// Failures reported by the review session controller.
///
/// None of these are fatal; the caller decides how to surface them.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A rating outside the 1..=4 scale was offered.
    #[error("invalid rating {0}, expected a value from 1 to 4")]
    InvalidRating(u8),

    /// No item is due, so there is nothing to review.
    #[error("no items are due for review")]
    EmptyDueSet,

    /// A session is already running; it must be finished or aborted first.
    #[error("a review session is already in progress")]
    SessionInProgress,

    /// The operation needs a running session.
    #[error("no review session is in progress")]
    NotInSession,

    /// The record store failed to load or save.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of the record stores and the import/export helpers.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("config error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A persisted record breaks one of the scheduling invariants.
    #[error("corrupt schedule record for '{item_id}': {reason}")]
    CorruptRecord { item_id: String, reason: String },
}

pub type Result<T> = std::result::Result<T, SessionError>;
pub type StoreResult<T> = std::result::Result<T, StoreError>;
