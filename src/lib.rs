pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;

pub use database::{JsonFileStore, MemoryStore, RecordStore, SqliteStore};
pub use error::{SessionError, StoreError};
pub use models::{
    Catalog, Clock, FixedClock, ItemId, Rating, RecordMap, ReviewSession, ScheduleRecord,
    SystemClock,
};
