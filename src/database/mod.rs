pub mod db;
pub mod json_store;
pub mod store;

pub use db::SqliteStore;
pub use json_store::JsonFileStore;
pub use store::{MemoryStore, RecordStore};
