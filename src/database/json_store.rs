//! Record store backed by a single JSON file holding the keyed record map.
//!
//! The whole file is rewritten on every save: the new contents go to a temp
//! file in the same directory, which is then renamed over the old one.

use super::store::RecordStore;
use crate::error::StoreResult;
use crate::models::{RecordMap, ScheduleRecord, records_from_json, records_to_json};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub struct JsonFileStore {
    path: PathBuf,
    records: RecordMap,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is treated as an empty store.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            records_from_json(&contents)?
        } else {
            RecordMap::new()
        };

        info!(path = %path.display(), records = records.len(), "opened JSON record store");
        Ok(Self { path, records })
    }

    fn flush(&self) -> StoreResult<()> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(records_to_json(&self.records)?.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn load_all_records(&self) -> StoreResult<RecordMap> {
        Ok(self.records.clone())
    }

    fn save_record(&mut self, record: &ScheduleRecord) -> StoreResult<()> {
        let previous = self
            .records
            .insert(record.item_id.clone(), record.clone());

        if let Err(e) = self.flush() {
            // keep memory in line with the file
            match previous {
                Some(old) => self.records.insert(record.item_id.clone(), old),
                None => self.records.remove(&record.item_id),
            };
            return Err(e);
        }

        debug!(item_id = %record.item_id, interval = record.interval, "saved record");
        Ok(())
    }

    fn load_record(&self, item_id: &str) -> StoreResult<Option<ScheduleRecord>> {
        Ok(self.records.get(item_id).cloned())
    }
}
