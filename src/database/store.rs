//! Read/write contract between the review session and whatever persists
//! schedule records.

use crate::error::StoreResult;
use crate::models::{ItemId, RecordMap, ScheduleRecord};

pub trait RecordStore {
    /// Every persisted record, keyed by item id.
    fn load_all_records(&self) -> StoreResult<RecordMap>;

    /// Inserts or replaces the record with the same item id.
    fn save_record(&mut self, record: &ScheduleRecord) -> StoreResult<()>;

    fn load_record(&self, item_id: &str) -> StoreResult<Option<ScheduleRecord>> {
        Ok(self.load_all_records()?.remove(item_id))
    }
}

impl<S: RecordStore + ?Sized> RecordStore for &mut S {
    fn load_all_records(&self) -> StoreResult<RecordMap> {
        (**self).load_all_records()
    }

    fn save_record(&mut self, record: &ScheduleRecord) -> StoreResult<()> {
        (**self).save_record(record)
    }

    fn load_record(&self, item_id: &str) -> StoreResult<Option<ScheduleRecord>> {
        (**self).load_record(item_id)
    }
}

/// Keeps records in memory only.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: RecordMap,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: RecordMap) -> Self {
        Self { records }
    }

    pub fn get(&self, item_id: &str) -> Option<&ScheduleRecord> {
        self.records.get(item_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn load_all_records(&self) -> StoreResult<RecordMap> {
        Ok(self.records.clone())
    }

    fn save_record(&mut self, record: &ScheduleRecord) -> StoreResult<()> {
        let item_id: ItemId = record.item_id.clone();
        self.records.insert(item_id, record.clone());
        Ok(())
    }

    fn load_record(&self, item_id: &str) -> StoreResult<Option<ScheduleRecord>> {
        Ok(self.records.get(item_id).cloned())
    }
}
