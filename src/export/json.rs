//! JSON import/export of the catalog together with its schedule records.

use crate::error::StoreResult;
use crate::models::{Catalog, RecordMap, restore_item_ids};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Everything needed to restore a learner's review state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    pub catalog: Catalog,
    #[serde(default)]
    pub records: RecordMap,
}

/// Writes a backup to a JSON file at the specified path.
pub fn export_json_to_path(backup: &Backup, path: impl AsRef<Path>) -> StoreResult<()> {
    let path = path.as_ref();
    let json_string = serde_json::to_string_pretty(backup)?;
    fs::write(path, json_string)?;
    info!(
        path = %path.display(),
        items = backup.catalog.len(),
        records = backup.records.len(),
        "exported backup"
    );
    Ok(())
}

/// Reads a backup from a JSON file, restoring record ids from their keys.
pub fn import_json(path: impl AsRef<Path>) -> StoreResult<Backup> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let mut backup: Backup = serde_json::from_str(&contents)?;
    backup.records = restore_item_ids(backup.records)?;

    info!(path = %path.display(), items = backup.catalog.len(), "imported backup");
    Ok(backup)
}

/// Loads a catalog file; a missing file is an empty catalog.
pub fn read_catalog(path: impl AsRef<Path>) -> StoreResult<Catalog> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Catalog::new());
    }
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

pub fn write_catalog(catalog: &Catalog, path: impl AsRef<Path>) -> StoreResult<()> {
    fs::write(path, serde_json::to_string_pretty(catalog)?)?;
    Ok(())
}
