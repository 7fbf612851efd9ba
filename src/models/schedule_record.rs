//! Per-item scheduling state and its serialized form.
//!
//! Records are keyed by item id, so the id itself is not part of the
//! serialized object:
//!
//! ```json
//! { "item-1": { "easeFactor": 2.6, "interval": 1, "repetitions": 1,
//!               "lastReviewedAt": 1700000000000, "dueAt": 1700086400000 } }
//! ```
use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable identifier of a reviewable item.
pub type ItemId = String;

/// All known records, keyed by item id. Absent keys mean "never reviewed".
pub type RecordMap = BTreeMap<ItemId, ScheduleRecord>;

pub const INITIAL_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;
/// Longest interval the scheduler hands out, in days (100 years).
pub const MAX_INTERVAL: u32 = 36_500;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    #[serde(skip)]
    pub item_id: ItemId,
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_reviewed_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub due_at: DateTime<Utc>,
}

impl ScheduleRecord {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at <= now
    }

    /// Checks the invariants every scheduler-produced record satisfies.
    pub fn validate(&self) -> StoreResult<()> {
        let corrupt = |reason: String| StoreError::CorruptRecord {
            item_id: self.item_id.clone(),
            reason,
        };

        if self.ease_factor.is_nan() || self.ease_factor < MIN_EASE_FACTOR {
            return Err(corrupt(format!(
                "ease factor {} is below {MIN_EASE_FACTOR}",
                self.ease_factor
            )));
        }
        if self.repetitions >= 1 && self.interval == 0 {
            return Err(corrupt(format!(
                "interval is 0 after {} repetitions",
                self.repetitions
            )));
        }
        match due_date(self.last_reviewed_at, self.interval) {
            None => Err(corrupt(format!(
                "interval of {} days runs past the last representable date",
                self.interval
            ))),
            Some(due) if due != self.due_at => Err(corrupt(
                "due date does not match last review plus interval".to_string(),
            )),
            Some(_) => Ok(()),
        }
    }
}

/// Due date of a review made at `reviewed_at` with an interval of `interval` days,
/// or `None` when that date cannot be represented.
pub fn due_date(reviewed_at: DateTime<Utc>, interval: u32) -> Option<DateTime<Utc>> {
    Duration::try_days(i64::from(interval)).and_then(|days| reviewed_at.checked_add_signed(days))
}

/// Caps `interval` at `MAX_INTERVAL` and at the days left before the last
/// representable date, so `due_date(reviewed_at, ..)` always succeeds.
pub fn clamp_interval(reviewed_at: DateTime<Utc>, interval: u32) -> u32 {
    let days_left = (DateTime::<Utc>::MAX_UTC - reviewed_at).num_days();
    interval
        .min(MAX_INTERVAL)
        .min(u32::try_from(days_left).unwrap_or(u32::MAX))
}

/// Serializes a record map into its keyed JSON object form.
pub fn records_to_json(records: &RecordMap) -> StoreResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Parses the keyed JSON object form, restoring each record's id from its key.
pub fn records_from_json(json: &str) -> StoreResult<RecordMap> {
    let records: RecordMap = serde_json::from_str(json)?;
    restore_item_ids(records)
}

/// Fills `item_id` from the map keys and validates every record.
pub fn restore_item_ids(mut records: RecordMap) -> StoreResult<RecordMap> {
    for (id, record) in records.iter_mut() {
        record.item_id = id.clone();
        record.validate()?;
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(item_id: &str, interval: u32, repetitions: u32) -> ScheduleRecord {
        let reviewed = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        ScheduleRecord {
            item_id: item_id.to_string(),
            ease_factor: 2.6,
            interval,
            repetitions,
            last_reviewed_at: reviewed,
            due_at: due_date(reviewed, interval).unwrap(),
        }
    }

    #[test]
    fn test_serialized_shape() {
        let mut records = RecordMap::new();
        records.insert("card-1".to_string(), record("card-1", 1, 1));

        let value: serde_json::Value =
            serde_json::from_str(&records_to_json(&records).unwrap()).unwrap();
        let entry = &value["card-1"];

        assert_eq!(entry["easeFactor"], 2.6);
        assert_eq!(entry["interval"], 1);
        assert_eq!(entry["repetitions"], 1);
        assert_eq!(entry["lastReviewedAt"], 1_700_000_000_000i64);
        assert_eq!(entry["dueAt"], 1_700_086_400_000i64);
        assert!(entry.get("itemId").is_none());
    }

    #[test]
    fn test_parse_restores_ids() {
        let json = r#"{
  "q-42": {
    "easeFactor": 2.5,
    "interval": 4,
    "repetitions": 2,
    "lastReviewedAt": 1700000000000,
    "dueAt": 1700345600000
  }
}"#;

        let records = records_from_json(json).unwrap();
        let parsed = &records["q-42"];
        assert_eq!(parsed.item_id, "q-42");
        assert_eq!(parsed.interval, 4);
        assert_eq!(parsed.repetitions, 2);
    }

    #[test]
    fn test_mismatched_due_date_is_corrupt() {
        let json = r#"{
  "q-1": {
    "easeFactor": 2.5,
    "interval": 4,
    "repetitions": 2,
    "lastReviewedAt": 1700000000000,
    "dueAt": 1700000000000
  }
}"#;

        let result = records_from_json(json);
        assert!(matches!(result, Err(StoreError::CorruptRecord { .. })));
    }

    #[test]
    fn test_interval_past_calendar_end_is_corrupt() {
        let json = r#"{"x":{"easeFactor":2.5,"interval":4000000000,"repetitions":3,"lastReviewedAt":0,"dueAt":0}}"#;

        match records_from_json(json) {
            Err(StoreError::CorruptRecord { item_id, reason }) => {
                assert_eq!(item_id, "x");
                assert!(reason.contains("4000000000"));
            }
            other => panic!("expected a corrupt record, got {other:?}"),
        }
    }

    #[test]
    fn test_due_date_overflow() {
        assert_eq!(due_date(DateTime::<Utc>::MAX_UTC, 1), None);
        assert_eq!(due_date(DateTime::<Utc>::MIN_UTC, u32::MAX), None);
        assert!(due_date(DateTime::UNIX_EPOCH, MAX_INTERVAL).is_some());
    }

    #[test]
    fn test_clamp_interval() {
        let epoch = DateTime::UNIX_EPOCH;
        assert_eq!(clamp_interval(epoch, 11), 11);
        assert_eq!(clamp_interval(epoch, u32::MAX), MAX_INTERVAL);

        let near_end = DateTime::<Utc>::MAX_UTC - Duration::days(3);
        let clamped = clamp_interval(near_end, 400);
        assert!(clamped <= 3);
        assert!(due_date(near_end, clamped).is_some());
    }

    #[test]
    fn test_ease_below_floor_is_corrupt() {
        let mut bad = record("x", 1, 1);
        bad.ease_factor = 1.1;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_is_due_boundary() {
        let rec = record("x", 1, 1);
        assert!(rec.is_due(rec.due_at));
        assert!(!rec.is_due(rec.due_at - Duration::milliseconds(1)));
    }
}
