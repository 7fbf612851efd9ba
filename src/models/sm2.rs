//! SM-2 style spaced repetition scheduling on a four-grade scale.
//!
//! - Each item has an ease factor (EF) that adjusts based on performance
//! - Fail and Hard (1-2): reset repetitions, review again tomorrow
//! - Good and Easy (3-4): interval grows 1 day → 4 days → interval × EF
//! - EF is adjusted after every rating and never falls below 1.3

use super::rating::Rating;
use super::schedule_record::{
    INITIAL_EASE_FACTOR, ItemId, MAX_INTERVAL, MIN_EASE_FACTOR, ScheduleRecord, clamp_interval,
    due_date,
};
use chrono::{DateTime, Utc};

/// Calculates the record that follows `prior` after a rating given at `now`.
///
/// `prior == None` means the item has never been reviewed. The id is taken
/// from `prior` when present, otherwise from `item_id`.
pub fn calculate_next_review(
    item_id: &str,
    prior: Option<&ScheduleRecord>,
    rating: Rating,
    now: DateTime<Utc>,
) -> ScheduleRecord {
    let (ease_factor, interval, repetitions) = prior
        .map(|p| (p.ease_factor, p.interval, p.repetitions))
        .unwrap_or((INITIAL_EASE_FACTOR, 0, 0));

    let (new_interval, new_repetitions) = if rating.is_success() {
        let new_int = match repetitions {
            0 => 1,
            1 => 4,
            _ => (f64::from(interval) * ease_factor)
                .round()
                .min(f64::from(MAX_INTERVAL)) as u32,
        };
        (new_int, repetitions + 1)
    } else {
        // Hard counts as a full lapse
        (1, 0)
    };

    let new_interval = clamp_interval(now, new_interval);
    // clamped above, so the date always exists
    let due_at = due_date(now, new_interval).unwrap_or(DateTime::<Utc>::MAX_UTC);

    let item_id: ItemId = prior
        .map(|p| p.item_id.clone())
        .unwrap_or_else(|| item_id.to_string());

    ScheduleRecord {
        item_id,
        ease_factor: next_ease_factor(ease_factor, rating),
        interval: new_interval,
        repetitions: new_repetitions,
        last_reviewed_at: now,
        due_at,
    }
}

/// EF' = EF + (0.1 - (4-r) * (0.08 + (4-r) * 0.02)), floored at 1.3
pub fn next_ease_factor(ease_factor: f64, rating: Rating) -> f64 {
    let miss = f64::from(4 - rating.value());
    (ease_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR)
}

/// Intervals in days that Fail, Hard, Good and Easy would produce.
pub fn preview_intervals(prior: Option<&ScheduleRecord>, now: DateTime<Utc>) -> [u32; 4] {
    Rating::ALL.map(|rating| calculate_next_review("", prior, rating, now).interval)
}
