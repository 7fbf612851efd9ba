//! Review session management for spaced repetition practice.
//! Snapshots the due items into a queue and walks it one rating at a time.

use super::clock::Clock;
use super::rating::Rating;
use super::schedule_record::{ItemId, RecordMap, ScheduleRecord};
use super::sm2::calculate_next_review;
use crate::database::RecordStore;
use crate::error::{Result, SessionError};
use chrono::{DateTime, Utc};

/// Items that are due at `now`, in catalog order.
/// Items without a record have never been reviewed and are always due.
pub fn due_items(items: &[ItemId], records: &RecordMap, now: DateTime<Utc>) -> Vec<ItemId> {
    items
        .iter()
        .filter(|id| records.get(*id).is_none_or(|record| record.is_due(now)))
        .cloned()
        .collect()
}

pub fn due_count(items: &[ItemId], records: &RecordMap, now: DateTime<Utc>) -> usize {
    due_items(items, records, now).len()
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    InSession {
        queue: Vec<ItemId>,
        cursor: usize,
    },
    Complete,
}

/// Result of rating the current item.
#[derive(Clone, Debug, PartialEq)]
pub struct RateOutcome {
    pub record: ScheduleRecord,
    /// False when the rated item was the last one and the session completed.
    pub advanced: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionProgress {
    /// Zero-based index of the current item.
    pub position: usize,
    pub total: usize,
    /// Items not yet rated, the current one included.
    pub remaining: usize,
}

/// Drives one learner's review sessions.
///
/// The store holds the durable records; the session itself only keeps the
/// queue snapshot and cursor.
pub struct ReviewSession<S, C> {
    store: S,
    clock: C,
    state: SessionState,
}

impl<S: RecordStore, C: Clock> ReviewSession<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            state: SessionState::Idle,
        }
    }

    /// Snapshots the items due now into a new queue.
    pub fn start_session(&mut self, items: &[ItemId]) -> Result<&[ItemId]> {
        if self.is_in_session() {
            return Err(SessionError::SessionInProgress);
        }

        let records = self.store.load_all_records()?;
        let queue = due_items(items, &records, self.clock.now());
        if queue.is_empty() {
            return Err(SessionError::EmptyDueSet);
        }

        self.state = SessionState::InSession { queue, cursor: 0 };
        Ok(self.queue().unwrap_or_default())
    }

    /// The queue of the running session.
    pub fn queue(&self) -> Option<&[ItemId]> {
        match &self.state {
            SessionState::InSession { queue, .. } => Some(queue),
            _ => None,
        }
    }

    pub fn current_item(&self) -> Result<&ItemId> {
        match &self.state {
            SessionState::InSession { queue, cursor } => Ok(&queue[*cursor]),
            _ => Err(SessionError::NotInSession),
        }
    }

    /// Rates the current item, saves its new record and moves on.
    ///
    /// If loading or saving fails the session is left exactly as it was.
    pub fn rate(&mut self, rating: Rating) -> Result<RateOutcome> {
        let SessionState::InSession { queue, cursor } = &self.state else {
            return Err(SessionError::NotInSession);
        };
        let item_id = &queue[*cursor];

        let prior = self.store.load_record(item_id)?;
        let record = calculate_next_review(item_id, prior.as_ref(), rating, self.clock.now());
        self.store.save_record(&record)?;

        let advanced = match &mut self.state {
            SessionState::InSession { queue, cursor } if *cursor + 1 < queue.len() => {
                *cursor += 1;
                true
            }
            _ => false,
        };
        if !advanced {
            self.state = SessionState::Complete;
        }

        Ok(RateOutcome { record, advanced })
    }

    /// Rates the current item from a raw 1..=4 value.
    pub fn rate_value(&mut self, value: u8) -> Result<RateOutcome> {
        let rating = Rating::try_from(value)?;
        self.rate(rating)
    }

    /// Ends the session without rating the current item.
    pub fn abort(&mut self) -> Result<()> {
        if !self.is_in_session() {
            return Err(SessionError::NotInSession);
        }
        self.state = SessionState::Idle;
        Ok(())
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_in_session(&self) -> bool {
        matches!(self.state, SessionState::InSession { .. })
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    pub fn progress(&self) -> Option<SessionProgress> {
        match &self.state {
            SessionState::InSession { queue, cursor } => Some(SessionProgress {
                position: *cursor,
                total: queue.len(),
                remaining: queue.len() - cursor,
            }),
            _ => None,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
