pub mod catalog;
pub mod clock;
pub mod rating;
pub mod review_session;
pub mod schedule_record;
pub mod sm2;

pub use catalog::Catalog;
pub use clock::{Clock, FixedClock, SystemClock};
pub use rating::Rating;
pub use review_session::{
    RateOutcome, ReviewSession, SessionProgress, SessionState, due_count, due_items,
};
pub use schedule_record::{
    ItemId, RecordMap, ScheduleRecord, records_from_json, records_to_json, restore_item_ids,
};
