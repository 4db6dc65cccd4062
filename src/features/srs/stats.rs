use chrono::{Duration, NaiveDateTime};

use crate::data::models::{ReviewRecord, ReviewStatsSummary, ReviewStatus};

/// First instant of the next UTC calendar day.
pub fn end_of_day(now: NaiveDateTime) -> NaiveDateTime {
    now.date()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight + Duration::days(1))
        .unwrap_or(now)
}

/// Buckets records by status and counts those due before the day ends.
///
/// `total` is left unset; only a topic scope gives it a meaning.
pub fn summarize(records: &[ReviewRecord], now: NaiveDateTime) -> ReviewStatsSummary {
    let day_end = end_of_day(now);

    records
        .iter()
        .fold(ReviewStatsSummary::default(), |mut stats, record| {
            match record.status {
                ReviewStatus::New => stats.new += 1,
                ReviewStatus::Learning => stats.learning += 1,
                ReviewStatus::Mastered => stats.mastered += 1,
            }
            if record.next_review_date < day_end {
                stats.due_today += 1;
            }
            stats
        })
}
