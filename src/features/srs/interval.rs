//! Next-review computation, a simplified SM-2 variant.
//!
//! The first two reviews of a word use fixed intervals (1 and 3 days). From
//! the third review on, the time elapsed since the previous review is scaled
//! by the rating factor, capped at a year.

use chrono::{Duration, NaiveDateTime};

pub const FIRST_INTERVAL_DAYS: i64 = 1;
pub const SECOND_INTERVAL_DAYS: i64 = 3;
pub const MAX_INTERVAL_DAYS: f64 = 365.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Computes when a word is next due.
///
/// `review_count` is the count after the current rating was applied and
/// `last_reviewed_at` is the record's previous review time, before the current
/// rating stamped it. The result is never earlier than `now`.
pub fn compute_next_review(
    last_reviewed_at: Option<NaiveDateTime>,
    rating_factor: f64,
    review_count: i32,
    now: NaiveDateTime,
) -> NaiveDateTime {
    match review_count {
        i32::MIN..=1 => now + Duration::days(FIRST_INTERVAL_DAYS),
        2 => now + Duration::days(SECOND_INTERVAL_DAYS),
        _ => {
            let days_since_last = last_reviewed_at
                .map(|last| (now - last).num_milliseconds() as f64 / MILLIS_PER_DAY)
                .unwrap_or(1.0)
                .max(0.0);

            let interval = (days_since_last * rating_factor).clamp(0.0, MAX_INTERVAL_DAYS);
            now + Duration::milliseconds((interval * MILLIS_PER_DAY).round() as i64)
        }
    }
}
