use chrono::{Duration, NaiveDateTime};

use crate::data::models::{ReviewRecord, ReviewStatus};
use crate::features::srs::interval::compute_next_review;
use crate::features::srs::rating::Rating;

/// Correct answers needed before a Learning word is promoted by "easy".
pub const MASTERY_THRESHOLD: i32 = 3;
pub const FORGOT_RETRY_MINUTES: i64 = 10;
pub const MANUAL_MASTERY_DAYS: i64 = 30;

/// Applies one rating to a record.
///
/// Pure: the caller owns loading and persisting. Status may move in either
/// direction; Mastered is demoted by "hard" and reset by "forgot".
pub fn apply_rating_to_record(
    mut record: ReviewRecord,
    rating: &Rating,
    now: NaiveDateTime,
) -> ReviewRecord {
    let previous_review = record.last_reviewed_at;
    record.review_count += 1;
    record.last_reviewed_at = Some(now);

    match rating {
        Rating::Easy => {
            record.correct_count += 1;
            match record.status {
                ReviewStatus::New => record.status = ReviewStatus::Learning,
                ReviewStatus::Learning if record.correct_count >= MASTERY_THRESHOLD => {
                    record.status = ReviewStatus::Mastered
                }
                _ => {}
            }
        }
        Rating::Mastered => {
            record.status = ReviewStatus::Mastered;
            record.correct_count = record.correct_count.max(MASTERY_THRESHOLD);
            record.next_review_date = now + Duration::days(MANUAL_MASTERY_DAYS);
        }
        Rating::Hard => {
            record.wrong_count += 1;
            if record.status == ReviewStatus::Mastered {
                record.status = ReviewStatus::Learning;
            }
        }
        Rating::Forgot => {
            record.wrong_count += 1;
            record.status = ReviewStatus::Learning;
            record.correct_count = 0;
            record.next_review_date = now + Duration::minutes(FORGOT_RETRY_MINUTES);
        }
        Rating::Other(_) => {
            record.correct_count += 1;
        }
    }

    if let Some(factor) = rating.interval_factor() {
        record.next_review_date =
            compute_next_review(previous_review, factor, record.review_count, now);
    }

    record
}
