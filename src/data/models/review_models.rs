use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::schema::review_records;

/// Coarse mastery bucket of a word for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReviewStatus {
    New,
    Learning,
    Mastered,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::New => "New",
            ReviewStatus::Learning => "Learning",
            ReviewStatus::Mastered => "Mastered",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(ReviewStatus::New),
            "Learning" => Ok(ReviewStatus::Learning),
            "Mastered" => Ok(ReviewStatus::Mastered),
            other => Err(format!("unknown review status '{}'", other)),
        }
    }
}

/// Review state of one (user, word) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRecord {
    pub user_id: String,
    pub word_id: i32,
    pub status: ReviewStatus,
    pub next_review_date: NaiveDateTime,
    pub review_count: i32,
    pub correct_count: i32,
    pub wrong_count: i32,
    pub last_reviewed_at: Option<NaiveDateTime>,
}

impl ReviewRecord {
    /// Fresh record for a pair that has never been rated.
    pub fn new(user_id: &str, word_id: i32, now: NaiveDateTime) -> Self {
        Self {
            user_id: user_id.to_string(),
            word_id,
            status: ReviewStatus::New,
            next_review_date: now,
            review_count: 0,
            correct_count: 0,
            wrong_count: 0,
            last_reviewed_at: None,
        }
    }
}

/// Row shape of the `review_records` table
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = review_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReviewRecordRow {
    pub user_id: String,
    pub word_id: i32,
    pub status: String,
    pub next_review_date: NaiveDateTime,
    pub review_count: i32,
    pub correct_count: i32,
    pub wrong_count: i32,
    pub last_reviewed_at: Option<NaiveDateTime>,
}

impl TryFrom<ReviewRecordRow> for ReviewRecord {
    type Error = String;

    fn try_from(row: ReviewRecordRow) -> Result<Self, Self::Error> {
        Ok(Self {
            status: row.status.parse()?,
            user_id: row.user_id,
            word_id: row.word_id,
            next_review_date: row.next_review_date,
            review_count: row.review_count,
            correct_count: row.correct_count,
            wrong_count: row.wrong_count,
            last_reviewed_at: row.last_reviewed_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = review_records)]
pub struct NewReviewRecord<'a> {
    pub user_id: &'a str,
    pub word_id: i32,
    pub status: &'a str,
    pub next_review_date: NaiveDateTime,
    pub review_count: i32,
    pub correct_count: i32,
    pub wrong_count: i32,
    pub last_reviewed_at: Option<NaiveDateTime>,
}

impl<'a> From<&'a ReviewRecord> for NewReviewRecord<'a> {
    fn from(record: &'a ReviewRecord) -> Self {
        Self {
            user_id: &record.user_id,
            word_id: record.word_id,
            status: record.status.as_str(),
            next_review_date: record.next_review_date,
            review_count: record.review_count,
            correct_count: record.correct_count,
            wrong_count: record.wrong_count,
            last_reviewed_at: record.last_reviewed_at,
        }
    }
}
