use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::data::models::{NewReviewRecord, ReviewRecord, ReviewRecordRow};
use crate::data::repositories::{StoreError, StoreResult};
use crate::db::DbPool;
use crate::schema::{review_records, topic_words};

/// Persistence of per-(user, word) review state.
///
/// Implementations must run `update_atomically` as a single serialised
/// read-modify-write: two concurrent calls for the same pair may not both
/// observe the same prior state.
pub trait ReviewStore: Send + Sync {
    fn find(&self, user_id: &str, word_id: i32) -> StoreResult<Option<ReviewRecord>>;

    /// Records of `user_id` among `word_ids`, in no particular order.
    fn find_many(&self, user_id: &str, word_ids: &[i32]) -> StoreResult<Vec<ReviewRecord>>;

    /// Loads the current record (if any), hands it to `apply`, and upserts what it returns.
    fn update_atomically(
        &self,
        user_id: &str,
        word_id: i32,
        apply: &mut dyn FnMut(Option<ReviewRecord>) -> ReviewRecord,
    ) -> StoreResult<ReviewRecord>;

    /// Records with `next_review_date <= now`, earliest first.
    fn due_records(
        &self,
        user_id: &str,
        topic_id: Option<i32>,
        now: NaiveDateTime,
        limit: Option<u32>,
    ) -> StoreResult<Vec<ReviewRecord>>;

    /// Every record of the user regardless of due date, earliest first.
    fn records_for_user(
        &self,
        user_id: &str,
        topic_id: Option<i32>,
        limit: Option<u32>,
    ) -> StoreResult<Vec<ReviewRecord>>;
}

pub struct DieselReviewStore {
    pool: DbPool,
}

impl DieselReviewStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn into_record(row: ReviewRecordRow) -> StoreResult<ReviewRecord> {
    ReviewRecord::try_from(row).map_err(StoreError::CorruptRecord)
}

fn load_record(
    conn: &mut SqliteConnection,
    user_id: &str,
    word_id: i32,
) -> StoreResult<Option<ReviewRecord>> {
    review_records::table
        .filter(review_records::user_id.eq(user_id))
        .filter(review_records::word_id.eq(word_id))
        .select(ReviewRecordRow::as_select())
        .first::<ReviewRecordRow>(conn)
        .optional()?
        .map(into_record)
        .transpose()
}

fn topic_word_ids(conn: &mut SqliteConnection, topic_id: i32) -> StoreResult<Vec<i32>> {
    Ok(topic_words::table
        .filter(topic_words::topic_id.eq(topic_id))
        .select(topic_words::word_id)
        .load(conn)?)
}

impl ReviewStore for DieselReviewStore {
    fn find(&self, user_id: &str, word_id: i32) -> StoreResult<Option<ReviewRecord>> {
        let mut conn = self.pool.get()?;
        load_record(&mut conn, user_id, word_id)
    }

    fn find_many(&self, user_id: &str, word_ids: &[i32]) -> StoreResult<Vec<ReviewRecord>> {
        if word_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.pool.get()?;
        review_records::table
            .filter(review_records::user_id.eq(user_id))
            .filter(review_records::word_id.eq_any(word_ids.to_vec()))
            .select(ReviewRecordRow::as_select())
            .load::<ReviewRecordRow>(&mut conn)?
            .into_iter()
            .map(into_record)
            .collect()
    }

    fn update_atomically(
        &self,
        user_id: &str,
        word_id: i32,
        apply: &mut dyn FnMut(Option<ReviewRecord>) -> ReviewRecord,
    ) -> StoreResult<ReviewRecord> {
        let mut conn = self.pool.get()?;

        // BEGIN IMMEDIATE takes the write lock before the read
        conn.immediate_transaction::<_, StoreError, _>(|conn| {
            let existing = load_record(conn, user_id, word_id)?;
            let updated = apply(existing);
            let row = NewReviewRecord::from(&updated);

            diesel::insert_into(review_records::table)
                .values(&row)
                .on_conflict((review_records::user_id, review_records::word_id))
                .do_update()
                .set((
                    review_records::status.eq(row.status),
                    review_records::next_review_date.eq(row.next_review_date),
                    review_records::review_count.eq(row.review_count),
                    review_records::correct_count.eq(row.correct_count),
                    review_records::wrong_count.eq(row.wrong_count),
                    review_records::last_reviewed_at.eq(row.last_reviewed_at),
                ))
                .execute(conn)?;

            Ok(updated)
        })
    }

    fn due_records(
        &self,
        user_id: &str,
        topic_id: Option<i32>,
        now: NaiveDateTime,
        limit: Option<u32>,
    ) -> StoreResult<Vec<ReviewRecord>> {
        let mut conn = self.pool.get()?;

        let mut query = review_records::table
            .filter(review_records::user_id.eq(user_id))
            .filter(review_records::next_review_date.le(now))
            .order_by((
                review_records::next_review_date.asc(),
                review_records::word_id.asc(),
            ))
            .select(ReviewRecordRow::as_select())
            .into_boxed::<Sqlite>();

        if let Some(topic_id) = topic_id {
            let word_ids = topic_word_ids(&mut conn, topic_id)?;
            query = query.filter(review_records::word_id.eq_any(word_ids));
        }

        if let Some(limit) = limit {
            query = query.limit(i64::from(limit));
        }

        query
            .load::<ReviewRecordRow>(&mut conn)?
            .into_iter()
            .map(into_record)
            .collect()
    }

    fn records_for_user(
        &self,
        user_id: &str,
        topic_id: Option<i32>,
        limit: Option<u32>,
    ) -> StoreResult<Vec<ReviewRecord>> {
        let mut conn = self.pool.get()?;

        let mut query = review_records::table
            .filter(review_records::user_id.eq(user_id))
            .order_by((
                review_records::next_review_date.asc(),
                review_records::word_id.asc(),
            ))
            .select(ReviewRecordRow::as_select())
            .into_boxed::<Sqlite>();

        if let Some(topic_id) = topic_id {
            let word_ids = topic_word_ids(&mut conn, topic_id)?;
            query = query.filter(review_records::word_id.eq_any(word_ids));
        }

        if let Some(limit) = limit {
            query = query.limit(i64::from(limit));
        }

        query
            .load::<ReviewRecordRow>(&mut conn)?
            .into_iter()
            .map(into_record)
            .collect()
    }
}
