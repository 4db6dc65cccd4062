use std::sync::Arc;

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::data::models::ReviewStatus;
use crate::data::repositories::{StoreResult, WordCatalog};
use crate::db::DbPool;
use crate::schema::{review_records, topic_words, user_activity_progress};

/// Activity id of the "learn every word of the topic" activity
pub const VOCABULARY_ACTIVITY: &str = "vocabulary";

/// Notified after a rating has been persisted.
///
/// Callers treat every error as non-fatal: it is logged and dropped.
pub trait ActivityObserver: Send + Sync {
    fn word_reviewed(&self, user_id: &str, word_id: i32, now: NaiveDateTime) -> StoreResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicProgress {
    pub topic_id: i32,
    pub total_words: i64,
    pub learned_words: i64,
    pub percent: i64,
    pub completed: bool,
}

/// Recomputes how much of each topic a user has learned and auto-completes
/// the topic's vocabulary activity once every word is Learning or Mastered.
pub struct VocabularyActivityTracker {
    pool: DbPool,
    catalog: Arc<dyn WordCatalog>,
}

impl VocabularyActivityTracker {
    pub fn new(pool: DbPool, catalog: Arc<dyn WordCatalog>) -> Self {
        Self { pool, catalog }
    }

    pub fn topic_progress(&self, user_id: &str, topic_id: i32) -> StoreResult<TopicProgress> {
        let mut conn = self.pool.get()?;
        progress_for_topic(&mut conn, user_id, topic_id)
    }

    pub fn is_completed(&self, user_id: &str, topic_id: i32) -> StoreResult<bool> {
        let mut conn = self.pool.get()?;
        let completed = user_activity_progress::table
            .filter(user_activity_progress::user_id.eq(user_id))
            .filter(user_activity_progress::topic_id.eq(topic_id))
            .filter(user_activity_progress::activity_id.eq(VOCABULARY_ACTIVITY))
            .select(user_activity_progress::is_completed)
            .first::<bool>(&mut conn)
            .optional()?;
        Ok(completed.unwrap_or(false))
    }
}

fn progress_for_topic(
    conn: &mut SqliteConnection,
    user_id: &str,
    topic_id: i32,
) -> StoreResult<TopicProgress> {
    let word_ids: Vec<i32> = topic_words::table
        .filter(topic_words::topic_id.eq(topic_id))
        .select(topic_words::word_id)
        .load(conn)?;

    let total_words = word_ids.len() as i64;
    let learned_words: i64 = if word_ids.is_empty() {
        0
    } else {
        review_records::table
            .filter(review_records::user_id.eq(user_id))
            .filter(review_records::word_id.eq_any(word_ids))
            .filter(review_records::status.eq_any([
                ReviewStatus::Learning.as_str(),
                ReviewStatus::Mastered.as_str(),
            ]))
            .count()
            .get_result(conn)?
    };

    let percent = if total_words > 0 {
        learned_words * 100 / total_words
    } else {
        0
    };

    Ok(TopicProgress {
        topic_id,
        total_words,
        learned_words,
        percent,
        completed: total_words > 0 && learned_words == total_words,
    })
}

fn mark_completed(
    conn: &mut SqliteConnection,
    user_id: &str,
    topic_id: i32,
    now: NaiveDateTime,
) -> StoreResult<()> {
    diesel::insert_into(user_activity_progress::table)
        .values((
            user_activity_progress::user_id.eq(user_id),
            user_activity_progress::topic_id.eq(topic_id),
            user_activity_progress::activity_id.eq(VOCABULARY_ACTIVITY),
            user_activity_progress::is_completed.eq(true),
            user_activity_progress::completed_at.eq(Some(now)),
            user_activity_progress::updated_at.eq(now),
        ))
        .on_conflict((
            user_activity_progress::user_id,
            user_activity_progress::topic_id,
            user_activity_progress::activity_id,
        ))
        .do_update()
        .set((
            user_activity_progress::is_completed.eq(true),
            user_activity_progress::completed_at.eq(Some(now)),
            user_activity_progress::updated_at.eq(now),
        ))
        .execute(conn)?;
    Ok(())
}

impl ActivityObserver for VocabularyActivityTracker {
    fn word_reviewed(&self, user_id: &str, word_id: i32, now: NaiveDateTime) -> StoreResult<()> {
        let topic_ids = self.catalog.topics_for_word(word_id)?;
        if topic_ids.is_empty() {
            return Ok(());
        }

        let mut conn = self.pool.get()?;
        for topic_id in topic_ids {
            let progress = progress_for_topic(&mut conn, user_id, topic_id)?;
            log::debug!(
                "User {} has learned {}% of topic {} ({}/{})",
                user_id,
                progress.percent,
                topic_id,
                progress.learned_words,
                progress.total_words
            );

            if progress.completed {
                mark_completed(&mut conn, user_id, topic_id, now)?;
                log::info!("Vocabulary activity completed for user {} in topic {}", user_id, topic_id);
            }
        }

        Ok(())
    }
}
