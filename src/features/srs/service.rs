use std::sync::Arc;

use crate::data::models::{FlashcardReview, ReviewRecord, ReviewStatsSummary};
use crate::data::repositories::{ActivityObserver, ReviewStore, WordCatalog};
use crate::features::srs::clock::Clock;
use crate::features::srs::errors::SrsError;
use crate::features::srs::rating::Rating;
use crate::features::srs::scheduler::apply_rating_to_record;
use crate::features::srs::selector::{select_words, DueQuery};
use crate::features::srs::stats::summarize;

/// Entry point of the scheduling core.
///
/// Every method blocks on the store; async callers should run them on a
/// blocking thread.
pub struct SrsService {
    store: Arc<dyn ReviewStore>,
    catalog: Arc<dyn WordCatalog>,
    clock: Arc<dyn Clock>,
    observer: Option<Arc<dyn ActivityObserver>>,
}

impl SrsService {
    pub fn new(
        store: Arc<dyn ReviewStore>,
        catalog: Arc<dyn WordCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            catalog,
            clock,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ActivityObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn apply_rating(
        &self,
        user_id: &str,
        word_id: i32,
        rating: &Rating,
    ) -> Result<ReviewRecord, SrsError> {
        ensure_user(user_id)?;
        let now = self.clock.now();

        let record = self.store.update_atomically(user_id, word_id, &mut |existing: Option<ReviewRecord>| {
            let record = existing.unwrap_or_else(|| ReviewRecord::new(user_id, word_id, now));
            apply_rating_to_record(record, rating, now)
        })?;

        log::debug!(
            "User {} rated word {} as {:?}: {} until {}",
            user_id,
            word_id,
            rating,
            record.status,
            record.next_review_date
        );

        if let Some(observer) = &self.observer {
            if let Err(e) = observer.word_reviewed(user_id, word_id, now) {
                log::warn!(
                    "Activity update after rating word {} for user {} failed: {}",
                    word_id,
                    user_id,
                    e
                );
            }
        }

        Ok(record)
    }

    pub fn get_due_words(
        &self,
        user_id: &str,
        query: DueQuery,
    ) -> Result<Vec<FlashcardReview>, SrsError> {
        ensure_user(user_id)?;
        select_words(
            self.store.as_ref(),
            self.catalog.as_ref(),
            user_id,
            query,
            self.clock.now(),
        )
    }

    pub fn get_stats(
        &self,
        user_id: &str,
        topic_id: Option<i32>,
    ) -> Result<ReviewStatsSummary, SrsError> {
        ensure_user(user_id)?;
        let records = self.store.records_for_user(user_id, topic_id, None)?;
        let mut stats = summarize(&records, self.clock.now());

        if let Some(topic_id) = topic_id {
            let total = self
                .catalog
                .word_count_by_topic(topic_id)
                .map_err(|e| SrsError::WordLookupFailed(e.to_string()))?;
            stats.total = Some(total);
        }

        Ok(stats)
    }
}

fn ensure_user(user_id: &str) -> Result<(), SrsError> {
    if user_id.trim().is_empty() {
        return Err(SrsError::NotAuthenticated);
    }
    Ok(())
}
