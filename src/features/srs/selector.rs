use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::data::models::{FlashcardReview, ReviewRecord};
use crate::data::repositories::{ReviewStore, WordCatalog};
use crate::features::srs::errors::SrsError;

/// Which words a review session should present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueQuery {
    pub topic_id: Option<i32>,
    /// false lists words regardless of their schedule (pre-study / browse)
    pub only_due: bool,
    pub limit: Option<u32>,
}

impl DueQuery {
    pub fn due(topic_id: Option<i32>, limit: Option<u32>) -> Self {
        Self {
            topic_id,
            only_due: true,
            limit,
        }
    }

    pub fn browse(topic_id: Option<i32>, limit: Option<u32>) -> Self {
        Self {
            topic_id,
            only_due: false,
            limit,
        }
    }
}

impl Default for DueQuery {
    fn default() -> Self {
        Self::due(None, None)
    }
}

pub fn select_words(
    store: &dyn ReviewStore,
    catalog: &dyn WordCatalog,
    user_id: &str,
    query: DueQuery,
    now: NaiveDateTime,
) -> Result<Vec<FlashcardReview>, SrsError> {
    match (query.only_due, query.topic_id) {
        (false, Some(topic_id)) => browse_topic(store, catalog, user_id, topic_id, query.limit),
        (true, topic_id) => {
            let records = store.due_records(user_id, topic_id, now, query.limit)?;
            attach_words(catalog, records)
        }
        (false, None) => {
            let records = store.records_for_user(user_id, None, query.limit)?;
            attach_words(catalog, records)
        }
    }
}

/// Every word of the topic in catalog order, with the user's record where one exists.
fn browse_topic(
    store: &dyn ReviewStore,
    catalog: &dyn WordCatalog,
    user_id: &str,
    topic_id: i32,
    limit: Option<u32>,
) -> Result<Vec<FlashcardReview>, SrsError> {
    let mut words = catalog
        .words_by_topic(topic_id)
        .map_err(|e| SrsError::WordLookupFailed(e.to_string()))?;
    if let Some(limit) = limit {
        words.truncate(limit as usize);
    }

    let word_ids: Vec<i32> = words.iter().map(|w| w.word_id).collect();
    let mut records: HashMap<i32, ReviewRecord> = store
        .find_many(user_id, &word_ids)?
        .into_iter()
        .map(|r| (r.word_id, r))
        .collect();

    Ok(words
        .into_iter()
        .map(|word| FlashcardReview {
            progress: records.remove(&word.word_id),
            word,
        })
        .collect())
}

fn attach_words(
    catalog: &dyn WordCatalog,
    records: Vec<ReviewRecord>,
) -> Result<Vec<FlashcardReview>, SrsError> {
    records
        .into_iter()
        .map(|record| {
            let word = catalog
                .word_by_id(record.word_id)
                .map_err(|e| SrsError::WordLookupFailed(e.to_string()))?
                .ok_or_else(|| {
                    SrsError::WordLookupFailed(format!("word {} not found", record.word_id))
                })?;
            Ok(FlashcardReview {
                word,
                progress: Some(record),
            })
        })
        .collect()
}
