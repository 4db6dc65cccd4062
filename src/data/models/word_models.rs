use diesel::{Queryable, Selectable};
use serde::Serialize;

use crate::data::models::ReviewRecord;
use crate::schema::words;

/// Word representation from the vocabulary catalog
#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Selectable)]
#[diesel(table_name = words)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Word {
    pub word_id: i32,
    pub character: String,   // Hanzi
    pub pinyin: String,
    pub meaning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_sentence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hsk_level: Option<i32>,
}

/// A flashcard ready for presentation: word content plus the user's review state
#[derive(Debug, Clone, Serialize)]
pub struct FlashcardReview {
    pub word: Word,
    pub progress: Option<ReviewRecord>, // None when the user never rated this word
}
