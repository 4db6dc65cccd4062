pub mod activity;
pub mod review_records;
pub mod words;

use diesel::r2d2::PoolError;
use diesel::result::Error as DieselError;
use thiserror::Error;

pub use activity::{ActivityObserver, TopicProgress, VocabularyActivityTracker, VOCABULARY_ACTIVITY};
pub use review_records::{DieselReviewStore, ReviewStore};
pub use words::{DieselWordCatalog, WordCatalog};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DieselError),
    #[error("Connection pool error: {0}")]
    Pool(#[from] PoolError),
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
