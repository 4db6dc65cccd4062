pub mod api_models;
pub mod review_models;
pub mod word_models;

pub use api_models::{DueWordsParams, ReviewRequest, ReviewStatsSummary, TopicReviewParams};
pub use review_models::{NewReviewRecord, ReviewRecord, ReviewRecordRow, ReviewStatus};
pub use word_models::{FlashcardReview, Word};
