use serde::{Deserialize, Serialize};

/// Summary counters for a dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewStatsSummary {
    pub total: Option<i64>, // Only populated for a topic scope
    pub new: i64,
    pub learning: i64,
    pub mastered: i64,
    pub due_today: i64,
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub word_id: i32,
    pub rating: String,
}

#[derive(Deserialize)]
pub struct DueWordsParams {
    pub topic_id: Option<i32>,
    pub limit: Option<u32>,
}

#[derive(Deserialize)]
pub struct TopicReviewParams {
    #[serde(default = "default_only_due")]
    pub only_due: bool,
    pub limit: Option<u32>,
}

fn default_only_due() -> bool {
    true
}
