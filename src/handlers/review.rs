use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use tower_sessions::Session;

use crate::{
    data::models::{
        DueWordsParams, FlashcardReview, ReviewRecord, ReviewRequest, ReviewStatsSummary,
        TopicReviewParams,
    },
    features::srs::{DueQuery, Rating, SrsError, SrsService},
    utils,
};

pub type SharedSrs = Arc<SrsService>;

async fn current_user(session: &Session) -> Result<String, SrsError> {
    utils::get_current_user_id(session)
        .await
        .ok_or(SrsError::NotAuthenticated)
}

/// Runs a store-bound call off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, SrsError>
where
    F: FnOnce() -> Result<T, SrsError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SrsError::TaskFailed(e.to_string()))?
}

pub async fn submit_review(
    State(srs): State<SharedSrs>,
    session: Session,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<ReviewRecord>, SrsError> {
    let user_id = current_user(&session).await?;
    let rating = Rating::parse(&payload.rating);

    let record =
        run_blocking(move || srs.apply_rating(&user_id, payload.word_id, &rating)).await?;
    Ok(Json(record))
}

pub async fn due_words(
    State(srs): State<SharedSrs>,
    session: Session,
    Query(params): Query<DueWordsParams>,
) -> Result<Json<Vec<FlashcardReview>>, SrsError> {
    let user_id = current_user(&session).await?;
    let query = DueQuery::due(params.topic_id, params.limit);

    let words = run_blocking(move || srs.get_due_words(&user_id, query)).await?;
    Ok(Json(words))
}

pub async fn topic_review_words(
    State(srs): State<SharedSrs>,
    session: Session,
    Path(topic_id): Path<i32>,
    Query(params): Query<TopicReviewParams>,
) -> Result<Json<Vec<FlashcardReview>>, SrsError> {
    let user_id = current_user(&session).await?;
    let query = DueQuery {
        topic_id: Some(topic_id),
        only_due: params.only_due,
        limit: params.limit,
    };

    let words = run_blocking(move || srs.get_due_words(&user_id, query)).await?;
    Ok(Json(words))
}

pub async fn topic_stats(
    State(srs): State<SharedSrs>,
    session: Session,
    Path(topic_id): Path<i32>,
) -> Result<Json<ReviewStatsSummary>, SrsError> {
    let user_id = current_user(&session).await?;
    let stats = run_blocking(move || srs.get_stats(&user_id, Some(topic_id))).await?;
    Ok(Json(stats))
}

pub async fn overall_stats(
    State(srs): State<SharedSrs>,
    session: Session,
) -> Result<Json<ReviewStatsSummary>, SrsError> {
    let user_id = current_user(&session).await?;
    let stats = run_blocking(move || srs.get_stats(&user_id, None)).await?;
    Ok(Json(stats))
}

pub fn review_router(srs: SharedSrs) -> Router {
    Router::new()
        .route("/review", post(submit_review))
        .route("/review/due", get(due_words))
        .route("/topics/{id}/review-words", get(topic_review_words))
        .route("/topics/{id}/stats", get(topic_stats))
        .route("/stats/overall", get(overall_stats))
        .with_state(srs)
}
