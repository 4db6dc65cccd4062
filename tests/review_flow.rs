use std::sync::Arc;
use std::thread;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use hsk_srs::data::models::{ReviewRecord, ReviewStatus};
use hsk_srs::data::repositories::{
    ActivityObserver, DieselReviewStore, DieselWordCatalog, ReviewStore, StoreError, StoreResult,
    VocabularyActivityTracker,
};
use hsk_srs::db::{self, DbPool};
use hsk_srs::features::srs::{Clock, DueQuery, ManualClock, Rating, SrsError, SrsService};
use hsk_srs::schema::{topic_words, words};

const USER: &str = "learner-1";
const TOPIC: i32 = 3;

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, 10)
        .and_then(|d| d.and_hms_opt(8, 30, 0))
        .unwrap()
}

fn seed_words(pool: &DbPool) {
    let mut conn = pool.get().unwrap();
    let rows: Vec<_> = (1..=5)
        .map(|id| {
            (
                words::word_id.eq(id),
                words::character.eq(format!("字{id}")),
                words::pinyin.eq(format!("zi{id}")),
                words::meaning.eq(format!("character {id}")),
                words::hsk_level.eq(Some(1)),
            )
        })
        .collect();
    diesel::insert_into(words::table).values(rows).execute(&mut conn).unwrap();

    // Topic 3 holds words 1..=3
    let members: Vec<_> = (1..=3)
        .map(|id| (topic_words::topic_id.eq(TOPIC), topic_words::word_id.eq(id)))
        .collect();
    diesel::insert_into(topic_words::table).values(members).execute(&mut conn).unwrap();
}

fn tracker(pool: &DbPool) -> VocabularyActivityTracker {
    VocabularyActivityTracker::new(pool.clone(), Arc::new(DieselWordCatalog::new(pool.clone())))
}

struct Harness {
    pool: DbPool,
    clock: Arc<ManualClock>,
    srs: SrsService,
}

fn harness() -> Harness {
    let pool = db::in_memory_pool().unwrap();
    seed_words(&pool);
    let clock = Arc::new(ManualClock::new(start()));
    let srs = SrsService::new(
        Arc::new(DieselReviewStore::new(pool.clone())),
        Arc::new(DieselWordCatalog::new(pool.clone())),
        clock.clone(),
    )
    .with_observer(Arc::new(tracker(&pool)));
    Harness { pool, clock, srs }
}

fn due_ids(h: &Harness, query: DueQuery) -> Vec<i32> {
    h.srs
        .get_due_words(USER, query)
        .unwrap()
        .into_iter()
        .map(|card| card.word.word_id)
        .collect()
}

#[test]
fn test_first_and_second_review_intervals() {
    let h = harness();

    let first = h.srs.apply_rating(USER, 1, &Rating::Hard).unwrap();
    assert_eq!(first.review_count, 1);
    assert_eq!(first.next_review_date, start() + Duration::days(1));

    h.clock.advance(Duration::days(1));
    let second = h.srs.apply_rating(USER, 1, &Rating::Easy).unwrap();
    assert_eq!(second.review_count, 2);
    assert_eq!(second.next_review_date, h.clock.now() + Duration::days(3));
}

#[test]
fn test_third_review_scales_elapsed_days() {
    let h = harness();
    h.srs.apply_rating(USER, 2, &Rating::Easy).unwrap();
    h.clock.advance(Duration::days(1));
    h.srs.apply_rating(USER, 2, &Rating::Easy).unwrap();
    h.clock.advance(Duration::days(3));

    let third = h.srs.apply_rating(USER, 2, &Rating::Easy).unwrap();
    // 3 days since the previous review, times 1.3
    assert_eq!(third.next_review_date, h.clock.now() + Duration::minutes(3 * 1440 * 13 / 10));
    assert_eq!(third.status, ReviewStatus::Mastered);
}

#[test]
fn test_easy_promotion_persists() {
    let h = harness();
    let statuses: Vec<ReviewStatus> = (0..3)
        .map(|_| {
            h.clock.advance(Duration::days(1));
            h.srs.apply_rating(USER, 1, &Rating::parse("EASY")).unwrap().status
        })
        .collect();
    assert_eq!(
        statuses,
        vec![ReviewStatus::Learning, ReviewStatus::Learning, ReviewStatus::Mastered]
    );

    let store = DieselReviewStore::new(h.pool.clone());
    let stored = store.find(USER, 1).unwrap().expect("record persisted");
    assert_eq!(stored.status, ReviewStatus::Mastered);
    assert_eq!(stored.correct_count, 3);
}

#[test]
fn test_forgot_after_mastery() {
    let h = harness();
    h.srs.apply_rating(USER, 4, &Rating::Mastered).unwrap();
    for _ in 0..2 {
        h.clock.advance(Duration::days(30));
        h.srs.apply_rating(USER, 4, &Rating::Easy).unwrap();
    }

    h.clock.advance(Duration::days(2));
    let record = h.srs.apply_rating(USER, 4, &Rating::Forgot).unwrap();
    assert_eq!(record.status, ReviewStatus::Learning);
    assert_eq!(record.correct_count, 0);
    assert_eq!(record.wrong_count, 1);
    assert_eq!(record.review_count, 4);
    assert_eq!(record.next_review_date, h.clock.now() + Duration::minutes(10));
}

#[test]
fn test_instant_mastery_single_call() {
    let h = harness();
    let record = h.srs.apply_rating(USER, 5, &Rating::parse("instant")).unwrap();
    assert_eq!(record.status, ReviewStatus::Mastered);
    assert!(record.correct_count >= 3);
    assert_eq!(record.next_review_date, start() + Duration::days(30));
}

#[test]
fn test_due_set_boundaries() {
    let h = harness();
    let store = DieselReviewStore::new(h.pool.clone());
    let now = start();
    for (word_id, next) in [
        (1, now - Duration::hours(1)),
        (2, now + Duration::hours(1)),
        (3, now),
    ] {
        store
            .update_atomically(USER, word_id, &mut |_| ReviewRecord {
                next_review_date: next,
                ..ReviewRecord::new(USER, word_id, now)
            })
            .unwrap();
    }

    let ids = due_ids(&h, DueQuery::default());
    assert_eq!(ids, vec![1, 3]);

    // no ratings in between: same set again
    assert_eq!(due_ids(&h, DueQuery::default()), ids);

    assert_eq!(due_ids(&h, DueQuery::due(None, Some(1))), vec![1]);
}

#[test]
fn test_nothing_due_is_empty_not_error() {
    let h = harness();
    assert!(h.srs.get_due_words(USER, DueQuery::default()).unwrap().is_empty());

    h.srs.apply_rating(USER, 1, &Rating::Easy).unwrap();
    assert!(due_ids(&h, DueQuery::default()).is_empty());

    h.clock.advance(Duration::days(1));
    assert_eq!(due_ids(&h, DueQuery::default()), vec![1]);
}

#[test]
fn test_topic_scope_and_browse_mode() {
    let h = harness();
    h.srs.apply_rating(USER, 2, &Rating::Forgot).unwrap();
    h.srs.apply_rating(USER, 5, &Rating::Forgot).unwrap();
    h.clock.advance(Duration::minutes(15));

    assert_eq!(due_ids(&h, DueQuery::due(None, None)), vec![2, 5]);
    assert_eq!(due_ids(&h, DueQuery::due(Some(TOPIC), None)), vec![2]);

    let browse = h
        .srs
        .get_due_words(USER, DueQuery::browse(Some(TOPIC), Some(2)))
        .unwrap();
    assert_eq!(browse.len(), 2);
    assert_eq!(browse[0].word.word_id, 1);
    assert!(browse[0].progress.is_none());
    assert_eq!(browse[1].word.word_id, 2);
    assert_eq!(
        browse[1].progress.as_ref().map(|p| p.status),
        Some(ReviewStatus::Learning)
    );

    // unscoped browse lists every record regardless of schedule
    h.srs.apply_rating(USER, 4, &Rating::Mastered).unwrap();
    assert_eq!(due_ids(&h, DueQuery::browse(None, None)), vec![2, 5, 4]);
}

#[test]
fn test_due_record_for_unknown_word_fails_lookup() {
    let h = harness();
    h.srs.apply_rating(USER, 77, &Rating::Forgot).unwrap();
    h.clock.advance(Duration::hours(1));

    let err = h.srs.get_due_words(USER, DueQuery::default()).unwrap_err();
    assert!(matches!(err, SrsError::WordLookupFailed(_)));
}

#[test]
fn test_rating_word_outside_catalog_is_stored() {
    let h = harness();
    let record = h.srs.apply_rating(USER, 77, &Rating::Easy).unwrap();
    assert_eq!(record.word_id, 77);
    assert_eq!(record.status, ReviewStatus::Learning);

    let stored = DieselReviewStore::new(h.pool.clone()).find(USER, 77).unwrap();
    assert_eq!(stored, Some(record));
}

#[test]
fn test_stats_partition() {
    let h = harness();
    h.srs.apply_rating(USER, 1, &Rating::parse("meh")).unwrap(); // stays New
    h.srs.apply_rating(USER, 2, &Rating::Easy).unwrap();
    h.srs.apply_rating(USER, 3, &Rating::Forgot).unwrap();
    h.srs.apply_rating(USER, 4, &Rating::Mastered).unwrap();
    h.srs.apply_rating(USER, 5, &Rating::Mastered).unwrap();

    let overall = h.srs.get_stats(USER, None).unwrap();
    assert_eq!(overall.total, None);
    assert_eq!((overall.new, overall.learning, overall.mastered), (1, 2, 2));
    assert_eq!(overall.new + overall.learning + overall.mastered, 5);
    // only the "forgot" word comes back today
    assert_eq!(overall.due_today, 1);

    let topic = h.srs.get_stats(USER, Some(TOPIC)).unwrap();
    assert_eq!(topic.total, Some(3));
    assert_eq!((topic.new, topic.learning, topic.mastered), (1, 2, 0));

    let stranger = h.srs.get_stats("someone-else", None).unwrap();
    assert_eq!(stranger.new + stranger.learning + stranger.mastered, 0);
}

#[test]
fn test_empty_user_is_rejected() {
    let h = harness();
    assert!(matches!(
        h.srs.apply_rating("", 1, &Rating::Easy),
        Err(SrsError::NotAuthenticated)
    ));
    assert!(matches!(
        h.srs.get_due_words("  ", DueQuery::default()),
        Err(SrsError::NotAuthenticated)
    ));
    assert!(matches!(h.srs.get_stats("", None), Err(SrsError::NotAuthenticated)));
}

struct FailingObserver;

impl ActivityObserver for FailingObserver {
    fn word_reviewed(&self, _user_id: &str, _word_id: i32, _now: NaiveDateTime) -> StoreResult<()> {
        Err(StoreError::CorruptRecord("tracker offline".into()))
    }
}

#[test]
fn test_observer_failure_does_not_fail_rating() {
    let pool = db::in_memory_pool().unwrap();
    seed_words(&pool);
    let srs = SrsService::new(
        Arc::new(DieselReviewStore::new(pool.clone())),
        Arc::new(DieselWordCatalog::new(pool.clone())),
        Arc::new(ManualClock::new(start())),
    )
    .with_observer(Arc::new(FailingObserver));

    let record = srs.apply_rating(USER, 1, &Rating::Easy).unwrap();
    assert_eq!(record.status, ReviewStatus::Learning);
    assert!(DieselReviewStore::new(pool).find(USER, 1).unwrap().is_some());
}

#[test]
fn test_topic_activity_completes_when_all_words_learned() {
    let h = harness();
    let tracker = tracker(&h.pool);

    h.srs.apply_rating(USER, 1, &Rating::Easy).unwrap();
    h.srs.apply_rating(USER, 2, &Rating::Easy).unwrap();
    assert!(!tracker.is_completed(USER, TOPIC).unwrap());

    h.srs.apply_rating(USER, 3, &Rating::Hard).unwrap(); // New stays New on "hard"
    assert!(!tracker.is_completed(USER, TOPIC).unwrap());

    h.srs.apply_rating(USER, 3, &Rating::Mastered).unwrap();
    assert!(tracker.is_completed(USER, TOPIC).unwrap());
}

#[test]
fn test_concurrent_ratings_of_one_pair_all_land() {
    let dir = tempfile::tempdir().unwrap();
    let url = dir.path().join("srs.db").to_string_lossy().into_owned();
    let pool = db::create_pool(&url, 4, 10_000).unwrap();
    db::run_migrations(&pool).unwrap();
    seed_words(&pool);

    let srs = Arc::new(SrsService::new(
        Arc::new(DieselReviewStore::new(pool.clone())),
        Arc::new(DieselWordCatalog::new(pool.clone())),
        Arc::new(ManualClock::new(start())),
    ));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let srs = Arc::clone(&srs);
            thread::spawn(move || {
                for _ in 0..5 {
                    srs.apply_rating(USER, 1, &Rating::Hard).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let record = DieselReviewStore::new(pool).find(USER, 1).unwrap().unwrap();
    assert_eq!(record.review_count, 20);
    assert_eq!(record.wrong_count, 20);
}
