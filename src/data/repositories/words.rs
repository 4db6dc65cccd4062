use diesel::prelude::*;

use crate::data::models::Word;
use crate::data::repositories::StoreResult;
use crate::db::DbPool;
use crate::schema::{topic_words, words};

/// Read-only access to vocabulary content and topic membership.
pub trait WordCatalog: Send + Sync {
    fn word_by_id(&self, word_id: i32) -> StoreResult<Option<Word>>;
    fn words_by_topic(&self, topic_id: i32) -> StoreResult<Vec<Word>>;
    fn word_count_by_topic(&self, topic_id: i32) -> StoreResult<i64>;
    fn topics_for_word(&self, word_id: i32) -> StoreResult<Vec<i32>>;
}

pub struct DieselWordCatalog {
    pool: DbPool,
}

impl DieselWordCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl WordCatalog for DieselWordCatalog {
    fn word_by_id(&self, word_id: i32) -> StoreResult<Option<Word>> {
        let mut conn = self.pool.get()?;
        Ok(words::table
            .filter(words::word_id.eq(word_id))
            .select(Word::as_select())
            .first::<Word>(&mut conn)
            .optional()?)
    }

    fn words_by_topic(&self, topic_id: i32) -> StoreResult<Vec<Word>> {
        let mut conn = self.pool.get()?;
        Ok(topic_words::table
            .inner_join(words::table)
            .filter(topic_words::topic_id.eq(topic_id))
            .order_by(words::word_id.asc())
            .select(Word::as_select())
            .load::<Word>(&mut conn)?)
    }

    fn word_count_by_topic(&self, topic_id: i32) -> StoreResult<i64> {
        let mut conn = self.pool.get()?;
        Ok(topic_words::table
            .filter(topic_words::topic_id.eq(topic_id))
            .count()
            .get_result(&mut conn)?)
    }

    fn topics_for_word(&self, word_id: i32) -> StoreResult<Vec<i32>> {
        let mut conn = self.pool.get()?;
        Ok(topic_words::table
            .filter(topic_words::word_id.eq(word_id))
            .select(topic_words::topic_id)
            .order_by(topic_words::topic_id.asc())
            .load(&mut conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::in_memory_pool;

    fn seeded() -> DieselWordCatalog {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();

        diesel::insert_into(words::table)
            .values(vec![
                (
                    words::word_id.eq(1),
                    words::character.eq("你好"),
                    words::pinyin.eq("nǐ hǎo"),
                    words::meaning.eq("hello"),
                ),
                (
                    words::word_id.eq(2),
                    words::character.eq("谢谢"),
                    words::pinyin.eq("xiè xie"),
                    words::meaning.eq("thanks"),
                ),
            ])
            .execute(&mut conn)
            .unwrap();
        diesel::insert_into(topic_words::table)
            .values(vec![
                (topic_words::topic_id.eq(5), topic_words::word_id.eq(2)),
                (topic_words::topic_id.eq(5), topic_words::word_id.eq(1)),
                (topic_words::topic_id.eq(6), topic_words::word_id.eq(1)),
            ])
            .execute(&mut conn)
            .unwrap();
        drop(conn);

        DieselWordCatalog::new(pool)
    }

    #[test]
    fn test_word_lookup() {
        let catalog = seeded();
        let word = catalog.word_by_id(1).unwrap().expect("word 1 exists");
        assert_eq!(word.character, "你好");
        assert!(word.audio_url.is_none());
        assert!(catalog.word_by_id(42).unwrap().is_none());
    }

    #[test]
    fn test_topic_membership() {
        let catalog = seeded();
        let ids: Vec<i32> = catalog
            .words_by_topic(5)
            .unwrap()
            .into_iter()
            .map(|w| w.word_id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(catalog.word_count_by_topic(5).unwrap(), 2);
        assert_eq!(catalog.word_count_by_topic(7).unwrap(), 0);
        assert_eq!(catalog.topics_for_word(1).unwrap(), vec![5, 6]);
    }
}
