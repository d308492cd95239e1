//! Time-expiring question cache and API quota flag.
//!
//! Records live in a [`KeyValueStore`] under `question_cache_<level>` and
//! `api_quota`. Expiry is checked on read and stale records are evicted
//! lazily. Store failures are logged and degrade to "absent".

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::models::Question;
use crate::storage::KeyValueStore;

pub const CACHE_PREFIX: &str = "question_cache_";
pub const QUOTA_KEY: &str = "api_quota";

/// How long a fetched question stays servable.
pub const CACHE_TTL_HOURS: i64 = 24;

/// Quota cooldown used when the API does not say how long to wait.
pub const DEFAULT_QUOTA_COOLDOWN_SECS: u64 = 86_400;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntry {
    question: Question,
    cached_at: i64,
    expires_at: i64,
    level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuotaState {
    exhausted: bool,
    marked_at: i64,
    reset_at: i64,
}

/// Snapshot of one cached level, for `--cache-stats`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedLevel {
    pub level: u8,
    pub cached_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_expired: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total_cached: usize,
    pub levels: Vec<CachedLevel>,
    pub quota_reset_at: Option<DateTime<Utc>>,
}

pub struct QuestionCache {
    store: Box<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl QuestionCache {
    pub fn new(store: Box<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn key(level: u8) -> String {
        format!("{}{}", CACHE_PREFIX, level)
    }

    fn now_millis(&self) -> i64 {
        self.clock.now().timestamp_millis()
    }

    fn read<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read cache record");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "dropping unreadable cache record");
                self.remove(key);
                None
            }
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to encode cache record");
                return;
            }
        };
        if let Err(err) = self.store.set(key, json) {
            tracing::warn!(key, error = %err, "failed to write cache record");
        }
    }

    fn remove(&mut self, key: &str) {
        if let Err(err) = self.store.delete(key) {
            tracing::warn!(key, error = %err, "failed to delete cache record");
        }
    }

    /// Cached question for `level`, unless it has expired.
    pub fn get(&mut self, level: u8) -> Option<Question> {
        let key = Self::key(level);
        let entry: CacheEntry = self.read(&key)?;

        if self.now_millis() > entry.expires_at {
            tracing::debug!(level, "evicting expired cached question");
            self.remove(&key);
            return None;
        }

        Some(entry.question)
    }

    pub fn put(&mut self, level: u8, question: &Question) {
        let now = self.now_millis();
        let entry = CacheEntry {
            question: question.clone(),
            cached_at: now,
            expires_at: now + Duration::hours(CACHE_TTL_HOURS).num_milliseconds(),
            level,
        };
        self.write(&Self::key(level), &entry);
        tracing::info!(level, "cached question");
    }

    /// Remove every cached question. The quota flag is left alone.
    pub fn clear_all(&mut self) {
        let keys = match self.store.keys_with_prefix(CACHE_PREFIX) {
            Ok(keys) => keys,
            Err(err) => {
                tracing::warn!(error = %err, "failed to list cached questions");
                return;
            }
        };
        for key in &keys {
            self.remove(key);
        }
        tracing::info!(removed = keys.len(), "cleared question cache");
    }

    pub fn is_quota_exhausted(&mut self) -> bool {
        let Some(state) = self.read::<QuotaState>(QUOTA_KEY) else {
            return false;
        };

        if self.now_millis() > state.reset_at {
            tracing::info!("quota cooldown elapsed");
            self.remove(QUOTA_KEY);
            return false;
        }

        state.exhausted
    }

    pub fn mark_quota_exhausted(&mut self, retry_after_secs: u64) {
        let now = self.now_millis();
        let cooldown = i64::try_from(retry_after_secs)
            .unwrap_or(i64::MAX / 1000)
            .saturating_mul(1000);
        let state = QuotaState {
            exhausted: true,
            marked_at: now,
            reset_at: now.saturating_add(cooldown),
        };
        self.write(QUOTA_KEY, &state);
        tracing::warn!(retry_after_secs, "question API quota marked as exhausted");
    }

    pub fn clear_quota_status(&mut self) {
        self.remove(QUOTA_KEY);
    }

    /// Cached question texts for levels below `level`, in level order.
    pub fn history_before(&mut self, level: u8) -> Vec<String> {
        (1..level)
            .filter_map(|earlier| self.get(earlier))
            .map(|question| question.text().to_string())
            .collect()
    }

    pub fn stats(&mut self) -> CacheStats {
        let keys = match self.store.keys_with_prefix(CACHE_PREFIX) {
            Ok(keys) => keys,
            Err(err) => {
                tracing::warn!(error = %err, "failed to list cached questions");
                return CacheStats::default();
            }
        };

        let now = self.now_millis();
        let mut levels: Vec<CachedLevel> = keys
            .iter()
            .filter_map(|key| self.read::<CacheEntry>(key))
            .filter_map(|entry| {
                Some(CachedLevel {
                    level: entry.level,
                    cached_at: DateTime::from_timestamp_millis(entry.cached_at)?,
                    expires_at: DateTime::from_timestamp_millis(entry.expires_at)?,
                    is_expired: now > entry.expires_at,
                })
            })
            .collect();
        levels.sort_by_key(|entry| entry.level);

        let quota_reset_at = self
            .read::<QuotaState>(QUOTA_KEY)
            .filter(|state| state.exhausted && now <= state.reset_at)
            .and_then(|state| DateTime::from_timestamp_millis(state.reset_at));

        CacheStats {
            total_cached: levels.len(),
            levels,
            quota_reset_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;

    fn question(level: u8, text: &str) -> Question {
        Question::new(
            level,
            text,
            ["a".into(), "b".into(), "c".into(), "d".into()],
            1,
            None,
        )
        .unwrap()
    }

    fn cache() -> (QuestionCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let cache = QuestionCache::new(Box::new(MemoryStore::new()), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_round_trip_before_expiry() {
        let (mut cache, clock) = cache();
        let q = question(3, "Which ocean is largest?");
        cache.put(3, &q);

        clock.advance(Duration::hours(23));
        assert_eq!(cache.get(3), Some(q));
        assert_eq!(cache.get(4), None);
    }

    #[test]
    fn test_expired_entry_is_evicted() {
        let (mut cache, clock) = cache();
        cache.put(1, &question(1, "q1"));

        clock.advance(Duration::hours(CACHE_TTL_HOURS));
        assert!(cache.get(1).is_some(), "boundary is inclusive");

        clock.advance(Duration::milliseconds(1));
        assert_eq!(cache.get(1), None);
        assert!(cache.store.get("question_cache_1").unwrap().is_none());
    }

    #[test]
    fn test_put_overwrites() {
        let (mut cache, _) = cache();
        cache.put(2, &question(2, "old"));
        cache.put(2, &question(2, "new"));
        assert_eq!(cache.get(2).unwrap().text(), "new");
    }

    #[test]
    fn test_quota_window() {
        let (mut cache, clock) = cache();
        assert!(!cache.is_quota_exhausted());

        cache.mark_quota_exhausted(60);
        assert!(cache.is_quota_exhausted());

        clock.advance(Duration::seconds(60));
        assert!(cache.is_quota_exhausted());

        clock.advance(Duration::milliseconds(1));
        assert!(!cache.is_quota_exhausted());
        assert!(cache.store.get(QUOTA_KEY).unwrap().is_none());
    }

    #[test]
    fn test_clear_all_keeps_quota_flag() {
        let (mut cache, _) = cache();
        for level in 1..=5 {
            cache.put(level, &question(level, "q"));
        }
        cache.mark_quota_exhausted(DEFAULT_QUOTA_COOLDOWN_SECS);

        cache.clear_all();

        assert!((1..=5).all(|level| cache.get(level).is_none()));
        assert!(cache.is_quota_exhausted());
    }

    #[test]
    fn test_history_skips_gaps() {
        let (mut cache, _) = cache();
        cache.put(1, &question(1, "first"));
        cache.put(3, &question(3, "third"));
        cache.put(5, &question(5, "fifth"));

        assert_eq!(cache.history_before(5), vec!["first", "third"]);
        assert!(cache.history_before(1).is_empty());
    }

    #[test]
    fn test_unreadable_record_is_dropped() {
        let (mut cache, _) = cache();
        cache
            .store
            .set("question_cache_4", "not json".into())
            .unwrap();

        assert_eq!(cache.get(4), None);
        assert!(cache.store.get("question_cache_4").unwrap().is_none());
    }

    #[test]
    fn test_stats() {
        let (mut cache, clock) = cache();
        cache.put(2, &question(2, "q2"));
        clock.advance(Duration::hours(25));
        cache.put(1, &question(1, "q1"));
        cache.mark_quota_exhausted(30);

        let stats = cache.stats();
        assert_eq!(stats.total_cached, 2);
        assert_eq!(stats.levels[0].level, 1);
        assert!(!stats.levels[0].is_expired);
        assert!(stats.levels[1].is_expired);
        assert!(stats.quota_reset_at.is_some());
    }
}
