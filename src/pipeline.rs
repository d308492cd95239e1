//! Question acquisition: cache, quota gate, deduplicated fetch, fallback.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;

use crate::cache::{DEFAULT_QUOTA_COOLDOWN_SECS, QuestionCache};
use crate::data::{FallbackSet, MAX_LEVEL};
use crate::models::Question;
use crate::provider::{ProviderError, QuestionProvider};

/// Default time a level stays locked after its fetch completes.
pub const DEFAULT_LOCK_GRACE: Duration = Duration::from_millis(1000);

/// Where a resolved question came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Remote,
    Fallback,
}

/// A question ready to be shown, plus what the status banner should say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub question: Question,
    pub source: Source,
    pub quota_exhausted: bool,
    /// Non-fatal problem worth telling the player about.
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    Ready(Resolved),
    /// Another fetch for this level is still running.
    InFlight,
    /// Level is past the end of the ladder.
    Complete,
}

/// Levels with a fetch in flight.
///
/// Every lock carries a token so a delayed release from an earlier fetch
/// cannot drop a lock taken after a [`FetchLocks::clear`].
#[derive(Debug, Default)]
pub struct FetchLocks {
    held: Mutex<HashMap<u8, u64>>,
    next_token: AtomicU64,
}

impl FetchLocks {
    pub async fn try_acquire(&self, level: u8) -> Option<u64> {
        let mut held = self.held.lock().await;
        if held.contains_key(&level) {
            return None;
        }
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        held.insert(level, token);
        Some(token)
    }

    pub async fn release(&self, level: u8, token: u64) {
        let mut held = self.held.lock().await;
        if held.get(&level) == Some(&token) {
            held.remove(&level);
        }
    }

    pub async fn is_locked(&self, level: u8) -> bool {
        self.held.lock().await.contains_key(&level)
    }

    pub async fn clear(&self) {
        self.held.lock().await.clear();
    }
}

pub struct AcquisitionPipeline {
    cache: Mutex<QuestionCache>,
    provider: Arc<dyn QuestionProvider>,
    fallback: FallbackSet,
    locks: Arc<FetchLocks>,
    lock_grace: Duration,
}

impl AcquisitionPipeline {
    pub fn new(
        cache: QuestionCache,
        provider: Arc<dyn QuestionProvider>,
        fallback: FallbackSet,
    ) -> Self {
        Self {
            cache: Mutex::new(cache),
            provider,
            fallback,
            locks: Arc::new(FetchLocks::default()),
            lock_grace: DEFAULT_LOCK_GRACE,
        }
    }

    pub fn with_lock_grace(mut self, grace: Duration) -> Self {
        self.lock_grace = grace;
        self
    }

    pub fn lock_grace(&self) -> Duration {
        self.lock_grace
    }

    pub fn locks(&self) -> &FetchLocks {
        &self.locks
    }

    pub fn fallback_for(&self, level: u8) -> Question {
        self.fallback.for_level(level).clone()
    }

    /// Cached question for `level`, if any. Expired entries are evicted.
    pub async fn cached(&self, level: u8) -> Option<Question> {
        self.cache.lock().await.get(level)
    }

    /// Run `f` against the cache, for maintenance commands.
    pub async fn with_cache<T>(&self, f: impl FnOnce(&mut QuestionCache) -> T) -> T {
        f(&mut *self.cache.lock().await)
    }

    /// Resolve a question for `level`.
    ///
    /// Never fails: provider errors degrade to the fallback question.
    pub async fn acquire(&self, level: u8) -> Acquisition {
        if level > MAX_LEVEL {
            return Acquisition::Complete;
        }

        {
            let mut cache = self.cache.lock().await;
            if let Some(question) = cache.get(level) {
                tracing::debug!(level, "serving cached question");
                return Acquisition::Ready(Resolved {
                    question,
                    source: Source::Cache,
                    quota_exhausted: cache.is_quota_exhausted(),
                    notice: None,
                });
            }

            if cache.is_quota_exhausted() {
                tracing::info!(level, "quota exhausted, serving fallback question");
                return Acquisition::Ready(self.fallback_resolved(level, true, None));
            }
        }

        let Some(token) = self.locks.try_acquire(level).await else {
            tracing::debug!(level, "fetch already in flight");
            return Acquisition::InFlight;
        };

        let history = self.cache.lock().await.history_before(level);
        let result = self.provider.fetch(level, &history).await;
        let resolved = self.settle(level, result).await;

        self.release_later(level, token);
        Acquisition::Ready(resolved)
    }

    async fn settle(&self, level: u8, result: Result<Question, ProviderError>) -> Resolved {
        match result {
            Ok(question) => {
                let mut cache = self.cache.lock().await;
                cache.put(level, &question);
                cache.clear_quota_status();
                Resolved {
                    question,
                    source: Source::Remote,
                    quota_exhausted: false,
                    notice: None,
                }
            }
            Err(ProviderError::RateLimited { retry_after_secs }) => {
                let cooldown = retry_after_secs.unwrap_or(DEFAULT_QUOTA_COOLDOWN_SECS);
                self.cache.lock().await.mark_quota_exhausted(cooldown);
                self.fallback_resolved(
                    level,
                    true,
                    Some("Question API quota exhausted, using bundled questions".to_string()),
                )
            }
            Err(err) => {
                tracing::warn!(level, error = %err, "question fetch failed, using fallback");
                self.fallback_resolved(level, false, Some(err.to_string()))
            }
        }
    }

    fn fallback_resolved(&self, level: u8, quota_exhausted: bool, notice: Option<String>) -> Resolved {
        Resolved {
            question: self.fallback_for(level),
            source: Source::Fallback,
            quota_exhausted,
            notice,
        }
    }

    fn release_later(&self, level: u8, token: u64) {
        let locks = Arc::clone(&self.locks);
        let grace = self.lock_grace;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            locks.release(level, token).await;
        });
    }

    /// Forget cached questions and in-flight locks so a new game starts fresh.
    pub async fn reset(&self) {
        self.cache.lock().await.clear_all();
        self.locks.clear().await;
    }
}
