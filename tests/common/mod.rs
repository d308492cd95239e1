#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use kbc_quiz::{
    AcquisitionPipeline, FallbackSet, ManualClock, MemoryStore, ProviderError, Question,
    QuestionCache, QuestionProvider,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn remote_question(level: u8) -> Question {
    Question::new(
        level,
        format!("Remote question {}", level),
        ["w".into(), "x".into(), "y".into(), "z".into()],
        2,
        Some(format!("Translation {}", level)),
    )
    .unwrap()
}

/// Scripted provider that counts calls and records the history it was given.
pub struct MockProvider {
    pub calls: AtomicUsize,
    pub histories: Mutex<Vec<Vec<String>>>,
    outcome: Mutex<Result<(), ProviderError>>,
    latency: Duration,
}

impl MockProvider {
    pub fn succeeding() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            histories: Mutex::new(Vec::new()),
            outcome: Mutex::new(Ok(())),
            latency: Duration::ZERO,
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        let provider = Self::succeeding();
        *provider.outcome.lock().unwrap() = Err(error);
        provider
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn set_outcome(&self, outcome: Result<(), ProviderError>) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuestionProvider for MockProvider {
    async fn fetch(&self, level: u8, history: &[String]) -> Result<Question, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.histories.lock().unwrap().push(history.to_vec());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let outcome = self.outcome.lock().unwrap().clone();
        outcome.map(|()| remote_question(level))
    }
}

pub fn pipeline_with(provider: Arc<MockProvider>) -> (AcquisitionPipeline, Arc<ManualClock>) {
    init_tracing();
    let clock = Arc::new(ManualClock::default());
    let cache = QuestionCache::new(Box::new(MemoryStore::new()), clock.clone());
    let pipeline = AcquisitionPipeline::new(cache, provider, FallbackSet::builtin())
        .with_lock_grace(Duration::from_millis(500));
    (pipeline, clock)
}
