//! Session-scoped background work: question loads and delayed transitions.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::pipeline::Acquisition;

/// Events delivered back to the UI loop. `epoch` identifies the session
/// that scheduled them.
#[derive(Debug, Clone)]
pub enum GameEvent {
    QuestionResolved {
        epoch: u64,
        level: u8,
        acquisition: Acquisition,
    },
    Reveal {
        epoch: u64,
    },
    GameOver {
        epoch: u64,
    },
}

impl GameEvent {
    pub fn epoch(&self) -> u64 {
        match self {
            Self::QuestionResolved { epoch, .. } | Self::Reveal { epoch } | Self::GameOver { epoch } => {
                *epoch
            }
        }
    }
}

/// Tracks every task spawned for the current session.
///
/// [`SessionTasks::cancel_all`] aborts them and moves to a new epoch, so an
/// event that was already queued by a superseded session is recognisably
/// stale.
pub struct SessionTasks {
    tx: mpsc::UnboundedSender<GameEvent>,
    handles: Vec<JoinHandle<()>>,
    epoch: u64,
}

impl SessionTasks {
    pub fn new(tx: mpsc::UnboundedSender<GameEvent>) -> Self {
        Self {
            tx,
            handles: Vec::new(),
            epoch: 0,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_current(&self, event: &GameEvent) -> bool {
        event.epoch() == self.epoch
    }

    /// Deliver `make(epoch)` after `delay`.
    pub fn schedule(&mut self, delay: Duration, make: fn(u64) -> GameEvent) {
        let epoch = self.epoch;
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            make(epoch)
        });
    }

    /// Run `work` and deliver its event when it finishes.
    pub fn spawn<F>(&mut self, work: F)
    where
        F: Future<Output = GameEvent> + Send + 'static,
    {
        self.handles.retain(|handle| !handle.is_finished());
        let tx = self.tx.clone();
        self.handles.push(tokio::spawn(async move {
            let event = work.await;
            // The receiver is gone only when the game is shutting down.
            let _ = tx.send(event);
        }));
    }

    pub fn cancel_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        self.epoch += 1;
    }
}

impl Drop for SessionTasks {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_event_arrives_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = SessionTasks::new(tx);

        tasks.schedule(Duration::from_secs(3), |epoch| GameEvent::Reveal { epoch });
        assert!(rx.try_recv().is_err());

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, GameEvent::Reveal { epoch: 0 }));
        assert!(tasks.is_current(&event));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_drops_pending_work() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = SessionTasks::new(tx);

        tasks.schedule(Duration::from_secs(2), |epoch| GameEvent::GameOver { epoch });
        tasks.cancel_all();
        assert_eq!(tasks.epoch(), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
        assert!(!tasks.is_current(&GameEvent::GameOver { epoch: 0 }));
    }
}
