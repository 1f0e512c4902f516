//! Broadcast + latest-snapshot channel for session state.

use std::sync::RwLock;

use futures::StreamExt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::SessionState;

/// Capacity of the live update channel. Lagging readers skip ahead.
const CHANNEL_CAPACITY: usize = 64;

/// Holds the latest session state and fans out every change.
///
/// New readers take the current snapshot, then follow live updates.
pub struct StateChannel {
    latest: RwLock<SessionState>,
    sender: broadcast::Sender<SessionState>,
}

impl StateChannel {
    /// Create a channel seeded with `initial`.
    #[must_use]
    pub fn new(initial: SessionState) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            latest: RwLock::new(initial),
            sender,
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.latest
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Apply `f` to the state and broadcast the result if it changed.
    pub fn update<F>(&self, f: F) -> SessionState
    where
        F: FnOnce(&mut SessionState),
    {
        let (next, changed) = {
            let mut latest = self
                .latest
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let before = latest.clone();
            f(&mut latest);
            (latest.clone(), *latest != before)
        };
        if changed {
            let _ = self.sender.send(next.clone()); // no readers is fine
        }
        next
    }

    /// Replace the state wholesale.
    pub fn publish(&self, state: SessionState) {
        self.update(|s| *s = state);
    }

    /// Receiver for live updates only.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionState> {
        self.sender.subscribe()
    }

    /// Stream yielding the current snapshot first, then live updates.
    #[must_use]
    pub fn snapshot_plus_stream(&self) -> futures::stream::BoxStream<'static, SessionState> {
        // Subscribe before reading so no update falls between the two.
        let rx = self.subscribe();
        let current = self.snapshot();

        let live = BroadcastStream::new(rx).filter_map(|res| async move {
            if let Err(e) = &res {
                tracing::debug!("State reader lagged: {e}");
            }
            res.ok()
        });

        futures::stream::once(async move { current }).chain(live).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FetchStatus, LanguageCodes};

    fn initial() -> SessionState {
        SessionState::initial(LanguageCodes::new(["en", "fr"]))
    }

    #[test]
    fn test_update_broadcasts_changes_only() {
        let channel = StateChannel::new(initial());
        let mut rx = channel.subscribe();

        channel.update(|s| s.status = FetchStatus::Loading); // unchanged
        channel.update(|s| s.status = FetchStatus::Idle);

        let got = rx.try_recv().unwrap();
        assert_eq!(got.status, FetchStatus::Idle);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stream_starts_with_snapshot() {
        let channel = StateChannel::new(initial());
        channel.update(|s| s.status = FetchStatus::Failed);

        let mut stream = channel.snapshot_plus_stream();
        channel.update(|s| s.current_language_code = Some("fr".into()));

        let first = stream.next().await.unwrap();
        assert_eq!(first.status, FetchStatus::Failed);
        assert_eq!(first.current_language_code, Some("en".into()));

        let second = stream.next().await.unwrap();
        assert_eq!(second.current_language_code, Some("fr".into()));
    }

    #[test]
    fn test_stream_outside_runtime() {
        let channel = StateChannel::new(initial());
        let mut stream = channel.snapshot_plus_stream();
        let first = tokio_test::block_on(stream.next()).unwrap();
        assert_eq!(first.status, FetchStatus::Loading);
    }

    #[test]
    fn test_snapshot_without_readers() {
        let channel = StateChannel::new(initial());
        channel.publish(SessionState::initial(LanguageCodes::default()));
        assert_eq!(channel.snapshot().status, FetchStatus::Failed);
    }
}
