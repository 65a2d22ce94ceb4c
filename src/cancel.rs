//! Cooperative cancellation
//!
//! A [`CancellationSignal`] is owned by the caller and read by the
//! aggregator. It can be flipped to cancelled exactly once; further calls to
//! [`CancellationSignal::cancel`] are no-ops. Clones observe the same flag.

use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Caller-owned abort flag with listener support
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    token: CancellationToken,
}

impl CancellationSignal {
    /// Create a signal in the not-cancelled state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Future that resolves once cancellation is requested
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// Derive a signal that is cancelled with this one, but can also be
    /// cancelled on its own without affecting the parent
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// Register a listener invoked once cancellation is requested
    ///
    /// The listener runs on a spawned task, so this must be called from
    /// within a tokio runtime. Aborting the returned handle unregisters it.
    pub fn on_abort<F>(&self, listener: F) -> JoinHandle<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let token = self.token.clone();
        tokio::spawn(async move {
            token.cancelled().await;
            listener();
        })
    }

    /// Access the underlying token
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl From<CancellationToken> for CancellationSignal {
    fn from(token: CancellationToken) -> Self {
        Self { token }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_test::{assert_pending, assert_ready};

    #[test]
    fn test_signal_starts_uncancelled() {
        let signal = CancellationSignal::new();
        assert!(!signal.is_cancelled());
    }

    #[test]
    fn test_cancel_is_shared_and_idempotent() {
        let signal = CancellationSignal::new();
        let observer = signal.clone();

        signal.cancel();
        signal.cancel();

        assert!(signal.is_cancelled());
        assert!(observer.is_cancelled());
    }

    #[test]
    fn test_child_follows_parent_only() {
        let parent = CancellationSignal::new();
        let child = parent.child();

        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());

        let other_child = parent.child();
        parent.cancel();
        assert!(other_child.is_cancelled());
    }

    #[test]
    fn test_cancelled_future_resolves_after_cancel() {
        let signal = CancellationSignal::new();
        let mut waiting = tokio_test::task::spawn(signal.cancelled());

        assert_pending!(waiting.poll());
        signal.cancel();
        assert!(waiting.is_woken());
        assert_ready!(waiting.poll());
    }

    #[tokio::test]
    async fn test_on_abort_listener_fires() {
        let signal = CancellationSignal::new();
        let (tx, rx) = tokio::sync::oneshot::channel();

        let handle = signal.on_abort(move || {
            let _ = tx.send("aborted");
        });
        signal.cancel();

        let fired = tokio::time::timeout(Duration::from_secs(1), rx)
            .await
            .expect("listener did not fire")
            .unwrap();
        assert_eq!(fired, "aborted");
        handle.await.unwrap();
    }

    #[test]
    fn test_from_token() {
        let token = CancellationToken::new();
        let signal = CancellationSignal::from(token.clone());
        token.cancel();
        assert!(signal.is_cancelled());
    }
}
