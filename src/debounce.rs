use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Search input debounce window.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Coalesces bursts of calls into one delivery after `wait` of quiet.
///
/// At most one timer is pending at a time: every [`Debouncer::call`] aborts
/// the previous timer before arming a new one, so only the last value of a
/// burst reaches the receiver.
#[derive(Debug)]
pub struct Debouncer<T> {
    wait: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(wait: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                wait,
                tx,
                pending: None,
            },
            rx,
        )
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub fn call(&mut self, value: T) {
        self.cancel();
        let tx = self.tx.clone();
        let wait = self.wait;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            let _ = tx.send(value);
        }));
    }

    /// Drops the pending timer, if any. Returns whether one was armed.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn burst_delivers_only_last_value() {
        let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(300));
        debouncer.call("z");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call("zt");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call("zte");
        assert!(debouncer.is_pending());

        assert_eq!(rx.recv().await, Some("zte"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn waits_full_window_after_last_call() {
        let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(300));
        let start = tokio::time::Instant::now();
        debouncer.call(1u8);
        tokio::time::sleep(Duration::from_millis(250)).await;
        debouncer.call(2u8);
        assert_eq!(rx.recv().await, Some(2));
        assert!(start.elapsed() >= Duration::from_millis(550));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_delivery() {
        let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(300));
        debouncer.call(());
        assert!(debouncer.cancel());
        assert!(!debouncer.is_pending());
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(rx.try_recv().is_err());
    }
}
