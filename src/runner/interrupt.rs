use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Stop request shared between the Ctrl-C handler and running suites.
///
/// Once triggered it stays triggered. Suites race their scenarios against
/// [`Interrupt::triggered`] and still close their browser session.
#[derive(Clone, Default)]
pub struct Interrupt {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    stop_flag: AtomicBool,
    notify: Notify,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Safe to call from a signal handler thread
    pub fn trigger(&self) {
        self.inner.stop_flag.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.stop_flag.load(Ordering::SeqCst)
    }

    /// Resolves once `trigger` has been called, immediately if it already was
    pub async fn triggered(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // register before checking the flag so a concurrent trigger is not lost
        notified.as_mut().enable();
        if self.is_triggered() {
            return;
        }
        notified.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_triggered_resolves_for_late_and_early_waiters() {
        let interrupt = Interrupt::new();
        let handle = interrupt.clone();
        let waiter = tokio::spawn(async move { handle.triggered().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!interrupt.is_triggered());
        interrupt.trigger();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();

        // already triggered: returns without another notification
        tokio::time::timeout(Duration::from_millis(100), interrupt.triggered())
            .await
            .unwrap();
        assert!(interrupt.is_triggered());
    }
}
