//! Discarding results that arrive after a view is gone.
//!
//! A view owns a [`ViewScope`] and hands [`ScopeGuard`]s to the requests it
//! starts. Closing (or dropping) the scope makes every pending
//! [`ScopeGuard::run`] resolve to `None`, so a late response is never applied
//! to a torn-down view.

use std::future::Future;

use tokio::sync::watch;

pub struct ViewScope {
    closed: watch::Sender<bool>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        let (closed, _) = watch::channel(false);
        Self { closed }
    }

    pub fn guard(&self) -> ScopeGuard {
        ScopeGuard {
            closed: self.closed.subscribe(),
        }
    }

    /// Unmount. Idempotent.
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.close();
    }
}

#[derive(Clone)]
pub struct ScopeGuard {
    closed: watch::Receiver<bool>,
}

impl ScopeGuard {
    pub fn is_open(&self) -> bool {
        // A dropped scope counts as closed.
        self.closed.has_changed().is_ok() && !*self.closed.borrow()
    }

    /// Drive `fut` unless the scope closes first.
    ///
    /// Returns `None` if the scope was closed before `fut` started, while it
    /// was running, or by the time it finished.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        if !self.is_open() {
            return None;
        }
        let mut closed = self.closed.clone();
        tokio::select! {
            biased;
            _ = wait_closed(&mut closed) => None,
            out = fut => self.is_open().then_some(out),
        }
    }
}

async fn wait_closed(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn open_scope_delivers_result() {
        let scope = ViewScope::new();
        let guard = scope.guard();
        assert_eq!(guard.run(async { 42 }).await, Some(42));
        assert!(!scope.is_closed());
    }

    #[tokio::test]
    async fn closed_scope_skips_work() {
        let scope = ViewScope::new();
        let guard = scope.guard();
        scope.close();
        scope.close();
        assert!(scope.is_closed());
        assert!(!guard.is_open());
        assert_eq!(guard.run(async { 42 }).await, None);
    }

    #[tokio::test]
    async fn late_result_is_discarded_after_unmount() {
        let scope = ViewScope::new();
        let guard = scope.guard();
        let (tx, rx) = oneshot::channel::<u32>();

        let pending = tokio::spawn(async move { guard.run(async move { rx.await.ok() }).await });

        drop(scope);
        let _ = tx.send(7);

        assert_eq!(pending.await.unwrap(), None);
    }

    #[tokio::test]
    async fn dropped_scope_reads_as_closed() {
        let guard = ViewScope::new().guard();
        assert!(!guard.is_open());
    }
}
