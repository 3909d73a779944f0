//! Cancellation scopes for reads started by a screen.
//!
//! A screen opens a [`ViewScope`] when it mounts and drops it when it goes
//! away. Reads run through the scope resolve to `None` once it is closed, so a
//! slow response can never be applied to a screen that no longer exists.
//!
//! ```rust
//! use screw_plus_storefront::scope::ViewScope;
//!
//! # tokio_test_block(async {
//! let scope = ViewScope::new();
//! assert_eq!(scope.run(async { 42 }).await, Some(42));
//!
//! scope.close();
//! assert_eq!(scope.run(async { 42 }).await, None);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Lifetime of one screen's outstanding reads.
///
/// Closing (or dropping) a scope cancels every read started through it and
/// through its children.
#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A nested scope that closes with this one but can also close on its own.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// Cancel all outstanding reads.
    pub fn close(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token for background loops that need to watch the scope themselves.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Await `fut` unless the scope closes first.
    ///
    /// Returns `None` if the scope was closed before or while the future ran;
    /// a result that arrives after close is dropped.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        guarded(&self.token, fut).await
    }

    /// Run `fut` on the runtime, bound to this scope.
    ///
    /// The task is aborted at its next await point once the scope closes,
    /// and its handle then yields `None`.
    pub fn spawn<F>(&self, fut: F) -> JoinHandle<Option<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let token = self.token.clone();
        tokio::spawn(async move { guarded(&token, fut).await })
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn guarded<F: Future>(token: &CancellationToken, fut: F) -> Option<F::Output> {
    if token.is_cancelled() {
        return None;
    }

    tokio::select! {
        biased;
        () = token.cancelled() => None,
        output = fut => (!token.is_cancelled()).then_some(output),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use tokio::sync::oneshot;

    use super::*;

    #[tokio::test]
    async fn test_run_completes_while_open() {
        let scope = ViewScope::new();
        assert_eq!(scope.run(async { "products" }).await, Some("products"));
    }

    #[tokio::test]
    async fn test_run_after_close_is_none() {
        let scope = ViewScope::new();
        scope.close();
        assert!(scope.is_closed());
        assert_eq!(scope.run(async { 1 }).await, None);
    }

    #[tokio::test]
    async fn test_close_discards_late_result() {
        let scope = ViewScope::new();
        let (tx, rx) = oneshot::channel::<u32>();

        let pending = scope.spawn(async move { rx.await.unwrap() });
        tokio::task::yield_now().await;

        scope.close();
        let _ = tx.send(7);

        assert_eq!(pending.await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_drop_cancels() {
        let scope = ViewScope::new();
        let token = scope.token();
        let task = scope.spawn(tokio::time::sleep(Duration::from_secs(60)));

        drop(scope);

        assert!(token.is_cancelled());
        assert_eq!(task.await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_child_closes_with_parent() {
        let parent = ViewScope::new();
        let child = parent.child();
        let sibling = parent.child();

        child.close();
        assert!(child.is_closed());
        assert!(!parent.is_closed());
        assert!(!sibling.is_closed());

        parent.close();
        assert!(sibling.is_closed());
        assert_eq!(sibling.run(async {}).await, None);
    }
}
