use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Collapses a burst of calls into a single trailing invocation.
///
/// Each `call` cancels the previously armed timer and schedules the wrapped
/// function `wait` in the future with the latest argument, so within any
/// `wait` window only the most recent call ever fires.
pub struct Debouncer<T: Send + 'static> {
    wait: Duration,
    callback: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(wait: Duration, callback: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            wait,
            callback: Arc::new(callback),
            pending: None,
        }
    }

    /// Must run inside a tokio runtime; the armed timer lives on it.
    pub fn call(&mut self, arg: T) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }

        let callback = self.callback.clone();
        let wait = self.wait;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            callback(arg);
        }));
    }

    /// Drops any armed invocation without firing it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<T: Send + 'static> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}
