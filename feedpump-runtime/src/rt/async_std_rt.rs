use futures::future::{Future, FutureExt};
use std::time::Duration;

pub use async_std::future::TimeoutError;

/// Resolves to `Result<T, JoinError>`, same as a tokio `JoinHandle`.
pub type TaskHandle<T> =
    futures::future::Map<async_std::task::JoinHandle<T>, fn(T) -> Result<T, JoinError>>;

#[derive(Debug)]
/// Never constructed: async-std propagates panics instead of reporting them.
pub struct JoinError;

pub fn spawn_task<F, T>(future: F) -> TaskHandle<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    async_std::task::spawn(future).map(Result::Ok)
}

pub fn spawn_blocking<F, T>(f: F) -> TaskHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    async_std::task::spawn_blocking(f).map(Result::Ok)
}

/// Fails with [`TimeoutError`] if `f` does not complete within `dur`. `f` is dropped in that case.
pub async fn timeout<F, T>(dur: Duration, f: F) -> Result<T, TimeoutError>
where
    F: Future<Output = T>,
{
    async_std::future::timeout(dur, f).await
}

#[inline]
pub async fn sleep(dur: Duration) {
    async_std::task::sleep(dur).await
}

impl std::fmt::Display for JoinError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JoinError")
    }
}

impl std::error::Error for JoinError {}
