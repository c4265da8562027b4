use std::{future::Future, time::Duration};

pub use tokio::task::{spawn as spawn_task, spawn_blocking, JoinError, JoinHandle as TaskHandle};
pub use tokio::time::error::Elapsed as TimeoutError;

/// Fails with [`TimeoutError`] if `f` does not complete within `dur`. `f` is dropped in that case.
pub async fn timeout<F, T>(dur: Duration, f: F) -> Result<T, TimeoutError>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(dur, f).await
}

#[inline]
pub async fn sleep(dur: Duration) {
    tokio::time::sleep(dur).await
}
