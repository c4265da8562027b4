//! Placeholders so that dependents compile without a runtime. Everything fails at run time.
use futures::future::{ready, Ready};
use std::{future::Future, time::Duration};

pub type TaskHandle<T> = Ready<Result<T, JoinError>>;

#[derive(Debug)]
pub struct JoinError;

#[derive(Debug)]
pub struct TimeoutError;

pub fn spawn_task<F, T>(_: F) -> TaskHandle<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    ready(Err(JoinError))
}

pub fn spawn_blocking<F, T>(_: F) -> TaskHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    ready(Err(JoinError))
}

pub async fn timeout<F, T>(_: Duration, _: F) -> Result<T, TimeoutError>
where
    F: Future<Output = T>,
{
    Err(TimeoutError)
}

pub async fn sleep(_: Duration) {
    log::error!("feedpump-runtime: sleep called without a runtime");
}

impl std::fmt::Display for JoinError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Please enable a runtime")
    }
}

impl std::error::Error for JoinError {}

impl std::fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Please enable a runtime")
    }
}

impl std::error::Error for TimeoutError {}
