use thiserror::Error;

/// Type alias of the [`Result`] type specific to `feedpump-stream`.
pub type PumpResult<T> = std::result::Result<T, PumpErr>;

#[derive(Error, Debug)]
/// Transport failures. Any of these ends a run; a per-line failure never becomes one.
pub enum PumpErr {
    #[error("IO Error: {0}")]
    Io(#[source] std::io::Error),
    #[error("Reader has already been closed")]
    ReaderClosed,
    #[error("Read cancelled")]
    Cancelled,
    #[error("Task Dead ({0})")]
    TaskDead(String),
}
