use flume::{Receiver, Sender};
use std::time::Duration;

use crate::{sleep, spawn_task, TaskHandle};

/// The owning half of a cancellation signal. Cancelling is one-way and permanent.
///
/// Dropping the source also cancels, so a signal can never be left dangling
/// by a task that has gone away.
#[derive(Debug)]
pub struct CancelSource {
    sender: Option<Sender<()>>,
    receiver: Receiver<()>,
}

/// The observing half. Cheap to clone; every clone observes the same signal.
#[derive(Debug, Clone)]
pub struct CancelToken {
    receiver: Option<Receiver<()>>,
}

impl CancelSource {
    pub fn new() -> Self {
        // nothing is ever sent: the channel disconnecting is the signal
        let (sender, receiver) = flume::bounded(0);
        Self {
            sender: Some(sender),
            receiver,
        }
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            receiver: Some(self.receiver.clone()),
        }
    }

    pub fn cancel(&mut self) {
        if self.sender.take().is_some() {
            log::debug!("CancelSource: cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.sender.is_none()
    }

    /// Cancel once `dur` has elapsed, on a background task.
    pub fn cancel_after(mut self, dur: Duration) -> TaskHandle<()> {
        spawn_task(async move {
            sleep(dur).await;
            self.cancel();
        })
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    /// A token that is never cancelled.
    pub fn never() -> Self {
        Self { receiver: None }
    }

    pub fn is_cancelled(&self) -> bool {
        match &self.receiver {
            Some(receiver) => receiver.is_disconnected(),
            None => false,
        }
    }

    /// Resolves once the source is cancelled (or dropped). Pending forever for [`CancelToken::never`].
    pub async fn cancelled(&self) {
        match &self.receiver {
            Some(receiver) => {
                while receiver.recv_async().await.is_ok() {}
            }
            None => futures::future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use futures::{executor::block_on, future::FutureExt};

    #[test]
    fn test_cancel() {
        let mut source = CancelSource::new();
        let token = source.token();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        assert!(token.cancelled().now_or_never().is_none());

        source.cancel();
        assert!(source.is_cancelled());
        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
        assert!(clone.cancelled().now_or_never().is_some());
        source.cancel();
    }

    #[test]
    fn test_cancel_from_thread() {
        let mut source = CancelSource::new();
        let token = source.token();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            source.cancel();
        });
        block_on(token.cancelled());
        assert!(token.is_cancelled());
        handle.join().unwrap();
    }

    #[test]
    fn test_drop_cancels() {
        let source = CancelSource::new();
        let token = source.token();
        drop(source);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_never() {
        let token = CancelToken::never();
        assert!(!token.is_cancelled());
        assert!(token.cancelled().now_or_never().is_none());
    }
}
