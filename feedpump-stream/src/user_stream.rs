use feedpump_runtime::CancelToken;
use feedpump_types::{StreamHandler, StreamState};

use crate::{ByteSource, Drained, PumpOptions, PumpResult, StreamDispatcher, StreamPump};

#[derive(Debug, Clone, Default)]
/// The full pipeline: bytes in, handler callbacks out.
pub struct UserStream {
    pump: StreamPump,
}

impl UserStream {
    pub fn new(options: PumpOptions) -> Self {
        Self {
            pump: StreamPump::new(options),
        }
    }

    /// Run one connection to its end, then hand the handler back.
    ///
    /// The handler sees `Connected` first and `Disconnected` last; in between it is owned
    /// by the dispatch worker. A failing source still ends with `Disconnected`, and the
    /// error is in [`Drained::completion`]. The one exception is a dead dispatch worker
    /// ([`PumpErr::TaskDead`]): the handler went down with it, so nothing is notified.
    /// Reconnecting is up to the caller.
    ///
    /// [`PumpErr::TaskDead`]: crate::PumpErr::TaskDead
    pub async fn run<S, H>(
        &self,
        source: S,
        mut handler: H,
        cancel: &CancelToken,
    ) -> PumpResult<Drained<H>>
    where
        S: ByteSource,
        H: StreamHandler + Send + 'static,
    {
        handler.on_state_changed(StreamState::Connected);
        handler.log("stream connected");

        let Drained {
            completion,
            processor,
        } = self
            .pump
            .run(source, StreamDispatcher::new(handler), cancel)
            .await?;

        let mut handler = processor.into_handler();
        match &completion {
            Ok(completion) => handler.log(&format!("stream finished: {completion:?}")),
            Err(e) => handler.log(&format!("stream failed: {e}")),
        }
        handler.on_state_changed(StreamState::Disconnected);
        Ok(Drained {
            completion,
            processor: handler,
        })
    }
}
