use feedpump_runtime::{spawn_blocking, timeout, CancelToken};
use flume::{Receiver, Sender};

use crate::{ByteLineReader, ByteSource, PumpErr, PumpOptions, PumpResult};

/// Consumes lines on the dispatch worker, one at a time, in arrival order.
pub trait LineProcessor: Send + 'static {
    fn process(&mut self, line: String);
}

impl<F> LineProcessor for F
where
    F: FnMut(String) + Send + 'static,
{
    fn process(&mut self, line: String) {
        self(line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a run ended. Every line read before the end has been processed.
pub enum Completion {
    /// The source reported end of input.
    EndOfStream,
    /// The cancel signal fired.
    Cancelled,
    /// No line arrived within the read deadline; the connection is considered stalled.
    TimedOut,
}

#[derive(Debug)]
/// The end of a run whose dispatch worker survived: every line read has been processed,
/// and the processor is handed back whether or not the read loop failed.
pub struct Drained<P> {
    /// How the read loop ended. An `Err` is a transport failure of the source.
    pub completion: PumpResult<Completion>,
    pub processor: P,
}

impl<P> Drained<P> {
    /// Discard the processor on a transport failure.
    pub fn into_result(self) -> PumpResult<(Completion, P)> {
        Ok((self.completion?, self.processor))
    }
}

#[derive(Debug, Clone, Default)]
/// Reads lines on the calling task and processes them on a dedicated worker, so slow
/// processing never counts against the read deadline.
pub struct StreamPump {
    options: PumpOptions,
}

impl StreamPump {
    pub fn new(options: PumpOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PumpOptions {
        &self.options
    }

    /// Pump `source` into `processor` until end of input, cancellation or a stall.
    ///
    /// However the read loop ends, lines already queued are still processed before this
    /// returns ("complete-then-drain"), and `processor` is handed back in [`Drained`].
    /// Cancellation and an expired deadline are a [`Completion`]; a failing source is an
    /// `Err` in [`Drained::completion`]. Only a dead dispatch worker fails the run itself,
    /// with [`PumpErr::TaskDead`], and the processor is lost with it.
    pub async fn run<S, P>(
        &self,
        source: S,
        processor: P,
        cancel: &CancelToken,
    ) -> PumpResult<Drained<P>>
    where
        S: ByteSource,
        P: LineProcessor,
    {
        let (sender, receiver) = match self.options.queue_capacity() {
            Some(capacity) => flume::bounded(capacity),
            None => flume::unbounded(),
        };
        let worker = spawn_blocking(move || drain(receiver, processor));

        let mut reader = ByteLineReader::with_options(source, &self.options);
        log::debug!("StreamPump: read loop started");
        let completion = self.read_loop(&mut reader, &sender, cancel).await;
        reader.close();
        // dropping the sender marks the queue complete; the worker exits once it is drained
        drop(sender);

        match &completion {
            Ok(completion) => log::debug!("StreamPump: read loop exited ({completion:?})"),
            Err(e) => log::error!("StreamPump: read loop failed: {e}"),
        }
        let processor = worker
            .await
            .map_err(|e| PumpErr::TaskDead(e.to_string()))?;
        log::debug!("StreamPump: worker exited");

        Ok(Drained {
            completion,
            processor,
        })
    }

    async fn read_loop<S: ByteSource>(
        &self,
        reader: &mut ByteLineReader<S>,
        sender: &Sender<String>,
        cancel: &CancelToken,
    ) -> PumpResult<Completion> {
        let deadline = self.options.read_deadline();
        loop {
            if cancel.is_cancelled() {
                return Ok(Completion::Cancelled);
            }
            let next = match deadline {
                Some(deadline) => match timeout(deadline, reader.read_line(cancel)).await {
                    Ok(next) => next,
                    Err(_) => {
                        log::warn!("StreamPump: no line within {deadline:?}");
                        return Ok(Completion::TimedOut);
                    }
                },
                None => reader.read_line(cancel).await,
            };
            match next {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if sender.send_async(line).await.is_err() {
                        return Err(PumpErr::TaskDead("dispatch worker".to_owned()));
                    }
                }
                Ok(None) => return Ok(Completion::EndOfStream),
                Err(PumpErr::Cancelled) => return Ok(Completion::Cancelled),
                Err(e) => return Err(e),
            }
        }
    }
}

fn drain<P: LineProcessor>(receiver: Receiver<String>, mut processor: P) -> P {
    for line in receiver.iter() {
        processor.process(line);
    }
    processor
}
