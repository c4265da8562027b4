use anyhow::{anyhow, Result};
use clap::Parser;
use feedpump_runtime::CancelSource;
use feedpump_stream::{ChunkSource, Drained, PumpOptions, TextEncoding, UserStream};
use feedpump_types::{Status, StreamHandler, StreamMessage, StreamParseErr, StreamState};
use std::{io::Read, path::PathBuf, time::Duration};

#[derive(Debug, Parser)]
struct Args {
    #[clap(long, help = "Replay this ndjson capture. Reads stdin if absent")]
    file: Option<PathBuf>,
    #[clap(long, help = "Deliver the bytes in chunks of this size", default_value = "1024")]
    chunk_size: usize,
    #[clap(long, value_parser = parse_duration, help = "Read timeout per line. e.g. 90s, 500ms")]
    timeout: Option<Duration>,
    #[clap(long, value_parser = parse_duration, help = "Cancel the replay after this long")]
    cancel_after: Option<Duration>,
    #[clap(long, env = "FEEDPUMP_QUEUE_CAPACITY", help = "Bound of the line queue. Unbounded if absent")]
    queue_capacity: Option<usize>,
    #[clap(long, help = "Decode the input as Latin-1 instead of UTF-8")]
    latin1: bool,
}

fn parse_duration(src: &str) -> Result<Duration> {
    if let Some(s) = src.strip_suffix("ms") {
        Ok(Duration::from_millis(s.parse()?))
    } else if let Some(s) = src.strip_suffix('s') {
        Ok(Duration::from_secs(s.parse()?))
    } else if let Some(s) = src.strip_suffix('m') {
        Ok(Duration::from_secs(s.parse::<u64>()? * 60))
    } else {
        Err(anyhow!("Failed to parse {} as Duration", src))
    }
}

#[derive(Debug, Default)]
struct LogHandler {
    statuses: usize,
    messages: usize,
    errors: usize,
}

impl StreamHandler for LogHandler {
    fn on_status(&mut self, status: Status) {
        self.statuses += 1;
        log::info!("[status] @{}: {}", status.user.screen_name(), status.text);
    }

    fn on_message(&mut self, message: StreamMessage) {
        self.messages += 1;
        match message.event_name() {
            Some(event) => log::info!("[{}] {event}", message.kind()),
            None => log::info!("[{}] {message:?}", message.kind()),
        }
    }

    fn on_exception(&mut self, error: StreamParseErr) {
        self.errors += 1;
        log::warn!("[error] {}: {:?} ({})", error.message(), error.kind(), error.raw());
    }

    fn on_state_changed(&mut self, state: StreamState) {
        log::info!("[state] {state:?}");
    }

    fn log(&mut self, text: &str) {
        log::debug!("{text}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        file,
        chunk_size,
        timeout,
        cancel_after,
        queue_capacity,
        latin1,
    } = Args::parse();

    let bytes = match file {
        Some(path) => std::fs::read(path)?,
        None => {
            let mut bytes = Vec::new();
            std::io::stdin().read_to_end(&mut bytes)?;
            bytes
        }
    };

    let mut options = PumpOptions::default();
    options
        .set_read_timeout(timeout)
        .set_queue_capacity(queue_capacity);
    if latin1 {
        options.set_encoding(TextEncoding::Latin1);
    }

    let cancel = CancelSource::new();
    let token = cancel.token();
    // dropping the source would cancel right away
    let _cancel = match cancel_after {
        Some(after) => {
            cancel.cancel_after(after);
            None
        }
        None => Some(cancel),
    };

    let stream = UserStream::new(options);
    let source = ChunkSource::chunked(&bytes, chunk_size);
    let Drained {
        completion,
        processor: handler,
    } = stream.run(source, LogHandler::default(), &token).await?;

    println!(
        "{completion:?}: {} statuses, {} messages, {} errors",
        handler.statuses, handler.messages, handler.errors
    );
    completion?;

    Ok(())
}
