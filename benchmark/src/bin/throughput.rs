use anyhow::Result;
use clap::Parser;
use feedpump::{
    runtime::CancelToken, ByteSource, PumpOptions, PumpResult, Status, StreamHandler,
    StreamMessage, StreamParseErr, UserStream,
};
use futures::future::{ready, Ready};
use std::time::Instant;

#[derive(Debug, Parser)]
struct Args {
    #[clap(long, help = "Number of lines to pump", default_value = "1000000")]
    lines: u64,
    #[clap(long, help = "Bytes per read", default_value = "1024")]
    chunk_size: usize,
    #[clap(long, env = "FEEDPUMP_QUEUE_CAPACITY", help = "Bound of the line queue. Unbounded if absent")]
    queue_capacity: Option<usize>,
}

const TEMPLATES: &[&str] = &[
    r#"{"created_at":"Wed Aug 27 13:08:45 +0000 2008","id":114749583439036416,"id_str":"114749583439036416","text":"The this the message payload {i}: Lorem ipsum dolor sit amet, consectetur adipiscing elit あい","user":{"id":6253282,"id_str":"6253282","name":"Feed API","screen_name":"feedapi","followers_count":+1234567},"retweet_count":0,"favorited":false,"entities":{"hashtags":[],"urls":[],"user_mentions":[]}}"#,
    r#"{"event":"favorite","created_at":"Wed Aug 27 13:08:45 +0000 2008","source":{"id":1,"screen_name":"alice"},"target":{"id":2,"screen_name":"bob"},"target_object":{"id":3,"text":"liked {i}","user":{"id":2}}}"#,
    r#"{"event":"follow","source":{"id":1,"screen_name":"alice"},"target":{"id":2,"screen_name":"bob"}}"#,
    r#"{"delete":{"status":{"id":{i},"id_str":"{i}","user_id":3,"user_id_str":"3"},"timestamp_ms":"1294332605461"}}"#,
    r#"{"limit":{"track":{i},"timestamp_ms":"1294332605461"}}"#,
];

/// Replays a block of synthetic lines until `lines` have been produced.
struct SyntheticSource {
    block: Vec<u8>,
    offset: usize,
    rounds: u64,
}

impl SyntheticSource {
    fn new(lines: u64) -> Self {
        let mut block = String::new();
        for i in 0..100 {
            block.push_str(&TEMPLATES[i % TEMPLATES.len()].replace("{i}", &i.to_string()));
            block.push_str("\r\n");
        }
        Self {
            block: block.into_bytes(),
            offset: 0,
            rounds: (lines + 99) / 100,
        }
    }
}

impl ByteSource for SyntheticSource {
    type Future<'a> = Ready<PumpResult<usize>>;

    fn read_bytes<'a>(&'a mut self, buf: &'a mut [u8]) -> Self::Future<'a> {
        if self.offset == self.block.len() {
            self.rounds = self.rounds.saturating_sub(1);
            self.offset = 0;
        }
        if self.rounds == 0 {
            return ready(Ok(0));
        }
        let rest = &self.block[self.offset..];
        let size = rest.len().min(buf.len());
        buf[..size].copy_from_slice(&rest[..size]);
        self.offset += size;
        ready(Ok(size))
    }
}

#[derive(Debug, Default)]
struct Counter {
    statuses: u64,
    messages: u64,
    errors: u64,
}

impl StreamHandler for Counter {
    fn on_status(&mut self, status: Status) {
        std::hint::black_box(status);
        self.statuses += 1;
    }

    fn on_message(&mut self, message: StreamMessage) {
        std::hint::black_box(message);
        self.messages += 1;
    }

    fn on_exception(&mut self, error: StreamParseErr) {
        log::error!("{error}: {:?}", error.kind());
        self.errors += 1;
    }
}

#[cfg_attr(feature = "runtime-tokio", tokio::main)]
#[cfg_attr(feature = "runtime-async-std", async_std::main)]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        lines,
        chunk_size,
        queue_capacity,
    } = Args::parse();

    let mut options = PumpOptions::default();
    options
        .set_buffer_size(chunk_size)
        .set_queue_capacity(queue_capacity);

    let started = Instant::now();
    let (completion, counter) = UserStream::new(options)
        .run(
            SyntheticSource::new(lines),
            Counter::default(),
            &CancelToken::never(),
        )
        .await?
        .into_result()?;
    let elapsed = started.elapsed();

    let total = counter.statuses + counter.messages + counter.errors;
    println!(
        "{completion:?}: {total} lines ({} statuses, {} messages, {} errors) in {elapsed:?}, {:.0} lines/s",
        counter.statuses,
        counter.messages,
        counter.errors,
        total as f64 / elapsed.as_secs_f64()
    );

    Ok(())
}
