use feedpump_runtime::CancelToken;
use futures::future::{select, Either};

use crate::{ByteSource, PumpErr, PumpOptions, PumpResult, TextDecoder, BUFFER_SIZE};

/// Frames a byte source into text lines, regardless of how the source chunks its bytes.
///
/// Lines end with `\n`, `\r` or `\r\n`; the terminator is stripped. A `\r` ending one read
/// followed by a `\n` starting the next still counts as a single terminator.
///
/// The source is closed exactly once: by [`ByteLineReader::close`], or when the reader is dropped.
#[derive(Debug)]
pub struct ByteLineReader<S: ByteSource> {
    source: S,
    buffer: Vec<u8>,
    decoder: TextDecoder,
    /// decoded text of the last read, consumed from `pos`
    chars: String,
    pos: usize,
    line: String,
    pending_cr: bool,
    eof: bool,
    closed: bool,
}

impl<S: ByteSource> ByteLineReader<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, &PumpOptions::default())
    }

    pub fn with_options(source: S, options: &PumpOptions) -> Self {
        Self {
            source,
            buffer: vec![0; options.buffer_size()],
            decoder: TextDecoder::new(options.encoding()),
            chars: String::new(),
            pos: 0,
            line: String::new(),
            pending_cr: false,
            eof: false,
            closed: false,
        }
    }

    /// The next line, or `None` at end of input. A final line without terminator is
    /// returned once, before `None`.
    ///
    /// Fails with [`PumpErr::Cancelled`] if `cancel` fires while waiting for bytes.
    /// Nothing read so far is lost in that case.
    pub async fn read_line(&mut self, cancel: &CancelToken) -> PumpResult<Option<String>> {
        if self.closed {
            return Err(PumpErr::ReaderClosed);
        }
        loop {
            if self.pos < self.chars.len() {
                if self.pending_cr {
                    self.pending_cr = false;
                    if self.chars[self.pos..].starts_with('\n') {
                        self.pos += 1;
                        continue;
                    }
                }
                let rest = &self.chars[self.pos..];
                match rest.find(&['\r', '\n'][..]) {
                    Some(i) => {
                        let cr = rest.as_bytes()[i] == b'\r';
                        self.line.push_str(&rest[..i]);
                        self.pos += i + 1;
                        if cr {
                            if self.pos < self.chars.len() {
                                if self.chars.as_bytes()[self.pos] == b'\n' {
                                    self.pos += 1;
                                }
                            } else {
                                self.pending_cr = true;
                            }
                        }
                        return Ok(Some(self.take_line()));
                    }
                    None => {
                        self.line.push_str(rest);
                        self.pos = self.chars.len();
                    }
                }
            }

            if self.eof {
                return Ok(if self.line.is_empty() {
                    None
                } else {
                    Some(self.take_line())
                });
            }

            self.chars.clear();
            self.pos = 0;
            let size = {
                let read = self.source.read_bytes(&mut self.buffer);
                let cancelled = cancel.cancelled();
                futures::pin_mut!(read, cancelled);
                match select(read, cancelled).await {
                    Either::Left((res, _)) => res?,
                    Either::Right(_) => return Err(PumpErr::Cancelled),
                }
            };
            if size == 0 {
                self.eof = true;
                self.decoder.finish(&mut self.chars);
            } else {
                self.decoder.decode(&self.buffer[..size], &mut self.chars);
            }
        }
    }

    /// Keep the line builder's allocation for the next line, unless one very long line
    /// has grown it far beyond what lines usually need.
    fn take_line(&mut self) -> String {
        if self.line.capacity() <= 4 * self.line.len().max(BUFFER_SIZE) {
            let line = self.line.as_str().to_owned();
            self.line.clear();
            line
        } else {
            std::mem::take(&mut self.line)
        }
    }

    /// Release the source. Closing twice is a no-op; reading afterwards fails with [`PumpErr::ReaderClosed`].
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.source.close();
            log::debug!("ByteLineReader: source closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<S: ByteSource> Drop for ByteLineReader<S> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ChannelSource, ChunkSource};
    use futures::executor::block_on;

    fn read_all<S: ByteSource>(reader: &mut ByteLineReader<S>) -> Vec<String> {
        let cancel = CancelToken::never();
        let mut lines = Vec::new();
        while let Some(line) = block_on(reader.read_line(&cancel)).unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn test_cr_lf_across_reads() {
        let mut reader = ByteLineReader::new(ChunkSource::new(vec!["foo\r", "\nbar"]));
        assert_eq!(read_all(&mut reader), ["foo", "bar"]);
        let cancel = CancelToken::never();
        assert_eq!(block_on(reader.read_line(&cancel)).unwrap(), None);
    }

    #[test]
    fn test_terminators() {
        let mut reader = ByteLineReader::new(ChunkSource::new(vec!["a\nb\rc\r\nd\n\ne"]));
        assert_eq!(read_all(&mut reader), ["a", "b", "c", "d", "", "e"]);

        let mut reader = ByteLineReader::new(ChunkSource::new(vec!["a\r", "\r", "\n", "b\n"]));
        assert_eq!(read_all(&mut reader), ["a", "", "b"]);
    }

    #[test]
    fn test_any_chunking() {
        let text = "{\"text\":\"héllo\"}\r\n[1,2]\nnot json\r😀\r\n";
        let expected = ["{\"text\":\"héllo\"}", "[1,2]", "not json", "😀"];
        for size in 1..=text.len() {
            let mut options = PumpOptions::default();
            options.set_buffer_size(size.min(7));
            let source = ChunkSource::chunked(text.as_bytes(), size);
            let mut reader = ByteLineReader::with_options(source, &options);
            assert_eq!(read_all(&mut reader), expected, "chunk size {size}");
        }
    }

    #[test]
    fn test_long_line() {
        let long = "x".repeat(BUFFER_SIZE * 10);
        let text = format!("{long}\nshort\n");
        let mut reader = ByteLineReader::new(ChunkSource::chunked(text.as_bytes(), 100));
        let cancel = CancelToken::never();
        assert_eq!(block_on(reader.read_line(&cancel)).unwrap(), Some(long));
        assert_eq!(
            block_on(reader.read_line(&cancel)).unwrap().as_deref(),
            Some("short")
        );
        assert!(reader.line.capacity() <= 4 * BUFFER_SIZE);
    }

    #[test]
    fn test_close() {
        let mut reader = ByteLineReader::new(ChunkSource::new(vec!["a\n"]));
        reader.close();
        reader.close();
        assert!(reader.is_closed());
        let cancel = CancelToken::never();
        assert!(matches!(
            block_on(reader.read_line(&cancel)),
            Err(PumpErr::ReaderClosed)
        ));
    }

    #[test]
    fn test_cancel_while_waiting() {
        let (sender, source) = ChannelSource::channel();
        let mut reader = ByteLineReader::new(source);
        let mut cancel = feedpump_runtime::CancelSource::new();
        let token = cancel.token();

        sender.send(b"partial".to_vec()).unwrap();
        cancel.cancel();
        assert!(matches!(
            block_on(reader.read_line(&token)),
            Err(PumpErr::Cancelled)
        ));

        sender.send(b" line\n".to_vec()).unwrap();
        let line = block_on(reader.read_line(&CancelToken::never())).unwrap();
        assert_eq!(line.as_deref(), Some("partial line"));
    }
}
