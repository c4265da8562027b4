use std::time::Duration;

/// Size of the raw byte buffer a reader fills per read.
pub const BUFFER_SIZE: usize = 1024;

/// Added to the read timeout, to absorb scheduling jitter.
pub const READ_TIMEOUT_EPSILON: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct PumpOptions {
    read_timeout: Option<Duration>,
    queue_capacity: Option<usize>,
    encoding: TextEncoding,
    buffer_size: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Encoding of the byte source.
pub enum TextEncoding {
    #[default]
    Utf8,
    Latin1,
}

impl Default for PumpOptions {
    fn default() -> Self {
        Self {
            read_timeout: None,
            queue_capacity: None,
            encoding: TextEncoding::Utf8,
            buffer_size: BUFFER_SIZE,
        }
    }
}

impl PumpOptions {
    /// How long to wait for the next line. `None` waits forever.
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    pub fn set_read_timeout(&mut self, timeout: Option<Duration>) -> &mut Self {
        self.read_timeout = timeout;
        self
    }

    /// The read deadline actually armed: the read timeout plus [`READ_TIMEOUT_EPSILON`].
    pub fn read_deadline(&self) -> Option<Duration> {
        self.read_timeout.map(|t| t + READ_TIMEOUT_EPSILON)
    }

    /// Bound of the line queue. `None` (the default) is unbounded.
    pub fn queue_capacity(&self) -> Option<usize> {
        self.queue_capacity
    }

    /// When the queue is full, the read loop waits for the worker.
    pub fn set_queue_capacity(&mut self, capacity: Option<usize>) -> &mut Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn set_encoding(&mut self, encoding: TextEncoding) -> &mut Self {
        self.encoding = encoding;
        self
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// A size of zero is treated as one.
    pub fn set_buffer_size(&mut self, size: usize) -> &mut Self {
        self.buffer_size = size.max(1);
        self
    }
}
