use flume::{Receiver, Sender};
use futures::{
    future::{ready, BoxFuture, Ready},
    io::{AsyncRead, AsyncReadExt},
    FutureExt,
};
use std::{collections::VecDeque, future::Future};

use crate::{PumpErr, PumpResult};

/// Where the bytes of a stream come from.
pub trait ByteSource {
    type Future<'a>: Future<Output = PumpResult<usize>>
    where
        Self: 'a;

    /// Read some bytes into `buf`, waiting until at least one is available.
    /// Resolving to `Ok(0)` means end of input.
    fn read_bytes<'a>(&'a mut self, buf: &'a mut [u8]) -> Self::Future<'a>;

    /// Release the underlying resource. Called at most once, by the reader owning this source.
    fn close(&mut self) {}
}

/// Adapts any [`AsyncRead`], e.g. the body of an HTTP response.
pub struct ReadSource<R> {
    inner: Option<R>,
}

#[derive(Debug, Default)]
/// In-memory chunks, each handed out as one read. For replays and tests.
pub struct ChunkSource {
    chunks: VecDeque<Vec<u8>>,
    current: Pending,
}

#[derive(Debug)]
/// Chunks arriving over a channel, the way a live connection delivers them.
/// Input ends once every [`Sender`] has been dropped.
pub struct ChannelSource {
    receiver: Option<Receiver<Vec<u8>>>,
    current: Pending,
}

#[derive(Debug, Default)]
struct Pending {
    bytes: Vec<u8>,
    offset: usize,
}

impl Pending {
    fn is_empty(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    fn replace(&mut self, bytes: Vec<u8>) {
        self.bytes = bytes;
        self.offset = 0;
    }

    fn copy_to(&mut self, buf: &mut [u8]) -> usize {
        let rest = &self.bytes[self.offset..];
        let size = rest.len().min(buf.len());
        buf[..size].copy_from_slice(&rest[..size]);
        self.offset += size;
        size
    }
}

impl<R> ReadSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    pub fn new(inner: R) -> Self {
        Self { inner: Some(inner) }
    }
}

impl<R> std::fmt::Debug for ReadSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadSource")
            .field("closed", &self.inner.is_none())
            .finish()
    }
}

impl<R> ByteSource for ReadSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    type Future<'a> = BoxFuture<'a, PumpResult<usize>> where Self: 'a;

    fn read_bytes<'a>(&'a mut self, buf: &'a mut [u8]) -> Self::Future<'a> {
        async move {
            match self.inner.as_mut() {
                Some(inner) => inner.read(buf).await.map_err(PumpErr::Io),
                None => Err(PumpErr::ReaderClosed),
            }
        }
        .boxed()
    }

    fn close(&mut self) {
        self.inner = None;
    }
}

impl ChunkSource {
    pub fn new<I, B>(chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Vec<u8>>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
            current: Default::default(),
        }
    }

    /// Split `bytes` into chunks of `size` bytes; the last one may be shorter.
    pub fn chunked(bytes: &[u8], size: usize) -> Self {
        Self::new(bytes.chunks(size.max(1)).map(|c| c.to_vec()))
    }
}

impl ByteSource for ChunkSource {
    type Future<'a> = Ready<PumpResult<usize>>;

    fn read_bytes<'a>(&'a mut self, buf: &'a mut [u8]) -> Self::Future<'a> {
        while self.current.is_empty() {
            match self.chunks.pop_front() {
                Some(chunk) => self.current.replace(chunk),
                None => return ready(Ok(0)),
            }
        }
        ready(Ok(self.current.copy_to(buf)))
    }

    fn close(&mut self) {
        self.chunks.clear();
        self.current = Default::default();
    }
}

impl ChannelSource {
    /// Create a source, and the sender feeding it.
    pub fn channel() -> (Sender<Vec<u8>>, Self) {
        let (sender, receiver) = flume::unbounded();
        (sender, Self::new(receiver))
    }

    pub fn new(receiver: Receiver<Vec<u8>>) -> Self {
        Self {
            receiver: Some(receiver),
            current: Default::default(),
        }
    }
}

impl ByteSource for ChannelSource {
    type Future<'a> = BoxFuture<'a, PumpResult<usize>>;

    fn read_bytes<'a>(&'a mut self, buf: &'a mut [u8]) -> Self::Future<'a> {
        async move {
            let receiver = self.receiver.as_ref().ok_or(PumpErr::ReaderClosed)?;
            while self.current.is_empty() {
                match receiver.recv_async().await {
                    Ok(bytes) => self.current.replace(bytes),
                    // all senders are gone
                    Err(_) => return Ok(0),
                }
            }
            Ok(self.current.copy_to(buf))
        }
        .boxed()
    }

    fn close(&mut self) {
        self.receiver = None;
        self.current = Default::default();
    }
}
