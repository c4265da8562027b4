/// The minimal capability the parser needs from its input.
///
/// `peek` is where a buffer-oriented implementation refills: it only reports end-of-input
/// once there is nothing more to read.
pub trait Cursor {
    /// The next byte, without consuming it.
    fn peek(&mut self) -> Option<u8>;

    /// Consume the byte returned by the last `peek`.
    fn advance(&mut self);

    /// Number of bytes consumed so far.
    fn position(&self) -> usize;
}

#[derive(Debug, Clone)]
/// Scans a fully assembled buffer in place.
pub struct SliceCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

#[derive(Debug)]
/// Walks a sequence of text chunks, moving to the next chunk whenever the current one runs out.
pub struct ChunkCursor<I, S> {
    chunks: I,
    current: Option<S>,
    pos: usize,
    consumed: usize,
}

impl<'a> SliceCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl<'a> Cursor for SliceCursor<'a> {
    #[inline]
    fn peek(&mut self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[inline]
    fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    fn position(&self) -> usize {
        self.pos
    }
}

impl<I, S> ChunkCursor<I, S>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    pub fn new<T: IntoIterator<IntoIter = I>>(chunks: T) -> Self {
        Self {
            chunks: chunks.into_iter(),
            current: None,
            pos: 0,
            consumed: 0,
        }
    }

    fn read_more(&mut self) -> bool {
        if let Some(chunk) = self.current.take() {
            self.consumed += chunk.as_ref().len();
        }
        self.pos = 0;
        self.current = self.chunks.next();
        self.current.is_some()
    }
}

impl<I, S> Cursor for ChunkCursor<I, S>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    fn peek(&mut self) -> Option<u8> {
        loop {
            if let Some(chunk) = &self.current {
                if let Some(b) = chunk.as_ref().as_bytes().get(self.pos) {
                    return Some(*b);
                }
            }
            // empty chunks are skipped
            if !self.read_more() {
                return None;
            }
        }
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn position(&self) -> usize {
        self.consumed + self.pos
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn drain(cursor: &mut impl Cursor) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(b) = cursor.peek() {
            out.push(b);
            cursor.advance();
        }
        out
    }

    #[test]
    fn test_chunk_cursor() {
        let mut cursor = ChunkCursor::new(vec!["ab", "", "c", "", "", "de"]);
        assert_eq!(drain(&mut cursor), b"abcde");
        assert_eq!(cursor.position(), 5);
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn test_slice_cursor() {
        let mut cursor = SliceCursor::new(b"xyz");
        assert_eq!(cursor.peek(), Some(b'x'));
        assert_eq!(cursor.peek(), Some(b'x'));
        assert_eq!(drain(&mut cursor), b"xyz");
        assert_eq!(cursor.position(), 3);
    }
}
