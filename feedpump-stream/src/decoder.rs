use std::borrow::Cow;

use crate::TextEncoding;

/// Incremental bytes-to-text decoder. A multi-byte sequence split across two reads is
/// carried over and completed by the next one. Invalid bytes become U+FFFD.
#[derive(Debug)]
pub struct TextDecoder {
    encoding: TextEncoding,
    carry: Vec<u8>,
}

impl TextDecoder {
    pub fn new(encoding: TextEncoding) -> Self {
        Self {
            encoding,
            carry: Vec::new(),
        }
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Decode `bytes` and append the text to `out`.
    pub fn decode(&mut self, bytes: &[u8], out: &mut String) {
        match self.encoding {
            TextEncoding::Latin1 => out.extend(bytes.iter().map(|b| *b as char)),
            TextEncoding::Utf8 => {
                if self.carry.is_empty() {
                    self.carry = decode_utf8(bytes, out).to_vec();
                } else {
                    let mut joined = std::mem::take(&mut self.carry);
                    joined.extend_from_slice(bytes);
                    self.carry = decode_utf8(&joined, out).to_vec();
                }
            }
        }
    }

    /// End of input: an incomplete trailing sequence is flushed as U+FFFD.
    pub fn finish(&mut self, out: &mut String) {
        if !self.carry.is_empty() {
            self.carry.clear();
            out.push(char::REPLACEMENT_CHARACTER);
        }
    }
}

/// Decode as much as possible; returns the bytes of a trailing sequence that is not complete yet.
fn decode_utf8<'a>(bytes: &'a [u8], out: &mut String) -> &'a [u8] {
    let split = incomplete_tail(bytes);
    let (head, tail) = bytes.split_at(split);
    match String::from_utf8_lossy(head) {
        Cow::Borrowed(s) => out.push_str(s),
        Cow::Owned(s) => out.push_str(&s),
    }
    tail
}

/// Index where an unfinished multi-byte sequence starts, or `bytes.len()` if there is none.
fn incomplete_tail(bytes: &[u8]) -> usize {
    let len = bytes.len();
    // a sequence is at most 4 bytes, so only the last 3 can be unfinished
    for back in 1..=len.min(3) {
        let i = len - back;
        let b = bytes[i];
        if b & 0b1100_0000 == 0b1000_0000 {
            // continuation byte, keep looking for the lead
            continue;
        }
        let width = match b {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        return if back < width { i } else { len };
    }
    len
}

#[cfg(test)]
mod test {
    use super::*;

    fn decode_in_pieces(encoding: TextEncoding, bytes: &[u8], size: usize) -> String {
        let mut decoder = TextDecoder::new(encoding);
        let mut out = String::new();
        for chunk in bytes.chunks(size) {
            decoder.decode(chunk, &mut out);
        }
        decoder.finish(&mut out);
        out
    }

    #[test]
    fn test_split_sequences() {
        let text = "aé€😀b あ";
        for size in 1..=text.len() {
            assert_eq!(
                decode_in_pieces(TextEncoding::Utf8, text.as_bytes(), size),
                text,
                "chunk size {size}"
            );
        }
    }

    #[test]
    fn test_invalid_bytes() {
        let bytes = b"a\xffb\xe2\x82";
        assert_eq!(
            decode_in_pieces(TextEncoding::Utf8, bytes, 64),
            "a\u{fffd}b\u{fffd}"
        );
        assert_eq!(
            decode_in_pieces(TextEncoding::Utf8, b"\xe2\x82x", 1),
            "\u{fffd}x"
        );
    }

    #[test]
    fn test_latin1() {
        assert_eq!(
            decode_in_pieces(TextEncoding::Latin1, b"caf\xe9", 2),
            "café"
        );
    }

    #[test]
    fn test_incomplete_tail() {
        assert_eq!(incomplete_tail(b"abc"), 3);
        assert_eq!(incomplete_tail("é".as_bytes()), 2);
        assert_eq!(incomplete_tail(&"€".as_bytes()[..2]), 0);
        assert_eq!(incomplete_tail(&"a😀".as_bytes()[..4]), 1);
        assert_eq!(incomplete_tail(b""), 0);
    }
}
