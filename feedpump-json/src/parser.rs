use crate::{
    ChunkCursor, Cursor, JsonErrKind, JsonError, JsonNumber, JsonObject, JsonResult, JsonValue,
    SliceCursor,
};

/// Strings shorter than this never touch the heap until the final `String` is built.
pub const STRING_SCRATCH_LEN: usize = 16;
const NUMBER_SCRATCH_LEN: usize = 32;
/// Arrays and objects nested deeper than this are rejected.
pub const MAX_DEPTH: usize = 512;

/// Parse one complete line of JSON, scanning the text in place.
pub fn parse(text: &str) -> JsonResult<JsonValue> {
    JsonParser::new(SliceCursor::new(text.as_bytes())).parse()
}

/// Parse one JSON document that is split over several buffers.
/// The result is identical to [`parse`] on the concatenation of the buffers.
pub fn parse_chunks<T, S>(chunks: T) -> JsonResult<JsonValue>
where
    T: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    JsonParser::new(ChunkCursor::new(chunks)).parse()
}

#[derive(Debug)]
/// Recursive descent parser over any [`Cursor`].
pub struct JsonParser<C> {
    cursor: C,
    depth: usize,
}

/// Fixed size inline buffer, spilling to the heap once full.
struct ScratchBuffer<const N: usize> {
    scratch: [u8; N],
    len: usize,
    spill: Vec<u8>,
}

impl<const N: usize> ScratchBuffer<N> {
    fn new() -> Self {
        Self {
            scratch: [0; N],
            len: 0,
            spill: Vec::new(),
        }
    }

    #[inline]
    fn push(&mut self, b: u8) {
        if self.len == N {
            self.spill.extend_from_slice(&self.scratch);
            self.len = 0;
        }
        self.scratch[self.len] = b;
        self.len += 1;
    }

    fn push_char(&mut self, c: char) {
        let mut tmp = [0; 4];
        for b in c.encode_utf8(&mut tmp).as_bytes() {
            self.push(*b);
        }
    }

    fn bytes(&self) -> impl Iterator<Item = &u8> {
        self.spill.iter().chain(self.scratch[..self.len].iter())
    }

    fn into_bytes(mut self) -> Vec<u8> {
        if self.spill.is_empty() {
            self.scratch[..self.len].to_vec()
        } else {
            self.spill.extend_from_slice(&self.scratch[..self.len]);
            self.spill
        }
    }

    /// Input is `&str` and escapes push whole `char`s, so the bytes are always valid UTF-8.
    fn into_string(self) -> String {
        match String::from_utf8(self.into_bytes()) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }
}

impl<C: Cursor> JsonParser<C> {
    pub fn new(cursor: C) -> Self {
        Self { cursor, depth: 0 }
    }

    /// Parse exactly one value; only whitespace may follow it.
    pub fn parse(mut self) -> JsonResult<JsonValue> {
        self.skip_whitespaces();
        if self.cursor.peek().is_none() {
            return Err(self.error(JsonErrKind::Empty));
        }
        let value = self.read_value()?;
        self.skip_whitespaces();
        match self.cursor.peek() {
            Some(b) => Err(self.error(JsonErrKind::TrailingCharacters(char::from(b)))),
            None => Ok(value),
        }
    }

    fn read_value(&mut self) -> JsonResult<JsonValue> {
        self.skip_whitespaces();
        let b = match self.cursor.peek() {
            Some(b) => b,
            None => return Err(self.error(JsonErrKind::UnexpectedEnd)),
        };
        match b {
            b'[' => self.nested(Self::read_array),
            b'{' => self.nested(Self::read_object),
            b'"' => self.read_string().map(JsonValue::String),
            b'+' | b'-' | b'0'..=b'9' => self.read_number().map(JsonValue::Number),
            b't' => self.read_literal(b"true", JsonValue::Bool(true)),
            b'f' => self.read_literal(b"false", JsonValue::Bool(false)),
            b'n' => self.read_literal(b"null", JsonValue::Null),
            other => Err(self.error(JsonErrKind::InvalidToken(char::from(other)))),
        }
    }

    fn nested(&mut self, read: fn(&mut Self) -> JsonResult<JsonValue>) -> JsonResult<JsonValue> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(JsonErrKind::TooDeep(MAX_DEPTH)));
        }
        self.depth += 1;
        let value = read(self);
        self.depth -= 1;
        value
    }

    fn read_array(&mut self) -> JsonResult<JsonValue> {
        debug_assert_eq!(self.cursor.peek(), Some(b'['));
        self.cursor.advance();

        self.skip_whitespaces();
        match self.cursor.peek() {
            None => return Err(self.error(JsonErrKind::Unclosed("array"))),
            Some(b']') => {
                self.cursor.advance();
                return Ok(JsonValue::Array(Vec::new()));
            }
            Some(_) => (),
        }

        let mut list = Vec::new();
        loop {
            list.push(self.read_value()?);

            self.skip_whitespaces();
            match self.cursor.peek() {
                None => return Err(self.error(JsonErrKind::Unclosed("array"))),
                Some(b']') => {
                    self.cursor.advance();
                    break;
                }
                Some(_) => self.expect(b',')?,
            }
        }
        Ok(JsonValue::Array(list))
    }

    fn read_object(&mut self) -> JsonResult<JsonValue> {
        debug_assert_eq!(self.cursor.peek(), Some(b'{'));
        self.cursor.advance();

        self.skip_whitespaces();
        match self.cursor.peek() {
            None => return Err(self.error(JsonErrKind::Unclosed("object"))),
            Some(b'}') => {
                self.cursor.advance();
                return Ok(JsonValue::Object(JsonObject::new()));
            }
            Some(_) => (),
        }

        let mut object = JsonObject::new();
        loop {
            let key_begin = self.cursor.position();
            match self.cursor.peek() {
                Some(b'"') => (),
                found => return Err(self.expected(b'"', found)),
            }
            let key = self.read_string()?;
            if object.contains_key(&key) {
                return Err(JsonError::new(key_begin, JsonErrKind::DuplicateKey(key)));
            }

            self.skip_whitespaces();
            self.expect(b':')?;
            let value = self.read_value()?;
            object.insert(key, value);

            self.skip_whitespaces();
            match self.cursor.peek() {
                None => return Err(self.error(JsonErrKind::Unclosed("object"))),
                Some(b'}') => {
                    self.cursor.advance();
                    break;
                }
                Some(_) => self.expect(b',')?,
            }
            self.skip_whitespaces();
        }
        Ok(JsonValue::Object(object))
    }

    fn read_string(&mut self) -> JsonResult<String> {
        debug_assert_eq!(self.cursor.peek(), Some(b'"'));
        self.cursor.advance();

        let mut buf = ScratchBuffer::<STRING_SCRATCH_LEN>::new();
        // a high surrogate waiting for its low half
        let mut high = None;
        loop {
            match self.cursor.peek() {
                None => return Err(self.error(JsonErrKind::Unclosed("string"))),
                Some(b'"') => {
                    self.cursor.advance();
                    break;
                }
                Some(b'\\') => {
                    self.cursor.advance();
                    self.read_escape(&mut buf, &mut high);
                }
                Some(b) => {
                    flush_surrogate(&mut buf, &mut high);
                    buf.push(b);
                    self.cursor.advance();
                }
            }
        }
        flush_surrogate(&mut buf, &mut high);
        Ok(buf.into_string())
    }

    /// The backslash has been consumed. Unsupported escapes keep the backslash literally,
    /// and the character after it is read as ordinary text.
    fn read_escape<const N: usize>(&mut self, buf: &mut ScratchBuffer<N>, high: &mut Option<u16>) {
        let unescaped = match self.cursor.peek() {
            Some(b'"') => b'"',
            Some(b'\\') => b'\\',
            Some(b'/') => b'/',
            Some(b'b') => 0x08,
            Some(b'f') => 0x0c,
            Some(b'n') => b'\n',
            Some(b'r') => b'\r',
            Some(b't') => b'\t',
            Some(b'u') => {
                self.cursor.advance();
                self.read_unicode_escape(buf, high);
                return;
            }
            _ => {
                flush_surrogate(buf, high);
                buf.push(b'\\');
                return;
            }
        };
        self.cursor.advance();
        flush_surrogate(buf, high);
        buf.push(unescaped);
    }

    /// `\u` has been consumed. Exactly four hex digits make one UTF-16 code unit.
    fn read_unicode_escape<const N: usize>(
        &mut self,
        buf: &mut ScratchBuffer<N>,
        high: &mut Option<u16>,
    ) {
        let mut digits = [0u8; 4];
        let mut unit: u16 = 0;
        for i in 0..4 {
            match self.cursor.peek() {
                Some(d) if d.is_ascii_hexdigit() => {
                    digits[i] = d;
                    unit = (unit << 4) | hex_value(d);
                    self.cursor.advance();
                }
                _ => {
                    // malformed, keep the text as written
                    flush_surrogate(buf, high);
                    buf.push(b'\\');
                    buf.push(b'u');
                    for d in &digits[..i] {
                        buf.push(*d);
                    }
                    return;
                }
            }
        }
        push_code_unit(buf, high, unit);
    }

    fn read_number(&mut self) -> JsonResult<JsonNumber> {
        let mut text = ScratchBuffer::<NUMBER_SCRATCH_LEN>::new();
        let mut is_float = false;

        // RFC 8259 only allows '-', but feeds do send '+' once in a while
        if let Some(sign @ (b'+' | b'-')) = self.cursor.peek() {
            text.push(sign);
            self.cursor.advance();
        }
        if !self.read_digits(&mut text) {
            return Err(self.error(JsonErrKind::MissingDigits("sign")));
        }

        if self.cursor.peek() == Some(b'.') {
            is_float = true;
            text.push(b'.');
            self.cursor.advance();
            if !self.read_digits(&mut text) {
                return Err(self.error(JsonErrKind::MissingDigits("decimal point")));
            }
        }

        if let Some(e @ (b'e' | b'E')) = self.cursor.peek() {
            is_float = true;
            text.push(e);
            self.cursor.advance();
            if let Some(sign @ (b'+' | b'-')) = self.cursor.peek() {
                text.push(sign);
                self.cursor.advance();
            }
            if !self.read_digits(&mut text) {
                return Err(self.error(JsonErrKind::MissingDigits("exponent sign")));
            }
        }

        if !is_float {
            if let Some(integer) = accumulate_integer(text.bytes()) {
                return Ok(JsonNumber::Integer(integer));
            }
            // too large for i64
        }
        let position = self.cursor.position();
        let text = text.into_string();
        match text.parse::<f64>() {
            Ok(float) => Ok(JsonNumber::Float(float)),
            Err(_) => Err(JsonError::new(position, JsonErrKind::InvalidNumber(text))),
        }
    }

    fn read_digits<const N: usize>(&mut self, text: &mut ScratchBuffer<N>) -> bool {
        let mut any = false;
        while let Some(d @ b'0'..=b'9') = self.cursor.peek() {
            text.push(d);
            self.cursor.advance();
            any = true;
        }
        any
    }

    fn read_literal(&mut self, word: &'static [u8], value: JsonValue) -> JsonResult<JsonValue> {
        for c in word {
            self.expect(*c)?;
        }
        Ok(value)
    }

    #[inline]
    fn expect(&mut self, c: u8) -> JsonResult<()> {
        match self.cursor.peek() {
            Some(b) if b == c => {
                self.cursor.advance();
                Ok(())
            }
            found => Err(self.expected(c, found)),
        }
    }

    #[inline]
    fn skip_whitespaces(&mut self) {
        while let Some(b' ' | b'\t' | b'\r' | b'\n') = self.cursor.peek() {
            self.cursor.advance();
        }
    }

    fn expected(&self, c: u8, found: Option<u8>) -> JsonError {
        self.error(JsonErrKind::Expected {
            expected: char::from(c),
            found: found.map(char::from),
        })
    }

    fn error(&self, kind: JsonErrKind) -> JsonError {
        JsonError::new(self.cursor.position(), kind)
    }
}

/// Faster than `str::parse` for the common case. `None` on overflow.
fn accumulate_integer<'a>(mut bytes: impl Iterator<Item = &'a u8>) -> Option<i64> {
    let mut total: i64 = 0;
    let mut negative = false;
    let mut first = bytes.next().copied();
    if let Some(sign @ (b'+' | b'-')) = first {
        negative = sign == b'-';
        first = bytes.next().copied();
    }
    for d in first.into_iter().chain(bytes.copied()) {
        let digit = i64::from(d - b'0');
        total = total.checked_mul(10)?;
        total = if negative {
            total.checked_sub(digit)?
        } else {
            total.checked_add(digit)?
        };
    }
    Some(total)
}

fn hex_value(d: u8) -> u16 {
    u16::from(match d {
        b'0'..=b'9' => d - b'0',
        b'a'..=b'f' => d - b'a' + 10,
        b'A'..=b'F' => d - b'A' + 10,
        _ => 0,
    })
}

fn push_code_unit<const N: usize>(buf: &mut ScratchBuffer<N>, high: &mut Option<u16>, unit: u16) {
    match unit {
        0xD800..=0xDBFF => {
            flush_surrogate(buf, high);
            *high = Some(unit);
        }
        0xDC00..=0xDFFF => match high.take() {
            Some(h) => {
                let code = 0x10000 + ((u32::from(h) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                buf.push_char(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            None => buf.push_char(char::REPLACEMENT_CHARACTER),
        },
        _ => {
            flush_surrogate(buf, high);
            buf.push_char(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
    }
}

/// An unpaired high surrogate has no UTF-8 form.
#[inline]
fn flush_surrogate<const N: usize>(buf: &mut ScratchBuffer<N>, high: &mut Option<u16>) {
    if high.take().is_some() {
        buf.push_char(char::REPLACEMENT_CHARACTER);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn int(i: i64) -> JsonValue {
        JsonValue::Number(JsonNumber::Integer(i))
    }

    fn float(f: f64) -> JsonValue {
        JsonValue::Number(JsonNumber::Float(f))
    }

    fn kind(text: &str) -> JsonErrKind {
        parse(text).unwrap_err().kind().clone()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse("12345").unwrap(), int(12345));
        assert_eq!(parse("1.5e2").unwrap(), float(150.0));
        assert_eq!(parse("+42").unwrap(), int(42));
        assert_eq!(parse("-7").unwrap(), int(-7));
        assert_eq!(parse("1E-2").unwrap(), float(0.01));
        assert_eq!(parse("-0.5").unwrap(), float(-0.5));
        assert_eq!(parse("9223372036854775807").unwrap(), int(i64::MAX));
        assert_eq!(parse("-9223372036854775808").unwrap(), int(i64::MIN));
        assert_eq!(parse("9223372036854775808").unwrap(), float(9223372036854775808.0));
        assert_eq!(parse("123456789012345678901234567890123456").unwrap(), float(1.2345678901234568e35));
    }

    #[test]
    fn test_number_errors() {
        assert_eq!(kind("+"), JsonErrKind::MissingDigits("sign"));
        assert_eq!(kind("-x"), JsonErrKind::MissingDigits("sign"));
        assert_eq!(kind("1."), JsonErrKind::MissingDigits("decimal point"));
        assert_eq!(kind("1e"), JsonErrKind::MissingDigits("exponent sign"));
        assert_eq!(kind("1e+"), JsonErrKind::MissingDigits("exponent sign"));
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            parse(r#""A\n\t\"""#).unwrap(),
            JsonValue::String("A\n\t\"".to_owned())
        );
        assert_eq!(
            parse(r#""\\\/\b\f\r""#).unwrap(),
            JsonValue::String("\\/\u{8}\u{c}\r".to_owned())
        );
        let long = "a very long string that does not fit into the scratch buffer, ünïcödé included";
        assert_eq!(
            parse(&format!("\"{long}\"")).unwrap(),
            JsonValue::String(long.to_owned())
        );
        assert_eq!(parse(r#""""#).unwrap(), JsonValue::String(String::new()));
    }

    #[test]
    fn test_tolerant_escapes() {
        assert_eq!(parse(r#""\x""#).unwrap(), JsonValue::String("\\x".to_owned()));
        assert_eq!(parse(r#""\u12G4""#).unwrap(), JsonValue::String("\\u12G4".to_owned()));
        assert_eq!(parse(r#""a\u""#).unwrap(), JsonValue::String("a\\u".to_owned()));
        assert_eq!(kind(r#""abc\"#), JsonErrKind::Unclosed("string"));
    }

    #[test]
    fn test_escape_before_multibyte() {
        let text = r#"{"a":"\é\u00éあ\ud83d😀","ünï":"x"}"#;
        let expected = parse(text).unwrap();
        assert_eq!(expected["a"].as_str(), Some("\\é\\u00éあ\u{fffd}😀"));
        assert_eq!(expected["ünï"].as_str(), Some("x"));
        for size in 1..text.len() {
            let chunks = split_chars(text, size);
            assert_eq!(parse_chunks(chunks).unwrap(), expected, "chunk size {size}");
        }
    }

    #[test]
    fn test_surrogates() {
        assert_eq!(
            parse(r#""\ud83d\ude00""#).unwrap(),
            JsonValue::String("😀".to_owned())
        );
        assert_eq!(
            parse(r#""\u0041\u00e9\u3042""#).unwrap(),
            JsonValue::String("Aéあ".to_owned())
        );
        assert_eq!(parse(r#""\ud83dx""#).unwrap(), JsonValue::String("\u{fffd}x".to_owned()));
        assert_eq!(parse(r#""\ude00""#).unwrap(), JsonValue::String("\u{fffd}".to_owned()));
        assert_eq!(parse(r#""\ud83d""#).unwrap(), JsonValue::String("\u{fffd}".to_owned()));
    }

    #[test]
    fn test_duplicate_key() {
        let err = parse(r#"{"a":1,"a":2}"#).unwrap_err();
        assert_eq!(err.kind(), &JsonErrKind::DuplicateKey("a".to_owned()));
        assert_eq!(err.position(), 7);
        assert!(err.to_string().contains("duplicated key detected: a"));
    }

    #[test]
    fn test_object_order() {
        let value = parse(r#"{ "z": 1, "a": [true, false, null], "m": {} }"#).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.keys().collect::<Vec<_>>(), ["z", "a", "m"]);
        assert_eq!(
            value["a"],
            JsonValue::Array(vec![
                JsonValue::Bool(true),
                JsonValue::Bool(false),
                JsonValue::Null
            ])
        );
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(kind(""), JsonErrKind::Empty);
        assert_eq!(kind("  \r\n"), JsonErrKind::Empty);
        assert_eq!(
            kind("not json"),
            JsonErrKind::Expected {
                expected: 'u',
                found: Some('o')
            }
        );
        assert_eq!(kind("x"), JsonErrKind::InvalidToken('x'));
        assert_eq!(kind("[1, 2"), JsonErrKind::Unclosed("array"));
        assert_eq!(kind("[1,"), JsonErrKind::UnexpectedEnd);
        assert_eq!(kind("[1,]"), JsonErrKind::InvalidToken(']'));
        assert_eq!(kind("{"), JsonErrKind::Unclosed("object"));
        assert_eq!(
            kind(r#"{"a" 1}"#),
            JsonErrKind::Expected {
                expected: ':',
                found: Some('1')
            }
        );
        assert_eq!(
            kind(r#"{"a":1,}"#),
            JsonErrKind::Expected {
                expected: '"',
                found: Some('}')
            }
        );
        assert_eq!(
            kind("[1 2]"),
            JsonErrKind::Expected {
                expected: ',',
                found: Some('2')
            }
        );
        assert_eq!(
            kind("nul"),
            JsonErrKind::Expected {
                expected: 'l',
                found: None
            }
        );
        assert_eq!(kind("true false"), JsonErrKind::TrailingCharacters('f'));
        assert_eq!(kind("\"abc"), JsonErrKind::Unclosed("string"));
    }

    #[test]
    fn test_depth_limit() {
        let deep = "[".repeat(MAX_DEPTH + 1);
        assert_eq!(kind(&deep), JsonErrKind::TooDeep(MAX_DEPTH));
        let ok = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse(&ok).is_ok());
    }

    #[test]
    fn test_chunks_match_slice() {
        let text = r#"{"id":+1,"text":"😀 split A","n":[1.5e2,-3,null]}"#;
        let expected = parse(text).unwrap();
        for size in 1..text.len() {
            let chunks = split_chars(text, size);
            assert_eq!(parse_chunks(chunks).unwrap(), expected, "chunk size {size}");
        }
    }

    fn split_chars(text: &str, size: usize) -> Vec<&str> {
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < text.len() {
            let mut end = (start + size).min(text.len());
            while !text.is_char_boundary(end) {
                end += 1;
            }
            chunks.push(&text[start..end]);
            start = end;
        }
        chunks
    }

    #[test]
    fn test_chunk_error_position() {
        let err = parse_chunks(["{\"a\":1,", "\"a\":2}"]).unwrap_err();
        assert_eq!(err, parse(r#"{"a":1,"a":2}"#).unwrap_err());
    }

    #[test]
    fn test_independent_trees() {
        let line = r#"{"a":[1,2,{"b":"c"}]}"#;
        let mut first = parse(line).unwrap();
        let second = parse(line).unwrap();
        assert_eq!(first, second);
        if let JsonValue::Object(object) = &mut first {
            object.clear();
        }
        assert_ne!(first, second);
        assert_eq!(second["a"][2]["b"].as_str(), Some("c"));
    }
}
