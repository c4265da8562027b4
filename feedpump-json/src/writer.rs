use std::fmt::{self, Display, Write};

use crate::{JsonNumber, JsonValue};

/// Compact serialization. Whatever is written here parses back into an equal tree,
/// except non-finite floats which have no JSON form and are written as `null`.
impl Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonValue::Null => f.write_str("null"),
            JsonValue::Bool(b) => write!(f, "{b}"),
            JsonValue::Number(n) => write!(f, "{n}"),
            JsonValue::String(s) => write_escaped(f, s),
            JsonValue::Array(list) => {
                f.write_char('[')?;
                for (i, value) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_char(']')
            }
            JsonValue::Object(object) => {
                f.write_char('{')?;
                for (i, (key, value)) in object.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write_escaped(f, key)?;
                    f.write_char(':')?;
                    write!(f, "{value}")?;
                }
                f.write_char('}')
            }
        }
    }
}

impl Display for JsonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonNumber::Integer(i) => write!(f, "{i}"),
            // `Debug` is the shortest representation that round trips, and always has a
            // fraction or an exponent, so the number stays a float when parsed again
            JsonNumber::Float(v) if v.is_finite() => write!(f, "{v:?}"),
            JsonNumber::Float(_) => f.write_str("null"),
        }
    }
}

/// Write `s` as a quoted JSON string.
pub fn write_escaped<W: Write>(w: &mut W, s: &str) -> fmt::Result {
    w.write_char('"')?;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        let escaped = match c {
            '"' => "\\\"",
            '\\' => "\\\\",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            '\u{8}' => "\\b",
            '\u{c}' => "\\f",
            c if (c as u32) < 0x20 => "",
            _ => continue,
        };
        w.write_str(&s[start..i])?;
        if escaped.is_empty() {
            write!(w, "\\u{:04x}", c as u32)?;
        } else {
            w.write_str(escaped)?;
        }
        start = i + c.len_utf8();
    }
    w.write_str(&s[start..])?;
    w.write_char('"')
}

#[cfg(test)]
mod test {
    use crate::{parse, JsonObject, JsonValue};

    #[test]
    fn test_compact() {
        let text = r#"{"a":[1,-2.5,true,null],"b":{"c":"d\"e\\f\n\u0001"},"e":150.0}"#;
        let value = parse(text).unwrap();
        assert_eq!(value.to_string(), text);
    }

    #[test]
    fn test_floats_stay_floats() {
        for f in [150.0, 1e300, -0.0, 0.1, 5e-324] {
            let value = JsonValue::from(f);
            assert_eq!(parse(&value.to_string()).unwrap(), value);
        }
        assert_eq!(JsonValue::from(f64::NAN).to_string(), "null");
    }

    #[test]
    fn test_whitespace_is_dropped() {
        let value = parse(" { \"k\" : [ 1 , 2 ] } ").unwrap();
        assert_eq!(value.to_string(), r#"{"k":[1,2]}"#);
        assert_eq!(JsonValue::Object(JsonObject::new()).to_string(), "{}");
    }
}
