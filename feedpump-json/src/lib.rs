//! ### `feedpump-json`: JSON line parser
//!
//! A recursive-descent parser for one complete line of JSON, tuned for the short-token heavy
//! traffic of social feed streams. The grammar is the standard JSON value set, with one tolerant
//! extension: a number may carry a leading `+` sign.
//!
//! ```
//! use feedpump_json::{parse, JsonNumber, JsonValue};
//!
//! let value = parse(r#"{"id": +42, "text": "hello"}"#).unwrap();
//! assert_eq!(value["id"], JsonValue::Number(JsonNumber::Integer(42)));
//! assert_eq!(value["text"].as_str(), Some("hello"));
//! ```
//!
//! The grammar is implemented once in [`JsonParser`], generic over a [`Cursor`]. [`parse`] scans
//! a fully assembled line directly, [`parse_chunks`] walks a sequence of buffers and refills at the
//! end of each. Both produce identical trees for identical input.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_debug_implementations)]

mod cursor;
mod error;
mod parser;
mod value;
mod writer;

pub use cursor::*;
pub use error::*;
pub use parser::*;
pub use value::*;
pub use writer::*;
