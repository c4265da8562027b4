//! # Feedpump Types
//!
//! The data model of a user stream: the messages a stream carries, the payloads embedded in them,
//! the per-line failure taxonomy and the [`StreamHandler`] trait applications implement.
//! It does not read or dispatch anything; see `feedpump-stream` for that.
//!
//! Payload decoders only look at the fields they need. Each record keeps the JSON sub-tree it was
//! decoded from, so an application can read whatever else it cares about.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_debug_implementations)]

mod error;
mod event;
pub mod field;
mod handler;
mod message;
mod payload;
mod timestamp;

pub use error::*;
pub use event::*;
pub use handler::*;
pub use message::*;
pub use payload::*;
pub use timestamp::*;

pub use feedpump_json as json;
