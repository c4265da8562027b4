//! ### `feedpump-stream`: from bytes to callbacks
//!
//! ```text
//! ByteSource -> ByteLineReader -> StreamPump (queue) -> JsonParser -> StreamDispatcher -> StreamHandler
//! ```
//!
//! + [`ByteLineReader`] frames whatever chunks a [`ByteSource`] delivers into text lines.
//! + [`StreamPump`] reads lines on the calling task, and hands them to a dedicated worker
//!   which processes one line at a time in arrival order. A read deadline detects stalled
//!   connections independent of how slow processing is.
//! + [`StreamDispatcher`] parses each line and invokes the matching [`StreamHandler`] callback.
//!   A malformed line is reported to the handler, and the stream carries on.
//! + [`UserStream`] puts all of the above together.
//!
//! The worker runs on the async runtime's blocking pool: enable `runtime-tokio` or `runtime-async-std`.
//!
//! [`StreamHandler`]: feedpump_types::StreamHandler

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_debug_implementations)]

mod decoder;
mod dispatcher;
mod error;
mod generic;
mod options;
mod pump;
mod reader;
mod source;
mod user_stream;

pub use decoder::*;
pub use dispatcher::*;
pub use error::*;
pub use generic::*;
pub use options::*;
pub use pump::*;
pub use reader::*;
pub use source::*;
pub use user_stream::*;
