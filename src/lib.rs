//! <div align="center">
//!
//!   <h1>feedpump</h1>
//!
//!   <p>
//!     <strong>🌊 Streaming ingestion pipeline for newline-delimited JSON feeds</strong>
//!   </p>
//!
//!   [![crate](https://img.shields.io/crates/v/feedpump.svg)](https://crates.io/crates/feedpump)
//!   [![docs](https://docs.rs/feedpump/badge.svg)](https://docs.rs/feedpump)
//!
//! </div>
//!
//! feedpump turns a long-lived byte stream of JSON lines into typed callbacks.
//!
//! ## Features
//!
//! 1. Async
//!
//! Reading is async and works on both `tokio` and `async-std`. Processing happens on a dedicated
//! worker, so a slow handler never stalls the connection, and a stalled connection is detected
//! even while the handler is busy.
//!
//! 2. Forgiving
//!
//! Chunk boundaries can fall anywhere: in the middle of a line, a multi-byte character or a
//! `\r\n` pair. A malformed line is reported to the handler and the stream carries on.
//!
//! 3. Ordered
//!
//! Every line is handled exactly once, in arrival order, one at a time. On cancellation or
//! timeout, lines already read are still delivered before the run returns.
//!
//! ## Architecture
//!
//! `feedpump` is the facade crate re-exporting implementation from a number of sub-crates:
//!
//! + `feedpump-json`: a strict JSON parser tolerating a leading `+` on numbers
//! + `feedpump-types`: message types, errors and the `StreamHandler` trait
//! + `feedpump-runtime`: async runtime abstraction and cancellation
//! + `feedpump-stream`: line reader, pump and dispatcher
//!
//! ## Quick Start
//!
//! ```ignore
//! let source = ReadSource::new(tcp_stream);
//! let Drained { completion, processor: handler } = UserStream::default()
//!     .run(source, MyHandler::default(), &cancel.token())
//!     .await?;
//! // the handler has seen `Disconnected` even if the connection failed
//! let completion = completion?;
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub use feedpump_types::*;

#[cfg(feature = "stream")]
#[cfg_attr(docsrs, doc(cfg(feature = "stream")))]
pub use feedpump_stream::*;

#[cfg(feature = "runtime")]
#[cfg_attr(docsrs, doc(cfg(feature = "runtime")))]
pub use feedpump_runtime as runtime;
