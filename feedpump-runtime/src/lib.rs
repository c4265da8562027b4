//! ### `feedpump-runtime`: Async runtime abstraction
//!
//! A small set of functions aligning the type signatures between `async-std` and `tokio`,
//! so that the pipeline stays generic to both runtimes. Enable exactly one of the
//! `runtime-tokio` or `runtime-async-std` features.
//!
//! It also provides [`CancelSource`] / [`CancelToken`], the cooperative cancellation signal
//! observed by the read loop.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_debug_implementations)]

#[cfg(all(feature = "runtime-async-std", feature = "runtime-tokio"))]
compile_error!("'runtime-async-std' and 'runtime-tokio' cannot be enabled at the same time");

mod cancel;
mod rt;

pub use cancel::*;
pub use rt::*;
