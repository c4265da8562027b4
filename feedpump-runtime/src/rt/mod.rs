#[cfg(feature = "runtime-tokio")]
mod tokio_rt;

#[cfg(feature = "runtime-tokio")]
pub use tokio_rt::*;

#[cfg(feature = "runtime-async-std")]
mod async_std_rt;

#[cfg(feature = "runtime-async-std")]
pub use async_std_rt::*;

#[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
mod no_rt;

#[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
pub use no_rt::*;
