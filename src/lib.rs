//! Administrative tool for POSIX message queues on Linux.
//!
//! Mounts the `mqueue` filesystem on demand, then lists, inspects or unlinks
//! queues, or tears the mount down again.

pub mod cli;
pub mod config;
pub mod mqueue;

#[cfg(any(test, feature = "mockall"))]
pub use mqueue::interface::MockKernel;
