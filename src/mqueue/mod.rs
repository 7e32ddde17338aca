pub mod error;
pub mod interface;
pub mod mount;
pub mod queue;
pub mod system;

pub use error::{ErrorKind, PqError, PqResult};
pub use interface::{EntryKind, Kernel, QueueAccessError, QueueAttributes, QueueEntry};
pub use mount::{Attempt, ensure_mounted, release};
pub use queue::{destroy_queue, inspect_queue, list_queues};
pub use system::LinuxKernel;
