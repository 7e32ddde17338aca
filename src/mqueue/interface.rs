// Kernel interface abstraction
//
// Every syscall the tool issues goes through `Kernel`, so the mount and queue
// components can run against the real host or against a fake in tests.

use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use nix::errno::Errno;
use nix::sys::stat::Mode;

#[cfg(any(test, feature = "mockall"))]
use mockall::automock;

/// Kind of an entry found under the mount point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Queue,
    Directory,
    /// d_type not reported by the filesystem
    Unknown,
}

/// Directory entry read from the mounted filesystem
///
/// The name keeps the raw `d_name` bytes; the kernel does not require UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub name: OsString,
    pub kind: EntryKind,
}

impl QueueEntry {
    pub fn new(name: impl Into<OsString>, kind: EntryKind) -> Self {
        Self { name: name.into(), kind }
    }

    /// Directories and dot entries are filesystem artifacts, not queues.
    pub fn is_queue(&self) -> bool {
        self.kind != EntryKind::Directory && !self.name.as_bytes().starts_with(b".")
    }
}

/// Snapshot of a queue's `mq_attr`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueAttributes {
    pub flags: i64,
    pub max_messages: i64,
    pub message_size: i64,
    pub current_messages: i64,
}

/// Which half of an attribute query failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueAccessError {
    Open(Errno),
    Query(Errno),
}

/// Syscall surface used by the tool.
///
/// Methods return the raw errno on failure; interpreting it (for instance
/// `EEXIST` on mkdir meaning "nothing to do") is left to the callers.
#[cfg_attr(any(test, feature = "mockall"), automock)]
pub trait Kernel {
    fn create_dir(&self, path: &Path, mode: Mode) -> Result<(), Errno>;

    fn mount(&self, source: &str, target: &Path, fs_type: &str) -> Result<(), Errno>;

    fn unmount(&self, target: &Path) -> Result<(), Errno>;

    fn remove_dir(&self, path: &Path) -> Result<(), Errno>;

    fn read_dir(&self, path: &Path) -> Result<Vec<QueueEntry>, Errno>;

    /// Open `name` read-only, fetch its attributes, and close it again.
    /// The handle must be released whether or not the query succeeds.
    fn queue_attributes(&self, name: &OsStr) -> Result<QueueAttributes, QueueAccessError>;

    fn unlink_queue(&self, name: &OsStr) -> Result<(), Errno>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_entry_is_queue() {
        assert!(QueueEntry::new("jobs", EntryKind::Queue).is_queue());
        assert!(QueueEntry::new("jobs", EntryKind::Unknown).is_queue());
    }

    #[test]
    fn test_directory_entry_is_not_queue() {
        assert!(!QueueEntry::new("nested", EntryKind::Directory).is_queue());
    }

    #[test]
    fn test_hidden_entries_are_not_queues() {
        assert!(!QueueEntry::new(".", EntryKind::Directory).is_queue());
        assert!(!QueueEntry::new("..", EntryKind::Directory).is_queue());
        assert!(!QueueEntry::new(".lock", EntryKind::Queue).is_queue());
    }

    #[test]
    fn test_non_utf8_entry_is_queue() {
        let entry = QueueEntry::new(OsStr::from_bytes(b"q\xff\xfe"), EntryKind::Queue);
        assert!(entry.is_queue());
        assert_eq!(entry.name.as_bytes(), b"q\xff\xfe");
    }

    #[test]
    fn test_attributes_default_is_zeroed() {
        let attr = QueueAttributes::default();
        assert_eq!(attr.flags, 0);
        assert_eq!(attr.max_messages, 0);
        assert_eq!(attr.message_size, 0);
        assert_eq!(attr.current_messages, 0);
    }
}
