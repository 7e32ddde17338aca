// In-memory stand-in for the kernel, modelling one mount point and the
// queue namespace behind it.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::sys::stat::Mode;
use pq::mqueue::{EntryKind, Kernel, QueueAccessError, QueueAttributes, QueueEntry};

#[derive(Debug, Default)]
pub struct FakeState {
    pub dir_exists: bool,
    pub mounted: bool,
    /// Number of successful mount(2) calls that attached a new filesystem.
    pub mount_count: usize,
    /// Open handles keep the filesystem busy.
    pub busy: bool,
    pub queues: BTreeMap<OsString, QueueAttributes>,
    pub extra_entries: Vec<QueueEntry>,
}

pub struct FakeKernel {
    pub mount_point: PathBuf,
    pub state: RefCell<FakeState>,
}

impl FakeKernel {
    pub fn new(mount_point: impl Into<PathBuf>) -> Self {
        Self { mount_point: mount_point.into(), state: RefCell::new(FakeState::default()) }
    }

    pub fn with_queue(self, name: impl AsRef<OsStr>, attr: QueueAttributes) -> Self {
        self.state.borrow_mut().queues.insert(name.as_ref().to_os_string(), attr);
        self
    }

    pub fn is_mounted(&self) -> bool {
        self.state.borrow().mounted
    }

    pub fn set_busy(&self, busy: bool) {
        self.state.borrow_mut().busy = busy;
    }

    fn check_path(&self, path: &Path) -> Result<(), Errno> {
        if path != self.mount_point {
            return Err(Errno::ENOENT);
        }
        Ok(())
    }
}

impl Kernel for FakeKernel {
    fn create_dir(&self, path: &Path, _mode: Mode) -> Result<(), Errno> {
        self.check_path(path)?;
        let mut state = self.state.borrow_mut();
        if state.dir_exists {
            return Err(Errno::EEXIST);
        }
        state.dir_exists = true;
        Ok(())
    }

    fn mount(&self, _source: &str, target: &Path, fs_type: &str) -> Result<(), Errno> {
        self.check_path(target)?;
        if fs_type != "mqueue" {
            return Err(Errno::ENODEV);
        }
        let mut state = self.state.borrow_mut();
        if !state.dir_exists {
            return Err(Errno::ENOENT);
        }
        if state.mounted {
            return Err(Errno::EBUSY);
        }
        state.mounted = true;
        state.mount_count += 1;
        Ok(())
    }

    fn unmount(&self, target: &Path) -> Result<(), Errno> {
        self.check_path(target)?;
        let mut state = self.state.borrow_mut();
        if !state.dir_exists {
            return Err(Errno::ENOENT);
        }
        if !state.mounted {
            return Err(Errno::EINVAL);
        }
        if state.busy {
            return Err(Errno::EBUSY);
        }
        state.mounted = false;
        Ok(())
    }

    fn remove_dir(&self, path: &Path) -> Result<(), Errno> {
        self.check_path(path)?;
        let mut state = self.state.borrow_mut();
        if !state.dir_exists {
            return Err(Errno::ENOENT);
        }
        if state.mounted {
            return Err(Errno::EBUSY);
        }
        state.dir_exists = false;
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<QueueEntry>, Errno> {
        self.check_path(path)?;
        let state = self.state.borrow();
        if !state.dir_exists {
            return Err(Errno::ENOENT);
        }

        let mut entries = vec![
            QueueEntry::new(".", EntryKind::Directory),
            QueueEntry::new("..", EntryKind::Directory),
        ];
        if state.mounted {
            entries.extend(
                state
                    .queues
                    .keys()
                    .map(|name| QueueEntry::new(entry_name(name), EntryKind::Queue)),
            );
            entries.extend(state.extra_entries.iter().cloned());
        }
        Ok(entries)
    }

    fn queue_attributes(&self, name: &OsStr) -> Result<QueueAttributes, QueueAccessError> {
        let state = self.state.borrow();
        let bytes = name.as_bytes();
        if !bytes.starts_with(b"/") || bytes[1..].contains(&b'/') {
            return Err(QueueAccessError::Open(Errno::EINVAL));
        }
        let attr = *state.queues.get(name).ok_or(QueueAccessError::Open(Errno::ENOENT))?;
        Ok(attr)
    }

    fn unlink_queue(&self, name: &OsStr) -> Result<(), Errno> {
        let mut state = self.state.borrow_mut();
        state.queues.remove(name).map(|_| ()).ok_or(Errno::ENOENT)
    }
}

/// Queue names carry a leading slash; directory entries do not.
fn entry_name(name: &OsStr) -> &OsStr {
    let bytes = name.as_bytes();
    OsStr::from_bytes(bytes.strip_prefix(b"/").unwrap_or(bytes))
}

pub fn attrs(max_messages: i64, message_size: i64, current_messages: i64) -> QueueAttributes {
    QueueAttributes { flags: 0, max_messages, message_size, current_messages }
}
