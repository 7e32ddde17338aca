// Linux implementation of the kernel interface
//
// Thin wrappers over nix; no policy lives here.

use std::ffi::{CString, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use nix::dir::{Dir, Type};
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::mount::{MsFlags, mount, umount};
use nix::mqueue::{MQ_OFlag, mq_close, mq_getattr, mq_open, mq_unlink};
use nix::sys::stat::Mode;
use nix::unistd::mkdir;

use super::interface::{EntryKind, Kernel, QueueAccessError, QueueAttributes, QueueEntry};

#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxKernel;

impl LinuxKernel {
    pub fn new() -> Self {
        Self
    }
}

fn queue_name(name: &OsStr) -> Result<CString, Errno> {
    CString::new(name.as_bytes()).map_err(|_| Errno::EINVAL)
}

impl Kernel for LinuxKernel {
    fn create_dir(&self, path: &Path, mode: Mode) -> Result<(), Errno> {
        mkdir(path, mode)
    }

    fn mount(&self, source: &str, target: &Path, fs_type: &str) -> Result<(), Errno> {
        mount(Some(source), target, Some(fs_type), MsFlags::empty(), None::<&str>)
    }

    fn unmount(&self, target: &Path) -> Result<(), Errno> {
        umount(target)
    }

    fn remove_dir(&self, path: &Path) -> Result<(), Errno> {
        std::fs::remove_dir(path)
            .map_err(|err| Errno::from_raw(err.raw_os_error().unwrap_or(libc::EIO)))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<QueueEntry>, Errno> {
        let mut dir = Dir::open(path, OFlag::O_RDONLY | OFlag::O_DIRECTORY, Mode::empty())?;

        let mut entries = Vec::new();
        for entry in dir.iter() {
            let entry = entry?;
            let kind = match entry.file_type() {
                Some(Type::Directory) => EntryKind::Directory,
                Some(_) => EntryKind::Queue,
                None => EntryKind::Unknown,
            };
            let name = OsStr::from_bytes(entry.file_name().to_bytes());
            entries.push(QueueEntry::new(name, kind));
        }

        Ok(entries)
    }

    fn queue_attributes(&self, name: &OsStr) -> Result<QueueAttributes, QueueAccessError> {
        let c_name = queue_name(name).map_err(QueueAccessError::Open)?;
        let mqd = mq_open(c_name.as_c_str(), MQ_OFlag::O_RDONLY, Mode::empty(), None)
            .map_err(QueueAccessError::Open)?;

        let attr = mq_getattr(&mqd);

        // Close before looking at the query result so both paths release the handle.
        if let Err(errno) = mq_close(mqd) {
            tracing::warn!(
                "Failed to close queue {}: {}",
                name.to_string_lossy(),
                errno.desc()
            );
        }

        let attr = attr.map_err(QueueAccessError::Query)?;
        Ok(QueueAttributes {
            flags: i64::from(attr.flags()),
            max_messages: i64::from(attr.maxmsg()),
            message_size: i64::from(attr.msgsize()),
            current_messages: i64::from(attr.curmsgs()),
        })
    }

    fn unlink_queue(&self, name: &OsStr) -> Result<(), Errno> {
        let c_name = queue_name(name)?;
        mq_unlink(c_name.as_c_str())
    }
}
