use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

pub type PqResult<T> = Result<T, PqError>;

/// Failure class of a [`PqError`], for callers that branch on what went wrong
/// rather than on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Mount,
    Enumeration,
    QueueOpen,
    QueueAttribute,
    QueueUnlink,
    Unmount,
    MountPointRemoval,
    InvalidAction,
    Output,
}

#[derive(Error, Debug)]
pub enum PqError {
    #[error("Invalid usage")]
    Usage,

    #[error("Couldn't create posix filesystem mount point {} ({})", .path.display(), .errno.desc())]
    MountPointCreate { path: PathBuf, errno: Errno },

    #[error("Couldn't mount the posix queue filesystem on {} ({})", .path.display(), .errno.desc())]
    Mount { path: PathBuf, errno: Errno },

    #[error("Couldn't read from the posix queue filesystem at {} ({})", .path.display(), .errno.desc())]
    Enumerate { path: PathBuf, errno: Errno },

    #[error("Couldn't open queue {name} ({})", .errno.desc())]
    QueueOpen { name: String, errno: Errno },

    #[error("Failed to query queue {name} for its parameters ({})", .errno.desc())]
    QueueAttributes { name: String, errno: Errno },

    #[error("Failed to unlink queue {name} ({})", .errno.desc())]
    QueueUnlink { name: String, errno: Errno },

    #[error("Couldn't unmount the posix queue filesystem at {} ({})", .path.display(), .errno.desc())]
    Unmount { path: PathBuf, errno: Errno },

    #[error("Couldn't remove posix filesystem mount point {} ({})", .path.display(), .errno.desc())]
    MountPointRemove { path: PathBuf, errno: Errno },

    #[error("Invalid action \"{0}\"")]
    InvalidAction(String),

    #[error("Couldn't write output ({0})")]
    Output(#[from] std::io::Error),
}

impl PqError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PqError::Usage => ErrorKind::Usage,
            PqError::MountPointCreate { .. } | PqError::Mount { .. } => ErrorKind::Mount,
            PqError::Enumerate { .. } => ErrorKind::Enumeration,
            PqError::QueueOpen { .. } => ErrorKind::QueueOpen,
            PqError::QueueAttributes { .. } => ErrorKind::QueueAttribute,
            PqError::QueueUnlink { .. } => ErrorKind::QueueUnlink,
            PqError::Unmount { .. } => ErrorKind::Unmount,
            PqError::MountPointRemove { .. } => ErrorKind::MountPointRemoval,
            PqError::InvalidAction(_) => ErrorKind::InvalidAction,
            PqError::Output(_) => ErrorKind::Output,
        }
    }

    /// Underlying system error, when the failure came from a syscall.
    pub fn errno(&self) -> Option<Errno> {
        match self {
            PqError::MountPointCreate { errno, .. }
            | PqError::Mount { errno, .. }
            | PqError::Enumerate { errno, .. }
            | PqError::QueueOpen { errno, .. }
            | PqError::QueueAttributes { errno, .. }
            | PqError::QueueUnlink { errno, .. }
            | PqError::Unmount { errno, .. }
            | PqError::MountPointRemove { errno, .. } => Some(*errno),
            PqError::Output(err) => err.raw_os_error().map(Errno::from_raw),
            PqError::Usage | PqError::InvalidAction(_) => None,
        }
    }
}
