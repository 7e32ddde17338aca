use std::path::{Path, PathBuf};

use nix::sys::stat::Mode;

/// Where the message queue filesystem lives on Linux (see mq_overview(7)).
pub const DEFAULT_MOUNT_POINT: &str = "/dev/mqueue";

/// Filesystem type name registered by the kernel for POSIX message queues.
pub const MQUEUE_FS_TYPE: &str = "mqueue";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountConfig {
    pub mount_point: PathBuf,
    /// Source device passed to mount(2); the kernel ignores it for mqueue.
    pub source: String,
    pub fs_type: String,
    /// Permission bits for a freshly created mount point directory.
    pub dir_mode: u32,
}

impl MountConfig {
    pub fn with_mount_point(mount_point: impl Into<PathBuf>) -> Self {
        Self { mount_point: mount_point.into(), ..Default::default() }
    }

    pub fn mount_point(&self) -> &Path {
        &self.mount_point
    }

    pub fn dir_mode(&self) -> Mode {
        Mode::from_bits_truncate(self.dir_mode)
    }
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            mount_point: PathBuf::from(DEFAULT_MOUNT_POINT),
            source: "none".to_string(),
            fs_type: MQUEUE_FS_TYPE.to_string(),
            dir_mode: 0o644,
        }
    }
}
