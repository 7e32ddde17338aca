// Mount management for the message queue filesystem
//
// `ensure_mounted` attaches the filesystem if needed, `release` detaches it
// and removes the mount point. Both are idempotent: errnos meaning "already
// done" are treated as success.

use nix::errno::Errno;

use super::error::{PqError, PqResult};
use super::interface::Kernel;
use crate::config::MountConfig;

/// Outcome of a single idempotent step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Succeeded,
    AlreadyInDesiredState,
    Failed(Errno),
}

impl Attempt {
    /// Classify a syscall result, treating any errno in `satisfied` as a no-op.
    pub fn classify(result: Result<(), Errno>, satisfied: &[Errno]) -> Self {
        match result {
            Ok(()) => Attempt::Succeeded,
            Err(errno) if satisfied.contains(&errno) => Attempt::AlreadyInDesiredState,
            Err(errno) => Attempt::Failed(errno),
        }
    }
}

/// Create the mount point (if missing) and attach the mqueue filesystem (if
/// not already attached).
pub fn ensure_mounted(kernel: &impl Kernel, config: &MountConfig) -> PqResult<()> {
    let path = config.mount_point();

    tracing::debug!("Creating mount point {}", path.display());
    match Attempt::classify(kernel.create_dir(path, config.dir_mode()), &[Errno::EEXIST]) {
        Attempt::Succeeded => tracing::info!("Created mount point {}", path.display()),
        Attempt::AlreadyInDesiredState => {
            tracing::debug!("Mount point {} already exists", path.display())
        }
        Attempt::Failed(errno) => {
            return Err(PqError::MountPointCreate { path: path.to_path_buf(), errno });
        }
    }

    tracing::debug!("Mounting {} filesystem at {}", config.fs_type, path.display());
    let mounted = kernel.mount(&config.source, path, &config.fs_type);
    match Attempt::classify(mounted, &[Errno::EBUSY]) {
        Attempt::Succeeded => tracing::info!("Mounted {} at {}", config.fs_type, path.display()),
        Attempt::AlreadyInDesiredState => {
            tracing::debug!("{} already mounted at {}", config.fs_type, path.display())
        }
        Attempt::Failed(errno) => {
            return Err(PqError::Mount { path: path.to_path_buf(), errno });
        }
    }

    Ok(())
}

/// Detach the filesystem and remove the mount point.
///
/// A busy filesystem fails the release at either step. Other unmount failures
/// are only logged, and removing the directory decides the outcome.
pub fn release(kernel: &impl Kernel, config: &MountConfig) -> PqResult<()> {
    let path = config.mount_point();

    tracing::debug!("Unmounting {}", path.display());
    // EINVAL: not a mount point, ENOENT: no mount point at all
    match Attempt::classify(kernel.unmount(path), &[Errno::EINVAL, Errno::ENOENT]) {
        Attempt::Succeeded => tracing::info!("Unmounted {}", path.display()),
        Attempt::AlreadyInDesiredState => tracing::debug!("{} was not mounted", path.display()),
        Attempt::Failed(Errno::EBUSY) => {
            return Err(PqError::Unmount { path: path.to_path_buf(), errno: Errno::EBUSY });
        }
        Attempt::Failed(errno) => {
            tracing::warn!(
                "Couldn't unmount {} ({}), removing it anyway",
                path.display(),
                errno.desc()
            )
        }
    }

    tracing::debug!("Removing mount point {}", path.display());
    match Attempt::classify(kernel.remove_dir(path), &[Errno::ENOENT]) {
        Attempt::Succeeded => tracing::info!("Removed mount point {}", path.display()),
        Attempt::AlreadyInDesiredState => {
            tracing::debug!("Mount point {} already removed", path.display())
        }
        Attempt::Failed(errno) => {
            return Err(PqError::MountPointRemove { path: path.to_path_buf(), errno });
        }
    }

    Ok(())
}
