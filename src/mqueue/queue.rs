// Queue listing, inspection and removal
//
// All three expect the filesystem to be mounted already.

use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use super::error::{PqError, PqResult};
use super::interface::{Kernel, QueueAccessError, QueueAttributes};

/// Printed by `list_queues` when the mount point holds no queues.
pub const NO_QUEUES_PLACEHOLDER: &str = "(No posix queues)";

/// Names of all queues under `mount_point`, in directory order.
pub fn queue_names(kernel: &impl Kernel, mount_point: &Path) -> PqResult<Vec<OsString>> {
    let entries = kernel
        .read_dir(mount_point)
        .map_err(|errno| PqError::Enumerate { path: mount_point.to_path_buf(), errno })?;

    Ok(entries.into_iter().filter(|entry| entry.is_queue()).map(|entry| entry.name).collect())
}

/// Write one queue name per line, or the placeholder when there are none.
/// Names are written as raw bytes. Returns the number of queues found.
pub fn list_queues(
    kernel: &impl Kernel,
    mount_point: &Path,
    out: &mut impl Write,
) -> PqResult<usize> {
    let names = queue_names(kernel, mount_point)?;

    if names.is_empty() {
        writeln!(out, "{NO_QUEUES_PLACEHOLDER}")?;
    }
    for name in &names {
        out.write_all(name.as_bytes())?;
        out.write_all(b"\n")?;
    }

    tracing::debug!("Listed {} queues under {}", names.len(), mount_point.display());
    Ok(names.len())
}

pub fn queue_attributes(kernel: &impl Kernel, name: &OsStr) -> PqResult<QueueAttributes> {
    let display = || name.to_string_lossy().into_owned();

    kernel.queue_attributes(name).map_err(|err| match err {
        QueueAccessError::Open(errno) => PqError::QueueOpen { name: display(), errno },
        QueueAccessError::Query(errno) => PqError::QueueAttributes { name: display(), errno },
    })
}

/// Four `key value` lines, keys padded to a common width.
pub fn format_attributes(attr: &QueueAttributes) -> String {
    format!(
        "{:<8}{}\n{:<8}{}\n{:<8}{}\n{:<8}{}\n",
        "flags",
        attr.flags,
        "maxmsg",
        attr.max_messages,
        "msgsize",
        attr.message_size,
        "curmsgs",
        attr.current_messages,
    )
}

pub fn inspect_queue(kernel: &impl Kernel, name: &OsStr, out: &mut impl Write) -> PqResult<()> {
    let attr = queue_attributes(kernel, name)?;
    out.write_all(format_attributes(&attr).as_bytes())?;
    Ok(())
}

pub fn destroy_queue(kernel: &impl Kernel, name: &OsStr) -> PqResult<()> {
    kernel.unlink_queue(name).map_err(|errno| PqError::QueueUnlink {
        name: name.to_string_lossy().into_owned(),
        errno,
    })?;

    tracing::info!("Unlinked queue {}", name.to_string_lossy());
    Ok(())
}
