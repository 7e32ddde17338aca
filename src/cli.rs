// Command line parsing and dispatch

use std::ffi::{OsStr, OsString};
use std::io::Write;

use clap::{CommandFactory, Parser};

use crate::config::MountConfig;
use crate::mqueue::{
    ErrorKind, Kernel, PqError, PqResult, destroy_queue, ensure_mounted, inspect_queue,
    list_queues, release,
};

const USAGE: &str = "pq { ls | stat /<queue-name> | unlink /<queue-name> | umount }";

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Inspect and manage POSIX message queues (run as root)
#[derive(Parser, Debug, Default)]
#[command(name = "pq", version, override_usage = USAGE)]
pub struct Cli {
    /// Action (ls, stat, unlink, umount), then the queue name for stat and
    /// unlink. Anything after that is ignored.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<OsString>,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn new(action: &str, queue: Option<&str>) -> Self {
        let args = std::iter::once(action).chain(queue).map(OsString::from).collect();
        Self { args, ..Default::default() }
    }

    pub fn action(&self) -> Option<&OsStr> {
        self.args.first().map(OsString::as_os_str)
    }

    pub fn queue(&self) -> Option<&OsStr> {
        self.args.get(1).map(OsString::as_os_str)
    }
}

/// Rendered usage synopsis, as printed after a usage error.
pub fn usage() -> String {
    Cli::command().render_usage().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    List,
    Stat(OsString),
    Unlink(OsString),
    Unmount,
}

impl Action {
    /// Queue names are passed through untouched; only the kernel validates them.
    pub fn parse(token: &OsStr, queue: Option<&OsStr>) -> PqResult<Self> {
        let queue_arg = || queue.map(OsStr::to_os_string).ok_or(PqError::Usage);

        match token.to_str() {
            Some("ls" | "list") => Ok(Action::List),
            Some("umount" | "unmount") => Ok(Action::Unmount),
            Some("stat") => Ok(Action::Stat(queue_arg()?)),
            Some("unlink") => Ok(Action::Unlink(queue_arg()?)),
            _ => Err(PqError::InvalidAction(token.to_string_lossy().into_owned())),
        }
    }
}

/// Run one invocation: make sure the filesystem is mounted, then perform the
/// requested action. Data goes to `out`; failures come back as `PqError`.
pub fn run(
    cli: &Cli,
    kernel: &impl Kernel,
    config: &MountConfig,
    out: &mut impl Write,
) -> PqResult<()> {
    let Some(token) = cli.action() else {
        return Err(PqError::Usage);
    };

    ensure_mounted(kernel, config)?;

    let action = Action::parse(token, cli.queue())?;
    tracing::debug!("Dispatching {:?}", action);

    match action {
        Action::List => list_queues(kernel, config.mount_point(), out).map(|_| ()),
        Action::Stat(name) => inspect_queue(kernel, &name, out),
        Action::Unlink(name) => destroy_queue(kernel, &name),
        Action::Unmount => release(kernel, config),
    }
}

/// Report the outcome of `run` on `err_out` and return the process exit status.
///
/// A failure produces one `Error:` line, followed by the usage synopsis when
/// the arguments were wrong.
pub fn finish(result: PqResult<()>, err_out: &mut impl Write) -> u8 {
    let Err(err) = result else {
        return EXIT_SUCCESS;
    };

    // Nothing sensible left to do if stderr itself is gone.
    let _ = writeln!(err_out, "Error: {err}");
    if err.kind() == ErrorKind::Usage {
        let _ = writeln!(err_out, "{}", usage().trim_end());
    }

    EXIT_FAILURE
}
