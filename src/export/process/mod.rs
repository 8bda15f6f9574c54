//! Rendering process invocation.
//!
//! A [`RenderCommand`] is run to completion or until its time budget runs
//! out, whichever comes first. The child never goes through a shell:
//! arguments are passed verbatim. Stdout is discarded and stderr is
//! captured for error messages.

mod stderr;

use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use camino::{Utf8Path, Utf8PathBuf};

use super::error::ExportError;

use self::stderr::StderrCapture;

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Program, arguments and time budget for one rendering run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCommand {
    program: Utf8PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl RenderCommand {
    /// Creates a command for `program` with no arguments.
    #[must_use]
    pub fn new(program: impl Into<Utf8PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout,
        }
    }

    /// Appends arguments in order.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Returns the program to execute.
    #[must_use]
    pub fn program(&self) -> &Utf8Path {
        self.program.as_path()
    }

    /// Returns the arguments in order.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the time budget.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Renders the command as a single space-separated line.
    #[must_use]
    pub fn display_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs rendering commands.
///
/// Exporters depend on this seam rather than on [`std::process`] so tests
/// can substitute a scripted runner.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessRunner: Send + Sync {
    /// Runs `command` and waits for it to exit within its time budget.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::BinaryNotFound`] or [`ExportError::Spawn`]
    /// when the process cannot start, [`ExportError::NonZeroExit`] when it
    /// exits unsuccessfully, and [`ExportError::TimedOut`] when it is still
    /// running once the budget is spent.
    fn run(&self, command: &RenderCommand) -> Result<(), ExportError>;
}

/// Runs commands as local child processes, killing them on timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    /// Creates a runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, command: &RenderCommand) -> Result<(), ExportError> {
        tracing::debug!("running renderer: {}", command.display_line());

        let mut child = spawn(command)?;
        let capture = StderrCapture::spawn(child.stderr.take());

        match wait_with_deadline(&mut child, command.timeout()) {
            Ok(Some(status)) => exit_result(status, capture.finish()),
            Ok(None) => {
                terminate(&mut child);
                Err(ExportError::TimedOut {
                    timeout: command.timeout(),
                    stderr: capture.abandon(),
                })
            }
            Err(error) => {
                terminate(&mut child);
                drop(capture.abandon());
                Err(ExportError::Io {
                    message: format!("failed waiting for renderer exit: {error}"),
                })
            }
        }
    }
}

fn spawn(command: &RenderCommand) -> Result<Child, ExportError> {
    Command::new(command.program().as_std_path())
        .args(command.args())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|error| match error.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                ExportError::BinaryNotFound {
                    binary: command.program().to_string(),
                    message: error.to_string(),
                }
            }
            _ => ExportError::Spawn {
                message: error.to_string(),
            },
        })
}

/// Polls `child` until it exits or `timeout` elapses.
///
/// Returns `Ok(None)` when the child is still running at the deadline. A
/// budget too large to represent as an [`Instant`] never expires.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now().checked_add(timeout);
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let remaining = deadline.map_or(POLL_INTERVAL, |at| {
            at.saturating_duration_since(Instant::now())
        });
        if remaining.is_zero() {
            return Ok(None);
        }
        std::thread::sleep(remaining.min(POLL_INTERVAL));
    }
}

fn exit_result(status: ExitStatus, stderr: String) -> Result<(), ExportError> {
    if status.success() {
        if !stderr.trim().is_empty() {
            tracing::debug!("renderer stderr: {}", stderr.trim());
        }
        return Ok(());
    }
    Err(ExportError::NonZeroExit {
        code: status.code(),
        stderr,
    })
}

/// Kills `child` if it is still running and reaps it.
fn terminate(child: &mut Child) {
    if matches!(child.try_wait(), Ok(Some(_))) {
        return;
    }
    if let Err(error) = child.kill() {
        tracing::trace!("failed to kill renderer process {}: {error}", child.id());
    }
    if let Err(error) = child.wait() {
        tracing::trace!("failed to reap renderer process {}: {error}", child.id());
    }
}
