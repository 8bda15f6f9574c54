//! Error types surfaced by exporters.
//!
//! Only the generation step can fail. Path, filename and option problems
//! degrade to defaults instead of producing one of these errors.

use std::time::Duration;

use thiserror::Error;

/// Errors returned while rendering a report to its output file.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportError {
    /// The rendering binary could not be located or is not executable.
    #[error("rendering binary '{binary}' is unavailable: {message}")]
    BinaryNotFound {
        /// Binary name or path as configured.
        binary: String,
        /// Lookup failure detail.
        message: String,
    },

    /// The rendering process could not be started.
    #[error("failed to launch rendering process: {message}")]
    Spawn {
        /// Error detail from the operating system.
        message: String,
    },

    /// The rendering process exited unsuccessfully.
    #[error("rendering process exited with {}{}", exit_label(.code), stderr_suffix(.stderr))]
    NonZeroExit {
        /// Exit code, when the process was not killed by a signal.
        code: Option<i32>,
        /// Captured standard error output.
        stderr: String,
    },

    /// The rendering process exceeded its time budget and was killed.
    #[error("rendering process timed out after {}{}", budget_label(.timeout), stderr_suffix(.stderr))]
    TimedOut {
        /// Configured time budget.
        timeout: Duration,
        /// Standard error captured before the process was killed.
        stderr: String,
    },

    /// The rendering script or document could not be produced.
    #[error("failed to build rendering script: {message}")]
    Script {
        /// Template error detail.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(
        || "no exit code (terminated by signal)".to_owned(),
        |value| format!("status {value}"),
    )
}

/// Whole seconds when the budget has no fraction, milliseconds otherwise.
fn budget_label(timeout: &Duration) -> String {
    if timeout.subsec_nanos() == 0 {
        format!("{}s", timeout.as_secs())
    } else {
        format!("{}ms", timeout.as_millis())
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n\nstderr:\n{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;

    use super::ExportError;

    #[rstest]
    #[case::with_code(
        ExportError::NonZeroExit { code: Some(3), stderr: String::new() },
        "rendering process exited with status 3"
    )]
    #[case::signalled(
        ExportError::NonZeroExit { code: None, stderr: String::new() },
        "rendering process exited with no exit code (terminated by signal)"
    )]
    #[case::timeout(
        ExportError::TimedOut { timeout: Duration::from_secs(10), stderr: "  ".to_owned() },
        "rendering process timed out after 10s"
    )]
    #[case::sub_second_timeout(
        ExportError::TimedOut { timeout: Duration::from_millis(200), stderr: String::new() },
        "rendering process timed out after 200ms"
    )]
    fn display_omits_blank_stderr(#[case] error: ExportError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn display_appends_captured_stderr() {
        let error = ExportError::NonZeroExit {
            code: Some(1),
            stderr: "ReferenceError: page is undefined\n".to_owned(),
        };

        assert_eq!(
            error.to_string(),
            "rendering process exited with status 1\n\nstderr:\nReferenceError: page is undefined"
        );
    }
}
