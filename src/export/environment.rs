//! Ambient state the exporters depend on.
//!
//! Temp-directory lookup and fallback filename generation sit behind the
//! [`ExportEnvironment`] trait so tests can pin both without touching the
//! real clock or the process environment.

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};

/// Prefix shared by every generated report filename.
pub const GENERATED_NAME_PREFIX: &str = "report-";

/// Capability providing the fallback directory and filename.
#[cfg_attr(test, mockall::automock)]
pub trait ExportEnvironment: Send + Sync {
    /// Directory used when the requested output directory is unusable.
    fn temp_dir(&self) -> Utf8PathBuf;

    /// Filename stem used when the requested filename is unusable.
    ///
    /// Implementations must return a non-empty name without extension.
    fn generated_file_name(&self) -> String;
}

/// Production environment backed by the OS temp directory and wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnvironment;

impl ExportEnvironment for SystemEnvironment {
    fn temp_dir(&self) -> Utf8PathBuf {
        let native = std::env::temp_dir();
        Utf8PathBuf::from_path_buf(native)
            .unwrap_or_else(|lossy| Utf8PathBuf::from(lossy.to_string_lossy().into_owned()))
    }

    fn generated_file_name(&self) -> String {
        generated_name_at(Utc::now())
    }
}

/// Derives the fallback name `report-<hash>` from a timestamp.
///
/// Two calls within the same nanosecond produce the same name; callers
/// needing isolation should pass distinct filenames.
#[must_use]
pub fn generated_name_at(now: DateTime<Utc>) -> String {
    let seed = now.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true);
    let hash = blake3::hash(seed.as_bytes());
    format!("{GENERATED_NAME_PREFIX}{}", hash.to_hex())
}
