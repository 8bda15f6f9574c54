//! Output directory and filename resolution.
//!
//! Resolution never fails. An unusable directory degrades to the
//! environment's temp directory and an unusable filename degrades to a
//! generated one, so callers who care about the requested location must
//! inspect [`OutputLocation::path`] and [`OutputLocation::file_name`]
//! afterwards.

use std::fmt;
use std::io;
use std::sync::Arc;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::OpenOptions;
use cap_std::fs_utf8::Dir;

use super::environment::ExportEnvironment;

/// Directory mode used when none is requested; leaves permissions to the umask.
pub const DEFAULT_DIR_MODE: u32 = 0o777;

const SEPARATOR: char = std::path::MAIN_SEPARATOR;

/// Resolved output directory, filename stem and extension for one export.
pub struct OutputLocation {
    path: String,
    file_name: String,
    extension: String,
    environment: Arc<dyn ExportEnvironment>,
}

impl fmt::Debug for OutputLocation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("OutputLocation")
            .field("path", &self.path)
            .field("file_name", &self.file_name)
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}

impl OutputLocation {
    /// Resolves `path` then `file_name` for files ending in `extension`.
    ///
    /// `extension` includes its leading dot (for example `.pdf`).
    #[must_use]
    pub fn resolve(
        path: &str,
        file_name: &str,
        extension: impl Into<String>,
        environment: Arc<dyn ExportEnvironment>,
    ) -> Self {
        let fallback = with_trailing_separator(environment.temp_dir().as_str());
        let mut location = Self {
            path: fallback,
            file_name: String::new(),
            extension: extension.into(),
            environment,
        };
        location.set_path(path);
        location.set_file_name(file_name);
        location
    }

    /// Returns the output directory, always ending in one separator.
    #[must_use]
    pub const fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Returns the filename stem without extension.
    #[must_use]
    pub const fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// Returns the extension appended to the filename.
    #[must_use]
    pub const fn extension(&self) -> &str {
        self.extension.as_str()
    }

    /// Returns directory, filename and extension joined.
    #[must_use]
    pub fn full_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{}{}{}", self.path, self.file_name, self.extension))
    }

    /// Uses `path` as the output directory with [`DEFAULT_DIR_MODE`].
    pub fn set_path(&mut self, path: &str) -> &mut Self {
        self.set_path_with_mode(path, DEFAULT_DIR_MODE)
    }

    /// Uses `path` as the output directory, creating it with `mode` when
    /// missing.
    ///
    /// Falls back to the temp directory when `path` is empty, cannot be
    /// created, is read-only, or (once a filename is set) the target file
    /// cannot be touched.
    pub fn set_path_with_mode(&mut self, path: &str, mode: u32) -> &mut Self {
        match self.check_directory(path, mode) {
            Ok(resolved) => self.path = resolved,
            Err(reason) => {
                let fallback = with_trailing_separator(self.environment.temp_dir().as_str());
                tracing::debug!(
                    "output directory '{path}' is unusable ({reason}); using '{fallback}'"
                );
                self.path = fallback;
            }
        }
        self
    }

    /// Uses `name` as the filename stem.
    ///
    /// Falls back to a generated name when `name` is empty, contains a path
    /// separator, or names an existing read-only file in the output
    /// directory.
    pub fn set_file_name(&mut self, name: &str) -> &mut Self {
        match self.check_file_name(name) {
            Ok(()) => name.clone_into(&mut self.file_name),
            Err(reason) => {
                let generated = self.environment.generated_file_name();
                tracing::debug!("filename '{name}' is unusable ({reason}); using '{generated}'");
                self.file_name = generated;
            }
        }
        self
    }

    fn check_directory(&self, path: &str, mode: u32) -> Result<String, String> {
        if path.is_empty() {
            return Err("no directory requested".to_owned());
        }

        let directory = absolute(Utf8Path::new(path))
            .map_err(|error| format!("cannot resolve directory: {error}"))?;
        let dir = ensure_directory(&directory, mode)
            .map_err(|error| format!("cannot create directory: {error}"))?;
        if dir
            .dir_metadata()
            .is_ok_and(|metadata| metadata.permissions().readonly())
        {
            return Err("directory is read-only".to_owned());
        }

        if !self.file_name.is_empty() {
            let target = format!("{}{}", self.file_name, self.extension);
            touch(&dir, &target)
                .map_err(|error| format!("cannot touch '{target}' in '{directory}': {error}"))?;
        }
        Ok(with_trailing_separator(directory.as_str()))
    }

    fn check_file_name(&self, name: &str) -> Result<(), &'static str> {
        if name.is_empty() {
            return Err("no filename requested");
        }
        if name.contains(['/', '\\', '\0']) {
            return Err("filename contains a path separator");
        }

        let target = format!("{name}{}", self.extension);
        if is_read_only_file(Utf8Path::new(&self.path), &target) {
            return Err("target file exists and is read-only");
        }
        Ok(())
    }
}

fn with_trailing_separator(path: &str) -> String {
    let trimmed = path.trim_end_matches(['/', SEPARATOR]);
    format!("{trimmed}{SEPARATOR}")
}

/// Joins a relative `path` onto the current directory, dropping `.`
/// segments.
///
/// `..` segments are kept so symlinked parents resolve the way the
/// filesystem resolves them.
fn absolute(path: &Utf8Path) -> io::Result<Utf8PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let current = Utf8PathBuf::from_path_buf(std::env::current_dir()?).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            "current directory is not valid UTF-8",
        )
    })?;
    Ok(current
        .join(path)
        .components()
        .filter(|component| !matches!(component, Utf8Component::CurDir))
        .collect())
}

/// Opens `path` as a directory, creating it with `mode` when missing.
fn ensure_directory(path: &Utf8Path, mode: u32) -> io::Result<Dir> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => return Ok(dir),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => return Err(error),
    }

    Dir::create_ambient_dir_all(path, ambient_authority())?;
    apply_mode(path, mode)?;
    Dir::open_ambient_dir(path, ambient_authority())
}

#[cfg(unix)]
fn apply_mode(path: &Utf8Path, mode: u32) -> io::Result<()> {
    use cap_std::fs::PermissionsExt;

    if mode == DEFAULT_DIR_MODE {
        return Ok(());
    }
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return Ok(());
    };
    let parent_dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    let mut permissions = parent_dir.metadata(name)?.permissions();
    permissions.set_mode(mode);
    parent_dir.set_permissions(name, permissions)
}

#[cfg(not(unix))]
fn apply_mode(_path: &Utf8Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

fn is_read_only_file(directory: &Utf8Path, name: &str) -> bool {
    Dir::open_ambient_dir(directory, ambient_authority())
        .and_then(|dir| dir.metadata(name))
        .is_ok_and(|metadata| metadata.is_file() && metadata.permissions().readonly())
}

fn touch(dir: &Dir, name: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    dir.open_with(name, &options).map(drop)
}

#[cfg(test)]
#[path = "location_tests.rs"]
mod tests;
