//! Transient files consumed by one rendering run.

use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::{Builder, NamedTempFile};

use crate::export::error::ExportError;

/// The HTML document and script written for one run.
///
/// Each file is named `<stem>.<random>.html` or `<stem>.<random>.js`, so
/// concurrent runs and unrelated files in the same directory are never
/// touched. Both files are removed when this value is dropped; removal
/// failures are logged and otherwise ignored.
#[derive(Debug)]
pub(super) struct RenderArtifacts {
    document: Artifact,
    script: Artifact,
}

impl RenderArtifacts {
    /// Writes the document and script into `directory`.
    pub(super) fn write(
        directory: &Utf8Path,
        stem: &str,
        document: &str,
        script: &str,
    ) -> Result<Self, ExportError> {
        Ok(Self {
            document: Artifact::create(directory, stem, ".html", document)?,
            script: Artifact::create(directory, stem, ".js", script)?,
        })
    }

    pub(super) fn document_path(&self) -> &Utf8Path {
        &self.document.path
    }

    pub(super) fn script_path(&self) -> &Utf8Path {
        &self.script.path
    }
}

#[derive(Debug)]
struct Artifact {
    file: Option<NamedTempFile>,
    path: Utf8PathBuf,
}

impl Artifact {
    fn create(
        directory: &Utf8Path,
        stem: &str,
        suffix: &str,
        contents: &str,
    ) -> Result<Self, ExportError> {
        let failed = |action: &str, error: io::Error| ExportError::Io {
            message: format!("failed to {action} {stem}{suffix} artifact in '{directory}': {error}"),
        };

        let mut file = Builder::new()
            .prefix(&format!("{stem}."))
            .suffix(suffix)
            .tempfile_in(directory)
            .map_err(|error| failed("create", error))?;
        file.write_all(contents.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|error| failed("write", error))?;

        let path = Utf8PathBuf::from_path_buf(file.path().to_path_buf()).map_err(|path| {
            ExportError::Io {
                message: format!("artifact path '{}' is not valid UTF-8", path.display()),
            }
        })?;
        Ok(Self {
            file: Some(file),
            path,
        })
    }
}

impl Drop for Artifact {
    fn drop(&mut self) {
        if let Some(file) = self.file.take()
            && let Err(error) = file.close()
        {
            tracing::warn!("failed to remove '{}': {error}", self.path);
        }
    }
}
