//! Report exporters.
//!
//! An exporter resolves where its output goes, declares which renderer
//! options it understands, and turns a [`Report`] into a file by running an
//! external renderer.
//!
//! Only [`Exporter::generate`] can fail. Unusable directories and filenames
//! fall back to the temp directory and a generated name, and rejected
//! options are dropped.

pub mod command;
pub mod compress;
pub mod environment;
pub mod error;
pub mod location;
pub mod options;
pub mod pdf;
pub mod process;
pub mod settings;

use camino::Utf8PathBuf;

pub use command::{mount_command_options, option_flags};
pub use compress::compress;
pub use environment::{ExportEnvironment, SystemEnvironment};
pub use error::ExportError;
pub use location::{DEFAULT_DIR_MODE, OutputLocation};
pub use options::{CommandOptions, OptionKind, OptionRejection, OptionSchema, OptionValue};
pub use pdf::{Orientation, PaperFormat, PdfExporter};
pub use process::{ProcessRunner, RenderCommand, SystemProcessRunner};
pub use settings::{DEFAULT_TIMEOUT, ExportSettings};

use crate::report::Report;

/// Common contract of every output format.
pub trait Exporter {
    /// Returns the location, timeout and option declarations.
    fn settings(&self) -> &ExportSettings;

    /// Returns the settings for modification.
    fn settings_mut(&mut self) -> &mut ExportSettings;

    /// Installs the format's option schema and defaults, then applies the
    /// options supplied at construction.
    fn initialize(&mut self);

    /// Renders `report` and returns the path of the written file.
    ///
    /// # Errors
    ///
    /// Returns an [`ExportError`] when the renderer is missing, cannot be
    /// started, exits unsuccessfully or overruns its timeout.
    fn generate(&self, report: &Report) -> Result<Utf8PathBuf, ExportError>;

    /// Returns where [`Self::generate`] writes its output.
    fn full_path(&self) -> Utf8PathBuf {
        self.settings().full_path()
    }
}
