//! PDF export through a headless PhantomJS renderer.
//!
//! [`PdfExporter`] writes the report as an HTML document plus a small
//! rendering script into the temp directory, then runs the renderer with
//! the validated command options. The renderer writes the PDF straight to
//! the resolved output path.

mod artifacts;
mod paper;
mod phantom;
mod script;

use std::fmt;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};

pub use paper::{BAND_HEIGHT, DEFAULT_MARGIN, Orientation, PaperFormat};
pub use phantom::{DEFAULT_BINARY, default_options, option_schema};
pub use script::{HostOs, PageSetup, prefix_os_path, render_document, render_script};

use self::artifacts::RenderArtifacts;
use super::command::{mount_command_options, option_flags};
use super::environment::{ExportEnvironment, SystemEnvironment};
use super::error::ExportError;
use super::options::{CommandOptions, OptionRejection, OptionValue};
use super::process::{ProcessRunner, RenderCommand, SystemProcessRunner};
use super::settings::ExportSettings;
use super::Exporter;
use crate::report::Report;

/// Exports reports as PDF files.
pub struct PdfExporter {
    settings: ExportSettings,
    config: CommandOptions,
    options: CommandOptions,
    format: PaperFormat,
    orientation: Orientation,
    margin: String,
    binary_path: String,
    environment: Arc<dyn ExportEnvironment>,
    runner: Arc<dyn ProcessRunner>,
}

impl fmt::Debug for PdfExporter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PdfExporter")
            .field("settings", &self.settings)
            .field("options", &self.options)
            .field("format", &self.format)
            .field("orientation", &self.orientation)
            .field("margin", &self.margin)
            .field("binary_path", &self.binary_path)
            .finish_non_exhaustive()
    }
}

impl PdfExporter {
    /// File extension of the rendered output.
    pub const EXTENSION: &'static str = ".pdf";

    /// Creates an initialised exporter writing to `path`/`file_name`.pdf.
    ///
    /// Either location part may be empty, in which case the temp directory
    /// or a generated name is used. Entries of `config` are applied on top
    /// of the default options through [`Self::add_command_option`].
    #[must_use]
    pub fn new(path: &str, file_name: &str, config: CommandOptions) -> Self {
        Self::with_capabilities(
            path,
            file_name,
            config,
            Arc::new(SystemEnvironment),
            Arc::new(SystemProcessRunner::new()),
        )
    }

    /// Creates an initialised exporter using the given environment and runner.
    #[must_use]
    pub fn with_capabilities(
        path: &str,
        file_name: &str,
        config: CommandOptions,
        environment: Arc<dyn ExportEnvironment>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        let mut exporter = Self {
            settings: ExportSettings::new(
                path,
                file_name,
                Self::EXTENSION,
                Arc::clone(&environment),
            ),
            config,
            options: CommandOptions::new(),
            format: PaperFormat::default(),
            orientation: Orientation::default(),
            margin: DEFAULT_MARGIN.to_owned(),
            binary_path: DEFAULT_BINARY.to_owned(),
            environment,
            runner,
        };
        exporter.initialize();
        exporter
    }

    /// Returns the paper format.
    #[must_use]
    pub const fn format(&self) -> PaperFormat {
        self.format
    }

    /// Sets the paper format by name; unknown names are ignored.
    pub fn set_format(&mut self, name: &str) -> &mut Self {
        match name.parse() {
            Ok(format) => self.format = format,
            Err(error) => tracing::debug!("keeping paper format {}: {error}", self.format),
        }
        self
    }

    /// Sets the paper format.
    pub const fn set_paper_format(&mut self, format: PaperFormat) -> &mut Self {
        self.format = format;
        self
    }

    /// Returns the page orientation.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Sets the orientation by name; unknown names are ignored.
    pub fn set_orientation(&mut self, name: &str) -> &mut Self {
        match name.parse() {
            Ok(orientation) => self.orientation = orientation,
            Err(error) => tracing::debug!("keeping orientation {}: {error}", self.orientation),
        }
        self
    }

    /// Sets the page orientation.
    pub const fn set_page_orientation(&mut self, orientation: Orientation) -> &mut Self {
        self.orientation = orientation;
        self
    }

    /// Returns the page margin.
    #[must_use]
    pub fn margin(&self) -> &str {
        &self.margin
    }

    /// Sets the page margin as a CSS length.
    pub fn set_margin(&mut self, margin: impl Into<String>) -> &mut Self {
        self.margin = margin.into();
        self
    }

    /// Returns the renderer binary as configured.
    #[must_use]
    pub fn binary_path(&self) -> &str {
        &self.binary_path
    }

    /// Sets the renderer binary: a name looked up on `PATH` or a path.
    pub fn set_binary_path(&mut self, binary_path: impl Into<String>) -> &mut Self {
        self.binary_path = binary_path.into();
        self
    }

    /// Returns the options passed to the renderer.
    #[must_use]
    pub const fn command_options(&self) -> &CommandOptions {
        &self.options
    }

    /// Replaces every option without validation.
    pub fn set_command_options(&mut self, options: CommandOptions) -> &mut Self {
        self.options = options;
        self
    }

    /// Merges one option if the schema accepts it, otherwise leaves the
    /// options untouched.
    pub fn add_command_option(&mut self, name: &str, value: impl Into<OptionValue>) -> &mut Self {
        if let Err(rejection) = self.try_add_command_option(name, value) {
            tracing::debug!("ignoring command option: {rejection}");
        }
        self
    }

    /// Merges one option, reporting why it was rejected.
    ///
    /// # Errors
    ///
    /// Returns the [`OptionRejection`] when `name` is undeclared or `value`
    /// fails its rule; the options are unchanged in that case.
    pub fn try_add_command_option(
        &mut self,
        name: &str,
        value: impl Into<OptionValue>,
    ) -> Result<(), OptionRejection> {
        let option_value = value.into();
        self.settings
            .config_valid_options()
            .validate(name, &option_value)?;
        self.options.set(name, option_value);
        Ok(())
    }

    /// Renders the options as space-joined `--name=value` flags.
    #[must_use]
    pub fn mount_command_options(&self) -> String {
        mount_command_options(&self.options)
    }

    /// Builds the compressed rendering script that prints `report` to
    /// `output_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Script`] if the script cannot be rendered.
    pub fn mount_script_for_export(
        &self,
        report: &Report,
        output_path: &Utf8Path,
    ) -> Result<String, ExportError> {
        let page = PageSetup {
            format: self.format,
            orientation: self.orientation,
            margin: &self.margin,
        };
        render_script(report, &page, output_path)
    }

    fn resolve_binary(&self) -> Result<Utf8PathBuf, ExportError> {
        let unavailable = |message: String| ExportError::BinaryNotFound {
            binary: self.binary_path.clone(),
            message,
        };
        let found = which::which(&self.binary_path).map_err(|e| unavailable(e.to_string()))?;
        Utf8PathBuf::from_path_buf(found)
            .map_err(|path| unavailable(format!("'{}' is not valid UTF-8", path.display())))
    }
}

impl Exporter for PdfExporter {
    fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut ExportSettings {
        &mut self.settings
    }

    fn initialize(&mut self) {
        self.settings
            .set_config_valid_options(option_schema())
            .set_config_default_options(default_options());
        self.options = self.settings.config_default_options().clone();

        let overrides = self.config.clone();
        for (name, value) in overrides.iter() {
            self.add_command_option(name, value.clone());
        }
    }

    fn generate(&self, report: &Report) -> Result<Utf8PathBuf, ExportError> {
        let binary = self.resolve_binary()?;
        let output = self.full_path();

        let artifacts = RenderArtifacts::write(
            &self.environment.temp_dir(),
            self.settings.file_name(),
            &render_document(report)?,
            &self.mount_script_for_export(report, &output)?,
        )?;
        let document = prefix_os_path(artifacts.document_path().as_str(), HostOs::current());

        let command = RenderCommand::new(binary, self.settings.timeout())
            .with_args(option_flags(&self.options))
            .with_args([artifacts.script_path().as_str().to_owned(), document]);
        self.runner.run(&command)?;

        tracing::info!("exported report to {output}");
        Ok(output)
    }
}
