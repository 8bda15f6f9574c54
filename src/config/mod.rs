//! Exporter configuration loaded from CLI, environment, and files.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – built-in exporter defaults
//! 2. **Configuration file** – `.report-export.toml` in the current
//!    directory, home directory, or XDG config directory
//! 3. **Environment variables** – `REPORT_EXPORT_CONTENT`,
//!    `REPORT_EXPORT_OUTPUT_DIR`, and so on
//! 4. **Command-line arguments** – `--content`/`-c`, `--output-dir`/`-o`, ...
//!
//! # Configuration File
//!
//! ```toml
//! content = "report.html"
//! footer = "footer.html"
//! output_dir = "out"
//! file_name = "quarterly"
//! format = "Letter"
//! options = "ignore-ssl-errors=false,proxy-type=none"
//! ```

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::export::error::ExportError;
use crate::export::options::{CommandOptions, OptionValue};
use crate::export::pdf::{DEFAULT_BINARY, DEFAULT_MARGIN, Orientation, PaperFormat};
use crate::export::settings::DEFAULT_TIMEOUT;

/// Exporter configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use report_export::ExportConfig;
///
/// let config = ExportConfig::load().expect("failed to load configuration");
/// let content = config.require_content().expect("content file required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "REPORT_EXPORT",
    discovery(
        dotfile_name = ".report-export.toml",
        config_file_name = "report-export.toml",
        app_name = "report-export"
    )
)]
pub struct ExportConfig {
    /// HTML file holding the report body.
    #[ortho_config(cli_short = 'c')]
    pub content: Option<String>,

    /// HTML fragment drawn in the header band of every page.
    #[ortho_config()]
    pub header: Option<String>,

    /// HTML fragment drawn in the footer band of every page.
    #[ortho_config()]
    pub footer: Option<String>,

    /// Directory for the rendered file. Falls back to the temp directory
    /// when unset or unusable.
    #[ortho_config(cli_short = 'o')]
    pub output_dir: Option<String>,

    /// Filename stem for the rendered file, without extension. A name is
    /// generated when unset.
    #[ortho_config(cli_short = 'n')]
    pub file_name: Option<String>,

    /// Renderer executable, looked up on `PATH` unless it is a path.
    #[ortho_config()]
    pub binary_path: String,

    /// Seconds the renderer may run before it is killed.
    #[ortho_config()]
    pub timeout_seconds: u64,

    /// Paper format name, such as `A4` or `Letter`.
    #[ortho_config()]
    pub format: String,

    /// Page orientation, `portrait` or `landscape`.
    #[ortho_config()]
    pub orientation: String,

    /// Page margin as a CSS length.
    #[ortho_config()]
    pub margin: String,

    /// Comma-separated `name=value` renderer options, for example
    /// `debug=true,proxy-type=none`.
    #[ortho_config()]
    pub options: Option<String>,

    /// Logs path resolution and option handling at debug level.
    #[ortho_config(cli_short = 'v')]
    pub verbose: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            content: None,
            header: None,
            footer: None,
            output_dir: None,
            file_name: None,
            binary_path: DEFAULT_BINARY.to_owned(),
            timeout_seconds: DEFAULT_TIMEOUT.as_secs(),
            format: PaperFormat::default().as_str().to_owned(),
            orientation: Orientation::default().as_str().to_owned(),
            margin: DEFAULT_MARGIN.to_owned(),
            options: None,
            verbose: false,
        }
    }
}

impl ExportConfig {
    /// Returns the content file or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Configuration`] when no content file is set.
    pub fn require_content(&self) -> Result<&str, ExportError> {
        self.content
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .ok_or_else(|| ExportError::Configuration {
                message: "report content file is required (use --content or -c)".to_owned(),
            })
    }

    /// Parses [`Self::options`] into renderer options, in the order given.
    ///
    /// `true` and `false` become booleans and decimal numbers become
    /// integers; anything else stays text. Empty entries are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Configuration`] when an entry has no `=` or
    /// an empty name.
    pub fn parse_options(&self) -> Result<CommandOptions, ExportError> {
        let Some(raw) = self.options.as_deref() else {
            return Ok(CommandOptions::new());
        };

        let mut parsed = CommandOptions::new();
        for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let (name, value) = entry
                .split_once('=')
                .map(|(name, value)| (name.trim(), value.trim()))
                .filter(|(name, _)| !name.is_empty())
                .ok_or_else(|| ExportError::Configuration {
                    message: format!("renderer option '{entry}' must look like name=value"),
                })?;
            parsed.set(name, OptionValue::parse(value));
        }
        Ok(parsed)
    }

    /// Returns the configured paper format.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Configuration`] for unknown format names.
    pub fn paper_format(&self) -> Result<PaperFormat, ExportError> {
        self.format.parse()
    }

    /// Returns the configured page orientation.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Configuration`] for unknown orientations.
    pub fn page_orientation(&self) -> Result<Orientation, ExportError> {
        self.orientation.parse()
    }

    /// Returns the renderer time budget.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[cfg(test)]
mod tests;
