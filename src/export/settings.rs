//! State shared by every exporter.

use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;

use super::environment::ExportEnvironment;
use super::location::OutputLocation;
use super::options::{CommandOptions, OptionSchema};

/// Time budget for one rendering process when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Output location, timeout and option declarations of one exporter.
#[derive(Debug)]
pub struct ExportSettings {
    location: OutputLocation,
    timeout: Duration,
    valid_options: OptionSchema,
    default_options: CommandOptions,
}

impl ExportSettings {
    /// Resolves the output location and starts with no declared options.
    #[must_use]
    pub fn new(
        path: &str,
        file_name: &str,
        extension: &str,
        environment: Arc<dyn ExportEnvironment>,
    ) -> Self {
        Self {
            location: OutputLocation::resolve(path, file_name, extension, environment),
            timeout: DEFAULT_TIMEOUT,
            valid_options: OptionSchema::new(),
            default_options: CommandOptions::new(),
        }
    }

    /// Returns the resolved output location.
    #[must_use]
    pub const fn location(&self) -> &OutputLocation {
        &self.location
    }

    /// Returns the output directory, ending in one separator.
    #[must_use]
    pub const fn path(&self) -> &str {
        self.location.path()
    }

    /// Changes the output directory; see [`OutputLocation::set_path`].
    pub fn set_path(&mut self, path: &str) -> &mut Self {
        self.location.set_path(path);
        self
    }

    /// Changes the output directory, creating it with `mode` when missing.
    pub fn set_path_with_mode(&mut self, path: &str, mode: u32) -> &mut Self {
        self.location.set_path_with_mode(path, mode);
        self
    }

    /// Returns the filename stem.
    #[must_use]
    pub const fn file_name(&self) -> &str {
        self.location.file_name()
    }

    /// Changes the filename stem; see [`OutputLocation::set_file_name`].
    pub fn set_file_name(&mut self, name: &str) -> &mut Self {
        self.location.set_file_name(name);
        self
    }

    /// Returns where the rendered file is written.
    #[must_use]
    pub fn full_path(&self) -> Utf8PathBuf {
        self.location.full_path()
    }

    /// Returns the rendering time budget.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sets the rendering time budget.
    pub const fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// Returns the declared option rules.
    #[must_use]
    pub const fn config_valid_options(&self) -> &OptionSchema {
        &self.valid_options
    }

    /// Replaces the declared option rules.
    pub fn set_config_valid_options(&mut self, schema: OptionSchema) -> &mut Self {
        self.valid_options = schema;
        self
    }

    /// Returns the options applied when the exporter initialises.
    #[must_use]
    pub const fn config_default_options(&self) -> &CommandOptions {
        &self.default_options
    }

    /// Replaces the options applied when the exporter initialises.
    pub fn set_config_default_options(&mut self, defaults: CommandOptions) -> &mut Self {
        self.default_options = defaults;
        self
    }
}
