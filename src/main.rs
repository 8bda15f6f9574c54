//! CLI entrypoint rendering a report from HTML fragments on disk.

use std::io::{self, Write};
use std::process::ExitCode;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use ortho_config::OrthoConfig;
use report_export::{ExportConfig, ExportError, Exporter, PdfExporter, Report};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ExportError> {
    let config = load_config()?;
    setup_logging(config.verbose);

    let report = load_report(&config)?;
    let mut exporter = PdfExporter::new(
        config.output_dir.as_deref().unwrap_or_default(),
        config.file_name.as_deref().unwrap_or_default(),
        config.parse_options()?,
    );
    exporter
        .set_paper_format(config.paper_format()?)
        .set_page_orientation(config.page_orientation()?)
        .set_margin(config.margin.as_str())
        .set_binary_path(config.binary_path.as_str());
    exporter.settings_mut().set_timeout(config.timeout());

    let written = exporter.generate(&report)?;

    writeln!(io::stdout().lock(), "{written}").map_err(|error| ExportError::Io {
        message: error.to_string(),
    })
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ExportError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<ExportConfig, ExportError> {
    ExportConfig::load().map_err(|error| ExportError::Configuration {
        message: error.to_string(),
    })
}

/// Installs a stderr subscriber; `RUST_LOG` wins over `--verbose`.
fn setup_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_report(config: &ExportConfig) -> Result<Report, ExportError> {
    let mut report = Report::new(read_fragment(config.require_content()?)?);
    if let Some(header) = config.header.as_deref() {
        report = report.with_header(read_fragment(header)?);
    }
    if let Some(footer) = config.footer.as_deref() {
        report = report.with_footer(read_fragment(footer)?);
    }
    Ok(report)
}

fn read_fragment(path: &str) -> Result<String, ExportError> {
    let file = Utf8Path::new(path);
    let name = file.file_name().ok_or_else(|| ExportError::Configuration {
        message: format!("'{path}' does not name a file"),
    })?;
    let parent = file
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));

    Dir::open_ambient_dir(parent, ambient_authority())
        .and_then(|dir| dir.read_to_string(name))
        .map_err(|error| ExportError::Io {
            message: format!("failed to read '{path}': {error}"),
        })
}
