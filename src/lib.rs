//! Report export library.
//!
//! Renders a [`Report`] (HTML content with optional header and footer
//! fragments) to a file through an external renderer. Output locations and
//! renderer options degrade to safe defaults; only
//! [`Exporter::generate`] can fail.

pub mod config;
pub mod export;
pub mod report;

pub use config::ExportConfig;
pub use export::{
    CommandOptions, ExportError, ExportSettings, Exporter, OptionKind, OptionRejection,
    OptionSchema, OptionValue, Orientation, PaperFormat, PdfExporter, compress,
};
pub use report::Report;
