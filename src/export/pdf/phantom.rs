//! Command-line surface of the PhantomJS renderer.

use crate::export::options::{CommandOptions, OptionKind, OptionSchema, OptionValue};

/// Renderer looked up on `PATH` when no binary is configured.
pub const DEFAULT_BINARY: &str = "phantomjs";

/// Options PhantomJS accepts on its command line.
///
/// `integer` is not a checked kind, so those options pass through
/// unvalidated.
#[must_use]
pub fn option_schema() -> OptionSchema {
    [
        ("cookies-file", OptionKind::String),
        ("config", OptionKind::String),
        ("debug", OptionKind::Bool),
        ("disk-cache", OptionKind::Bool),
        ("ignore-ssl-errors", OptionKind::Bool),
        ("load-images", OptionKind::Bool),
        ("local-storage-path", OptionKind::String),
        ("local-storage-quota", OptionKind::from_tag("integer")),
        ("local-to-remote-url-access", OptionKind::Bool),
        ("max-disk-cache-size", OptionKind::from_tag("integer")),
        ("output-encoding", OptionKind::String),
        ("proxy", OptionKind::String),
        ("proxy-auth", OptionKind::String),
        ("proxy-type", OptionKind::one_of(["http", "socks5", "none"])),
        ("script-encoding", OptionKind::String),
        (
            "ssl-protocol",
            OptionKind::one_of(["sslv3", "sslv2", "tlsv1", "any"]),
        ),
        ("ssl-certificates-path", OptionKind::String),
        ("web-security", OptionKind::Bool),
    ]
    .into_iter()
    .collect()
}

/// Options applied before any configured overrides.
#[must_use]
pub fn default_options() -> CommandOptions {
    [
        ("debug", OptionValue::Bool(false)),
        ("ignore-ssl-errors", OptionValue::Bool(true)),
        ("load-images", OptionValue::Bool(true)),
        ("ssl-protocol", OptionValue::from("any")),
    ]
    .into_iter()
    .collect()
}
