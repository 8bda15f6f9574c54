//! Tests for configuration layer precedence.

use rstest::rstest;
use serde_json::{Value, json};

use super::helpers::{Layer, compose_export_config};

#[rstest]
#[case::file_overrides_defaults(
    vec![(Layer::Defaults, json!({"content": "default.html"})), (Layer::File, json!({"content": "file.html"}))],
    "file.html",
    "file should override default"
)]
#[case::environment_overrides_file(
    vec![(Layer::File, json!({"content": "file.html"})), (Layer::Environment, json!({"content": "env.html"}))],
    "env.html",
    "environment should override file"
)]
#[case::cli_overrides_environment(
    vec![(Layer::Environment, json!({"content": "env.html"})), (Layer::Cli, json!({"content": "cli.html"}))],
    "cli.html",
    "CLI should override environment"
)]
fn content_layer_precedence(
    #[case] layers: Vec<(Layer, Value)>,
    #[case] expected: &str,
    #[case] message: &str,
) {
    let config = compose_export_config(&layers);

    assert_eq!(config.content.as_deref(), Some(expected), "{message}");
}

#[rstest]
fn unset_fields_keep_exporter_defaults() {
    let config = compose_export_config(&[(Layer::Cli, json!({"content": "report.html"}))]);

    assert_eq!(config.binary_path, "phantomjs");
    assert_eq!(config.timeout_seconds, 10);
    assert_eq!(config.format, "A4");
    assert_eq!(config.orientation, "portrait");
    assert_eq!(config.margin, "1cm");
    assert!(config.output_dir.is_none());
    assert!(config.file_name.is_none());
    assert!(config.options.is_none());
    assert!(!config.verbose);
}

#[rstest]
fn full_precedence_chain() {
    let config = compose_export_config(&[
        (
            Layer::Defaults,
            json!({"format": "A5", "timeout_seconds": 5, "output_dir": "default-out"}),
        ),
        (
            Layer::File,
            json!({"format": "Letter", "timeout_seconds": 30, "output_dir": "file-out"}),
        ),
        (Layer::Environment, json!({"format": "Legal", "output_dir": "env-out"})),
        (Layer::Cli, json!({"output_dir": "cli-out"})),
    ]);

    assert_eq!(config.output_dir.as_deref(), Some("cli-out"), "CLI wins");
    assert_eq!(config.format, "Legal", "environment wins for format");
    assert_eq!(config.timeout_seconds, 30, "file wins for timeout");
}
