//! Tests for content, option, and page geometry resolution.

use std::time::Duration;

use rstest::rstest;

use crate::ExportConfig;
use crate::export::error::ExportError;
use crate::export::options::OptionValue;
use crate::export::pdf::{Orientation, PaperFormat};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[rstest]
#[case::missing(None)]
#[case::blank(Some("  "))]
fn require_content_rejects_missing_file(#[case] content: Option<&str>) {
    let config = ExportConfig {
        content: content.map(str::to_owned),
        ..Default::default()
    };

    let result = config.require_content();

    assert!(
        matches!(result, Err(ExportError::Configuration { .. })),
        "got {result:?}"
    );
}

#[rstest]
fn require_content_returns_path() -> TestResult {
    let config = ExportConfig {
        content: Some("report.html".to_owned()),
        ..Default::default()
    };

    assert_eq!(config.require_content()?, "report.html");
    Ok(())
}

#[rstest]
fn parse_options_keeps_order_and_types() -> TestResult {
    let config = ExportConfig {
        options: Some("debug=true, local-storage-quota=512 ,proxy-type=none,,".to_owned()),
        ..Default::default()
    };

    let options = config.parse_options()?;
    let parsed: Vec<_> = options.iter().collect();

    assert_eq!(
        parsed,
        vec![
            ("debug", &OptionValue::Bool(true)),
            ("local-storage-quota", &OptionValue::Integer(512)),
            ("proxy-type", &OptionValue::from("none")),
        ]
    );
    Ok(())
}

#[rstest]
fn parse_options_without_value_is_empty() -> TestResult {
    assert!(ExportConfig::default().parse_options()?.is_empty());
    Ok(())
}

#[rstest]
#[case::no_equals("debug")]
#[case::empty_name("=true")]
fn parse_options_rejects_malformed_entries(#[case] raw: &str) {
    let config = ExportConfig {
        options: Some(raw.to_owned()),
        ..Default::default()
    };

    let result = config.parse_options();

    assert!(
        matches!(result, Err(ExportError::Configuration { ref message }) if message.contains(raw)),
        "got {result:?}"
    );
}

#[rstest]
fn page_geometry_parses_names() -> TestResult {
    let config = ExportConfig {
        format: "Tabloid".to_owned(),
        orientation: "landscape".to_owned(),
        timeout_seconds: 42,
        ..Default::default()
    };

    assert_eq!(config.paper_format()?, PaperFormat::Tabloid);
    assert_eq!(config.page_orientation()?, Orientation::Landscape);
    assert_eq!(config.timeout(), Duration::from_secs(42));
    Ok(())
}

#[rstest]
fn unknown_paper_format_is_a_configuration_error() {
    let config = ExportConfig {
        format: "B5".to_owned(),
        ..Default::default()
    };

    assert!(matches!(
        config.paper_format(),
        Err(ExportError::Configuration { .. })
    ));
}
