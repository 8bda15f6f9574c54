//! Rendering script and HTML document handed to the PDF renderer.
//!
//! The script template is compressed before any value is spliced in, so
//! paths and report markup reach the renderer untouched. Every value is
//! JSON-encoded first and cannot break out of its string literal.

use std::sync::LazyLock;

use camino::Utf8Path;
use minijinja::{Environment, context};

use super::paper::{BAND_HEIGHT, Orientation, PaperFormat};
use crate::export::compress::compress;
use crate::export::error::ExportError;
use crate::report::Report;

const DOCUMENT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
</head>
<body>
{{ content }}
</body>
</html>
"#;

const SCRIPT_TEMPLATE: &str = r#"/*
 * Loads the document named by the first argument, lays it out on the
 * configured paper and prints it to the output file.
 */
var system = require("system"),
    page = require("webpage").create();

page.viewportSize = { width: 600, height: 600 };
page.paperSize = {
    format: {{ format }},
    orientation: {{ orientation }},
    margin: {{ margin }}{% if header %},
    header: {
        height: {{ band_height }},
        contents: phantom.callback(function (pageNum, numPages) {
            return {{ header }};
        })
    }{% endif %}{% if footer %},
    footer: {
        height: {{ band_height }},
        contents: phantom.callback(function (pageNum, numPages) {
            return {{ footer }};
        })
    }{% endif %}
};

page.open(system.args[1], function (status) {
    if (status !== "success") {
        console.error("unable to load " + system.args[1]);
        phantom.exit(1);
        return;
    }
    window.setTimeout(function () {
        page.render({{ output_path }});
        phantom.exit(0);
    }, 250);
});
"#;

static COMPRESSED_SCRIPT_TEMPLATE: LazyLock<String> =
    LazyLock::new(|| compress(SCRIPT_TEMPLATE));

/// Operating system family of the host running the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    /// Windows, where local documents must be addressed by `file:` URL.
    Windows,
    /// Any other host; native paths are used as-is.
    Other,
}

impl HostOs {
    /// Returns the family this binary was built for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Other
        }
    }
}

/// Adapts a local document path to what the renderer can open on `os`.
#[must_use]
pub fn prefix_os_path(path: &str, os: HostOs) -> String {
    match os {
        HostOs::Windows => format!("file:///{}", path.replace('\\', "/")),
        HostOs::Other => path.to_owned(),
    }
}

/// Page geometry embedded into the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSetup<'a> {
    /// Paper size.
    pub format: PaperFormat,
    /// Page orientation.
    pub orientation: Orientation,
    /// CSS length applied to every edge.
    pub margin: &'a str,
}

/// Wraps the report content in a minimal UTF-8 HTML document.
///
/// # Errors
///
/// Returns [`ExportError::Script`] if the template fails to render.
pub fn render_document(report: &Report) -> Result<String, ExportError> {
    render(DOCUMENT_TEMPLATE, context! { content => report.content() })
}

/// Renders the compressed script that prints `report` to `output_path`.
///
/// # Errors
///
/// Returns [`ExportError::Script`] if a value cannot be encoded or the
/// template fails to render.
pub fn render_script(
    report: &Report,
    page: &PageSetup<'_>,
    output_path: &Utf8Path,
) -> Result<String, ExportError> {
    render(
        &COMPRESSED_SCRIPT_TEMPLATE,
        context! {
            format => js_string(page.format.as_str())?,
            orientation => js_string(page.orientation.as_str())?,
            margin => js_string(page.margin)?,
            band_height => js_string(BAND_HEIGHT)?,
            header => report.header().map(js_string).transpose()?,
            footer => report.footer().map(js_string).transpose()?,
            output_path => js_string(output_path.as_str())?,
        },
    )
}

fn js_string(value: &str) -> Result<String, ExportError> {
    serde_json::to_string(value).map_err(|e| ExportError::Script {
        message: format!("failed to encode script value: {e}"),
    })
}

fn render(source: &str, ctx: minijinja::Value) -> Result<String, ExportError> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| minijinja::AutoEscape::None);

    env.render_str(source, ctx).map_err(|e| ExportError::Script {
        message: format!("template rendering failed: {e}"),
    })
}
