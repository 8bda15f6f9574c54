//! Report content handed to an exporter.
//!
//! A report is plain data: an HTML body plus optional header and footer
//! fragments. Exporters decide how each slot is rendered; an absent or
//! empty slot renders nothing.

/// Markup fragments making up one exportable report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    content: String,
    header: Option<String>,
    footer: Option<String>,
}

impl Report {
    /// Creates a report with body content and no header or footer.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            header: None,
            footer: None,
        }
    }

    /// Sets the header fragment. An empty string leaves the slot absent.
    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = non_empty(header.into());
        self
    }

    /// Sets the footer fragment. An empty string leaves the slot absent.
    #[must_use]
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = non_empty(footer.into());
        self
    }

    /// Returns the report body markup.
    #[must_use]
    pub const fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Returns the header markup, if present.
    #[must_use]
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    /// Returns the footer markup, if present.
    #[must_use]
    pub fn footer(&self) -> Option<&str> {
        self.footer.as_deref()
    }
}

fn non_empty(fragment: String) -> Option<String> {
    if fragment.trim().is_empty() {
        None
    } else {
        Some(fragment)
    }
}
