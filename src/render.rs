//! Raw panes and sandboxed preview for a generation result.
//!
//! Generated markup is untrusted. The preview document is only ever shown
//! inside a sandbox without `allow-same-origin`, which gives it an opaque
//! origin: no access to the host page, its cookies or its storage, and no
//! top-level navigation.

use crate::generation::GenerationResult;

/// Placeholder for the HTML pane before any success.
pub const HTML_PLACEHOLDER: &str = "Your generated HTML will appear here...";
/// Placeholder for the CSS pane before any success.
pub const CSS_PLACEHOLDER: &str = "Your generated CSS will appear here...";
/// Shown instead of the preview frame while both fields are empty.
pub const PREVIEW_PLACEHOLDER: &str = "Your design preview will appear here after generation";

/// `sandbox` attribute for the preview iframe. Scripts run, but in an opaque
/// origin with no forms, popups or top navigation.
pub const PREVIEW_SANDBOX: &str = "allow-scripts";
/// `Content-Security-Policy` for the standalone preview response.
pub const PREVIEW_CSP: &str = "sandbox allow-scripts";

/// Which raw pane is selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    /// Markup pane.
    #[default]
    Html,
    /// Stylesheet pane.
    Css,
}

impl Tab {
    /// Lowercase name used in routes and markup.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Css => "css",
        }
    }

    /// Parse a route segment.
    #[must_use]
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "html" => Some(Self::Html),
            "css" => Some(Self::Css),
            _ => None,
        }
    }
}

/// The two raw-text panes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panes {
    /// Markup, verbatim.
    pub html: String,
    /// Stylesheet, verbatim.
    pub css: String,
}

impl Panes {
    /// Raw content of `tab`.
    #[must_use]
    pub fn get(&self, tab: Tab) -> &str {
        match tab {
            Tab::Html => &self.html,
            Tab::Css => &self.css,
        }
    }

    /// Text to display for `tab`.
    ///
    /// An empty pane shows its placeholder unless the content came from a
    /// successful generation, in which case empty is shown as empty.
    #[must_use]
    pub fn display(&self, tab: Tab, succeeded: bool) -> &str {
        let raw = self.get(tab);
        if raw.is_empty() && !succeeded {
            match tab {
                Tab::Html => HTML_PLACEHOLDER,
                Tab::Css => CSS_PLACEHOLDER,
            }
        } else {
            raw
        }
    }
}

/// Panes plus the standalone preview document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Raw panes.
    pub panes: Panes,
    /// Complete HTML document embedding both fields.
    pub preview_document: String,
}

impl Rendered {
    /// Whether there is anything to preview.
    #[must_use]
    pub fn has_preview(&self) -> bool {
        !(self.panes.html.is_empty() && self.panes.css.is_empty())
    }
}

/// Render `result` into panes and a preview document.
#[must_use]
pub fn render(result: &GenerationResult) -> Rendered {
    Rendered {
        panes: Panes {
            html: result.markup.clone(),
            css: result.stylesheet.clone(),
        },
        preview_document: preview_document(result),
    }
}

/// Minimal standalone document: stylesheet in the head, markup in the body.
#[must_use]
pub fn preview_document(result: &GenerationResult) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        result.stylesheet, result.markup
    )
}

/// Sandboxed iframe carrying `document` inline through `srcdoc`.
#[must_use]
pub fn preview_frame(document: &str) -> String {
    format!(
        r#"<iframe title="preview" class="preview-frame" sandbox="{PREVIEW_SANDBOX}" referrerpolicy="no-referrer" loading="lazy" srcdoc="{}"></iframe>"#,
        escape_html(document)
    )
}

/// Escape text for HTML content and double-quoted attributes.
#[must_use]
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
