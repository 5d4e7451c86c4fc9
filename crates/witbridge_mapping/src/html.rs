//! Rendered-field post-processing.
//!
//! Rich-text fields arrive pre-rendered as HTML from the source tracker.
//! Before the pipeline pushes them to the destination they get three passes:
//! attachment URLs referenced in the markup are substituted, the markup goes
//! through the external sanitizer, and the bundled stylesheet is prepended so
//! the rendered value keeps its source styling on the destination.

use tracing::warn;
use witbridge_model::Revision;

/// Identifier of the stylesheet prepended to rendered field values.
pub const RENDERED_STYLES: &str = "styles/rendered.css";

static RENDERED_CSS: &str = include_str!("../assets/rendered.css");

/// Read a build-time embedded text asset.
///
/// Returns `None` for unknown identifiers; callers decide whether a missing
/// asset degrades or fails.
pub fn read_embedded(id: &str) -> Option<&'static str> {
    match id {
        RENDERED_STYLES => Some(RENDERED_CSS),
        _ => None,
    }
}

/// External markup-cleanup seam.
///
/// The pipeline links a real sanitizer that resolves relative references and
/// normalizes tags for the destination; the engine only relies on the
/// text-in/text-out contract. Any `Fn(&str) -> String` satisfies it.
pub trait HtmlSanitizer {
    fn clean(&self, html: &str) -> String;
}

impl<F> HtmlSanitizer for F
where
    F: Fn(&str) -> String,
{
    fn clean(&self, html: &str) -> String {
        self(html)
    }
}

/// Post-processes rendered rich-text values before they leave the engine.
#[derive(Debug)]
pub struct HtmlFieldRewriter<S> {
    sanitizer: S,
}

impl<S: HtmlSanitizer> HtmlFieldRewriter<S> {
    pub fn new(sanitizer: S) -> Self {
        Self { sanitizer }
    }

    /// Rewrite one rendered field value.
    ///
    /// Blank input is returned unchanged. A missing or empty stylesheet
    /// asset is logged and the value goes out unstyled rather than failing
    /// the field.
    pub fn rewrite(&self, html: &str, revision: &Revision) -> String {
        if html.trim().is_empty() {
            return html.to_string();
        }

        let mut value = html.to_string();
        for url in revision.added_attachment_urls() {
            if !url.trim().is_empty() && value.contains(url) {
                value = value.replace(url, &rewritten_attachment_url(url));
            }
        }

        value = self.sanitizer.clean(&value);

        match read_embedded(RENDERED_STYLES).filter(|css| !css.trim().is_empty()) {
            Some(css) => format!("<style>{css}</style>{value}"),
            None => {
                warn!(
                    "could not read stylesheet for rendered field in {}",
                    revision.id
                );
                value
            }
        }
    }
}

/// Destination URL for an attachment referenced from rendered markup.
///
/// Attachment URLs are kept as-is until re-hosting on the target system is
/// wired up; the rewrite traversal already substitutes whatever this
/// returns.
fn rewritten_attachment_url(url: &str) -> String {
    url.to_string()
}
