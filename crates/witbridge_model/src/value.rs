//! Field values as carried by a source revision.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One field value from a source revision.
///
/// The source tracker hands back an untyped bag of field values; this variant
/// type covers the shapes that actually occur. Deserialization is untagged so
/// fetchers can hydrate a revision straight from tracker JSON (`"abc"`,
/// `3600`, `true`, `["a","b"]`). A string in RFC 3339 form becomes a
/// [`FieldValue::Date`]; any other string stays text.
///
/// Substitution tables and passthrough mapping compare on the [`Display`]
/// rendering, so that rendering is part of the mapping contract, not a
/// debugging aid.
///
/// [`Display`]: std::fmt::Display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean flag field.
    Bool(bool),
    /// Numeric field (story points, seconds of work, ordinals).
    Number(f64),
    /// Timestamped field.
    Date(DateTime<Utc>),
    /// Plain text field.
    Str(String),
    /// Multi-valued field (labels, components, fix versions).
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Render this value in the form substitution tables compare against.
    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

/// Rendering contract: strings verbatim, integral numbers without a
/// fractional part, dates as RFC 3339, lists comma-joined.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Number(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{n:.0}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Date(d) => f.write_str(&d.to_rfc3339_opts(SecondsFormat::Secs, true)),
            FieldValue::Str(s) => f.write_str(s),
            FieldValue::List(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}
