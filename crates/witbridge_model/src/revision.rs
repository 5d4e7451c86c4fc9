//! One historical snapshot of a source work item.

use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How one attachment changed in a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentChange {
    Added,
    Removed,
    Updated,
}

/// One attachment change carried by a revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentAction {
    pub change: AttachmentChange,
    /// Where the attachment content lives on the source system.
    pub url: String,
}

/// One historical snapshot of a source work item's field values plus the
/// attachment changes recorded against it.
///
/// Field names are case-sensitive and unique within a revision. A missing
/// key means "field not present", which is distinct from a present-but-empty
/// value: mappers skip absent fields instead of emitting empty ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
    /// Identifier of this revision on the source system.
    pub id: String,
    /// Source work-item type tag, resolved to a target type via the type map.
    pub item_type: String,
    /// Key of the parent item, prefixed onto mapped titles.
    pub parent_key: String,
    /// Raw field bag as fetched from the source tracker.
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,
    /// Attachment changes recorded in this revision, in source order.
    #[serde(default)]
    pub attachments: Vec<AttachmentAction>,
}

impl Revision {
    /// Create an empty revision.
    pub fn new(
        id: impl Into<String>,
        item_type: impl Into<String>,
        parent_key: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            item_type: item_type.into(),
            parent_key: parent_key.into(),
            fields: HashMap::new(),
            attachments: Vec::new(),
        }
    }

    /// Set a field value.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Record an attachment change.
    pub fn with_attachment(mut self, change: AttachmentChange, url: impl Into<String>) -> Self {
        self.attachments.push(AttachmentAction {
            change,
            url: url.into(),
        });
        self
    }

    /// Look up a field by exact name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Look up a field and render it with the standard stringification.
    pub fn field_text(&self, name: &str) -> Option<String> {
        self.fields.get(name).map(FieldValue::as_text)
    }

    /// URLs of attachments added in this revision.
    pub fn added_attachment_urls(&self) -> impl Iterator<Item = &str> {
        self.attachments
            .iter()
            .filter(|action| action.change == AttachmentChange::Added)
            .map(|action| action.url.as_str())
    }
}
