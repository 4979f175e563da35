use crate::doc_url::build_preview_url;

/// Identifier of a descriptor within a catalog.
pub type DocId = String;

pub const PLACEHOLDER_ID: &str = "1";
pub const PLACEHOLDER_NAME: &str = "Example Document";
pub const PLACEHOLDER_EXTERNAL_ID: &str = "1mNb8ayqYDdTzJ2whRhIsgY-ofGW25t0Ha_MsDSkwpT4";

/// One shareable document and its preview metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDescriptor {
    pub id: DocId,
    pub name: String,
    pub preview_url: String,
    pub external_doc_id: Option<String>,
}

impl DocumentDescriptor {
    /// Built-in entry shown when nothing has been stored yet.
    pub fn placeholder() -> Self {
        Self {
            id: PLACEHOLDER_ID.to_string(),
            name: PLACEHOLDER_NAME.to_string(),
            preview_url: build_preview_url(PLACEHOLDER_EXTERNAL_ID),
            external_doc_id: Some(PLACEHOLDER_EXTERNAL_ID.to_string()),
        }
    }
}

/// A roster record after shape normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterItem {
    pub label: String,
    pub url: String,
}

impl RosterItem {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}
