use crate::{DocId, Severity};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub course_id: String,
    pub documents: Vec<DocumentRowView>,
    pub active: Option<ActiveDocumentView>,
    pub status: Option<StatusView>,
    pub draft: DraftView,
    pub loading: bool,
    pub processing: bool,
    pub checking_uploads: bool,
    /// Bumped whenever the embedded preview must be reloaded.
    pub preview_generation: u64,
}

impl AppViewModel {
    pub fn is_busy(&self) -> bool {
        self.loading || self.processing || self.checking_uploads
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRowView {
    pub id: DocId,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDocumentView {
    pub id: DocId,
    pub name: String,
    pub preview_url: String,
    pub external_doc_id: Option<String>,
    pub copy_url: Option<String>,
    pub open_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub text: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DraftView {
    pub name: String,
    pub url: String,
    pub error: Option<String>,
}
