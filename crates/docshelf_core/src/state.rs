use crate::view_model::{ActiveDocumentView, AppViewModel, DocumentRowView, DraftView, StatusView};
use crate::{build_copy_url, build_open_url, Catalog, DocumentDescriptor};

pub const DEFAULT_COURSE_ID: &str = "math-2305-123";

/// Monotonic number identifying one remote request of a given kind.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Roster,
    Process,
    UploadCheck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Information,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub severity: Severity,
    pub token: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ManualDraft {
    pub name: String,
    pub url: String,
    /// Last validation failure; kept until the draft is edited or accepted.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct RequestSlot {
    latest: RequestId,
    pending: bool,
}

/// Latest issued token per request kind. Only the latest response is applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct RequestTracker {
    roster: RequestSlot,
    process: RequestSlot,
    upload_check: RequestSlot,
}

impl RequestTracker {
    fn slot_mut(&mut self, kind: RequestKind) -> &mut RequestSlot {
        match kind {
            RequestKind::Roster => &mut self.roster,
            RequestKind::Process => &mut self.process,
            RequestKind::UploadCheck => &mut self.upload_check,
        }
    }

    fn slot(&self, kind: RequestKind) -> RequestSlot {
        match kind {
            RequestKind::Roster => self.roster,
            RequestKind::Process => self.process,
            RequestKind::UploadCheck => self.upload_check,
        }
    }

    fn issue(&mut self, kind: RequestKind) -> RequestId {
        let slot = self.slot_mut(kind);
        slot.latest += 1;
        slot.pending = true;
        slot.latest
    }

    fn complete(&mut self, kind: RequestKind, request: RequestId) -> bool {
        let slot = self.slot_mut(kind);
        if slot.latest != request {
            return false;
        }
        slot.pending = false;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    catalog: Catalog,
    course_id: String,
    draft: ManualDraft,
    requests: RequestTracker,
    status: Option<StatusLine>,
    status_seq: u64,
    preview_generation: u64,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            catalog: Catalog::with_placeholder(),
            course_id: DEFAULT_COURSE_ID.to_string(),
            draft: ManualDraft::default(),
            requests: RequestTracker::default(),
            status: None,
            status_seq: 0,
            preview_generation: 0,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub(crate) fn catalog_mut(&mut self) -> &mut Catalog {
        self.dirty = true;
        &mut self.catalog
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    pub(crate) fn set_course_id(&mut self, course_id: String) {
        if self.course_id != course_id {
            self.course_id = course_id;
            self.dirty = true;
        }
    }

    pub fn draft(&self) -> &ManualDraft {
        &self.draft
    }

    pub(crate) fn draft_mut(&mut self) -> &mut ManualDraft {
        self.dirty = true;
        &mut self.draft
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    /// Replaces the status line and returns the token identifying it.
    pub(crate) fn set_status(&mut self, text: impl Into<String>, severity: Severity) -> u64 {
        self.status_seq += 1;
        self.status = Some(StatusLine {
            text: text.into(),
            severity,
            token: self.status_seq,
        });
        self.dirty = true;
        self.status_seq
    }

    /// Clears the status line if it is still the one identified by `token`.
    pub(crate) fn expire_status(&mut self, token: u64) {
        if self.status.as_ref().is_some_and(|status| status.token == token) {
            self.status = None;
            self.dirty = true;
        }
    }

    pub fn is_pending(&self, kind: RequestKind) -> bool {
        self.requests.slot(kind).pending
    }

    /// True while any remote request is outstanding.
    pub fn has_pending_requests(&self) -> bool {
        [
            RequestKind::Roster,
            RequestKind::Process,
            RequestKind::UploadCheck,
        ]
        .into_iter()
        .any(|kind| self.is_pending(kind))
    }

    pub(crate) fn issue_request(&mut self, kind: RequestKind) -> RequestId {
        self.dirty = true;
        self.requests.issue(kind)
    }

    /// Marks `request` as answered. Returns false for a superseded request.
    pub(crate) fn complete_request(&mut self, kind: RequestKind, request: RequestId) -> bool {
        let current = self.requests.complete(kind, request);
        if current {
            self.dirty = true;
        }
        current
    }

    pub fn preview_generation(&self) -> u64 {
        self.preview_generation
    }

    pub(crate) fn reload_preview(&mut self) {
        self.preview_generation += 1;
        self.dirty = true;
    }

    /// Descriptors in display order, for persistence.
    pub fn catalog_snapshot(&self) -> Vec<DocumentDescriptor> {
        self.catalog.snapshot()
    }

    pub fn view(&self) -> AppViewModel {
        let active_id = self.catalog.active_id();
        let documents = self
            .catalog
            .documents()
            .iter()
            .map(|doc| DocumentRowView {
                id: doc.id.clone(),
                name: doc.name.clone(),
                is_active: Some(doc.id.as_str()) == active_id,
            })
            .collect();

        let active = self.catalog.active().map(|doc| ActiveDocumentView {
            id: doc.id.clone(),
            name: doc.name.clone(),
            preview_url: doc.preview_url.clone(),
            external_doc_id: doc.external_doc_id.clone(),
            copy_url: doc.external_doc_id.as_deref().map(build_copy_url),
            open_url: doc.external_doc_id.as_deref().map(build_open_url),
        });

        AppViewModel {
            course_id: self.course_id.clone(),
            documents,
            active,
            status: self.status.as_ref().map(|status| StatusView {
                text: status.text.clone(),
                severity: status.severity,
            }),
            draft: DraftView {
                name: self.draft.name.clone(),
                url: self.draft.url.clone(),
                error: self.draft.error.clone(),
            },
            loading: self.is_pending(RequestKind::Roster),
            processing: self.is_pending(RequestKind::Process),
            checking_uploads: self.is_pending(RequestKind::UploadCheck),
            preview_generation: self.preview_generation,
        }
    }

    /// Returns whether anything visible changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
