use crate::{CatalogError, DocId, DocumentDescriptor, RequestId, RosterItem};

/// Outcome reported by the upload-check endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadCheck {
    pub success: bool,
    pub new_uploads: bool,
    pub upload_count: u64,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Replace the catalog with descriptors loaded from storage.
    RestoreCatalog(Vec<DocumentDescriptor>),
    /// User edited the course id input.
    CourseIdChanged(String),
    /// User asked for the course roster.
    FetchClicked,
    /// Roster endpoint answered (or failed) for `request`.
    RosterFetched {
        request: RequestId,
        result: Result<Vec<RosterItem>, CatalogError>,
    },
    /// User edited the manual-entry name field.
    ManualNameChanged(String),
    /// User edited the manual-entry URL field.
    ManualUrlChanged(String),
    /// User submitted the manual-entry form. The timestamp seeds the new id.
    AddManualSubmitted { created_at_ms: i64 },
    /// User deleted a document.
    RemoveClicked(DocId),
    /// User selected a document for preview.
    DocumentSelected(DocId),
    /// User clicked "Process with Lambda".
    ProcessClicked,
    ProcessFinished {
        request: RequestId,
        result: Result<(), CatalogError>,
    },
    /// User clicked "Check Discord uploads".
    CheckUploadsClicked,
    UploadCheckFinished {
        request: RequestId,
        result: Result<UploadCheck, CatalogError>,
    },
    /// User clicked "Make a copy".
    CopyClicked,
    /// User clicked "Open".
    OpenClicked,
    /// A status timer fired.
    StatusExpired { token: u64 },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
