use std::time::Duration;

use crate::{DocId, DocumentDescriptor, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchRoster {
        request: RequestId,
        course_id: String,
    },
    ProcessDocument {
        request: RequestId,
        doc_id: DocId,
    },
    CheckUploads {
        request: RequestId,
        external_id: String,
    },
    /// Write the full catalog to storage, replacing the previous value.
    PersistCatalog { documents: Vec<DocumentDescriptor> },
    OpenUrl { url: String },
    ReloadPreview { url: String },
    /// Post `Msg::StatusExpired { token }` after `delay`.
    ClearStatusAfter { token: u64, delay: Duration },
}
