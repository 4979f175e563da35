//! Docshelf core: document catalog, pure state machine and view-model helpers.
mod catalog;
mod descriptor;
mod doc_url;
mod effect;
mod error;
mod msg;
mod state;
mod update;
mod view_model;

pub use catalog::Catalog;
pub use descriptor::{
    DocId, DocumentDescriptor, RosterItem, PLACEHOLDER_EXTERNAL_ID, PLACEHOLDER_ID,
    PLACEHOLDER_NAME,
};
pub use doc_url::{
    build_copy_url, build_open_url, build_preview_url, embeddable_preview_url,
    extract_external_id,
};
pub use effect::Effect;
pub use error::CatalogError;
pub use msg::{Msg, UploadCheck};
pub use state::{
    AppState, ManualDraft, RequestId, RequestKind, Severity, StatusLine, DEFAULT_COURSE_ID,
};
pub use update::{update, NEW_UPLOADS_STATUS_DELAY, UPLOAD_STATUS_DELAY};
pub use view_model::{ActiveDocumentView, AppViewModel, DocumentRowView, DraftView, StatusView};
