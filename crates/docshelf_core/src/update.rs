use std::time::Duration;

use docshelf_logging::{shelf_debug, shelf_info, shelf_warn};

use crate::{AppState, CatalogError, Effect, Msg, RequestKind, Severity, UploadCheck};

/// How long a "new uploads" notice stays visible.
pub const NEW_UPLOADS_STATUS_DELAY: Duration = Duration::from_secs(5);
/// How long the other upload-check notices stay visible.
pub const UPLOAD_STATUS_DELAY: Duration = Duration::from_secs(3);

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::RestoreCatalog(documents) => {
            *state.catalog_mut() = crate::Catalog::from_documents(documents);
            Vec::new()
        }
        Msg::CourseIdChanged(course_id) => {
            state.set_course_id(course_id.trim().to_string());
            Vec::new()
        }
        Msg::FetchClicked => {
            if state.course_id().is_empty() {
                state.set_status("Enter a course id first", Severity::Error);
                return (state, Vec::new());
            }
            let request = state.issue_request(RequestKind::Roster);
            let course_id = state.course_id().to_string();
            state.set_status("Loading documents...", Severity::Information);
            vec![Effect::FetchRoster { request, course_id }]
        }
        Msg::RosterFetched { request, result } => {
            if !state.complete_request(RequestKind::Roster, request) {
                shelf_debug!("Discarding stale roster response request={}", request);
                return (state, Vec::new());
            }
            apply_roster(&mut state, result)
        }
        Msg::ManualNameChanged(name) => {
            let draft = state.draft_mut();
            draft.name = name;
            draft.error = None;
            Vec::new()
        }
        Msg::ManualUrlChanged(url) => {
            let draft = state.draft_mut();
            draft.url = url;
            draft.error = None;
            Vec::new()
        }
        Msg::AddManualSubmitted { created_at_ms } => add_manual(&mut state, created_at_ms),
        Msg::RemoveClicked(id) => {
            if !state.catalog().contains(&id) {
                return (state, Vec::new());
            }
            state.catalog_mut().remove(&id);
            shelf_info!("Removed document {}", id);
            vec![persist(&state)]
        }
        Msg::DocumentSelected(id) => {
            if state.catalog().contains(&id) && state.catalog().active_id() != Some(id.as_str()) {
                state.catalog_mut().set_active(&id);
            }
            Vec::new()
        }
        Msg::ProcessClicked => {
            let Some(doc_id) = state.catalog().active_id().map(ToOwned::to_owned) else {
                state.set_status("Select a document first", Severity::Error);
                return (state, Vec::new());
            };
            let request = state.issue_request(RequestKind::Process);
            state.set_status("Processing document...", Severity::Information);
            vec![Effect::ProcessDocument { request, doc_id }]
        }
        Msg::ProcessFinished { request, result } => {
            if !state.complete_request(RequestKind::Process, request) {
                shelf_debug!("Discarding stale process response request={}", request);
                return (state, Vec::new());
            }
            match result {
                Ok(()) => {
                    state.set_status("Document processed successfully", Severity::Success);
                }
                Err(err) => {
                    shelf_warn!("Process request {} failed: {}", request, err);
                    state.set_status(format!("Failed to process document: {err}"), Severity::Error);
                }
            }
            Vec::new()
        }
        Msg::CheckUploadsClicked => {
            let external_id = state
                .catalog()
                .active()
                .and_then(|doc| doc.external_doc_id.clone());
            let Some(external_id) = external_id else {
                state.set_status(
                    "The selected document has no document id to check",
                    Severity::Error,
                );
                return (state, Vec::new());
            };
            let request = state.issue_request(RequestKind::UploadCheck);
            state.set_status("Checking Discord uploads...", Severity::Information);
            vec![Effect::CheckUploads {
                request,
                external_id,
            }]
        }
        Msg::UploadCheckFinished { request, result } => {
            if !state.complete_request(RequestKind::UploadCheck, request) {
                shelf_debug!("Discarding stale upload check response request={}", request);
                return (state, Vec::new());
            }
            apply_upload_check(&mut state, result)
        }
        Msg::CopyClicked => open_active(&state, crate::build_copy_url),
        Msg::OpenClicked => open_active(&state, crate::build_open_url),
        Msg::StatusExpired { token } => {
            state.expire_status(token);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn persist(state: &AppState) -> Effect {
    Effect::PersistCatalog {
        documents: state.catalog_snapshot(),
    }
}

fn apply_roster(
    state: &mut AppState,
    result: Result<Vec<crate::RosterItem>, CatalogError>,
) -> Vec<Effect> {
    let items = match result {
        Ok(items) => items,
        Err(err) => {
            shelf_warn!("Roster fetch failed: {}", err);
            state.set_status(format!("Error: {err}"), Severity::Error);
            return Vec::new();
        }
    };

    if items.is_empty() {
        shelf_info!("Roster for {} is empty; keeping current catalog", state.course_id());
        state.set_status("No documents found for this course", Severity::Information);
        return Vec::new();
    }

    match state.catalog_mut().reconcile_from_remote(items) {
        Ok(count) => {
            shelf_info!("Catalog replaced with {} documents", count);
            state.set_status(format!("Loaded {count} documents"), Severity::Success);
            vec![persist(state)]
        }
        Err(err) => {
            state.set_status(err.to_string(), Severity::Information);
            Vec::new()
        }
    }
}

fn add_manual(state: &mut AppState, created_at_ms: i64) -> Vec<Effect> {
    let name = state.draft().name.clone();
    let url = state.draft().url.clone();

    let result = state
        .catalog_mut()
        .add_manual(&name, &url, created_at_ms)
        .map(|doc| doc.id.clone());
    match result {
        Ok(id) => {
            shelf_info!("Added document {} ({})", id, name.trim());
            *state.draft_mut() = crate::ManualDraft::default();
            vec![persist(state)]
        }
        Err(err) => {
            shelf_warn!("Rejected manual document {:?}: {}", url, err);
            state.draft_mut().error = Some(err.to_string());
            Vec::new()
        }
    }
}

fn apply_upload_check(
    state: &mut AppState,
    result: Result<UploadCheck, CatalogError>,
) -> Vec<Effect> {
    let mut effects = Vec::new();
    let (text, severity, delay) = match result {
        Ok(check) if check.success && check.new_uploads => {
            state.reload_preview();
            if let Some(doc) = state.catalog().active() {
                effects.push(Effect::ReloadPreview {
                    url: doc.preview_url.clone(),
                });
            }
            let text = check.message.unwrap_or_else(|| {
                format!("New uploads found ({} total)", check.upload_count)
            });
            (text, Severity::Success, NEW_UPLOADS_STATUS_DELAY)
        }
        Ok(check) if check.success => {
            let text = check
                .message
                .unwrap_or_else(|| "No new uploads found".to_string());
            (text, Severity::Information, UPLOAD_STATUS_DELAY)
        }
        Ok(check) => {
            let text = check
                .message
                .unwrap_or_else(|| "Upload check failed".to_string());
            (text, Severity::Error, UPLOAD_STATUS_DELAY)
        }
        Err(err) => {
            shelf_warn!("Upload check failed: {}", err);
            (
                format!("Error checking uploads: {err}"),
                Severity::Error,
                UPLOAD_STATUS_DELAY,
            )
        }
    };

    let token = state.set_status(text, severity);
    effects.push(Effect::ClearStatusAfter { token, delay });
    effects
}

fn open_active(state: &AppState, build: fn(&str) -> String) -> Vec<Effect> {
    match state
        .catalog()
        .active()
        .and_then(|doc| doc.external_doc_id.as_deref())
    {
        Some(external_id) => vec![Effect::OpenUrl {
            url: build(external_id),
        }],
        None => Vec::new(),
    }
}
