use docshelf_core::{
    update, AppState, CatalogError, Effect, Msg, RequestId, RosterItem, Severity, UploadCheck,
    NEW_UPLOADS_STATUS_DELAY, UPLOAD_STATUS_DELAY,
};

fn roster_request(effects: &[Effect]) -> RequestId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchRoster { request, .. } => Some(*request),
            _ => None,
        })
        .expect("fetch effect")
}

fn upload_request(effects: &[Effect]) -> RequestId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::CheckUploads { request, .. } => Some(*request),
            _ => None,
        })
        .expect("check uploads effect")
}

#[test]
fn stale_roster_response_is_discarded() {
    let state = AppState::new();
    let (state, first) = update(state, Msg::FetchClicked);
    let (state, second) = update(state, Msg::FetchClicked);
    let first = roster_request(&first);
    let second = roster_request(&second);
    assert!(second > first);

    // The newer request answers first.
    let (state, effects) = update(
        state,
        Msg::RosterFetched {
            request: second,
            result: Ok(vec![RosterItem::new(
                "Fresh",
                "https://docs.google.com/document/d/FRESH/edit",
            )]),
        },
    );
    assert_eq!(effects.len(), 1);

    // The older one arrives late and must not overwrite.
    let before = state.clone();
    let (state, effects) = update(
        state,
        Msg::RosterFetched {
            request: first,
            result: Ok(vec![RosterItem::new(
                "Stale",
                "https://docs.google.com/document/d/STALE/edit",
            )]),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state, before);
    assert_eq!(state.catalog().documents()[0].name, "Fresh");
}

#[test]
fn loading_stays_set_until_latest_roster_answers() {
    let (state, first) = update(AppState::new(), Msg::FetchClicked);
    let (state, _second) = update(state, Msg::FetchClicked);

    let (state, _) = update(
        state,
        Msg::RosterFetched {
            request: roster_request(&first),
            result: Err(CatalogError::Network("timeout".into())),
        },
    );

    assert!(state.view().loading);
    assert!(state.has_pending_requests());
}

#[test]
fn process_sends_active_id_and_reports_outcome() {
    let (state, effects) = update(AppState::new(), Msg::ProcessClicked);
    let request = match effects.as_slice() {
        [Effect::ProcessDocument { request, doc_id }] => {
            assert_eq!(doc_id, docshelf_core::PLACEHOLDER_ID);
            *request
        }
        other => panic!("unexpected effects {other:?}"),
    };
    assert!(state.view().processing);

    let (state, effects) = update(
        state,
        Msg::ProcessFinished {
            request,
            result: Ok(()),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert!(!view.processing);
    assert_eq!(view.status.map(|s| s.severity), Some(Severity::Success));
}

#[test]
fn process_without_selection_does_nothing_remote() {
    let (state, _) = update(AppState::new(), Msg::RemoveClicked("1".into()));
    assert!(state.catalog().is_empty());

    let (state, effects) = update(state, Msg::ProcessClicked);
    assert!(effects.is_empty());
    assert!(!state.view().processing);
    assert_eq!(state.view().status.map(|s| s.severity), Some(Severity::Error));
}

#[test]
fn new_uploads_reload_preview_and_clear_after_five_seconds() {
    let (state, effects) = update(AppState::new(), Msg::CheckUploadsClicked);
    let request = upload_request(&effects);
    let preview_url = state.catalog().active().unwrap().preview_url.clone();
    let generation = state.preview_generation();

    let (state, effects) = update(
        state,
        Msg::UploadCheckFinished {
            request,
            result: Ok(UploadCheck {
                success: true,
                new_uploads: true,
                upload_count: 3,
                message: None,
            }),
        },
    );

    let token = state.status().expect("status").token;
    assert_eq!(
        effects,
        vec![
            Effect::ReloadPreview { url: preview_url },
            Effect::ClearStatusAfter {
                token,
                delay: NEW_UPLOADS_STATUS_DELAY,
            },
        ]
    );
    assert_eq!(state.preview_generation(), generation + 1);
    assert_eq!(state.status().unwrap().text, "New uploads found (3 total)");

    let (state, _) = update(state, Msg::StatusExpired { token });
    assert!(state.status().is_none());
}

#[test]
fn no_new_uploads_uses_server_message_and_short_delay() {
    let (state, effects) = update(AppState::new(), Msg::CheckUploadsClicked);
    let request = upload_request(&effects);

    let (state, effects) = update(
        state,
        Msg::UploadCheckFinished {
            request,
            result: Ok(UploadCheck {
                success: true,
                new_uploads: false,
                upload_count: 0,
                message: Some("Nothing new".into()),
            }),
        },
    );

    let status = state.status().expect("status");
    assert_eq!(status.text, "Nothing new");
    assert_eq!(
        effects,
        vec![Effect::ClearStatusAfter {
            token: status.token,
            delay: UPLOAD_STATUS_DELAY,
        }]
    );
}

#[test]
fn expired_timer_does_not_clear_newer_status() {
    let (state, effects) = update(AppState::new(), Msg::CheckUploadsClicked);
    let request = upload_request(&effects);
    let (state, effects) = update(
        state,
        Msg::UploadCheckFinished {
            request,
            result: Err(CatalogError::Network("connection refused".into())),
        },
    );
    let old_token = match effects.as_slice() {
        [Effect::ClearStatusAfter { token, .. }] => *token,
        other => panic!("unexpected effects {other:?}"),
    };

    let (state, _) = update(state, Msg::FetchClicked);
    let (state, _) = update(state, Msg::StatusExpired { token: old_token });

    assert_eq!(
        state.status().map(|s| s.text.as_str()),
        Some("Loading documents...")
    );
}

#[test]
fn check_uploads_requires_external_id() {
    let (state, effects) = update(AppState::new(), Msg::FetchClicked);
    let (state, _) = update(
        state,
        Msg::RosterFetched {
            request: roster_request(&effects),
            result: Ok(vec![RosterItem::new("Loose", "https://example.com/file")]),
        },
    );

    let (state, effects) = update(state, Msg::CheckUploadsClicked);
    assert!(effects.is_empty());
    assert!(!state.view().checking_uploads);
}
