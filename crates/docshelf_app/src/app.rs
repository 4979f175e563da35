use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::Utc;
use docshelf_core::{update, AppState, AppViewModel, Msg, Severity};
use docshelf_engine::{CatalogStore, RemoteService, ReqwestRemote};
use docshelf_logging::{shelf_debug, shelf_info};

use crate::config::Settings;
use crate::effects::{EffectRunner, Notice};
use crate::render;
use crate::shell::{self, ShellCommand};

/// Interval used to coalesce engine results between renders.
const TICK: Duration = Duration::from_millis(75);

/// Owns the application state and routes messages through `update`.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
}

impl Session {
    pub fn start(settings: &Settings) -> anyhow::Result<Self> {
        let remote = ReqwestRemote::new(settings.remote_settings())
            .context("could not build HTTP client")?;
        Self::with_remote(settings, Arc::new(remote))
    }

    pub fn with_remote(
        settings: &Settings,
        remote: Arc<dyn RemoteService>,
    ) -> anyhow::Result<Self> {
        let store = CatalogStore::new(settings.state_dir.clone());
        let catalog = store.load();
        let (msg_tx, msg_rx) = mpsc::channel();
        let runner =
            EffectRunner::new(remote, store, msg_tx).context("could not start remote engine")?;

        let mut session = Self {
            state: AppState::new(),
            runner,
            msg_rx,
        };
        session.dispatch(Msg::RestoreCatalog(catalog.snapshot()));
        session.dispatch(Msg::CourseIdChanged(settings.course_id.clone()));
        session.state.consume_dirty();
        Ok(session)
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// Makes `id` the active document. Unlike `Msg::DocumentSelected`, an id
    /// the catalog does not hold is an error, so a follow-up action cannot
    /// land on whichever document happened to be active.
    pub fn select(&mut self, id: &str) -> anyhow::Result<Vec<Notice>> {
        if !self.state.catalog().contains(id) {
            anyhow::bail!("unknown document id {id}");
        }
        Ok(self.dispatch(Msg::DocumentSelected(id.to_string())))
    }

    /// Applies `msg` and runs the resulting effects.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<Notice> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects)
    }

    /// Dispatches every message already queued by the engine or timers.
    pub fn pump(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok(msg) = self.msg_rx.try_recv() {
            notices.extend(self.dispatch(msg));
        }
        notices
    }

    /// Waits until no remote request is outstanding or `timeout` elapses.
    pub fn settle(&mut self, timeout: Duration) -> Vec<Notice> {
        let deadline = Instant::now() + timeout;
        let mut notices = self.pump();
        while self.state.has_pending_requests() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                shelf_info!("Gave up waiting for remote requests after {:?}", timeout);
                break;
            }
            match self.msg_rx.recv_timeout(remaining) {
                Ok(msg) => notices.extend(self.dispatch(msg)),
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
        notices
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }
}

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Turns the settled view of a one-shot command into its exit result.
pub fn one_shot_outcome(view: &AppViewModel) -> anyhow::Result<()> {
    if let Some(error) = &view.draft.error {
        anyhow::bail!("{error}");
    }
    if view.is_busy() {
        anyhow::bail!("timed out waiting for the backend");
    }
    match &view.status {
        Some(status) if status.severity == Severity::Error => anyhow::bail!("{}", status.text),
        _ => Ok(()),
    }
}

/// Interactive loop: stdin lines become messages, engine results render as they arrive.
pub fn run_shell(mut session: Session) -> anyhow::Result<()> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if cmd_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut stdout = io::stdout();
    writeln!(stdout, "{}", render::render(&session.view()))?;
    writeln!(stdout, "Type 'help' for commands.")?;
    stdout.flush()?;

    loop {
        let mut notices = Vec::new();
        let mut force_render = false;

        match cmd_rx.recv_timeout(TICK) {
            Ok(line) => match shell::parse_line(&line, now_ms()) {
                Ok(Some(ShellCommand::Quit)) => break,
                Ok(Some(ShellCommand::Help)) => writeln!(stdout, "{}", shell::HELP)?,
                Ok(Some(ShellCommand::List)) => force_render = true,
                Ok(Some(ShellCommand::Send(msgs))) => {
                    for msg in msgs {
                        notices.extend(session.dispatch(msg));
                    }
                }
                Ok(None) => {}
                Err(err) => writeln!(stdout, "{err}")?,
            },
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                shelf_debug!("stdin closed; leaving shell");
                break;
            }
        }

        notices.extend(session.pump());
        for notice in &notices {
            writeln!(stdout, "{}", render::format_notice(notice))?;
        }
        if session.consume_dirty() || force_render {
            writeln!(stdout, "{}", render::render(&session.view()))?;
        }
        stdout.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use docshelf_core::{RosterItem, UploadCheck};
    use docshelf_engine::{FailureKind, RemoteError};
    use tempfile::TempDir;

    use super::*;

    struct StaticRemote;

    #[async_trait::async_trait]
    impl RemoteService for StaticRemote {
        async fn fetch_roster(&self, course_id: &str) -> Result<Vec<RosterItem>, RemoteError> {
            if course_id == "empty" {
                return Ok(Vec::new());
            }
            Ok(vec![
                RosterItem::new("Week 1", "https://docs.google.com/document/d/W1/edit"),
                RosterItem::new("Week 2", "https://docs.google.com/document/d/W2/edit"),
            ])
        }

        async fn process_document(&self, _doc_id: &str) -> Result<(), RemoteError> {
            Err(RemoteError {
                kind: FailureKind::Timeout,
                message: String::new(),
            })
        }

        async fn check_uploads(&self, _external_id: &str) -> Result<UploadCheck, RemoteError> {
            Ok(UploadCheck {
                success: true,
                new_uploads: true,
                upload_count: 1,
                message: None,
            })
        }
    }

    fn settings(temp: &TempDir) -> Settings {
        Settings {
            state_dir: temp.path().to_path_buf(),
            ..Settings::default()
        }
    }

    #[test]
    fn fetch_replaces_and_persists_catalog() {
        let temp = TempDir::new().unwrap();
        let settings = settings(&temp);
        let mut session = Session::with_remote(&settings, Arc::new(StaticRemote)).unwrap();

        session.dispatch(Msg::FetchClicked);
        session.settle(Duration::from_secs(5));

        let view = session.view();
        assert!(!view.loading);
        assert_eq!(view.documents.len(), 2);

        let reloaded = CatalogStore::new(temp.path()).load();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.documents()[1].name, "Week 2");
    }

    #[test]
    fn empty_roster_keeps_stored_catalog_untouched() {
        let temp = TempDir::new().unwrap();
        let settings = Settings {
            course_id: "empty".to_string(),
            ..settings(&temp)
        };
        let mut session = Session::with_remote(&settings, Arc::new(StaticRemote)).unwrap();

        session.dispatch(Msg::FetchClicked);
        session.settle(Duration::from_secs(5));

        assert_eq!(session.view().documents.len(), 1);
        assert!(!CatalogStore::new(temp.path()).path().exists());
    }

    #[test]
    fn upload_check_with_new_uploads_reports_reload() {
        let temp = TempDir::new().unwrap();
        let mut session = Session::with_remote(&settings(&temp), Arc::new(StaticRemote)).unwrap();

        session.dispatch(Msg::CheckUploadsClicked);
        let notices = session.settle(Duration::from_secs(5));

        assert!(notices
            .iter()
            .any(|notice| matches!(notice, Notice::PreviewReloaded(_))));
        assert_eq!(session.view().preview_generation, 1);
    }

    #[test]
    fn process_timeout_surfaces_as_error_status() {
        let temp = TempDir::new().unwrap();
        let mut session = Session::with_remote(&settings(&temp), Arc::new(StaticRemote)).unwrap();

        session.dispatch(Msg::ProcessClicked);
        session.settle(Duration::from_secs(5));

        let status = session.view().status.expect("status");
        assert_eq!(status.severity, Severity::Error);
        assert!(status.text.contains("timeout"));
        assert!(one_shot_outcome(&session.view()).is_err());
    }

    #[test]
    fn selecting_unknown_id_is_refused_and_keeps_selection() {
        let temp = TempDir::new().unwrap();
        let mut session = Session::with_remote(&settings(&temp), Arc::new(StaticRemote)).unwrap();

        let err = session.select("999").unwrap_err();
        assert_eq!(err.to_string(), "unknown document id 999");
        assert_eq!(session.view().active.map(|doc| doc.id), Some("1".to_string()));
        assert!(!session.view().is_busy());
    }

    #[test]
    fn selecting_known_id_targets_that_document() {
        let temp = TempDir::new().unwrap();
        let mut session = Session::with_remote(&settings(&temp), Arc::new(StaticRemote)).unwrap();
        session.dispatch(Msg::FetchClicked);
        session.settle(Duration::from_secs(5));

        session.select("1").unwrap();
        let notices = session.dispatch(Msg::CopyClicked);

        assert_eq!(
            notices,
            vec![Notice::OpenUrl(
                "https://docs.google.com/document/d/W2/copy".to_string()
            )]
        );
    }

    #[test]
    fn successful_one_shot_exits_cleanly() {
        let temp = TempDir::new().unwrap();
        let mut session = Session::with_remote(&settings(&temp), Arc::new(StaticRemote)).unwrap();

        session.dispatch(Msg::FetchClicked);
        session.settle(Duration::from_secs(5));

        assert!(one_shot_outcome(&session.view()).is_ok());
    }
}
