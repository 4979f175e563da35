use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use docshelf_core::{CatalogError, Effect, Msg};
use docshelf_engine::{CatalogStore, EngineEvent, EngineHandle, RemoteService};
use docshelf_logging::{shelf_debug, shelf_error, shelf_info};

/// Something the runner wants shown to the user outside the normal render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    OpenUrl(String),
    PreviewReloaded(String),
    PersistFailed(String),
}

/// Executes core effects: remote calls, persistence and status timers.
pub struct EffectRunner {
    engine: EngineHandle,
    store: CatalogStore,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(
        remote: Arc<dyn RemoteService>,
        store: CatalogStore,
        msg_tx: mpsc::Sender<Msg>,
    ) -> io::Result<Self> {
        let (engine, events) = EngineHandle::new(remote)?;
        spawn_event_forwarder(events, msg_tx.clone());
        Ok(Self {
            engine,
            store,
            msg_tx,
        })
    }

    pub fn run(&self, effects: Vec<Effect>) -> Vec<Notice> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::FetchRoster { request, course_id } => {
                    shelf_info!("FetchRoster request={} course_id={}", request, course_id);
                    self.engine.fetch_roster(request, course_id);
                }
                Effect::ProcessDocument { request, doc_id } => {
                    shelf_info!("ProcessDocument request={} doc_id={}", request, doc_id);
                    self.engine.process_document(request, doc_id);
                }
                Effect::CheckUploads {
                    request,
                    external_id,
                } => {
                    shelf_info!(
                        "CheckUploads request={} external_id={}",
                        request,
                        external_id
                    );
                    self.engine.check_uploads(request, external_id);
                }
                Effect::PersistCatalog { documents } => {
                    if let Err(err) = self.store.persist(&documents) {
                        shelf_error!(
                            "Failed to persist catalog to {:?}: {}",
                            self.store.dir(),
                            err
                        );
                        notices.push(Notice::PersistFailed(err.to_string()));
                    }
                }
                Effect::OpenUrl { url } => notices.push(Notice::OpenUrl(url)),
                Effect::ReloadPreview { url } => notices.push(Notice::PreviewReloaded(url)),
                Effect::ClearStatusAfter { token, delay } => {
                    let msg_tx = self.msg_tx.clone();
                    thread::spawn(move || {
                        thread::sleep(delay);
                        let _ = msg_tx.send(Msg::StatusExpired { token });
                    });
                }
            }
        }
        notices
    }
}

fn spawn_event_forwarder(events: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        for event in events {
            if msg_tx.send(map_event(event)).is_err() {
                break;
            }
        }
        shelf_debug!("Engine event forwarder stopped");
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::RosterFetched { request, result } => Msg::RosterFetched {
            request,
            result: result.map_err(CatalogError::from),
        },
        EngineEvent::ProcessFinished { request, result } => Msg::ProcessFinished {
            request,
            result: result.map_err(CatalogError::from),
        },
        EngineEvent::UploadCheckFinished { request, result } => Msg::UploadCheckFinished {
            request,
            result: result.map_err(CatalogError::from),
        },
    }
}

#[cfg(test)]
mod tests {
    use docshelf_engine::{FailureKind, RemoteError};

    use super::*;

    #[test]
    fn engine_failures_become_network_errors() {
        let msg = map_event(EngineEvent::ProcessFinished {
            request: 2,
            result: Err(RemoteError {
                kind: FailureKind::HttpStatus(503),
                message: "503 Service Unavailable".to_string(),
            }),
        });
        assert_eq!(
            msg,
            Msg::ProcessFinished {
                request: 2,
                result: Err(CatalogError::Network(
                    "http status 503: 503 Service Unavailable".to_string()
                )),
            }
        );
    }
}
