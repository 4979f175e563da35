use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use docshelf_core::RequestId;
use docshelf_logging::{shelf_debug, shelf_error};

use crate::{EngineEvent, RemoteService};

enum EngineCommand {
    FetchRoster {
        request: RequestId,
        course_id: String,
    },
    ProcessDocument {
        request: RequestId,
        doc_id: String,
    },
    CheckUploads {
        request: RequestId,
        external_id: String,
    },
}

/// Runs remote calls on a background tokio runtime.
///
/// Commands never block the caller; each finished call is reported as one
/// [`EngineEvent`] on the receiver returned by [`EngineHandle::new`]. Calls are
/// independent and may complete out of order.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    /// Fails when the tokio runtime cannot be built.
    pub fn new(
        remote: Arc<dyn RemoteService>,
    ) -> io::Result<(Self, mpsc::Receiver<EngineEvent>)> {
        let runtime = tokio::runtime::Runtime::new().inspect_err(|err| {
            shelf_error!("Could not start engine runtime: {}", err);
        })?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let remote = remote.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = handle_command(remote.as_ref(), command).await;
                    let _ = event_tx.send(event);
                });
            }
            shelf_debug!("Engine command channel closed; shutting down runtime");
            runtime.shutdown_background();
        });

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn fetch_roster(&self, request: RequestId, course_id: impl Into<String>) {
        self.send(EngineCommand::FetchRoster {
            request,
            course_id: course_id.into(),
        });
    }

    pub fn process_document(&self, request: RequestId, doc_id: impl Into<String>) {
        self.send(EngineCommand::ProcessDocument {
            request,
            doc_id: doc_id.into(),
        });
    }

    pub fn check_uploads(&self, request: RequestId, external_id: impl Into<String>) {
        self.send(EngineCommand::CheckUploads {
            request,
            external_id: external_id.into(),
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            shelf_error!("Engine thread is gone; remote command dropped");
        }
    }
}

async fn handle_command(remote: &dyn RemoteService, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::FetchRoster { request, course_id } => EngineEvent::RosterFetched {
            request,
            result: remote.fetch_roster(&course_id).await,
        },
        EngineCommand::ProcessDocument { request, doc_id } => EngineEvent::ProcessFinished {
            request,
            result: remote.process_document(&doc_id).await,
        },
        EngineCommand::CheckUploads {
            request,
            external_id,
        } => EngineEvent::UploadCheckFinished {
            request,
            result: remote.check_uploads(&external_id).await,
        },
    }
}
