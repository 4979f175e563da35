//! Docshelf engine: remote endpoints, roster normalization and catalog storage.
mod engine;
mod persist;
mod remote;
mod roster;
mod store;
mod types;

pub use engine::EngineHandle;
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use remote::{RemoteService, RemoteSettings, ReqwestRemote};
pub use roster::{normalize_roster, RosterPayload};
pub use store::{CatalogStore, StoreError, CATALOG_FILENAME};
pub use types::{EngineEvent, FailureKind, RemoteError};
