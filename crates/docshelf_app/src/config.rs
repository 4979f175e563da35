//! Settings for the `docshelf` binary.
//!
//! Precedence, lowest to highest: built-in defaults, `docshelf.ron`,
//! `DOCSHELF_*` environment variables, command-line flags.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use docshelf_core::DEFAULT_COURSE_ID;
use docshelf_engine::RemoteSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "docshelf.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub course_id: String,
    pub state_dir: PathBuf,
    pub roster_endpoint: String,
    pub process_endpoint: String,
    pub upload_check_endpoint: String,
    pub request_timeout_secs: u64,
    pub log_to_file: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let remote = RemoteSettings::default();
        Self {
            course_id: DEFAULT_COURSE_ID.to_string(),
            state_dir: PathBuf::from(".docshelf"),
            roster_endpoint: remote.roster_endpoint,
            process_endpoint: remote.process_endpoint,
            upload_check_endpoint: remote.upload_check_endpoint,
            request_timeout_secs: remote.request_timeout.as_secs(),
            log_to_file: false,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, or from `docshelf.ron` in the working
    /// directory when no path is given. Only an explicitly named file has to exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        ron::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Applies `DOCSHELF_*` overrides looked up through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("DOCSHELF_COURSE_ID") {
            self.course_id = v;
        }
        if let Some(v) = lookup("DOCSHELF_STATE_DIR") {
            self.state_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("DOCSHELF_ROSTER_ENDPOINT") {
            self.roster_endpoint = v;
        }
        if let Some(v) = lookup("DOCSHELF_PROCESS_ENDPOINT") {
            self.process_endpoint = v;
        }
        if let Some(v) = lookup("DOCSHELF_UPLOAD_CHECK_ENDPOINT") {
            self.upload_check_endpoint = v;
        }
    }

    pub fn remote_settings(&self) -> RemoteSettings {
        RemoteSettings {
            roster_endpoint: self.roster_endpoint.clone(),
            process_endpoint: self.process_endpoint.clone(),
            upload_check_endpoint: self.upload_check_endpoint.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            ..RemoteSettings::default()
        }
    }
}
