use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use docshelf_core::{Catalog, DocumentDescriptor};
use docshelf_logging::{shelf_debug, shelf_info, shelf_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AtomicFileWriter, PersistError};

pub const CATALOG_FILENAME: &str = "catalog.json";

/// On-disk form of a descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredDescriptor {
    id: String,
    name: String,
    url: String,
    #[serde(rename = "googleDocId", default)]
    google_doc_id: Option<String>,
}

impl From<&DocumentDescriptor> for StoredDescriptor {
    fn from(doc: &DocumentDescriptor) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.name.clone(),
            url: doc.preview_url.clone(),
            google_doc_id: doc.external_doc_id.clone(),
        }
    }
}

impl From<StoredDescriptor> for DocumentDescriptor {
    fn from(stored: StoredDescriptor) -> Self {
        Self {
            id: stored.id,
            name: stored.name,
            preview_url: stored.url,
            external_doc_id: stored.google_doc_id,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not read stored catalog {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("stored catalog {path:?} is corrupt: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Keyed storage of the whole catalog as one JSON document.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    writer: AtomicFileWriter,
}

impl CatalogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir.into()),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.writer.dir().join(CATALOG_FILENAME)
    }

    pub fn dir(&self) -> &Path {
        self.writer.dir()
    }

    /// Reads the stored descriptors. `Ok(None)` means nothing was stored yet.
    pub fn try_load(&self) -> Result<Option<Vec<DocumentDescriptor>>, StoreError> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        let stored: Vec<StoredDescriptor> = serde_json::from_str(&content)
            .map_err(|source| StoreError::Parse { path, source })?;
        Ok(Some(stored.into_iter().map(Into::into).collect()))
    }

    /// Loads the catalog, falling back to the built-in example when nothing
    /// usable is stored. Never fails.
    pub fn load(&self) -> Catalog {
        match self.try_load() {
            Ok(Some(documents)) => {
                shelf_info!(
                    "Loaded {} stored documents from {:?}",
                    documents.len(),
                    self.path()
                );
                Catalog::from_documents(documents)
            }
            Ok(None) => {
                shelf_debug!("No stored catalog at {:?}; using example", self.path());
                Catalog::with_placeholder()
            }
            Err(err) => {
                shelf_warn!("{}; using example", err);
                Catalog::with_placeholder()
            }
        }
    }

    /// Replaces the stored catalog with `documents`.
    pub fn persist(&self, documents: &[DocumentDescriptor]) -> Result<PathBuf, PersistError> {
        let stored: Vec<StoredDescriptor> = documents.iter().map(StoredDescriptor::from).collect();
        let content = serde_json::to_string_pretty(&stored)?;
        let path = self.writer.write(CATALOG_FILENAME, &content)?;
        shelf_debug!("Persisted {} documents to {:?}", documents.len(), path);
        Ok(path)
    }
}
