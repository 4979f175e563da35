use std::collections::HashSet;

use docshelf_logging::{shelf_debug, shelf_warn};

use crate::descriptor::{DocId, DocumentDescriptor, RosterItem};
use crate::doc_url::{build_preview_url, embeddable_preview_url, extract_external_id};
use crate::CatalogError;

/// Ordered list of document descriptors plus the active (previewed) selection.
///
/// Ids are unique and the active id, when set, always names an existing entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    documents: Vec<DocumentDescriptor>,
    active: Option<DocId>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding only the built-in example document.
    pub fn with_placeholder() -> Self {
        Self::from_documents(vec![DocumentDescriptor::placeholder()])
    }

    /// Builds a catalog from stored descriptors, dropping entries whose id was already seen.
    /// The first entry becomes active.
    pub fn from_documents(documents: Vec<DocumentDescriptor>) -> Self {
        let mut seen = HashSet::with_capacity(documents.len());
        let documents: Vec<_> = documents
            .into_iter()
            .filter(|doc| {
                let fresh = seen.insert(doc.id.clone());
                if !fresh {
                    shelf_warn!("Dropping descriptor with duplicate id {}", doc.id);
                }
                fresh
            })
            .collect();
        let active = documents.first().map(|doc| doc.id.clone());
        Self { documents, active }
    }

    pub fn documents(&self) -> &[DocumentDescriptor] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&DocumentDescriptor> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&DocumentDescriptor> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    /// Selects `id` for preview. Unknown ids leave the selection untouched.
    pub fn set_active(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            shelf_debug!("Ignoring selection of unknown document {}", id);
            return false;
        }
        if self.active.as_deref() == Some(id) {
            return false;
        }
        self.active = Some(id.to_string());
        true
    }

    /// Removes the descriptor with `id`. Removing an unknown id is a no-op.
    ///
    /// If the removed entry was active, the new first entry becomes active.
    pub fn remove(&mut self, id: &str) -> Option<DocumentDescriptor> {
        let index = self.documents.iter().position(|doc| doc.id == id)?;
        let removed = self.documents.remove(index);
        if self.active.as_deref() == Some(id) {
            self.active = self.documents.first().map(|doc| doc.id.clone());
        }
        Some(removed)
    }

    /// Replaces the whole catalog with a freshly fetched roster.
    ///
    /// The roster is authoritative: earlier entries, manual ones included, are
    /// discarded. An empty roster leaves the catalog as it was.
    pub fn reconcile_from_remote(&mut self, items: Vec<RosterItem>) -> Result<usize, CatalogError> {
        if items.is_empty() {
            return Err(CatalogError::EmptyResult);
        }

        self.documents = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| DocumentDescriptor {
                id: index.to_string(),
                external_doc_id: extract_external_id(&item.url).map(ToOwned::to_owned),
                preview_url: embeddable_preview_url(&item.url),
                name: item.label,
            })
            .collect();
        self.active = self.documents.first().map(|doc| doc.id.clone());
        Ok(self.documents.len())
    }

    /// Appends a user-supplied document and makes it active.
    ///
    /// The id is the creation timestamp in milliseconds, bumped until unique.
    pub fn add_manual(
        &mut self,
        name: &str,
        raw_url: &str,
        created_at_ms: i64,
    ) -> Result<&DocumentDescriptor, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::validation("document name is required"));
        }
        let external_id = extract_external_id(raw_url.trim())
            .ok_or_else(|| CatalogError::validation("not a recognizable document URL"))?
            .to_string();

        let mut stamp = created_at_ms;
        while self.contains(&stamp.to_string()) {
            stamp += 1;
        }
        let id = stamp.to_string();

        self.documents.push(DocumentDescriptor {
            id: id.clone(),
            name: name.to_string(),
            preview_url: build_preview_url(&external_id),
            external_doc_id: Some(external_id),
        });
        self.active = Some(id);
        Ok(&self.documents[self.documents.len() - 1])
    }

    /// Copy of the descriptors, in display order, for persistence.
    pub fn snapshot(&self) -> Vec<DocumentDescriptor> {
        self.documents.clone()
    }
}
