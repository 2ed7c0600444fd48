//! Open-document registry: tab order, active tab, and save baselines.

use std::path::{Path, PathBuf};

use crate::kernel::language::LanguageId;

pub type DocumentId = u64;

#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub path: PathBuf,
    pub display_name: String,
    pub language: LanguageId,
    content: String,
    saved_content: String,
}

impl Document {
    fn new(id: DocumentId, path: PathBuf, content: String) -> Self {
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let language = LanguageId::from_filename(&display_name);
        Self {
            id,
            path,
            display_name,
            language,
            saved_content: content.clone(),
            content,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Derived, never stored: the buffer differs from the last confirmed
    /// save (or the originally loaded content).
    pub fn is_dirty(&self) -> bool {
        self.content != self.saved_content
    }
}

#[derive(Debug)]
pub struct DocumentState {
    documents: Vec<Document>,
    active: Option<DocumentId>,
    next_id: DocumentId,
}

impl Default for DocumentState {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
            active: None,
            next_id: 1,
        }
    }
}

impl DocumentState {
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active
    }

    pub fn active_document(&self) -> Option<&Document> {
        let id = self.active?;
        self.get(id)
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn find_by_path(&self, path: &Path) -> Option<&Document> {
        self.documents.iter().find(|d| d.path == path)
    }

    fn get_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    /// Activate the document already open at `path`, if any.
    pub fn activate_path(&mut self, path: &Path) -> bool {
        if let Some(id) = self.find_by_path(path).map(|d| d.id) {
            let changed = self.active != Some(id);
            self.active = Some(id);
            changed
        } else {
            false
        }
    }

    /// Register freshly loaded content. If the path is already open (a
    /// second load raced the first), the existing document wins and is
    /// activated; no duplicate is ever created.
    pub fn insert_loaded(&mut self, path: PathBuf, content: String) -> bool {
        if let Some(existing) = self.find_by_path(&path).map(|d| d.id) {
            self.active = Some(existing);
            return true;
        }

        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        self.documents.push(Document::new(id, path, content));
        self.active = Some(id);
        true
    }

    pub fn update_content(&mut self, id: DocumentId, content: String) -> bool {
        match self.get_mut(id) {
            Some(doc) if doc.content != content => {
                doc.content = content;
                true
            }
            _ => false,
        }
    }

    /// Snapshot to hand to the writer, or `None` when the document is
    /// missing or clean.
    pub fn save_target(&self, id: DocumentId) -> Option<(PathBuf, String)> {
        let doc = self.get(id)?;
        if !doc.is_dirty() {
            return None;
        }
        Some((doc.path.clone(), doc.content.clone()))
    }

    pub fn dirty_ids(&self) -> Vec<DocumentId> {
        self.documents
            .iter()
            .filter(|d| d.is_dirty())
            .map(|d| d.id)
            .collect()
    }

    /// Record a confirmed write. The baseline becomes the snapshot that was
    /// actually written, so edits made while the write was in flight keep
    /// the document dirty.
    pub fn apply_saved(&mut self, id: DocumentId, written: String) -> bool {
        match self.get_mut(id) {
            Some(doc) => {
                doc.saved_content = written;
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self, id: DocumentId) -> bool {
        let Some(index) = self.documents.iter().position(|d| d.id == id) else {
            return false;
        };

        self.documents.retain(|d| d.id != id);

        if self.active == Some(id) {
            self.active = if self.documents.is_empty() {
                None
            } else {
                let fallback = index.min(self.documents.len() - 1);
                Some(self.documents[fallback].id)
            };
        }

        true
    }

    pub fn close_all(&mut self) -> bool {
        if self.documents.is_empty() {
            return false;
        }
        self.documents.clear();
        self.active = None;
        true
    }

    pub fn set_active(&mut self, id: DocumentId) -> bool {
        if self.get(id).is_none() || self.active == Some(id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    pub fn next_tab(&mut self) -> bool {
        self.cycle(1)
    }

    pub fn previous_tab(&mut self) -> bool {
        self.cycle(-1)
    }

    fn cycle(&mut self, step: isize) -> bool {
        if self.documents.len() <= 1 {
            return false;
        }

        let current = self
            .active
            .and_then(|id| self.documents.iter().position(|d| d.id == id))
            .unwrap_or(0);
        let len = self.documents.len() as isize;
        let next = (current as isize + step).rem_euclid(len) as usize;
        self.active = Some(self.documents[next].id);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/documents.rs"]
mod tests;
