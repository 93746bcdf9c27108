//! Per-verse notes and word-level text substitutions.
//!
//! Everything is keyed by [`VerseId`], never by book/chapter/verse number, so
//! annotations follow a verse across translations. State lives in memory for
//! the session only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::VerseId;

/// A user substitution: every occurrence of `original` in a verse is shown
/// paired with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseEdit {
    pub id: String,
    pub original: String,
    pub replacement: String,
}

impl VerseEdit {
    /// Create an edit with a fresh random id
    pub fn new(original: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), original, replacement)
    }

    pub fn with_id(
        id: impl Into<String>,
        original: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            original: original.into(),
            replacement: replacement.into(),
        }
    }

    /// The text matched against verse content
    pub fn pattern(&self) -> &str {
        self.original.trim()
    }

    pub fn is_valid(&self) -> bool {
        !self.pattern().is_empty()
    }
}

/// In-memory notes and edits.
///
/// Uses BTreeMap so iteration is ordered by verse id.
#[derive(Debug, Default, Clone)]
pub struct AnnotationStore {
    edits: BTreeMap<VerseId, Vec<VerseEdit>>,
    notes: BTreeMap<VerseId, String>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new edit, or replace the edit with the same id in place.
    ///
    /// Returns `false` without touching the store when the edit's original
    /// text is blank.
    pub fn add_or_update_edit(&mut self, verse_id: VerseId, edit: VerseEdit) -> bool {
        if !edit.is_valid() {
            log::debug!("Ignoring edit {} for verse {verse_id}: empty original", edit.id);
            return false;
        }

        let verse_edits = self.edits.entry(verse_id).or_default();
        match verse_edits.iter_mut().find(|existing| existing.id == edit.id) {
            Some(existing) => *existing = edit,
            None => verse_edits.push(edit),
        }
        true
    }

    /// Remove one edit. A verse left with no edits drops out of the map.
    ///
    /// Returns the removed edit if it existed
    pub fn remove_edit(&mut self, verse_id: VerseId, edit_id: &str) -> Option<VerseEdit> {
        let verse_edits = self.edits.get_mut(&verse_id)?;
        let index = verse_edits.iter().position(|edit| edit.id == edit_id)?;
        let removed = verse_edits.remove(index);
        if verse_edits.is_empty() {
            self.edits.remove(&verse_id);
        }
        Some(removed)
    }

    /// Edits for a verse in application order
    pub fn edits_for(&self, verse_id: VerseId) -> &[VerseEdit] {
        self.edits.get(&verse_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_edited(&self, verse_id: VerseId) -> bool {
        !self.edits_for(verse_id).is_empty()
    }

    /// Replace any note on the verse. Blank text removes the note instead.
    pub fn set_note(&mut self, verse_id: VerseId, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            self.remove_note(verse_id);
            return;
        }
        self.notes.insert(verse_id, text);
    }

    /// Delete the note entry. Returns the previous text if there was one
    pub fn remove_note(&mut self, verse_id: VerseId) -> Option<String> {
        self.notes.remove(&verse_id)
    }

    pub fn note(&self, verse_id: VerseId) -> Option<&str> {
        self.notes.get(&verse_id).map(String::as_str)
    }

    pub fn has_note(&self, verse_id: VerseId) -> bool {
        self.notes.contains_key(&verse_id)
    }

    pub fn edits(&self) -> &BTreeMap<VerseId, Vec<VerseEdit>> {
        &self.edits
    }

    pub fn notes(&self) -> &BTreeMap<VerseId, String> {
        &self.notes
    }
}
