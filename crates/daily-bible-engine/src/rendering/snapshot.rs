use std::collections::BTreeMap;

use super::compositor::{VerseSegment, compose};
use crate::annotations::{AnnotationStore, VerseEdit};
use crate::models::{Book, BookId, ChapterNumber, Verse, VerseId};
use crate::selection::SelectionState;

/// Read-only view of the reader for a frontend to draw from.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderSnapshot {
    pub books: Vec<Book>,
    pub chapters: Vec<ChapterNumber>,
    pub verses: Vec<Verse>,
    pub selected_book_id: Option<BookId>,
    pub selected_chapter: ChapterNumber,
    pub translation: String,
    pub loading_books: bool,
    pub loading_chapters: bool,
    pub loading_verses: bool,
    pub error: Option<String>,
    pub edits: BTreeMap<VerseId, Vec<VerseEdit>>,
    pub notes: BTreeMap<VerseId, String>,
}

/// A verse as it should be drawn: composed text plus annotation badges.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderVerse {
    pub id: VerseId,
    pub number: u32,
    pub segments: Vec<VerseSegment>,
    pub note: Option<String>,
    pub edited: bool,
}

/// What the verse list area should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerseListStatus {
    /// Loading with nothing to show yet
    Loading,
    /// Idle with nothing to show
    Empty,
    Ready,
}

impl VerseListStatus {
    pub fn hint(self) -> Option<&'static str> {
        match self {
            VerseListStatus::Loading => Some("Loading verses..."),
            VerseListStatus::Empty => Some("Select a book and chapter to start reading."),
            VerseListStatus::Ready => None,
        }
    }
}

impl ReaderSnapshot {
    pub fn capture(selection: &SelectionState, annotations: &AnnotationStore) -> Self {
        Self {
            books: selection.books.clone(),
            chapters: selection.chapters.clone(),
            verses: selection.verses.clone(),
            selected_book_id: selection.selected_book_id,
            selected_chapter: selection.selected_chapter,
            translation: selection.translation.clone(),
            loading_books: selection.loading_books,
            loading_chapters: selection.loading_chapters,
            loading_verses: selection.loading_verses,
            error: selection.error.clone(),
            edits: annotations.edits().clone(),
            notes: annotations.notes().clone(),
        }
    }

    pub fn selected_book(&self) -> Option<&Book> {
        let id = self.selected_book_id?;
        self.books.iter().find(|book| book.id == id)
    }

    /// "Genesis 1" once the selected book is known, "Verses" until then
    pub fn verse_header_title(&self) -> String {
        match self.selected_book() {
            Some(book) => format!("{} {}", book.name, self.selected_chapter),
            None => "Verses".to_string(),
        }
    }

    pub fn verse_list_status(&self) -> VerseListStatus {
        match (self.verses.is_empty(), self.loading_verses) {
            (false, _) => VerseListStatus::Ready,
            (true, true) => VerseListStatus::Loading,
            (true, false) => VerseListStatus::Empty,
        }
    }

    pub fn render_verse(&self, verse: &Verse) -> RenderVerse {
        let edits = self.edits.get(&verse.id).map(Vec::as_slice).unwrap_or(&[]);
        RenderVerse {
            id: verse.id,
            number: verse.verse_id,
            segments: compose(&verse.text, edits),
            note: self.notes.get(&verse.id).cloned(),
            edited: !edits.is_empty(),
        }
    }

    pub fn render_verses(&self) -> Vec<RenderVerse> {
        self.verses.iter().map(|v| self.render_verse(v)).collect()
    }
}
