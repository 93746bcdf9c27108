//! UniFFI bindings for daily-bible mobile apps
//!
//! Native shells do their own networking and screen work; this crate gives
//! them the annotation store, the verse compositor and the small helpers
//! (book grouping, translation list, payload decoding) so every platform
//! renders edits the same way.

use daily_bible_engine::{
    AnnotationStore, Book, Genre, Testament, Verse, VerseEdit, VerseSegment, compose,
    group_by_testament,
};
use std::sync::Mutex;

uniffi::setup_scaffolding!();

// ============ Errors ============

/// Errors that can cross the FFI boundary
/// Note: Field is named `reason` not `message` to avoid conflict with Throwable.message in Kotlin
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiError {
    #[error("Decode error: {reason}")]
    DecodeError { reason: String },
}

impl From<serde_json::Error> for FfiError {
    fn from(e: serde_json::Error) -> Self {
        FfiError::DecodeError {
            reason: e.to_string(),
        }
    }
}

// ============ Annotations Handle ============

/// Session-scoped notes and edits, shared with the native UI.
#[derive(uniffi::Object)]
pub struct AnnotationsHandle {
    inner: Mutex<AnnotationStore>,
}

impl AnnotationsHandle {
    fn with_store<T>(&self, f: impl FnOnce(&mut AnnotationStore) -> T) -> T {
        // Recover from poisoned mutex (another thread panicked while holding lock)
        let mut store = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut store)
    }
}

#[uniffi::export]
impl AnnotationsHandle {
    #[uniffi::constructor]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(AnnotationStore::new()),
        }
    }

    /// Returns false (and stores nothing) when `original` is blank.
    pub fn add_or_update_edit(&self, verse_id: u64, edit: VerseEditDto) -> bool {
        self.with_store(|store| store.add_or_update_edit(verse_id, edit.into_engine()))
    }

    pub fn remove_edit(&self, verse_id: u64, edit_id: String) -> bool {
        self.with_store(|store| store.remove_edit(verse_id, &edit_id).is_some())
    }

    pub fn edits_for(&self, verse_id: u64) -> Vec<VerseEditDto> {
        self.with_store(|store| {
            store
                .edits_for(verse_id)
                .iter()
                .map(VerseEditDto::from_engine)
                .collect()
        })
    }

    pub fn set_note(&self, verse_id: u64, text: String) {
        self.with_store(|store| store.set_note(verse_id, text));
    }

    pub fn remove_note(&self, verse_id: u64) -> bool {
        self.with_store(|store| store.remove_note(verse_id).is_some())
    }

    pub fn note(&self, verse_id: u64) -> Option<String> {
        self.with_store(|store| store.note(verse_id).map(str::to_string))
    }

    /// Compose a verse's text with whatever edits are stored for it.
    pub fn render_verse(&self, verse_id: u64, text: String) -> Vec<SegmentDto> {
        self.with_store(|store| {
            compose(&text, store.edits_for(verse_id))
                .into_iter()
                .map(SegmentDto::from_engine)
                .collect()
        })
    }
}

impl Default for AnnotationsHandle {
    fn default() -> Self {
        Self::new()
    }
}

// ============ DTOs ============

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct VerseEditDto {
    pub id: String,
    pub original: String,
    pub replacement: String,
}

impl VerseEditDto {
    fn from_engine(edit: &VerseEdit) -> Self {
        Self {
            id: edit.id.clone(),
            original: edit.original.clone(),
            replacement: edit.replacement.clone(),
        }
    }

    fn into_engine(self) -> VerseEdit {
        VerseEdit::with_id(self.id, self.original, self.replacement)
    }
}

/// A span of composed verse text.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct SegmentDto {
    /// Segment type: "literal" or "substitution"
    pub kind: String,
    /// Literal text, or the original text a substitution covers
    pub text: String,
    /// Replacement text for substitutions
    pub replacement: Option<String>,
}

impl SegmentDto {
    fn from_engine(segment: VerseSegment) -> Self {
        match segment {
            VerseSegment::Literal { text } => Self {
                kind: "literal".to_string(),
                text,
                replacement: None,
            },
            VerseSegment::Substitution {
                original,
                replacement,
            } => Self {
                kind: "substitution".to_string(),
                text: original,
                replacement: Some(replacement),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct BookDto {
    pub id: u32,
    pub name: String,
    /// "OT", "NT", or the service's label
    pub testament: String,
    pub genre_id: u32,
    pub genre_name: String,
}

impl BookDto {
    fn from_engine(book: Book) -> Self {
        Self {
            id: book.id,
            name: book.name,
            testament: book.testament.into(),
            genre_id: book.genre.id,
            genre_name: book.genre.name,
        }
    }

    fn into_engine(self) -> Book {
        Book {
            id: self.id,
            name: self.name,
            testament: Testament::from(self.testament),
            genre: Genre {
                id: self.genre_id,
                name: self.genre_name,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct BookSectionDto {
    pub title: String,
    pub books: Vec<BookDto>,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct VerseDto {
    pub id: u64,
    pub book_id: u32,
    pub book_name: String,
    pub chapter: u32,
    pub number: u32,
    pub text: String,
}

impl VerseDto {
    fn from_engine(verse: Verse) -> Self {
        Self {
            id: verse.id,
            book_id: verse.book.id,
            book_name: verse.book.name,
            chapter: verse.chapter_id,
            number: verse.verse_id,
            text: verse.text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct TranslationOptionDto {
    pub value: String,
    pub label: String,
}

// ============ Standalone Functions ============

/// Compose verse text with an explicit edit list.
#[uniffi::export]
pub fn compose_verse(text: String, edits: Vec<VerseEditDto>) -> Vec<SegmentDto> {
    let edits: Vec<VerseEdit> = edits.into_iter().map(VerseEditDto::into_engine).collect();
    compose(&text, &edits)
        .into_iter()
        .map(SegmentDto::from_engine)
        .collect()
}

/// A new edit with a freshly generated id.
#[uniffi::export]
pub fn new_edit(original: String, replacement: String) -> VerseEditDto {
    VerseEditDto::from_engine(&VerseEdit::new(original, replacement))
}

#[uniffi::export]
pub fn popular_translations() -> Vec<TranslationOptionDto> {
    daily_bible_engine::popular_translations()
        .into_iter()
        .map(|option| TranslationOptionDto {
            value: option.value,
            label: option.label,
        })
        .collect()
}

/// Group books into "Old Testament", "New Testament", then other sections.
#[uniffi::export]
pub fn group_books(books: Vec<BookDto>) -> Vec<BookSectionDto> {
    let books: Vec<Book> = books.into_iter().map(BookDto::into_engine).collect();
    group_by_testament(&books)
        .into_iter()
        .map(|section| BookSectionDto {
            title: section.title,
            books: section.books.into_iter().map(BookDto::from_engine).collect(),
        })
        .collect()
}

/// Decode a `/books` response body.
#[uniffi::export]
pub fn decode_books(json: String) -> Result<Vec<BookDto>, FfiError> {
    let books: Vec<Book> = serde_json::from_str(&json)?;
    Ok(books.into_iter().map(BookDto::from_engine).collect())
}

/// Decode a `/books/{id}/chapters/{chapter}` response body.
#[uniffi::export]
pub fn decode_verses(json: String) -> Result<Vec<VerseDto>, FfiError> {
    let verses: Vec<Verse> = serde_json::from_str(&json)?;
    Ok(verses.into_iter().map(VerseDto::from_engine).collect())
}
