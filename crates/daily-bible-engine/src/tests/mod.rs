//! Shared fixtures for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::api::{ApiError, BibleApi};
use crate::models::{Book, BookId, BookRef, ChapterNumber, Genre, Testament, Translation, Verse};

pub fn book(id: BookId, name: &str, testament: &str) -> Book {
    Book {
        id,
        name: name.to_string(),
        testament: Testament::from(testament.to_string()),
        genre: Genre {
            id: 1,
            name: "Law".to_string(),
        },
    }
}

/// Verse ids follow the service's BBCCCVVV layout.
pub fn verse_id(book_id: BookId, chapter: ChapterNumber, number: u32) -> u64 {
    u64::from(book_id) * 1_000_000 + u64::from(chapter) * 1_000 + u64::from(number)
}

pub fn verse(book_id: BookId, chapter: ChapterNumber, number: u32, text: &str) -> Verse {
    Verse {
        id: verse_id(book_id, chapter, number),
        book: BookRef {
            id: book_id,
            name: format!("Book {book_id}"),
            testament: Testament::Old,
        },
        chapter_id: chapter,
        verse_id: number,
        text: text.to_string(),
    }
}

pub fn verses_for(book_id: BookId, chapter: ChapterNumber, count: u32) -> Vec<Verse> {
    (1..=count)
        .map(|n| verse(book_id, chapter, n, &format!("Verse {n} of {book_id}:{chapter}")))
        .collect()
}

pub fn server_error() -> ApiError {
    ApiError::Request { status_code: 500 }
}

/// In-memory [`BibleApi`] with switchable failures and per-book gates that
/// hold chapter responses until opened.
#[derive(Default)]
pub struct FakeApi {
    books: Vec<Book>,
    chapters: HashMap<BookId, Vec<ChapterNumber>>,
    failing_books: Mutex<bool>,
    failing_verses: Mutex<HashSet<(BookId, ChapterNumber)>>,
    gates: Mutex<HashMap<BookId, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    /// Genesis (3 chapters), Exodus (2 chapters), Matthew (1 chapter)
    pub fn new() -> Self {
        Self {
            books: vec![
                book(1, "Genesis", "OT"),
                book(2, "Exodus", "OT"),
                book(40, "Matthew", "NT"),
            ],
            chapters: HashMap::from([(1, vec![1, 2, 3]), (2, vec![1, 2]), (40, vec![1])]),
            ..Default::default()
        }
    }

    pub fn fail_books(&self, failing: bool) {
        *self.failing_books.lock().unwrap() = failing;
    }

    pub fn fail_verses(&self, book_id: BookId, chapter: ChapterNumber) {
        self.failing_verses.lock().unwrap().insert((book_id, chapter));
    }

    pub fn heal_verses(&self) {
        self.failing_verses.lock().unwrap().clear();
    }

    /// Hold chapter responses for `book_id` until [`open`](Self::open)
    pub fn gate(&self, book_id: BookId) {
        self.gates
            .lock()
            .unwrap()
            .insert(book_id, Arc::new(Notify::new()));
    }

    pub fn open(&self, book_id: BookId) {
        if let Some(gate) = self.gates.lock().unwrap().get(&book_id) {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl BibleApi for FakeApi {
    async fn fetch_books(&self) -> Result<Vec<Book>, ApiError> {
        self.record("books".to_string());
        if *self.failing_books.lock().unwrap() {
            return Err(server_error());
        }
        Ok(self.books.clone())
    }

    async fn fetch_chapters(&self, book_id: BookId) -> Result<Vec<ChapterNumber>, ApiError> {
        self.record(format!("chapters {book_id}"));
        let gate = self.gates.lock().unwrap().get(&book_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.chapters
            .get(&book_id)
            .cloned()
            .ok_or(ApiError::Request { status_code: 404 })
    }

    async fn fetch_verses(
        &self,
        book_id: BookId,
        chapter: ChapterNumber,
        translation: Option<&str>,
    ) -> Result<Vec<Verse>, ApiError> {
        let code = translation.unwrap_or("default").to_string();
        self.record(format!("verses {book_id}:{chapter} {code}"));
        if self
            .failing_verses
            .lock()
            .unwrap()
            .contains(&(book_id, chapter))
        {
            return Err(server_error());
        }
        Ok((1..=2)
            .map(|n| {
                verse(
                    book_id,
                    chapter,
                    n,
                    &format!("{code} {book_id}:{chapter}:{n} God is love"),
                )
            })
            .collect())
    }

    async fn fetch_translations(&self) -> Result<Vec<Translation>, ApiError> {
        self.record("translations".to_string());
        Ok(Vec::new())
    }
}
