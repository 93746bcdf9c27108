//! The book → chapter → verse fetch pipeline.
//!
//! [`SelectionStateMachine`] is sans-IO. Every mutator returns the
//! [`FetchRequest`]s it wants executed; whoever runs them hands the results
//! back through [`SelectionStateMachine::apply`]. Each request carries a
//! [`Ticket`], and a result is committed only if its ticket is still the
//! latest one for its stage. Anything older is a stale response and is
//! dropped, so a slow answer for an earlier selection can never overwrite a
//! newer one.
//!
//! The three stages run independently:
//!
//! - **Books** load once, on [`start`](SelectionStateMachine::start). The
//!   first book is selected if nothing is selected yet.
//! - **Chapters** reload whenever the selected book changes. The selected
//!   chapter survives if the new list contains it, otherwise it snaps to the
//!   first chapter (or `1` for an empty list).
//! - **Verses** reload whenever book, chapter or translation changes.
//!
//! A failed stage keeps whatever data it already had and reports one of the
//! fixed messages from [`Stage::error_message`]. Only the latest error is
//! kept.

mod stage;

pub use stage::{Stage, Ticket};

use stage::StageTracker;

use crate::api::{ApiError, BibleApi};
use crate::models::{Book, BookId, ChapterNumber, Verse};

/// Chapter selected before any chapter list has arrived
pub const FIRST_CHAPTER: ChapterNumber = 1;

/// Everything the pipeline knows, as handed to renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
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
}

impl SelectionState {
    fn new(translation: String) -> Self {
        Self {
            books: Vec::new(),
            chapters: Vec::new(),
            verses: Vec::new(),
            selected_book_id: None,
            selected_chapter: FIRST_CHAPTER,
            translation,
            loading_books: false,
            loading_chapters: false,
            loading_verses: false,
            error: None,
        }
    }
}

/// A fetch the state machine wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Books {
        ticket: Ticket,
    },
    Chapters {
        ticket: Ticket,
        book_id: BookId,
    },
    Verses {
        ticket: Ticket,
        book_id: BookId,
        chapter: ChapterNumber,
        translation: String,
    },
}

impl FetchRequest {
    pub fn ticket(&self) -> Ticket {
        match self {
            FetchRequest::Books { ticket }
            | FetchRequest::Chapters { ticket, .. }
            | FetchRequest::Verses { ticket, .. } => *ticket,
        }
    }

    pub fn stage(&self) -> Stage {
        self.ticket().stage
    }

    /// Perform the request. Failures are returned inside the outcome, never
    /// raised, so the machine can map them to its own messages.
    pub async fn run<C: BibleApi>(self, api: &C) -> FetchOutcome {
        match self {
            FetchRequest::Books { ticket } => FetchOutcome::Books {
                ticket,
                result: api.fetch_books().await,
            },
            FetchRequest::Chapters { ticket, book_id } => FetchOutcome::Chapters {
                ticket,
                result: api.fetch_chapters(book_id).await,
            },
            FetchRequest::Verses {
                ticket,
                book_id,
                chapter,
                translation,
            } => {
                let code = (!translation.is_empty()).then_some(translation.as_str());
                FetchOutcome::Verses {
                    ticket,
                    result: api.fetch_verses(book_id, chapter, code).await,
                }
            }
        }
    }
}

/// A completed fetch, successful or not.
#[derive(Debug)]
pub enum FetchOutcome {
    Books {
        ticket: Ticket,
        result: Result<Vec<Book>, ApiError>,
    },
    Chapters {
        ticket: Ticket,
        result: Result<Vec<ChapterNumber>, ApiError>,
    },
    Verses {
        ticket: Ticket,
        result: Result<Vec<Verse>, ApiError>,
    },
}

impl FetchOutcome {
    pub fn ticket(&self) -> Ticket {
        match self {
            FetchOutcome::Books { ticket, .. }
            | FetchOutcome::Chapters { ticket, .. }
            | FetchOutcome::Verses { ticket, .. } => *ticket,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectionStateMachine {
    state: SelectionState,
    books: StageTracker,
    chapters: StageTracker,
    verses: StageTracker,
}

impl SelectionStateMachine {
    pub fn new(translation: impl Into<String>) -> Self {
        Self {
            state: SelectionState::new(translation.into()),
            books: StageTracker::new(Stage::Books),
            chapters: StageTracker::new(Stage::Chapters),
            verses: StageTracker::new(Stage::Verses),
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// True while any stage has a live request
    pub fn is_loading(&self) -> bool {
        self.books.in_flight() || self.chapters.in_flight() || self.verses.in_flight()
    }

    /// Initial load. Books are fetched exactly once per session from here.
    pub fn start(&mut self) -> Vec<FetchRequest> {
        vec![self.dispatch_books()]
    }

    /// Select a book. Chapters and verses for it are requested; the verses
    /// already on screen stay until the new ones arrive.
    pub fn set_selected_book(&mut self, book_id: BookId) -> Vec<FetchRequest> {
        if self.state.selected_book_id == Some(book_id) {
            return Vec::new();
        }
        self.select_book(book_id)
    }

    /// Select a chapter. The value is trusted to belong to the current book.
    pub fn set_selected_chapter(&mut self, chapter: ChapterNumber) -> Vec<FetchRequest> {
        if chapter < FIRST_CHAPTER {
            log::debug!("Ignoring chapter {chapter}: chapters start at {FIRST_CHAPTER}");
            return Vec::new();
        }
        if self.state.selected_chapter == chapter {
            return Vec::new();
        }
        self.state.selected_chapter = chapter;
        self.dispatch_verses().into_iter().collect()
    }

    pub fn set_translation(&mut self, translation: impl Into<String>) -> Vec<FetchRequest> {
        let translation = translation.into();
        if self.state.translation == translation {
            return Vec::new();
        }
        self.state.translation = translation;
        self.dispatch_verses().into_iter().collect()
    }

    /// Clear the error message. Data and in-flight requests are unaffected.
    pub fn dismiss_error(&mut self) {
        self.state.error = None;
    }

    /// Re-request every stage whose latest request failed.
    pub fn retry(&mut self) -> Vec<FetchRequest> {
        let mut requests = Vec::new();
        if self.books.failed() {
            requests.push(self.dispatch_books());
        }
        if self.chapters.failed() {
            requests.extend(self.dispatch_chapters());
        }
        if self.verses.failed() {
            requests.extend(self.dispatch_verses());
        }
        requests
    }

    /// Commit a finished fetch, or drop it if it is stale.
    ///
    /// Returns follow-up requests triggered by the new data (e.g. selecting
    /// the first book once books arrive).
    pub fn apply(&mut self, outcome: FetchOutcome) -> Vec<FetchRequest> {
        let ticket = outcome.ticket();
        if !self.tracker(ticket.stage).is_current(ticket) {
            log::debug!(
                "Discarding stale {} response (generation {})",
                ticket.stage,
                ticket.generation
            );
            return Vec::new();
        }

        match outcome {
            FetchOutcome::Books { result, .. } => self.apply_books(result),
            FetchOutcome::Chapters { result, .. } => self.apply_chapters(result),
            FetchOutcome::Verses { result, .. } => {
                self.apply_verses(result);
                Vec::new()
            }
        }
    }

    fn apply_books(&mut self, result: Result<Vec<Book>, ApiError>) -> Vec<FetchRequest> {
        self.state.loading_books = false;
        match result {
            Ok(books) => {
                self.books.settle(true);
                let first = books.first().map(|book| book.id);
                self.state.books = books;
                match (self.state.selected_book_id, first) {
                    (None, Some(book_id)) => self.select_book(book_id),
                    _ => Vec::new(),
                }
            }
            Err(e) => {
                self.fail(Stage::Books, &e);
                Vec::new()
            }
        }
    }

    fn apply_chapters(
        &mut self,
        result: Result<Vec<ChapterNumber>, ApiError>,
    ) -> Vec<FetchRequest> {
        self.state.loading_chapters = false;
        match result {
            Ok(chapters) => {
                self.chapters.settle(true);
                let current = self.state.selected_chapter;
                let chapter = if chapters.contains(&current) {
                    current
                } else {
                    chapters.first().copied().unwrap_or(FIRST_CHAPTER)
                };
                self.state.chapters = chapters;

                if chapter == current {
                    return Vec::new();
                }
                self.state.selected_chapter = chapter;
                self.dispatch_verses().into_iter().collect()
            }
            Err(e) => {
                self.fail(Stage::Chapters, &e);
                Vec::new()
            }
        }
    }

    fn apply_verses(&mut self, result: Result<Vec<Verse>, ApiError>) {
        self.state.loading_verses = false;
        match result {
            Ok(verses) => {
                self.verses.settle(true);
                self.state.verses = verses;
            }
            Err(e) => self.fail(Stage::Verses, &e),
        }
    }

    fn fail(&mut self, stage: Stage, error: &ApiError) {
        log::warn!("Failed to load {stage}: {error}");
        self.tracker_mut(stage).settle(false);
        self.state.error = Some(stage.error_message().to_string());
    }

    fn select_book(&mut self, book_id: BookId) -> Vec<FetchRequest> {
        self.state.selected_book_id = Some(book_id);
        let mut requests: Vec<FetchRequest> = self.dispatch_chapters().into_iter().collect();
        requests.extend(self.dispatch_verses());
        requests
    }

    fn dispatch_books(&mut self) -> FetchRequest {
        self.state.loading_books = true;
        self.state.error = None;
        FetchRequest::Books {
            ticket: self.books.dispatch(),
        }
    }

    fn dispatch_chapters(&mut self) -> Option<FetchRequest> {
        let book_id = self.state.selected_book_id?;
        self.state.loading_chapters = true;
        self.state.error = None;
        Some(FetchRequest::Chapters {
            ticket: self.chapters.dispatch(),
            book_id,
        })
    }

    fn dispatch_verses(&mut self) -> Option<FetchRequest> {
        let book_id = self.state.selected_book_id?;
        self.state.loading_verses = true;
        self.state.error = None;
        Some(FetchRequest::Verses {
            ticket: self.verses.dispatch(),
            book_id,
            chapter: self.state.selected_chapter,
            translation: self.state.translation.clone(),
        })
    }

    fn tracker(&self, stage: Stage) -> &StageTracker {
        match stage {
            Stage::Books => &self.books,
            Stage::Chapters => &self.chapters,
            Stage::Verses => &self.verses,
        }
    }

    fn tracker_mut(&mut self, stage: Stage) -> &mut StageTracker {
        match stage {
            Stage::Books => &mut self.books,
            Stage::Chapters => &mut self.chapters,
            Stage::Verses => &mut self.verses,
        }
    }
}
