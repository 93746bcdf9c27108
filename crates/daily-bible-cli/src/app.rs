use crossterm::event::{KeyCode, KeyEvent};
use daily_bible_engine::{
    BibleApi, Book, BookId, Reader, TranslationOption, VerseEdit, VerseId, group_by_testament,
};
use ratatui::widgets::ListState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Books,
    Chapters,
    Verses,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Books => Focus::Chapters,
            Focus::Chapters => Focus::Verses,
            Focus::Verses => Focus::Books,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Books => Focus::Verses,
            Focus::Chapters => Focus::Books,
            Focus::Verses => Focus::Chapters,
        }
    }
}

/// Text being typed at the prompt line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// `edit_id` is set when revising an edit that already exists
    Edit {
        verse_id: VerseId,
        edit_id: Option<String>,
        buffer: String,
    },
    Note { verse_id: VerseId, buffer: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookRow {
    Section(String),
    Book { id: BookId, name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<C> {
    pub reader: Reader<C>,
    pub translations: Vec<TranslationOption>,
    pub focus: Focus,
    pub book_rows: Vec<BookRow>,
    pub book_list: ListState,
    pub chapter_list: ListState,
    pub verse_cursor: usize,
    pub input: Option<Input>,
    pub message: Option<String>,
}

impl<C: BibleApi + 'static> App<C> {
    pub fn new(reader: Reader<C>, translations: Vec<TranslationOption>) -> Self {
        Self {
            reader,
            translations,
            focus: Focus::Books,
            book_rows: Vec::new(),
            book_list: ListState::default(),
            chapter_list: ListState::default(),
            verse_cursor: 0,
            input: None,
            message: None,
        }
    }

    /// Apply finished fetches and keep list cursors in range.
    pub fn refresh(&mut self) {
        self.reader.poll_outcomes();
        let selection = self.reader.selection();

        let book_count = self
            .book_rows
            .iter()
            .filter(|row| matches!(row, BookRow::Book { .. }))
            .count();
        if book_count != selection.books.len() {
            self.book_rows = book_rows(&selection.books);
            let selected = selection
                .selected_book_id
                .and_then(|id| book_row_position(&self.book_rows, id));
            self.book_list.select(selected);
        }

        let chapters = &selection.chapters;
        match self.chapter_list.selected() {
            Some(i) if i < chapters.len() => {}
            _ => {
                let current = chapters
                    .iter()
                    .position(|c| *c == selection.selected_chapter)
                    .or((!chapters.is_empty()).then_some(0));
                self.chapter_list.select(current);
            }
        }

        let verse_count = selection.verses.len();
        if self.verse_cursor >= verse_count {
            self.verse_cursor = verse_count.saturating_sub(1);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if self.input.is_some() {
            self.handle_input_key(key);
            return Flow::Continue;
        }

        self.message = None;
        match key.code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            KeyCode::Char('t') => self.cycle_translation(),
            KeyCode::Char('e') => self.begin_edit(),
            KeyCode::Char('E') => self.revise_last_edit(),
            KeyCode::Char('u') => self.undo_last_edit(),
            KeyCode::Char('n') => self.begin_note(),
            KeyCode::Char('x') => self.remove_note(),
            KeyCode::Char('r') => self.reader.retry(),
            KeyCode::Esc => self.reader.dismiss_error(),
            _ => {}
        }
        Flow::Continue
    }

    pub fn highlighted_verse_id(&self) -> Option<VerseId> {
        self.reader
            .selection()
            .verses
            .get(self.verse_cursor)
            .map(|verse| verse.id)
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.focus {
            Focus::Books => {
                let start = self.book_list.selected();
                self.book_list
                    .select(next_book_row(&self.book_rows, start, delta));
            }
            Focus::Chapters => {
                let len = self.reader.selection().chapters.len();
                let next = step(self.chapter_list.selected(), delta, len);
                self.chapter_list.select(next);
            }
            Focus::Verses => {
                let len = self.reader.selection().verses.len();
                self.verse_cursor = step(Some(self.verse_cursor), delta, len).unwrap_or(0);
            }
        }
    }

    fn activate(&mut self) {
        match self.focus {
            Focus::Books => {
                let index = self.book_list.selected();
                if let Some(BookRow::Book { id, .. }) = index.and_then(|i| self.book_rows.get(i)) {
                    let id = *id;
                    self.reader.select_book(id);
                    self.chapter_list.select(None);
                    self.verse_cursor = 0;
                }
            }
            Focus::Chapters => {
                let chapter = self
                    .chapter_list
                    .selected()
                    .and_then(|i| self.reader.selection().chapters.get(i).copied());
                if let Some(chapter) = chapter {
                    self.reader.select_chapter(chapter);
                    self.verse_cursor = 0;
                }
            }
            Focus::Verses => self.begin_edit(),
        }
    }

    fn cycle_translation(&mut self) {
        let current = self.reader.selection().translation.clone();
        if let Some(next) = next_translation(&self.translations, &current) {
            self.reader.select_translation(next.value.clone());
        }
    }

    fn begin_edit(&mut self) {
        if let Some(verse_id) = self.highlighted_verse_id() {
            self.input = Some(Input::Edit {
                verse_id,
                edit_id: None,
                buffer: String::new(),
            });
        }
    }

    /// Reopen the verse's most recent edit with its text prefilled.
    fn revise_last_edit(&mut self) {
        let Some(verse_id) = self.highlighted_verse_id() else {
            return;
        };
        let Some(last) = self.reader.annotations().edits_for(verse_id).last() else {
            self.message = Some("No edits on this verse".to_string());
            return;
        };
        self.input = Some(Input::Edit {
            verse_id,
            edit_id: Some(last.id.clone()),
            buffer: format!("{} => {}", last.original, last.replacement),
        });
    }

    fn begin_note(&mut self) {
        if let Some(verse_id) = self.highlighted_verse_id() {
            let buffer = self
                .reader
                .annotations()
                .note(verse_id)
                .unwrap_or_default()
                .to_string();
            self.input = Some(Input::Note { verse_id, buffer });
        }
    }

    fn undo_last_edit(&mut self) {
        let Some(verse_id) = self.highlighted_verse_id() else {
            return;
        };
        let last = self
            .reader
            .annotations()
            .edits_for(verse_id)
            .last()
            .map(|edit| edit.id.clone());
        if let Some(edit_id) = last {
            self.reader.remove_edit(verse_id, &edit_id);
        }
    }

    fn remove_note(&mut self) {
        if let Some(verse_id) = self.highlighted_verse_id() {
            self.reader.remove_note(verse_id);
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let Some(input) = self.input.as_mut() else {
            return;
        };
        let buffer = match input {
            Input::Edit { buffer, .. } | Input::Note { buffer, .. } => buffer,
        };

        match key.code {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Esc => self.input = None,
            KeyCode::Enter => {
                if let Some(input) = self.input.take() {
                    self.submit(input);
                }
            }
            _ => {}
        }
    }

    fn submit(&mut self, input: Input) {
        match input {
            Input::Edit {
                verse_id,
                edit_id,
                buffer,
            } => match parse_edit(&buffer) {
                Some((original, replacement)) => {
                    let edit = edit_to_store(
                        self.reader.annotations().edits_for(verse_id),
                        edit_id,
                        original,
                        replacement,
                    );
                    if !self.reader.add_or_update_edit(verse_id, edit) {
                        self.message = Some("Original text cannot be empty".to_string());
                    }
                }
                None => {
                    self.message = Some("Use: original => replacement".to_string());
                }
            },
            Input::Note { verse_id, buffer } => self.reader.set_note(verse_id, buffer),
        }
    }
}

/// Flatten testament sections into list rows.
pub fn book_rows(books: &[Book]) -> Vec<BookRow> {
    group_by_testament(books)
        .into_iter()
        .flat_map(|section| {
            let books = section.books.into_iter().map(|book| BookRow::Book {
                id: book.id,
                name: book.name,
            });
            std::iter::once(BookRow::Section(section.title)).chain(books)
        })
        .collect()
}

fn book_row_position(rows: &[BookRow], book_id: BookId) -> Option<usize> {
    rows.iter()
        .position(|row| matches!(row, BookRow::Book { id, .. } if *id == book_id))
}

/// Split `original => replacement`. The replacement may be empty.
pub fn parse_edit(input: &str) -> Option<(String, String)> {
    let (original, replacement) = input.split_once("=>")?;
    Some((original.trim().to_string(), replacement.trim().to_string()))
}

/// Build the edit to store. A revision keeps its id, and so does retyping an
/// original the verse already has, so the edit is updated in place.
pub fn edit_to_store(
    existing: &[VerseEdit],
    edit_id: Option<String>,
    original: String,
    replacement: String,
) -> VerseEdit {
    let id = edit_id.or_else(|| {
        let pattern = original.trim().to_lowercase();
        existing
            .iter()
            .find(|edit| edit.pattern().to_lowercase() == pattern)
            .map(|edit| edit.id.clone())
    });
    match id {
        Some(id) => VerseEdit::with_id(id, original, replacement),
        None => VerseEdit::new(original, replacement),
    }
}

/// Option after `current`, wrapping around; the first option if `current`
/// isn't listed.
pub fn next_translation<'a>(
    options: &'a [TranslationOption],
    current: &str,
) -> Option<&'a TranslationOption> {
    match options.iter().position(|o| o.value == current) {
        Some(i) => options.get((i + 1) % options.len()),
        None => options.first(),
    }
}

fn step(current: Option<usize>, delta: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = current.unwrap_or(0) as isize;
    Some((current + delta).clamp(0, len as isize - 1) as usize)
}

/// Next book row in the given direction, skipping section headers.
fn next_book_row(rows: &[BookRow], start: Option<usize>, delta: isize) -> Option<usize> {
    if delta == 0 {
        return start;
    }
    let mut index = match start {
        Some(i) => i as isize,
        None => -delta.signum(),
    };
    loop {
        index += delta.signum();
        let Ok(position) = usize::try_from(index) else {
            return start;
        };
        match rows.get(position) {
            Some(BookRow::Book { .. }) => return Some(index as usize),
            Some(BookRow::Section(_)) => continue,
            None => return start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daily_bible_engine::{AnnotationStore, Genre, Testament, popular_translations};
    use pretty_assertions::assert_eq;

    fn book(id: BookId, name: &str, testament: Testament) -> Book {
        Book {
            id,
            name: name.to_string(),
            testament,
            genre: Genre {
                id: 1,
                name: "Law".to_string(),
            },
        }
    }

    #[test]
    fn test_book_rows_have_section_headers() {
        let rows = book_rows(&[
            book(40, "Matthew", Testament::New),
            book(1, "Genesis", Testament::Old),
        ]);

        assert_eq!(
            rows,
            vec![
                BookRow::Section("Old Testament".to_string()),
                BookRow::Book {
                    id: 1,
                    name: "Genesis".to_string()
                },
                BookRow::Section("New Testament".to_string()),
                BookRow::Book {
                    id: 40,
                    name: "Matthew".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_book_navigation_skips_headers() {
        let rows = book_rows(&[
            book(1, "Genesis", Testament::Old),
            book(40, "Matthew", Testament::New),
        ]);

        assert_eq!(next_book_row(&rows, None, 1), Some(1));
        assert_eq!(next_book_row(&rows, Some(1), 1), Some(3));
        assert_eq!(next_book_row(&rows, Some(3), 1), Some(3));
        assert_eq!(next_book_row(&rows, Some(3), -1), Some(1));
        assert_eq!(next_book_row(&rows, Some(1), -1), Some(1));
    }

    #[test]
    fn test_parse_edit() {
        assert_eq!(
            parse_edit(" God => The Lord "),
            Some(("God".to_string(), "The Lord".to_string()))
        );
        assert_eq!(
            parse_edit("selah =>"),
            Some(("selah".to_string(), String::new()))
        );
        assert_eq!(parse_edit("no arrow"), None);
    }

    #[test]
    fn test_revision_keeps_edit_id() {
        let existing = vec![VerseEdit::with_id("e1", "God", "Lord")];

        let edit = edit_to_store(
            &existing,
            Some("e1".to_string()),
            "God".to_string(),
            "The Lord".to_string(),
        );

        assert_eq!(edit, VerseEdit::with_id("e1", "God", "The Lord"));
    }

    #[test]
    fn test_retyped_original_updates_existing_edit() {
        let existing = vec![
            VerseEdit::with_id("e1", "light", "LIGHT"),
            VerseEdit::with_id("e2", "God", "Lord"),
        ];

        let edit = edit_to_store(&existing, None, "god".to_string(), "Elohim".to_string());

        assert_eq!(edit.id, "e2");
        assert_eq!(edit.replacement, "Elohim");
    }

    #[test]
    fn test_new_original_gets_fresh_edit() {
        let existing = vec![VerseEdit::with_id("e1", "God", "Lord")];

        let edit = edit_to_store(&existing, None, "heaven".to_string(), "sky".to_string());

        assert_ne!(edit.id, "e1");
        assert_eq!(edit.original, "heaven");
    }

    #[test]
    fn test_revised_edit_stays_in_place() {
        let mut store = AnnotationStore::new();
        store.add_or_update_edit(7, VerseEdit::with_id("e1", "light", "LIGHT"));
        store.add_or_update_edit(7, VerseEdit::with_id("e2", "God", "Lord"));

        let edit = edit_to_store(
            store.edits_for(7),
            None,
            "LIGHT".to_string(),
            "lamp".to_string(),
        );
        store.add_or_update_edit(7, edit);

        assert_eq!(
            store.edits_for(7),
            &[
                VerseEdit::with_id("e1", "LIGHT", "lamp"),
                VerseEdit::with_id("e2", "God", "Lord"),
            ]
        );
    }

    #[test]
    fn test_next_translation_wraps_and_handles_unknown() {
        let options = popular_translations();

        assert_eq!(next_translation(&options, "KJV").unwrap().value, "ESV");
        assert_eq!(next_translation(&options, "ASV").unwrap().value, "KJV");
        assert_eq!(next_translation(&options, "WEB").unwrap().value, "KJV");
        assert!(next_translation(&[], "KJV").is_none());
    }

    #[test]
    fn test_step_clamps() {
        assert_eq!(step(Some(0), -1, 3), Some(0));
        assert_eq!(step(Some(2), 1, 3), Some(2));
        assert_eq!(step(None, 1, 3), Some(1));
        assert_eq!(step(Some(1), 1, 0), None);
    }
}
