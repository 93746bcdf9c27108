//! Async driver tying the selection pipeline to a [`BibleApi`].
//!
//! The [`Reader`] is the single writer of all reader state. Each fetch the
//! state machine asks for runs as its own Tokio task; finished fetches come
//! back over a channel and are applied by whoever owns the `Reader`, one at a
//! time. Requests are never aborted, only ignored once stale.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::annotations::{AnnotationStore, VerseEdit};
use crate::api::BibleApi;
use crate::models::{BookId, ChapterNumber, VerseId};
use crate::rendering::ReaderSnapshot;
use crate::selection::{FetchOutcome, FetchRequest, SelectionState, SelectionStateMachine};

pub struct Reader<C> {
    api: Arc<C>,
    selection: SelectionStateMachine,
    annotations: AnnotationStore,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl<C: BibleApi + 'static> Reader<C> {
    pub fn new(api: C, translation: impl Into<String>) -> Self {
        Self::with_shared(Arc::new(api), translation)
    }

    pub fn with_shared(api: Arc<C>, translation: impl Into<String>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            api,
            selection: SelectionStateMachine::new(translation),
            annotations: AnnotationStore::new(),
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn api(&self) -> &Arc<C> {
        &self.api
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    pub fn snapshot(&self) -> ReaderSnapshot {
        ReaderSnapshot::capture(self.selection.state(), &self.annotations)
    }

    pub fn is_loading(&self) -> bool {
        self.selection.is_loading()
    }

    // Fetch-triggering intents. These spawn tasks, so they must be called
    // from inside a Tokio runtime.

    pub fn start(&mut self) {
        let requests = self.selection.start();
        self.dispatch(requests);
    }

    pub fn select_book(&mut self, book_id: BookId) {
        let requests = self.selection.set_selected_book(book_id);
        self.dispatch(requests);
    }

    pub fn select_chapter(&mut self, chapter: ChapterNumber) {
        let requests = self.selection.set_selected_chapter(chapter);
        self.dispatch(requests);
    }

    pub fn select_translation(&mut self, translation: impl Into<String>) {
        let requests = self.selection.set_translation(translation);
        self.dispatch(requests);
    }

    pub fn retry(&mut self) {
        let requests = self.selection.retry();
        self.dispatch(requests);
    }

    pub fn dismiss_error(&mut self) {
        self.selection.dismiss_error();
    }

    // Annotation intents

    pub fn add_or_update_edit(&mut self, verse_id: VerseId, edit: VerseEdit) -> bool {
        self.annotations.add_or_update_edit(verse_id, edit)
    }

    pub fn remove_edit(&mut self, verse_id: VerseId, edit_id: &str) -> Option<VerseEdit> {
        self.annotations.remove_edit(verse_id, edit_id)
    }

    pub fn set_note(&mut self, verse_id: VerseId, text: impl Into<String>) {
        self.annotations.set_note(verse_id, text);
    }

    pub fn remove_note(&mut self, verse_id: VerseId) -> Option<String> {
        self.annotations.remove_note(verse_id)
    }

    /// Apply every outcome that has already arrived, without waiting.
    ///
    /// Returns how many were processed (stale ones included).
    pub fn poll_outcomes(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.handle(outcome);
            processed += 1;
        }
        processed
    }

    /// Wait for the next outcome and apply it.
    pub async fn next_outcome(&mut self) {
        // The reader holds a sender itself, so the channel never closes.
        if let Some(outcome) = self.outcome_rx.recv().await {
            self.handle(outcome);
        }
    }

    /// Apply outcomes until no stage is loading.
    ///
    /// There is no timeout: a request that never completes keeps this
    /// waiting, just as it keeps its loading flag set.
    pub async fn settle(&mut self) {
        while self.selection.is_loading() {
            self.next_outcome().await;
        }
    }

    fn handle(&mut self, outcome: FetchOutcome) {
        let follow_up = self.selection.apply(outcome);
        self.dispatch(follow_up);
    }

    fn dispatch(&self, requests: Vec<FetchRequest>) {
        for request in requests {
            log::debug!(
                "Dispatching {} request (generation {})",
                request.stage(),
                request.ticket().generation
            );
            let api = Arc::clone(&self.api);
            let tx = self.outcome_tx.clone();
            tokio::spawn(async move {
                let outcome = request.run(api.as_ref()).await;
                // Receiver only goes away with the reader itself
                let _ = tx.send(outcome);
            });
        }
    }
}
