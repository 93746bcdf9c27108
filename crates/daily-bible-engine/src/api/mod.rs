//! Typed access to the remote Bible REST service.
//!
//! [`BibleApi`] is the seam the selection pipeline talks to; [`HttpBibleClient`]
//! is the production implementation. Neither retries nor caches.

mod http;

use std::future::Future;

use crate::models::{Book, BookId, ChapterNumber, Translation, Verse};

pub use http::{DEFAULT_BASE_URL, HttpBibleClient};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed with status {status_code}")]
    Request { status_code: u16 },
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// One network request per call, against a fixed base endpoint.
pub trait BibleApi: Send + Sync {
    fn fetch_books(&self) -> impl Future<Output = Result<Vec<Book>, ApiError>> + Send;

    fn fetch_chapters(
        &self,
        book_id: BookId,
    ) -> impl Future<Output = Result<Vec<ChapterNumber>, ApiError>> + Send;

    /// `None` leaves the choice of translation to the service.
    fn fetch_verses(
        &self,
        book_id: BookId,
        chapter: ChapterNumber,
        translation: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Verse>, ApiError>> + Send;

    fn fetch_translations(&self)
    -> impl Future<Output = Result<Vec<Translation>, ApiError>> + Send;
}
