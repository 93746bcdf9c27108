use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{ApiError, BibleApi};
use crate::models::{Book, BookId, ChapterEntry, ChapterNumber, Translation, Verse};

pub const DEFAULT_BASE_URL: &str = "https://bible-go-api.rkeplin.com/v1";

/// reqwest-backed [`BibleApi`].
#[derive(Debug, Clone)]
pub struct HttpBibleClient {
    client: Client,
    base_url: String,
}

impl HttpBibleClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Reuse an existing connection pool
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn books_url(&self) -> String {
        format!("{}/books", self.base_url)
    }

    pub(crate) fn chapters_url(&self, book_id: BookId) -> String {
        format!("{}/books/{book_id}/chapters", self.base_url)
    }

    pub(crate) fn verses_url(&self, book_id: BookId, chapter: ChapterNumber) -> String {
        format!("{}/books/{book_id}/chapters/{chapter}", self.base_url)
    }

    pub(crate) fn translations_url(&self) -> String {
        format!("{}/translations", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        translation: Option<&str>,
    ) -> Result<T, ApiError> {
        let mut request = self.client.get(url);
        if let Some(code) = translation {
            request = request.query(&[("translation", code)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Request {
                status_code: status.as_u16(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

impl Default for HttpBibleClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl BibleApi for HttpBibleClient {
    async fn fetch_books(&self) -> Result<Vec<Book>, ApiError> {
        self.get_json(&self.books_url(), None).await
    }

    async fn fetch_chapters(&self, book_id: BookId) -> Result<Vec<ChapterNumber>, ApiError> {
        let entries: Vec<ChapterEntry> = self.get_json(&self.chapters_url(book_id), None).await?;
        Ok(entries.into_iter().map(|entry| entry.id).collect())
    }

    async fn fetch_verses(
        &self,
        book_id: BookId,
        chapter: ChapterNumber,
        translation: Option<&str>,
    ) -> Result<Vec<Verse>, ApiError> {
        self.get_json(&self.verses_url(book_id, chapter), translation)
            .await
    }

    async fn fetch_translations(&self) -> Result<Vec<Translation>, ApiError> {
        self.get_json(&self.translations_url(), None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = HttpBibleClient::new("http://localhost:9000/v1/");
        assert_eq!(client.base_url(), "http://localhost:9000/v1");
        assert_eq!(client.books_url(), "http://localhost:9000/v1/books");
    }

    #[test]
    fn test_endpoint_paths() {
        let client = HttpBibleClient::new("http://api.test/v1");

        assert_eq!(client.chapters_url(43), "http://api.test/v1/books/43/chapters");
        assert_eq!(client.verses_url(43, 3), "http://api.test/v1/books/43/chapters/3");
        assert_eq!(client.translations_url(), "http://api.test/v1/translations");
    }

    #[test]
    fn test_default_points_at_public_service() {
        assert_eq!(HttpBibleClient::default().base_url(), DEFAULT_BASE_URL);
    }
}
