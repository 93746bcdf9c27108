//! HTTP client tests against a throwaway local server.
//!
//! The server answers each request from a fixed route table and records the
//! request target so tests can check paths and query strings.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use daily_bible_engine::{ApiError, BibleApi, HttpBibleClient, Reader, Testament};
use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

struct TestServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// Routes map a request target (path plus query) to `(status, body)`.
    async fn start(routes: Vec<(&str, u16, &str)>) -> Self {
        let routes: HashMap<String, (u16, String)> = routes
            .into_iter()
            .map(|(target, status, body)| (target.to_string(), (status, body.to_string())))
            .collect();
        let routes = Arc::new(routes);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let routes = Arc::clone(&routes);
                let seen = Arc::clone(&seen);
                tokio::spawn(async move {
                    let mut raw = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => raw.extend_from_slice(&chunk[..n]),
                        }
                    }

                    let head = String::from_utf8_lossy(&raw);
                    let target = head
                        .lines()
                        .next()
                        .and_then(|line| line.split_whitespace().nth(1))
                        .unwrap_or("/")
                        .to_string();
                    seen.lock().unwrap().push(target.clone());

                    let (status, body) = routes
                        .get(&target)
                        .cloned()
                        .unwrap_or((404, "{}".to_string()));
                    let response = format!(
                        "HTTP/1.1 {status} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}/v1"),
            requests,
        }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

const BOOKS: &str = r#"[
    {"id": 1, "name": "Genesis", "testament": "OT", "genre": {"id": 1, "name": "Law"}},
    {"id": 2, "name": "Exodus", "testament": "OT", "genre": {"id": 1, "name": "Law"}}
]"#;

const CHAPTERS: &str = r#"[{"id": 1}, {"id": 2}]"#;

const VERSES: &str = r#"[
    {"id": 1001001, "book": {"id": 1, "name": "Genesis", "testament": "OT"},
     "chapterId": 1, "verseId": 1,
     "verse": "In the beginning God created the heaven and the earth."}
]"#;

#[tokio::test]
async fn test_fetch_books_parses_listing() {
    let server = TestServer::start(vec![("/v1/books", 200, BOOKS)]).await;
    let client = HttpBibleClient::new(&server.base_url);

    let books = client.fetch_books().await.unwrap();

    assert_eq!(books.len(), 2);
    assert_eq!(books[0].name, "Genesis");
    assert_eq!(books[0].testament, Testament::Old);
}

#[tokio::test]
async fn test_fetch_chapters_flattens_ids() {
    let server = TestServer::start(vec![("/v1/books/1/chapters", 200, CHAPTERS)]).await;
    let client = HttpBibleClient::new(&server.base_url);

    let chapters = client.fetch_chapters(1).await.unwrap();

    assert_eq!(chapters, vec![1, 2]);
}

#[tokio::test]
async fn test_fetch_verses_passes_translation_as_query() {
    let server = TestServer::start(vec![
        ("/v1/books/1/chapters/1?translation=ASV", 200, VERSES),
        ("/v1/books/1/chapters/1", 200, VERSES),
    ])
    .await;
    let client = HttpBibleClient::new(&server.base_url);

    let with_code = client.fetch_verses(1, 1, Some("ASV")).await.unwrap();
    let without = client.fetch_verses(1, 1, None).await.unwrap();

    assert_eq!(with_code[0].id, 1001001);
    assert_eq!(without[0].verse_id, 1);
    assert_eq!(
        server.requests(),
        vec![
            "/v1/books/1/chapters/1?translation=ASV".to_string(),
            "/v1/books/1/chapters/1".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_non_success_status_maps_to_request_error() {
    let server = TestServer::start(vec![("/v1/translations", 500, "{}")]).await;
    let client = HttpBibleClient::new(&server.base_url);

    let error = client.fetch_translations().await.unwrap_err();

    assert!(matches!(error, ApiError::Request { status_code: 500 }));
    assert_eq!(error.to_string(), "Request failed with status 500");
}

#[tokio::test]
async fn test_malformed_body_is_transport_error() {
    let server = TestServer::start(vec![("/v1/books", 200, "not json")]).await;
    let client = HttpBibleClient::new(&server.base_url);

    let error = client.fetch_books().await.unwrap_err();

    assert!(matches!(error, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_reader_over_http_loads_pipeline_and_survives_verse_failure() {
    let server = TestServer::start(vec![
        ("/v1/books", 200, BOOKS),
        ("/v1/books/1/chapters", 200, CHAPTERS),
        ("/v1/books/1/chapters/1?translation=KJV", 200, VERSES),
        ("/v1/books/1/chapters/2?translation=KJV", 500, "{}"),
    ])
    .await;
    let mut reader = Reader::new(HttpBibleClient::new(&server.base_url), "KJV");

    reader.start();
    reader.settle().await;
    let loaded = reader.selection().verses.clone();
    assert_eq!(loaded.len(), 1);

    reader.select_chapter(2);
    reader.settle().await;

    let selection = reader.selection();
    assert_eq!(selection.verses, loaded);
    assert!(!selection.loading_verses);
    assert_eq!(
        selection.error.as_deref(),
        Some("Unable to load verses. Please try again.")
    );

    reader.dismiss_error();
    assert_eq!(reader.selection().error, None);
    assert_eq!(reader.selection().verses, loaded);
}
