//! Handler behaviour under store failures and concurrent writes
//!
//! Uses repository doubles in place of PostgreSQL: one that always fails,
//! and one that holds a listing query open until released.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode},
    Json, Router,
};
use bookshelf::{
    api::{create_router, list_books_handler, update_book_handler},
    cache::CacheStore,
    db::{BookRepository, InMemoryBookRepository},
    error::StoreError,
    models::{Book, BookPayload, ListParams, ListQuery},
    AppState,
};
use chrono::NaiveDate;
use tokio::sync::Notify;
use tower::ServiceExt;

// == Test Doubles ==

/// Fails every call the way an exhausted pool does.
struct UnavailableRepository;

#[async_trait]
impl BookRepository for UnavailableRepository {
    async fn create(&self, _book: BookPayload) -> Result<Book, StoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn list(&self, _query: &ListQuery) -> Result<Vec<Book>, StoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn update(&self, _id: i32, _book: BookPayload) -> Result<Option<Book>, StoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
}

/// Holds the next `list` call open after its rows were read.
struct PausingRepository {
    inner: InMemoryBookRepository,
    pause_next_list: AtomicBool,
    reached: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl BookRepository for PausingRepository {
    async fn create(&self, book: BookPayload) -> Result<Book, StoreError> {
        self.inner.create(book).await
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Book>, StoreError> {
        let rows = self.inner.list(query).await?;
        if self.pause_next_list.swap(false, Ordering::SeqCst) {
            self.reached.notify_one();
            self.release.notified().await;
        }
        Ok(rows)
    }

    async fn update(&self, id: i32, book: BookPayload) -> Result<Option<Book>, StoreError> {
        self.inner.update(id, book).await
    }
}

// == Helper Functions ==

fn payload(title: &str) -> BookPayload {
    BookPayload {
        title: title.to_string(),
        date: NaiveDate::from_ymd_opt(2015, 3, 14).unwrap(),
        author: "author".to_string(),
        description: "description".to_string(),
        image: "https://img.example/cover.png".to_string(),
    }
}

const BOOK_BODY: &str =
    r#"{"title":"t","date":"2015-03-14","author":"a","description":"d","image":"i"}"#;

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

// == Store Failure Tests ==

#[tokio::test]
async fn test_store_failure_returns_fixed_500_bodies() {
    let state = AppState::new(UnavailableRepository, CacheStore::with_ttl_secs(300));
    let app = create_router(state.clone());
    let driver_detail = sqlx::Error::PoolTimedOut.to_string();

    let cases = [
        ("POST", "/books", Some(BOOK_BODY), "Error inserting data"),
        ("GET", "/books", None, "Error fetching data"),
        ("PUT", "/books/1", Some(BOOK_BODY), "Error updating data"),
    ];

    for (method, uri, body, expected) in cases {
        let (status, text) = send(&app, method, uri, body).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{} {}", method, uri);
        assert_eq!(text, expected);
        assert!(!text.contains(&driver_detail));
        assert!(state.cache.read().await.is_empty(), "{} {} cached", method, uri);
    }
}

#[tokio::test]
async fn test_failed_update_leaves_warm_cache() {
    let state = AppState::new(UnavailableRepository, CacheStore::with_ttl_secs(300));
    state
        .cache
        .write()
        .await
        .set(bookshelf::cache::BOOKS_CACHE_KEY, Vec::new());
    let app = create_router(state.clone());

    let (status, _) = send(&app, "PUT", "/books/1", Some(BOOK_BODY)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(state.cache.read().await.len(), 1);
}

// == Concurrent Invalidation Tests ==

#[tokio::test]
async fn test_update_during_listing_query_is_not_masked_by_cache() {
    let reached = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let repo = PausingRepository {
        inner: InMemoryBookRepository::new(),
        pause_next_list: AtomicBool::new(false),
        reached: reached.clone(),
        release: release.clone(),
    };
    repo.inner.create(payload("old")).await.unwrap();
    repo.pause_next_list.store(true, Ordering::SeqCst);

    let state = AppState::new(repo, CacheStore::with_ttl_secs(300));

    // Listing reads "old" and stalls before touching the cache
    let listing = tokio::spawn(list_books_handler(
        State(state.clone()),
        Query(ListParams::default()),
    ));
    reached.notified().await;

    let Json(updated) =
        update_book_handler(State(state.clone()), Path("1".to_string()), Json(payload("new")))
            .await
            .unwrap();
    assert_eq!(updated.title, "new");

    release.notify_one();
    let Json(in_flight) = listing.await.unwrap().unwrap();
    assert_eq!(in_flight[0].title, "old");

    // The rows read before the update must not have been cached
    assert!(state.cache.read().await.is_empty());

    let Json(after) = list_books_handler(State(state.clone()), Query(ListParams::default()))
        .await
        .unwrap();
    assert_eq!(after[0].title, "new");
}
