//! API Handlers
//!
//! HTTP request handlers for each books endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use crate::cache::{CacheStore, BOOKS_CACHE_KEY};
use crate::config::Config;
use crate::db::BookRepository;
use crate::error::{ApiError, Result};
use crate::models::{parse_book_id, Book, BookPayload, ListParams};

/// Fixed body returned by the health check
pub const HEALTH_MESSAGE: &str = "The server has been run successfully";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Data store gateway
    pub books: Arc<dyn BookRepository>,
    /// Listing cache, keyed by `BOOKS_CACHE_KEY`
    pub cache: Arc<RwLock<CacheStore<Vec<Book>>>>,
}

impl AppState {
    /// Creates a new AppState around a repository and a cache store.
    pub fn new(books: impl BookRepository, cache: CacheStore<Vec<Book>>) -> Self {
        Self {
            books: Arc::new(books),
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Creates a new AppState using the cache TTL from the Config.
    pub fn from_config(books: impl BookRepository, config: &Config) -> Self {
        Self::new(books, CacheStore::with_ttl_secs(config.cache_ttl))
    }

    /// Drops the cached listing so the next read goes to the store.
    async fn invalidate_listing(&self) {
        if self.cache.write().await.delete(BOOKS_CACHE_KEY) {
            debug!("Invalidated cached book listing");
        }
    }
}

/// Handler for GET /
pub async fn health_handler() -> &'static str {
    HEALTH_MESSAGE
}

/// Handler for POST /books
///
/// Inserts a book and returns it with its generated id.
pub async fn create_book_handler(
    State(state): State<AppState>,
    Json(payload): Json<BookPayload>,
) -> Result<(StatusCode, Json<Book>)> {
    let book = state
        .books
        .create(payload)
        .await
        .map_err(ApiError::store("Error inserting data"))?;

    // New rows become visible to the next listing
    state.invalidate_listing().await;

    info!(id = book.id, "Created book");
    Ok((StatusCode::CREATED, Json(book)))
}

/// Handler for GET /books
///
/// Serves the cached listing when one is fresh. The cached page is returned
/// as-is, whatever offset/limit/sort the current request asks for; only a
/// miss runs the query with this request's parameters. Rows read before a
/// concurrent create or update are returned but not cached.
pub async fn list_books_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Book>>> {
    let query = params.validate().map_err(ApiError::InvalidRequest)?;

    // Write lock: a stale entry is removed on read
    let generation = {
        let mut cache = state.cache.write().await;
        if let Some(books) = cache.get(BOOKS_CACHE_KEY) {
            debug!(count = books.len(), "Book listing served from cache");
            return Ok(Json(books));
        }
        cache.generation()
    };

    debug!(
        offset = query.offset,
        limit = query.limit,
        sort_by = %query.sort_by,
        order = %query.order,
        "Book listing cache miss"
    );

    let books = state
        .books
        .list(&query)
        .await
        .map_err(ApiError::store("Error fetching data"))?;

    // A write that landed while the query ran makes these rows outdated
    let stored = state
        .cache
        .write()
        .await
        .set_if_current(BOOKS_CACHE_KEY, books.clone(), generation);
    if !stored {
        debug!("Book listing invalidated during query, not cached");
    }

    Ok(Json(books))
}

/// Handler for PUT /books/:id
///
/// Replaces a book's fields. Responds 404 and stops if the id is unknown.
pub async fn update_book_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(payload): Json<BookPayload>,
) -> Result<Json<Book>> {
    let id = parse_book_id(&raw_id).map_err(ApiError::InvalidRequest)?;

    let book = state
        .books
        .update(id, payload)
        .await
        .map_err(ApiError::store("Error updating data"))?
        .ok_or_else(|| ApiError::NotFound("Book not found".to_string()))?;

    state.invalidate_listing().await;

    info!(id = book.id, "Updated book");
    Ok(Json(book))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryBookRepository;
    use chrono::NaiveDate;

    fn test_state() -> AppState {
        AppState::new(InMemoryBookRepository::new(), CacheStore::with_ttl_secs(300))
    }

    fn payload(title: &str) -> BookPayload {
        BookPayload {
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(1999, 12, 31).unwrap(),
            author: "author".to_string(),
            description: "description".to_string(),
            image: "image.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_health_handler() {
        assert_eq!(health_handler().await, HEALTH_MESSAGE);
    }

    #[tokio::test]
    async fn test_create_handler() {
        let state = test_state();

        let (status, Json(book)) = create_book_handler(State(state), Json(payload("first")))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(book.id, 1);
        assert_eq!(book.title, "first");
    }

    #[tokio::test]
    async fn test_list_handler_populates_cache() {
        let state = test_state();
        create_book_handler(State(state.clone()), Json(payload("first")))
            .await
            .unwrap();

        let Json(books) = list_books_handler(State(state.clone()), Query(ListParams::default()))
            .await
            .unwrap();
        assert_eq!(books.len(), 1);

        let cached = state.cache.write().await.get(BOOKS_CACHE_KEY);
        assert_eq!(cached, Some(books));
    }

    #[tokio::test]
    async fn test_list_handler_rejects_bad_sort() {
        let state = test_state();
        let params = ListParams {
            sort_by: Some("1; DROP TABLE books".to_string()),
            ..ListParams::default()
        };

        let result = list_books_handler(State(state.clone()), Query(params)).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
        assert!(state.cache.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_handler_invalidates_cache() {
        let state = test_state();
        create_book_handler(State(state.clone()), Json(payload("first")))
            .await
            .unwrap();
        list_books_handler(State(state.clone()), Query(ListParams::default()))
            .await
            .unwrap();
        assert_eq!(state.cache.read().await.len(), 1);

        let Json(book) = update_book_handler(
            State(state.clone()),
            Path("1".to_string()),
            Json(payload("renamed")),
        )
        .await
        .unwrap();

        assert_eq!(book.title, "renamed");
        assert!(state.cache.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_handler_not_found() {
        let state = test_state();

        let result =
            update_book_handler(State(state), Path("5".to_string()), Json(payload("x"))).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_handler_invalid_id() {
        let state = test_state();

        let result =
            update_book_handler(State(state), Path("abc".to_string()), Json(payload("x"))).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }
}
