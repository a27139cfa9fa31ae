//! Data Store Gateway
//!
//! The `BookRepository` trait is the seam between handlers and storage.
//! `PgBookRepository` talks to PostgreSQL through a pooled sqlx connection;
//! `InMemoryBookRepository` keeps rows in process with the same semantics.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{Book, BookPayload, ListQuery};

pub use memory::InMemoryBookRepository;
pub use postgres::{connect_pool, list_sql, PgBookRepository};

/// Storage operations over the `books` table.
#[async_trait]
pub trait BookRepository: Send + Sync + 'static {
    /// Inserts a row and returns it with its generated id.
    async fn create(&self, book: BookPayload) -> Result<Book, StoreError>;

    /// Returns up to `query.limit` rows starting at `query.offset`.
    async fn list(&self, query: &ListQuery) -> Result<Vec<Book>, StoreError>;

    /// Replaces the five writable fields of row `id`.
    ///
    /// Returns `Ok(None)` when no row has that id.
    async fn update(&self, id: i32, book: BookPayload) -> Result<Option<Book>, StoreError>;
}
