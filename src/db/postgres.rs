//! PostgreSQL-backed repository

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::db::BookRepository;
use crate::error::StoreError;
use crate::models::{Book, BookPayload, ListQuery};

const BOOK_COLUMNS: &str = "id, title, date, author, description, image";

/// Builds the connection pool described by `config`.
///
/// Connections are opened lazily, so this succeeds even if the database is
/// not reachable yet; the first query surfaces the failure.
pub fn connect_pool(config: &DatabaseConfig) -> PgPool {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect_lazy_with(config.connect_options())
}

/// Renders the paginated SELECT for `query`.
///
/// Identifiers cannot be bound as parameters, so ORDER BY is rendered from
/// the allow-listed enums only. LIMIT and OFFSET are bound as `$1` and `$2`.
pub fn list_sql(query: &ListQuery) -> String {
    format!(
        "SELECT {} FROM books ORDER BY {} {} LIMIT $1 OFFSET $2",
        BOOK_COLUMNS,
        query.sort_by.as_sql(),
        query.order.as_sql()
    )
}

/// Repository over a pooled PostgreSQL connection.
#[derive(Debug, Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Closes the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn create(&self, book: BookPayload) -> Result<Book, StoreError> {
        let sql = format!(
            "INSERT INTO books (title, date, author, description, image) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            BOOK_COLUMNS
        );

        let row = sqlx::query_as::<_, Book>(&sql)
            .bind(book.title)
            .bind(book.date)
            .bind(book.author)
            .bind(book.description)
            .bind(book.image)
            .fetch_one(&self.pool)
            .await?;

        debug!(id = row.id, "Inserted book");
        Ok(row)
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query_as::<_, Book>(&list_sql(query))
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn update(&self, id: i32, book: BookPayload) -> Result<Option<Book>, StoreError> {
        let sql = format!(
            "UPDATE books SET title = $1, date = $2, author = $3, description = $4, image = $5 \
             WHERE id = $6 RETURNING {}",
            BOOK_COLUMNS
        );

        let row = sqlx::query_as::<_, Book>(&sql)
            .bind(book.title)
            .bind(book.date)
            .bind(book.author)
            .bind(book.description)
            .bind(book.image)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }
}
