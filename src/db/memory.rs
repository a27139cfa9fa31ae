//! Process-local repository

use std::cmp::Ordering;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::db::BookRepository;
use crate::error::StoreError;
use crate::models::{Book, BookPayload, ListQuery, SortColumn, SortOrder};

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Book>,
    last_id: i32,
}

/// Keeps books in memory with the same id, ordering and paging rules as the
/// PostgreSQL repository. Ids start at 1 and increase monotonically.
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    table: Mutex<Table>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(a: &Book, b: &Book, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Id => a.id.cmp(&b.id),
        SortColumn::Title => a.title.cmp(&b.title),
        SortColumn::Date => a.date.cmp(&b.date),
        SortColumn::Author => a.author.cmp(&b.author),
        SortColumn::Description => a.description.cmp(&b.description),
        SortColumn::Image => a.image.cmp(&b.image),
    }
}

fn apply(row: &mut Book, book: BookPayload) {
    row.title = book.title;
    row.date = book.date;
    row.author = book.author;
    row.description = book.description;
    row.image = book.image;
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn create(&self, book: BookPayload) -> Result<Book, StoreError> {
        let mut table = self.table.lock().await;
        table.last_id += 1;

        let row = Book {
            id: table.last_id,
            title: book.title,
            date: book.date,
            author: book.author,
            description: book.description,
            image: book.image,
        };
        table.rows.push(row.clone());

        Ok(row)
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Book>, StoreError> {
        let table = self.table.lock().await;

        let mut rows = table.rows.clone();
        // Stable sort, ties keep insertion (id) order
        rows.sort_by(|a, b| {
            let ordering = compare(a, b, query.sort_by);
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(0);

        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn update(&self, id: i32, book: BookPayload) -> Result<Option<Book>, StoreError> {
        let mut table = self.table.lock().await;

        Ok(table.rows.iter_mut().find(|row| row.id == id).map(|row| {
            apply(row, book);
            row.clone()
        }))
    }
}
