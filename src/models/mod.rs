//! Data models for the books service
//!
//! The persisted `Book` row and the DTOs used for
//! deserializing HTTP request bodies and query strings.

pub mod book;
pub mod requests;

// Re-export commonly used types
pub use book::Book;
pub use requests::{parse_book_id, BookPayload, ListParams, ListQuery, SortColumn, SortOrder};
