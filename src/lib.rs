//! Bookshelf - a small books CRUD service
//!
//! Serves create/list/update endpoints over a PostgreSQL `books` table with
//! an in-process TTL cache in front of the listing query.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use api::AppState;
pub use config::Config;
