//! API Module
//!
//! HTTP handlers and routing for the books REST API.
//!
//! # Endpoints
//! - `GET /` - Health check
//! - `POST /books` - Create a book
//! - `GET /books` - List books (cached)
//! - `PUT /books/:id` - Update a book

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
