//! Persisted book row

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `books` table.
///
/// `id` is generated by the store on insert and never reassigned.
///
/// The `date` column must be SQL `DATE`; a `TEXT` column fails to decode
/// into `NaiveDate` and every listing then answers 500.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub date: NaiveDate,
    pub author: String,
    pub description: String,
    pub image: String,
}
