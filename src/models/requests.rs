//! Request DTOs for the books API
//!
//! Defines incoming request bodies and the validated form of the
//! listing query string.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;

/// Default listing offset
pub const DEFAULT_OFFSET: i64 = 0;
/// Default listing page size
pub const DEFAULT_LIMIT: i64 = 10;

/// Request body for POST /books and PUT /books/:id
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookPayload {
    pub title: String,
    pub date: NaiveDate,
    pub author: String,
    pub description: String,
    pub image: String,
}

/// Raw query string of GET /books, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl ListParams {
    /// Validates the raw parameters and fills in defaults.
    ///
    /// Returns an error message if any parameter is malformed.
    pub fn validate(&self) -> Result<ListQuery, String> {
        let offset = match self.offset.as_deref() {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|v| *v >= 0)
                .ok_or_else(|| format!("Invalid offset '{}': expected a non-negative integer", raw))?,
            None => DEFAULT_OFFSET,
        };

        let limit = match self.limit.as_deref() {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(|| format!("Invalid limit '{}': expected a positive integer", raw))?,
            None => DEFAULT_LIMIT,
        };

        let sort_by = match self.sort_by.as_deref() {
            Some(raw) => raw.parse()?,
            None => SortColumn::default(),
        };

        let order = match self.order.as_deref() {
            Some(raw) => raw.parse()?,
            None => SortOrder::default(),
        };

        Ok(ListQuery {
            offset,
            limit,
            sort_by,
            order,
        })
    }
}

/// Validated listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub offset: i64,
    pub limit: i64,
    pub sort_by: SortColumn,
    pub order: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
            sort_by: SortColumn::default(),
            order: SortOrder::default(),
        }
    }
}

// == Sort Column ==
/// Columns of the `books` table a listing may be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortColumn {
    #[default]
    Id,
    Title,
    Date,
    Author,
    Description,
    Image,
}

impl SortColumn {
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Id,
        SortColumn::Title,
        SortColumn::Date,
        SortColumn::Author,
        SortColumn::Description,
        SortColumn::Image,
    ];

    /// Column name as it appears in SQL.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Title => "title",
            SortColumn::Date => "date",
            SortColumn::Author => "author",
            SortColumn::Description => "description",
            SortColumn::Image => "image",
        }
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortColumn::ALL
            .into_iter()
            .find(|column| column.as_sql() == s)
            .ok_or_else(|| format!("Invalid sortBy '{}': unknown column", s))
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

// == Sort Order ==
/// Sort direction of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ASC") {
            Ok(SortOrder::Asc)
        } else if s.eq_ignore_ascii_case("DESC") {
            Ok(SortOrder::Desc)
        } else {
            Err(format!("Invalid order '{}': expected ASC or DESC", s))
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Parses the `:id` path segment of PUT /books/:id as a positive integer.
pub fn parse_book_id(raw: &str) -> Result<i32, String> {
    raw.parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| format!("Invalid book id '{}': expected a positive integer", raw))
}
