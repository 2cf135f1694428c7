use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;

/// A book stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Service generated identifier
    pub id: String,
    pub name: String,
    /// Descriptive fields are stored as sent
    pub year: Option<Value>,
    pub author: Option<Value>,
    pub summary: Option<Value>,
    pub publisher: Option<Value>,
    /// Total number of pages
    pub page_count: u32,
    /// Pages read so far, never above `page_count`
    pub read_page: u32,
    /// Whether the owner is currently reading the book
    pub reading: bool,
    /// `page_count == read_page` at creation time
    pub finished: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub inserted_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Client payload for creating or replacing a book.
///
/// `name` is optional here so that a missing name is reported as a
/// validation failure rather than a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookInput {
    pub name: Option<String>,
    pub year: Option<Value>,
    pub author: Option<Value>,
    pub summary: Option<Value>,
    pub publisher: Option<Value>,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
}

/// Fields of a [`BookInput`] that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct BookFields {
    pub name: String,
    pub year: Option<Value>,
    pub author: Option<Value>,
    pub summary: Option<Value>,
    pub publisher: Option<Value>,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
}

impl BookFields {
    pub fn is_finished(&self) -> bool {
        self.page_count == self.read_page
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing name")]
    MissingName,
    #[error("readPage exceeds pageCount")]
    ReadPageExceedsPageCount,
}

impl BookInput {
    /// Check the payload. The name is checked first.
    pub fn validate(self) -> Result<BookFields, ValidationError> {
        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(ValidationError::MissingName),
        };

        if self.read_page > self.page_count {
            return Err(ValidationError::ReadPageExceedsPageCount);
        }

        Ok(BookFields {
            name,
            year: self.year,
            author: self.author,
            summary: self.summary,
            publisher: self.publisher,
            page_count: self.page_count,
            read_page: self.read_page,
            reading: self.reading,
        })
    }
}

/// Reduced view of a book returned by listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: Option<Value>,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Raw listing query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookQuery {
    pub reading: Option<String>,
    pub finished: Option<String>,
    pub name: Option<String>,
}

impl BookQuery {
    /// Build a query from raw pairs. A repeated key keeps its first value and
    /// unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        pairs
            .into_iter()
            .fold(Self::default(), |mut query, (key, value)| {
                let slot = match key.as_str() {
                    "reading" => &mut query.reading,
                    "finished" => &mut query.finished,
                    "name" => &mut query.name,
                    _ => return query,
                };
                if slot.is_none() {
                    *slot = Some(value);
                }
                query
            })
    }
}

/// The single filter dimension applied to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListFilter {
    #[default]
    All,
    Reading(bool),
    Finished(bool),
    /// Case-insensitive substring of the name
    Name(String),
}

impl ListFilter {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            ListFilter::All => true,
            ListFilter::Reading(flag) => book.reading == *flag,
            ListFilter::Finished(flag) => book.finished == *flag,
            ListFilter::Name(needle) => book
                .name
                .to_lowercase()
                .contains(needle.to_lowercase().as_str()),
        }
    }
}

impl From<BookQuery> for ListFilter {
    /// `reading` wins over `finished`, which wins over `name`.
    fn from(query: BookQuery) -> Self {
        if let Some(reading) = query.reading {
            ListFilter::Reading(is_truthy_flag(&reading))
        } else if let Some(finished) = query.finished {
            ListFilter::Finished(is_truthy_flag(&finished))
        } else if let Some(name) = query.name {
            ListFilter::Name(name)
        } else {
            ListFilter::All
        }
    }
}

/// A flag is set only when its value is numerically one, written in decimal
/// or with a `0x`, `0o` or `0b` prefix.
fn is_truthy_flag(value: &str) -> bool {
    let value = value.trim();
    let radix = match value.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };

    match radix {
        Some(radix) => {
            let digits = &value[2..];
            !digits.starts_with(['+', '-'])
                && u64::from_str_radix(digits, radix).is_ok_and(|number| number == 1)
        }
        None => value.parse::<f64>().is_ok_and(|number| number == 1.0),
    }
}
