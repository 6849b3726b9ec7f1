pub mod artist;
pub mod schedule;
pub mod show;
pub mod venue;

use crate::error::{BookingError, BookingResult};

/// `{id, name}` of a venue or artist plus how many of its shows are still to come.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone)]
pub struct SearchResults<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> From<Vec<T>> for SearchResults<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// LIKE pattern for a case-insensitive substring search on a name.
/// The empty term matches every name.
pub(crate) fn name_pattern(search_term: &str) -> String {
    format!("%{}%", search_term.to_lowercase())
}

pub(crate) fn required(field: &str, value: String) -> BookingResult<String> {
    if value.trim().is_empty() {
        return Err(BookingError::Invalid(format!("{field} is required")));
    }
    Ok(value)
}

/// Empty optional text is stored as NULL.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn join_genres(genres: Vec<String>) -> Option<String> {
    let genres: Vec<String> = genres
        .into_iter()
        .map(|genre| genre.trim().to_string())
        .filter(|genre| !genre.is_empty())
        .collect();

    if genres.is_empty() {
        None
    } else {
        Some(genres.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_pattern() {
        assert_eq!(name_pattern("Fill"), "%fill%");
        assert_eq!(name_pattern(""), "%%");
    }

    #[test]
    fn test_required_rejects_blank() {
        assert!(required("name", "  ".into()).is_err());
        assert_eq!(required("name", "Jane".into()).unwrap(), "Jane");
    }

    #[test]
    fn test_optional_and_join_genres() {
        assert_eq!(optional(Some("".into())), None);
        assert_eq!(optional(Some("x".into())), Some("x".into()));
        assert_eq!(
            join_genres(vec!["Jazz".into(), " ".into(), " Folk".into()]),
            Some("Jazz,Folk".into())
        );
        assert_eq!(join_genres(vec![]), None);
    }
}
