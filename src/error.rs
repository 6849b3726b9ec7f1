use std::fmt;

use sea_orm::DbErr;

/// The kind of record an operation works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Venue,
    Artist,
    Show,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Venue => "Venue",
            RecordKind::Artist => "Artist",
            RecordKind::Show => "Show",
        };
        f.write_str(name)
    }
}

/// Failure of a query or mutation against the booking directory.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Invalid submission: {0}")]
    Invalid(String),
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: i64 },
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl BookingError {
    pub fn not_found(kind: RecordKind, id: i64) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
