//! Date-time formatting used by the templates.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("Unknown date format: {0}")]
    UnknownFormat(String),
    #[error("Unable to parse date-time: {0:?}")]
    InvalidDateTime(String),
}

/// Named presets accepted by [`format_datetime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// `Saturday October, 17, 2026 at 8:00PM`
    Full,
    /// `Sat 10, 17, 2026 8:00PM`
    #[default]
    Medium,
}

impl DateFormat {
    fn pattern(self) -> &'static str {
        match self {
            DateFormat::Full => "%A %B, %-d, %Y at %-I:%M%p",
            DateFormat::Medium => "%a %m, %d, %Y %-I:%M%p",
        }
    }
}

impl FromStr for DateFormat {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(DateFormat::Full),
            "medium" => Ok(DateFormat::Medium),
            other => Err(FilterError::UnknownFormat(other.to_string())),
        }
    }
}

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse an ISO-ish date-time. Values without an offset are taken as UTC.
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, FilterError> {
    let value = value.trim();

    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Ok(date_time.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| FilterError::InvalidDateTime(value.to_string()))
}

fn render_datetime(value: &DateTime<Utc>, format: DateFormat) -> String {
    value.format(format.pattern()).to_string()
}

/// Render `value` with the preset called `format` ("full" or "medium").
pub fn format_datetime(value: &str, format: &str) -> Result<String, FilterError> {
    let format = format.parse::<DateFormat>()?;
    let date_time = parse_datetime(value)?;
    Ok(render_datetime(&date_time, format))
}
