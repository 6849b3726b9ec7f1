//! Past/upcoming classification of shows, evaluated against the time of the query.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, EntityTrait};

use crate::entities::show;
use crate::error::BookingResult;

/// A show starting exactly at `now` counts as upcoming, so every show falls
/// in exactly one bucket.
pub fn is_upcoming(start_time: &DateTime<Utc>, now: &DateTime<Utc>) -> bool {
    start_time >= now
}

#[derive(Debug, Clone)]
pub struct ScheduledShows<T> {
    pub past: Vec<T>,
    pub upcoming: Vec<T>,
}

impl<T> ScheduledShows<T> {
    /// Sort `shows` by start time and split them around `now`.
    pub fn split<F>(mut shows: Vec<T>, start_time: F, now: &DateTime<Utc>) -> Self
    where
        F: Fn(&T) -> DateTime<Utc>,
    {
        shows.sort_by_key(|s| start_time(s));
        let (upcoming, past) = shows
            .into_iter()
            .partition(|s| is_upcoming(&start_time(s), now));
        Self { past, upcoming }
    }

    pub fn past_count(&self) -> usize {
        self.past.len()
    }

    pub fn upcoming_count(&self) -> usize {
        self.upcoming.len()
    }
}

/// Upcoming show counts keyed by the id `owner` picks out of each show.
pub async fn upcoming_counts<C, F>(
    conn: &C,
    now: &DateTime<Utc>,
    owner: F,
) -> BookingResult<HashMap<i64, usize>>
where
    C: ConnectionTrait,
    F: Fn(&show::Model) -> i64,
{
    let shows = show::Entity::find().all(conn).await?;

    let mut counts = HashMap::new();
    for show in shows.iter().filter(|s| is_upcoming(&s.start_time, now)) {
        *counts.entry(owner(show)).or_insert(0) += 1;
    }
    Ok(counts)
}
