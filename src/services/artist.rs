use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::instrument;

use super::schedule::{ScheduledShows, upcoming_counts};
use super::{RecordSummary, SearchResults, join_genres, name_pattern, optional, required};
use crate::database::Database;
use crate::entities::{artist, show, venue};
use crate::error::{BookingError, BookingResult, RecordKind};

/// A show as listed on its artist's page.
#[derive(Debug, Clone)]
pub struct ShowWithVenue {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ArtistDetail {
    pub artist: artist::Model,
    pub shows: ScheduledShows<ShowWithVenue>,
}

#[derive(Debug, Clone, Default)]
pub struct NewArtist {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

/// Submitted edits; see [`super::venue::VenueChanges`].
#[derive(Debug, Clone, Default)]
pub struct ArtistChanges {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub genres: Option<Vec<String>>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: Option<bool>,
    pub seeking_description: Option<String>,
}

pub struct ArtistService {
    db: Arc<Database>,
}

impl ArtistService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> BookingResult<Vec<artist::Model>> {
        let artists = artist::Entity::find()
            .order_by_asc(artist::Column::Id)
            .all(&self.db.conn)
            .await?;
        Ok(artists)
    }

    #[instrument(skip(self))]
    pub async fn search(
        &self,
        search_term: &str,
        now: DateTime<Utc>,
    ) -> BookingResult<SearchResults<RecordSummary>> {
        let artists = artist::Entity::find()
            .filter(artist::Column::Name.like(name_pattern(search_term)))
            .order_by_asc(artist::Column::Id)
            .all(&self.db.conn)
            .await?;
        let upcoming = upcoming_counts(&self.db.conn, &now, |s| s.artist_id).await?;

        let data: Vec<RecordSummary> = artists
            .into_iter()
            .map(|artist| RecordSummary {
                num_upcoming_shows: upcoming.get(&artist.id).copied().unwrap_or(0),
                id: artist.id,
                name: artist.name,
            })
            .collect();

        Ok(data.into())
    }

    pub async fn get(&self, id: i64) -> BookingResult<artist::Model> {
        artist::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
            .ok_or(BookingError::not_found(RecordKind::Artist, id))
    }

    #[instrument(skip(self))]
    pub async fn detail(&self, id: i64, now: DateTime<Utc>) -> BookingResult<ArtistDetail> {
        let artist = self.get(id).await?;

        let rows = show::Entity::find()
            .filter(show::Column::ArtistId.eq(id))
            .find_also_related(venue::Entity)
            .all(&self.db.conn)
            .await?;

        let shows = rows
            .into_iter()
            .filter_map(|(show, venue)| match venue {
                Some(venue) => Some(ShowWithVenue {
                    venue_id: venue.id,
                    venue_name: venue.name,
                    venue_image_link: venue.image_link,
                    start_time: show.start_time,
                }),
                None => {
                    log::warn!("Show {} references missing venue {}", show.id, show.venue_id);
                    None
                }
            })
            .collect();

        Ok(ArtistDetail {
            artist,
            shows: ScheduledShows::split(shows, |s| s.start_time, &now),
        })
    }

    #[instrument(skip(self))]
    pub async fn create(&self, new_artist: NewArtist) -> BookingResult<artist::Model> {
        let artist = artist::ActiveModel {
            name: Set(required("name", new_artist.name)?),
            city: Set(required("city", new_artist.city)?),
            state: Set(required("state", new_artist.state)?),
            phone: Set(optional(new_artist.phone)),
            genres: Set(join_genres(new_artist.genres)),
            image_link: Set(optional(new_artist.image_link)),
            facebook_link: Set(optional(new_artist.facebook_link)),
            website: Set(optional(new_artist.website)),
            seeking_venue: Set(new_artist.seeking_venue),
            seeking_description: Set(optional(new_artist.seeking_description)),
            ..Default::default()
        };

        let txn = self.db.conn.begin().await?;
        let artist = artist.insert(&txn).await?;
        txn.commit().await?;

        log::info!("Artist created: '{}' (ID: {})", artist.name, artist.id);
        Ok(artist)
    }

    /// Overwrite the submitted fields of the artist with primary key `id`.
    #[instrument(skip(self))]
    pub async fn update(&self, id: i64, changes: ArtistChanges) -> BookingResult<artist::Model> {
        let txn = self.db.conn.begin().await?;

        let current = artist::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(BookingError::not_found(RecordKind::Artist, id))?;

        let mut artist: artist::ActiveModel = current.clone().into();
        if let Some(name) = changes.name {
            artist.name = Set(required("name", name)?);
        }
        if let Some(city) = changes.city {
            artist.city = Set(required("city", city)?);
        }
        if let Some(state) = changes.state {
            artist.state = Set(required("state", state)?);
        }
        if let Some(phone) = changes.phone {
            artist.phone = Set(optional(Some(phone)));
        }
        if let Some(genres) = changes.genres {
            artist.genres = Set(join_genres(genres));
        }
        if let Some(image_link) = changes.image_link {
            artist.image_link = Set(optional(Some(image_link)));
        }
        if let Some(facebook_link) = changes.facebook_link {
            artist.facebook_link = Set(optional(Some(facebook_link)));
        }
        if let Some(website) = changes.website {
            artist.website = Set(optional(Some(website)));
        }
        if let Some(seeking_venue) = changes.seeking_venue {
            artist.seeking_venue = Set(seeking_venue);
        }
        if let Some(seeking_description) = changes.seeking_description {
            artist.seeking_description = Set(optional(Some(seeking_description)));
        }

        if !artist.is_changed() {
            return Ok(current);
        }

        let artist = artist.update(&txn).await?;
        txn.commit().await?;

        log::info!("Artist updated: '{}' (ID: {})", artist.name, artist.id);
        Ok(artist)
    }
}
