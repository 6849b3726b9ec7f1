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

/// Venues sharing one `(city, state)` pair.
#[derive(Debug, Clone)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<RecordSummary>,
}

/// A show as listed on its venue's page.
#[derive(Debug, Clone)]
pub struct ShowWithArtist {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct VenueDetail {
    pub venue: venue::Model,
    pub shows: ScheduledShows<ShowWithArtist>,
}

#[derive(Debug, Clone, Default)]
pub struct NewVenue {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

/// Submitted edits. `None` leaves the stored value untouched; an empty string
/// clears an optional column.
#[derive(Debug, Clone, Default)]
pub struct VenueChanges {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub genres: Option<Vec<String>>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: Option<bool>,
    pub seeking_description: Option<String>,
}

pub struct VenueService {
    db: Arc<Database>,
}

impl VenueService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every venue, grouped by area. Areas are ordered by state then city.
    #[instrument(skip(self))]
    pub async fn list_by_area(&self, now: DateTime<Utc>) -> BookingResult<Vec<VenueArea>> {
        let venues = venue::Entity::find()
            .order_by_asc(venue::Column::State)
            .order_by_asc(venue::Column::City)
            .order_by_asc(venue::Column::Id)
            .all(&self.db.conn)
            .await?;
        let upcoming = upcoming_counts(&self.db.conn, &now, |s| s.venue_id).await?;

        let mut areas: Vec<VenueArea> = Vec::new();
        for venue in venues {
            let summary = RecordSummary {
                id: venue.id,
                num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
                name: venue.name,
            };

            match areas.last_mut() {
                Some(area) if area.city == venue.city && area.state == venue.state => {
                    area.venues.push(summary)
                }
                _ => areas.push(VenueArea {
                    city: venue.city,
                    state: venue.state,
                    venues: vec![summary],
                }),
            }
        }

        Ok(areas)
    }

    #[instrument(skip(self))]
    pub async fn search(
        &self,
        search_term: &str,
        now: DateTime<Utc>,
    ) -> BookingResult<SearchResults<RecordSummary>> {
        let venues = venue::Entity::find()
            .filter(venue::Column::Name.like(name_pattern(search_term)))
            .order_by_asc(venue::Column::Id)
            .all(&self.db.conn)
            .await?;
        let upcoming = upcoming_counts(&self.db.conn, &now, |s| s.venue_id).await?;

        let data: Vec<RecordSummary> = venues
            .into_iter()
            .map(|venue| RecordSummary {
                num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
                id: venue.id,
                name: venue.name,
            })
            .collect();

        Ok(data.into())
    }

    pub async fn get(&self, id: i64) -> BookingResult<venue::Model> {
        venue::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
            .ok_or(BookingError::not_found(RecordKind::Venue, id))
    }

    /// The venue plus its shows, split into past and upcoming relative to `now`.
    #[instrument(skip(self))]
    pub async fn detail(&self, id: i64, now: DateTime<Utc>) -> BookingResult<VenueDetail> {
        let venue = self.get(id).await?;

        let rows = show::Entity::find()
            .filter(show::Column::VenueId.eq(id))
            .find_also_related(artist::Entity)
            .all(&self.db.conn)
            .await?;

        let shows = rows
            .into_iter()
            .filter_map(|(show, artist)| match artist {
                Some(artist) => Some(ShowWithArtist {
                    artist_id: artist.id,
                    artist_name: artist.name,
                    artist_image_link: artist.image_link,
                    start_time: show.start_time,
                }),
                None => {
                    log::warn!("Show {} references missing artist {}", show.id, show.artist_id);
                    None
                }
            })
            .collect();

        Ok(VenueDetail {
            venue,
            shows: ScheduledShows::split(shows, |s| s.start_time, &now),
        })
    }

    #[instrument(skip(self))]
    pub async fn create(&self, new_venue: NewVenue) -> BookingResult<venue::Model> {
        let venue = venue::ActiveModel {
            name: Set(required("name", new_venue.name)?),
            city: Set(required("city", new_venue.city)?),
            state: Set(required("state", new_venue.state)?),
            address: Set(optional(new_venue.address)),
            phone: Set(optional(new_venue.phone)),
            genres: Set(join_genres(new_venue.genres)),
            image_link: Set(optional(new_venue.image_link)),
            facebook_link: Set(optional(new_venue.facebook_link)),
            website: Set(optional(new_venue.website)),
            seeking_talent: Set(new_venue.seeking_talent),
            seeking_description: Set(optional(new_venue.seeking_description)),
            ..Default::default()
        };

        // Dropping an uncommitted transaction rolls it back
        let txn = self.db.conn.begin().await?;
        let venue = venue.insert(&txn).await?;
        txn.commit().await?;

        log::info!("Venue created: '{}' (ID: {})", venue.name, venue.id);
        Ok(venue)
    }

    /// Overwrite the submitted fields of the venue with primary key `id`.
    #[instrument(skip(self))]
    pub async fn update(&self, id: i64, changes: VenueChanges) -> BookingResult<venue::Model> {
        let txn = self.db.conn.begin().await?;

        let current = venue::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(BookingError::not_found(RecordKind::Venue, id))?;

        let mut venue: venue::ActiveModel = current.clone().into();
        if let Some(name) = changes.name {
            venue.name = Set(required("name", name)?);
        }
        if let Some(city) = changes.city {
            venue.city = Set(required("city", city)?);
        }
        if let Some(state) = changes.state {
            venue.state = Set(required("state", state)?);
        }
        if let Some(address) = changes.address {
            venue.address = Set(optional(Some(address)));
        }
        if let Some(phone) = changes.phone {
            venue.phone = Set(optional(Some(phone)));
        }
        if let Some(genres) = changes.genres {
            venue.genres = Set(join_genres(genres));
        }
        if let Some(image_link) = changes.image_link {
            venue.image_link = Set(optional(Some(image_link)));
        }
        if let Some(facebook_link) = changes.facebook_link {
            venue.facebook_link = Set(optional(Some(facebook_link)));
        }
        if let Some(website) = changes.website {
            venue.website = Set(optional(Some(website)));
        }
        if let Some(seeking_talent) = changes.seeking_talent {
            venue.seeking_talent = Set(seeking_talent);
        }
        if let Some(seeking_description) = changes.seeking_description {
            venue.seeking_description = Set(optional(Some(seeking_description)));
        }

        if !venue.is_changed() {
            return Ok(current);
        }

        let venue = venue.update(&txn).await?;
        txn.commit().await?;

        log::info!("Venue updated: '{}' (ID: {})", venue.name, venue.id);
        Ok(venue)
    }

    /// Remove the venue with `id`; its shows go with it. Returns the number of
    /// removed venues.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> BookingResult<u64> {
        let txn = self.db.conn.begin().await?;
        let result = venue::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        log::info!("Deleted {} venue(s) with ID {}", result.rows_affected, id);
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::artist::{ArtistService, NewArtist};
    use crate::services::show::{NewShow, ShowService};
    use crate::test_utils::test_db;
    use chrono::Duration;

    fn fillmore() -> NewVenue {
        NewVenue {
            name: "The Fillmore".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            address: Some("1805 Geary St".into()),
            phone: Some("415-555-0100".into()),
            genres: vec!["Rock".into(), "Jazz".into()],
            ..Default::default()
        }
    }

    fn venue_in(name: &str, city: &str, state: &str) -> NewVenue {
        NewVenue {
            name: name.into(),
            city: city.into(),
            state: state.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let created = service.create(fillmore()).await.unwrap();
        let fetched = service.get(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "The Fillmore");
        assert_eq!(fetched.city, "San Francisco");
        assert_eq!(fetched.state, "CA");
        assert_eq!(fetched.address.as_deref(), Some("1805 Geary St"));
        assert_eq!(fetched.phone.as_deref(), Some("415-555-0100"));
        assert_eq!(fetched.genre_list(), vec!["Rock", "Jazz"]);
        assert!(!fetched.seeking_talent);
        assert_eq!(fetched.website, None);
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let result = service.create(venue_in("", "Austin", "TX")).await;

        assert!(matches!(result, Err(BookingError::Invalid(_))));
        assert!(service.list_by_area(Utc::now()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let err = service.get(42).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_by_area_groups_city_and_state() {
        let db = test_db().await;
        let service = VenueService::new(db);

        service.create(venue_in("Park Square", "San Francisco", "CA")).await.unwrap();
        service.create(venue_in("Dueling Pianos", "New York", "NY")).await.unwrap();
        service.create(venue_in("Hop Shop", "San Francisco", "CA")).await.unwrap();
        service.create(venue_in("Ryman", "Nashville", "TN")).await.unwrap();

        let areas = service.list_by_area(Utc::now()).await.unwrap();

        let keys: Vec<(&str, &str)> = areas
            .iter()
            .map(|a| (a.city.as_str(), a.state.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("San Francisco", "CA"), ("New York", "NY"), ("Nashville", "TN")]
        );
        let names: Vec<&str> = areas[0].venues.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Park Square", "Hop Shop"]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let db = test_db().await;
        let service = VenueService::new(db);

        service.create(fillmore()).await.unwrap();
        service.create(venue_in("Park Square Live", "San Francisco", "CA")).await.unwrap();

        let results = service.search("fILLm", Utc::now()).await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].name, "The Fillmore");

        let results = service.search("nowhere", Utc::now()).await.unwrap();
        assert_eq!(results.count, 0);
        assert!(results.data.is_empty());

        let results = service.search("", Utc::now()).await.unwrap();
        assert_eq!(results.count, 2);
    }

    #[tokio::test]
    async fn test_detail_splits_shows_by_venue_foreign_key() {
        let db = test_db().await;
        let venues = VenueService::new(db.clone());
        let artists = ArtistService::new(db.clone());
        let shows = ShowService::new(db);
        let now = Utc::now();

        let decoy = venues.create(venue_in("Decoy Hall", "Austin", "TX")).await.unwrap();
        let fillmore = venues.create(fillmore()).await.unwrap();
        let artist = artists
            .create(NewArtist {
                name: "Jane Doe".into(),
                city: "Oakland".into(),
                state: "CA".into(),
                image_link: Some("https://example.com/jane.jpg".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        for start_time in [now - Duration::days(10), now + Duration::days(5), now + Duration::days(365)] {
            shows
                .create(NewShow {
                    artist_id: artist.id,
                    venue_id: fillmore.id,
                    start_time,
                })
                .await
                .unwrap();
        }

        let detail = venues.detail(fillmore.id, now).await.unwrap();
        assert_eq!(detail.venue.name, "The Fillmore");
        assert_eq!(detail.shows.past_count(), 1);
        assert_eq!(detail.shows.upcoming_count(), 2);
        assert_eq!(detail.shows.upcoming[0].artist_name, "Jane Doe");
        assert_eq!(
            detail.shows.upcoming[0].artist_image_link.as_deref(),
            Some("https://example.com/jane.jpg")
        );
        assert!(detail.shows.upcoming[0].start_time < detail.shows.upcoming[1].start_time);

        // Show ids 1..=3 overlap the decoy venue's id, which must not pick them up
        let decoy_detail = venues.detail(decoy.id, now).await.unwrap();
        assert_eq!(decoy_detail.shows.past_count(), 0);
        assert_eq!(decoy_detail.shows.upcoming_count(), 0);

        let areas = venues.list_by_area(now).await.unwrap();
        let listed = areas
            .iter()
            .flat_map(|a| a.venues.iter())
            .find(|v| v.id == fillmore.id)
            .unwrap();
        assert_eq!(listed.num_upcoming_shows, 2);
    }

    #[tokio::test]
    async fn test_update_only_touches_submitted_fields() {
        let db = test_db().await;
        let service = VenueService::new(db);
        let venue = service.create(fillmore()).await.unwrap();

        let updated = service
            .update(
                venue.id,
                VenueChanges {
                    phone: Some("415-555-0199".into()),
                    seeking_talent: Some(true),
                    website: Some("".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.phone.as_deref(), Some("415-555-0199"));
        assert!(updated.seeking_talent);
        assert_eq!(updated.name, "The Fillmore");
        assert_eq!(updated.address.as_deref(), Some("1805 Geary St"));
        assert_eq!(updated.genres.as_deref(), Some("Rock,Jazz"));
        assert_eq!(updated.website, None);
        assert_eq!(service.get(venue.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_without_changes_returns_current() {
        let db = test_db().await;
        let service = VenueService::new(db);
        let venue = service.create(fillmore()).await.unwrap();

        let unchanged = service
            .update(venue.id, VenueChanges::default())
            .await
            .unwrap();

        assert_eq!(unchanged, venue);
    }

    #[tokio::test]
    async fn test_update_rejects_blank_name_and_keeps_record() {
        let db = test_db().await;
        let service = VenueService::new(db);
        let venue = service.create(fillmore()).await.unwrap();

        let result = service
            .update(
                venue.id,
                VenueChanges {
                    city: Some("Oakland".into()),
                    name: Some(" ".into()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(BookingError::Invalid(_))));
        assert_eq!(service.get(venue.id).await.unwrap(), venue);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let result = service.update(7, VenueChanges::default()).await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_removes_venue_and_its_shows() {
        let db = test_db().await;
        let venues = VenueService::new(db.clone());
        let artists = ArtistService::new(db.clone());
        let shows = ShowService::new(db);

        let venue = venues.create(fillmore()).await.unwrap();
        let artist = artists
            .create(NewArtist {
                name: "Jane Doe".into(),
                city: "Oakland".into(),
                state: "CA".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        shows
            .create(NewShow {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time: Utc::now() + Duration::days(1),
            })
            .await
            .unwrap();

        assert_eq!(venues.delete(venue.id).await.unwrap(), 1);
        assert!(venues.get(venue.id).await.unwrap_err().is_not_found());
        assert!(shows.list().await.unwrap().is_empty());
        assert_eq!(venues.delete(venue.id).await.unwrap(), 0);
    }
}
