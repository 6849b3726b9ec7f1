use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use tracing::instrument;

use crate::database::Database;
use crate::entities::{artist, show, venue};
use crate::error::{BookingError, BookingResult, RecordKind};

/// A show with its artist and venue resolved.
#[derive(Debug, Clone)]
pub struct ShowListing {
    pub id: i64,
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewShow {
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: DateTime<Utc>,
}

pub struct ShowService {
    db: Arc<Database>,
}

impl ShowService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every show ordered by start time.
    #[instrument(skip(self))]
    pub async fn list(&self) -> BookingResult<Vec<ShowListing>> {
        let rows = show::Entity::find()
            .find_also_related(artist::Entity)
            .all(&self.db.conn)
            .await?;
        let venues: HashMap<i64, venue::Model> = venue::Entity::find()
            .all(&self.db.conn)
            .await?
            .into_iter()
            .map(|venue| (venue.id, venue))
            .collect();

        let mut listings: Vec<ShowListing> = rows
            .into_iter()
            .filter_map(|(show, artist)| {
                let Some(artist) = artist else {
                    log::warn!("Show {} references missing artist {}", show.id, show.artist_id);
                    return None;
                };
                let Some(venue) = venues.get(&show.venue_id) else {
                    log::warn!("Show {} references missing venue {}", show.id, show.venue_id);
                    return None;
                };

                Some(ShowListing {
                    id: show.id,
                    venue_id: venue.id,
                    venue_name: venue.name.clone(),
                    artist_id: artist.id,
                    artist_name: artist.name,
                    artist_image_link: artist.image_link,
                    start_time: show.start_time,
                })
            })
            .collect();

        listings.sort_by_key(|listing| (listing.start_time, listing.id));
        Ok(listings)
    }

    /// Schedule a show. Both the artist and the venue must already exist.
    #[instrument(skip(self))]
    pub async fn create(&self, new_show: NewShow) -> BookingResult<show::Model> {
        let txn = self.db.conn.begin().await?;

        artist::Entity::find_by_id(new_show.artist_id)
            .one(&txn)
            .await?
            .ok_or(BookingError::not_found(RecordKind::Artist, new_show.artist_id))?;
        venue::Entity::find_by_id(new_show.venue_id)
            .one(&txn)
            .await?
            .ok_or(BookingError::not_found(RecordKind::Venue, new_show.venue_id))?;

        let show = show::ActiveModel {
            artist_id: Set(new_show.artist_id),
            venue_id: Set(new_show.venue_id),
            start_time: Set(new_show.start_time),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        log::info!(
            "Show created: artist {} at venue {} (ID: {})",
            show.artist_id,
            show.venue_id,
            show.id
        );
        Ok(show)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::artist::{ArtistService, NewArtist};
    use crate::services::venue::{NewVenue, VenueService};
    use crate::test_utils::test_db;
    use chrono::Duration;

    async fn seed(db: &Arc<Database>) -> (artist::Model, venue::Model) {
        let artist = ArtistService::new(db.clone())
            .create(NewArtist {
                name: "Jane Doe".into(),
                city: "Oakland".into(),
                state: "CA".into(),
                image_link: Some("https://example.com/jane.jpg".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let venue = VenueService::new(db.clone())
            .create(NewVenue {
                name: "The Fillmore".into(),
                city: "San Francisco".into(),
                state: "CA".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        (artist, venue)
    }

    #[tokio::test]
    async fn test_list_empty() {
        let db = test_db().await;
        let service = ShowService::new(db);

        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_list_resolves_names() {
        let db = test_db().await;
        let (artist, venue) = seed(&db).await;
        let service = ShowService::new(db);
        let later = Utc::now() + Duration::days(365);
        let sooner = Utc::now() + Duration::days(7);

        service
            .create(NewShow {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time: later,
            })
            .await
            .unwrap();
        service
            .create(NewShow {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time: sooner,
            })
            .await
            .unwrap();

        let listings = service.list().await.unwrap();
        assert_eq!(listings.len(), 2);
        assert!(listings[0].start_time < listings[1].start_time);
        assert_eq!((listings[0].start_time - sooner).num_seconds(), 0);
        assert_eq!(listings[0].artist_name, "Jane Doe");
        assert_eq!(listings[0].venue_name, "The Fillmore");
        assert_eq!(
            listings[0].artist_image_link.as_deref(),
            Some("https://example.com/jane.jpg")
        );
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_references() {
        let db = test_db().await;
        let (artist, venue) = seed(&db).await;
        let service = ShowService::new(db);

        let err = service
            .create(NewShow {
                artist_id: artist.id + 100,
                venue_id: venue.id,
                start_time: Utc::now(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BookingError::NotFound {
                kind: RecordKind::Artist,
                ..
            }
        ));

        let err = service
            .create(NewShow {
                artist_id: artist.id,
                venue_id: venue.id + 100,
                start_time: Utc::now(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BookingError::NotFound {
                kind: RecordKind::Venue,
                ..
            }
        ));

        assert!(service.list().await.unwrap().is_empty());
    }
}
