//! Submitted form bodies and their conversion into service inputs.

use serde::Deserialize;

use crate::error::{BookingError, BookingResult};
use crate::filters::parse_datetime;
use crate::services::artist::{ArtistChanges, NewArtist};
use crate::services::show::NewShow;
use crate::services::venue::{NewVenue, VenueChanges};

/// Checkbox/select values that mean "yes".
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "on" | "true" | "1"
    )
}

/// Genres may arrive as repeated fields, comma-separated text, or both.
fn split_genres(genres: Vec<String>) -> Vec<String> {
    genres
        .iter()
        .flat_map(|genre| genre.split(','))
        .map(|genre| genre.trim().to_string())
        .filter(|genre| !genre.is_empty())
        .collect()
}

/// `None` when the form carried no `genres` field at all. A blank field is
/// `Some` of an empty list, which clears the stored genres.
fn submitted_genres(genres: Vec<String>) -> Option<Vec<String>> {
    (!genres.is_empty()).then(|| split_genres(genres))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct VenueForm {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: Option<String>,
    pub seeking_description: Option<String>,
}

impl VenueForm {
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_default()
    }

    pub fn into_new_venue(self) -> NewVenue {
        NewVenue {
            name: self.name.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            address: self.address,
            phone: self.phone,
            genres: split_genres(self.genres),
            image_link: self.image_link,
            facebook_link: self.facebook_link,
            website: self.website,
            seeking_talent: self.seeking_talent.as_deref().is_some_and(parse_flag),
            seeking_description: self.seeking_description,
        }
    }

    /// Fields missing from the submission stay `None` and are left untouched.
    pub fn into_changes(self) -> VenueChanges {
        VenueChanges {
            name: self.name,
            city: self.city,
            state: self.state,
            address: self.address,
            phone: self.phone,
            genres: submitted_genres(self.genres),
            image_link: self.image_link,
            facebook_link: self.facebook_link,
            website: self.website,
            seeking_talent: self.seeking_talent.as_deref().map(parse_flag),
            seeking_description: self.seeking_description,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtistForm {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: Option<String>,
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_default()
    }

    pub fn into_new_artist(self) -> NewArtist {
        NewArtist {
            name: self.name.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            phone: self.phone,
            genres: split_genres(self.genres),
            image_link: self.image_link,
            facebook_link: self.facebook_link,
            website: self.website,
            seeking_venue: self.seeking_venue.as_deref().is_some_and(parse_flag),
            seeking_description: self.seeking_description,
        }
    }

    pub fn into_changes(self) -> ArtistChanges {
        ArtistChanges {
            name: self.name,
            city: self.city,
            state: self.state,
            phone: self.phone,
            genres: submitted_genres(self.genres),
            image_link: self.image_link,
            facebook_link: self.facebook_link,
            website: self.website,
            seeking_venue: self.seeking_venue.as_deref().map(parse_flag),
            seeking_description: self.seeking_description,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ShowForm {
    #[serde(default)]
    pub artist_id: String,
    #[serde(default)]
    pub venue_id: String,
    #[serde(default)]
    pub start_time: String,
}

fn parse_id(field: &str, value: &str) -> BookingResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| BookingError::Invalid(format!("{field} must be a number, got {value:?}")))
}

impl ShowForm {
    pub fn into_new_show(self) -> BookingResult<NewShow> {
        Ok(NewShow {
            artist_id: parse_id("artist_id", &self.artist_id)?,
            venue_id: parse_id("venue_id", &self.venue_id)?,
            start_time: parse_datetime(&self.start_time)
                .map_err(|err| BookingError::Invalid(err.to_string()))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("y"));
        assert!(parse_flag("Yes"));
        assert!(parse_flag("on"));
        assert!(!parse_flag("n"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_venue_form_into_new_venue() {
        let form = VenueForm {
            name: Some("The Fillmore".into()),
            city: Some("San Francisco".into()),
            state: Some("CA".into()),
            genres: vec!["Rock, Jazz".into(), "Folk".into()],
            seeking_talent: Some("y".into()),
            ..Default::default()
        };

        let venue = form.into_new_venue();

        assert_eq!(venue.name, "The Fillmore");
        assert_eq!(venue.genres, vec!["Rock", "Jazz", "Folk"]);
        assert!(venue.seeking_talent);
        assert_eq!(venue.address, None);
    }

    #[test]
    fn test_venue_form_into_changes_keeps_missing_fields_unset() {
        let form = VenueForm {
            phone: Some("415-555-0100".into()),
            ..Default::default()
        };

        let changes = form.into_changes();

        assert_eq!(changes.phone.as_deref(), Some("415-555-0100"));
        assert!(changes.name.is_none());
        assert!(changes.genres.is_none());
        assert!(changes.seeking_talent.is_none());
    }

    #[test]
    fn test_blank_genres_clear_the_stored_list() {
        let form = VenueForm {
            genres: vec!["".into()],
            ..Default::default()
        };
        assert_eq!(form.into_changes().genres, Some(vec![]));

        let form = ArtistForm {
            genres: vec![" , ".into()],
            ..Default::default()
        };
        assert_eq!(form.into_changes().genres, Some(vec![]));
    }

    #[test]
    fn test_artist_form_seeking_flag() {
        let form = ArtistForm {
            name: Some("Jane Doe".into()),
            seeking_venue: Some("n".into()),
            ..Default::default()
        };

        assert_eq!(form.display_name(), "Jane Doe");
        assert_eq!(form.into_changes().seeking_venue, Some(false));
    }

    #[test]
    fn test_show_form_into_new_show() {
        let form = ShowForm {
            artist_id: "4".into(),
            venue_id: " 1".into(),
            start_time: "2035-04-01 20:00:00".into(),
        };

        let show = form.into_new_show().unwrap();

        assert_eq!(show.artist_id, 4);
        assert_eq!(show.venue_id, 1);
        assert_eq!(
            show.start_time,
            Utc.with_ymd_and_hms(2035, 4, 1, 20, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_show_form_rejects_bad_input() {
        let form = ShowForm {
            artist_id: "four".into(),
            venue_id: "1".into(),
            start_time: "2035-04-01 20:00:00".into(),
        };
        assert!(matches!(form.into_new_show(), Err(BookingError::Invalid(_))));

        let form = ShowForm {
            artist_id: "4".into(),
            venue_id: "1".into(),
            start_time: "someday".into(),
        };
        assert!(matches!(form.into_new_show(), Err(BookingError::Invalid(_))));
    }
}
