//! Page templates and the view models fed into them.

use askama::Template;
use axum::response::Html;
use chrono::{DateTime, Utc};

use crate::entities::{artist, venue};
use crate::http_server::error::AppError;
use crate::services::artist::{ArtistDetail, ShowWithVenue};
use crate::services::show::ShowListing;
use crate::services::venue::{ShowWithArtist, VenueArea, VenueDetail};
use crate::services::{RecordSummary, SearchResults};

pub fn render<T: Template>(page: &T) -> Result<Html<String>, AppError> {
    Ok(Html(page.render()?))
}

/// Templates receive show times as ISO strings and format them with the
/// `datetime` filter.
fn show_time(start_time: &DateTime<Utc>) -> String {
    start_time.to_rfc3339()
}

mod filters {
    use std::fmt::Display;

    pub fn datetime<T: Display>(value: T, format: &str) -> askama::Result<String> {
        crate::filters::format_datetime(&value.to_string(), format)
            .map_err(|err| askama::Error::Custom(Box::new(err)))
    }
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomePage {
    pub flash: Option<String>,
}

#[derive(Template)]
#[template(path = "pages/venues.html")]
pub struct VenuesPage {
    pub areas: Vec<VenueArea>,
}

#[derive(Template)]
#[template(path = "pages/artists.html")]
pub struct ArtistsPage {
    pub artists: Vec<artist::Model>,
}

/// Search results for either venues or artists; `section` is the URL prefix.
#[derive(Template)]
#[template(path = "pages/search.html")]
pub struct SearchPage {
    pub section: &'static str,
    pub search_term: String,
    pub count: usize,
    pub data: Vec<RecordSummary>,
}

impl SearchPage {
    pub fn new(
        section: &'static str,
        search_term: String,
        results: SearchResults<RecordSummary>,
    ) -> Self {
        Self {
            section,
            search_term,
            count: results.count,
            data: results.data,
        }
    }
}

/// One row of the past/upcoming lists on a detail page.
pub struct ShowCard {
    pub link: String,
    pub name: String,
    pub image_link: String,
    pub start_time: String,
}

impl From<ShowWithArtist> for ShowCard {
    fn from(show: ShowWithArtist) -> Self {
        Self {
            link: format!("/artists/{}", show.artist_id),
            name: show.artist_name,
            image_link: show.artist_image_link.unwrap_or_default(),
            start_time: show_time(&show.start_time),
        }
    }
}

impl From<ShowWithVenue> for ShowCard {
    fn from(show: ShowWithVenue) -> Self {
        Self {
            link: format!("/venues/{}", show.venue_id),
            name: show.venue_name,
            image_link: show.venue_image_link.unwrap_or_default(),
            start_time: show_time(&show.start_time),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/show_venue.html")]
pub struct VenuePage {
    pub flash: Option<String>,
    pub venue: venue::Model,
    pub genres: Vec<String>,
    pub past_shows: Vec<ShowCard>,
    pub upcoming_shows: Vec<ShowCard>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl VenuePage {
    pub fn new(detail: VenueDetail, flash: Option<String>) -> Self {
        Self {
            flash,
            genres: detail.venue.genre_list(),
            past_shows_count: detail.shows.past_count(),
            upcoming_shows_count: detail.shows.upcoming_count(),
            past_shows: detail.shows.past.into_iter().map(ShowCard::from).collect(),
            upcoming_shows: detail.shows.upcoming.into_iter().map(ShowCard::from).collect(),
            venue: detail.venue,
        }
    }
}

#[derive(Template)]
#[template(path = "pages/show_artist.html")]
pub struct ArtistPage {
    pub flash: Option<String>,
    pub artist: artist::Model,
    pub genres: Vec<String>,
    pub past_shows: Vec<ShowCard>,
    pub upcoming_shows: Vec<ShowCard>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl ArtistPage {
    pub fn new(detail: ArtistDetail, flash: Option<String>) -> Self {
        Self {
            flash,
            genres: detail.artist.genre_list(),
            past_shows_count: detail.shows.past_count(),
            upcoming_shows_count: detail.shows.upcoming_count(),
            past_shows: detail.shows.past.into_iter().map(ShowCard::from).collect(),
            upcoming_shows: detail.shows.upcoming.into_iter().map(ShowCard::from).collect(),
            artist: detail.artist,
        }
    }
}

pub struct ShowRow {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
}

impl From<ShowListing> for ShowRow {
    fn from(show: ShowListing) -> Self {
        Self {
            venue_id: show.venue_id,
            venue_name: show.venue_name,
            artist_id: show.artist_id,
            artist_name: show.artist_name,
            artist_image_link: show.artist_image_link.unwrap_or_default(),
            start_time: show_time(&show.start_time),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/shows.html")]
pub struct ShowsPage {
    pub shows: Vec<ShowRow>,
}

/// Field values shown in a venue or artist form; empty for a new record.
#[derive(Default)]
pub struct FormValues {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub genres: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub seeking: bool,
    pub seeking_description: String,
}

impl From<&venue::Model> for FormValues {
    fn from(venue: &venue::Model) -> Self {
        Self {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone().unwrap_or_default(),
            phone: venue.phone.clone().unwrap_or_default(),
            genres: venue.genre_list().join(", "),
            image_link: venue.image_link.clone().unwrap_or_default(),
            facebook_link: venue.facebook_link.clone().unwrap_or_default(),
            website: venue.website.clone().unwrap_or_default(),
            seeking: venue.seeking_talent,
            seeking_description: venue.seeking_description.clone().unwrap_or_default(),
        }
    }
}

impl From<&artist::Model> for FormValues {
    fn from(artist: &artist::Model) -> Self {
        Self {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            address: String::new(),
            phone: artist.phone.clone().unwrap_or_default(),
            genres: artist.genre_list().join(", "),
            image_link: artist.image_link.clone().unwrap_or_default(),
            facebook_link: artist.facebook_link.clone().unwrap_or_default(),
            website: artist.website.clone().unwrap_or_default(),
            seeking: artist.seeking_venue,
            seeking_description: artist.seeking_description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "forms/venue.html")]
pub struct VenueFormPage {
    pub heading: String,
    pub action: String,
    pub values: FormValues,
}

impl VenueFormPage {
    pub fn create() -> Self {
        Self {
            heading: "List a new venue".to_string(),
            action: "/venues/create".to_string(),
            values: FormValues::default(),
        }
    }

    pub fn edit(venue: &venue::Model) -> Self {
        Self {
            heading: format!("Edit venue {}", venue.name),
            action: format!("/venues/{}/edit", venue.id),
            values: venue.into(),
        }
    }
}

#[derive(Template)]
#[template(path = "forms/artist.html")]
pub struct ArtistFormPage {
    pub heading: String,
    pub action: String,
    pub values: FormValues,
}

impl ArtistFormPage {
    pub fn create() -> Self {
        Self {
            heading: "List a new artist".to_string(),
            action: "/artists/create".to_string(),
            values: FormValues::default(),
        }
    }

    pub fn edit(artist: &artist::Model) -> Self {
        Self {
            heading: format!("Edit artist {}", artist.name),
            action: format!("/artists/{}/edit", artist.id),
            values: artist.into(),
        }
    }
}

#[derive(Template)]
#[template(path = "forms/new_show.html")]
pub struct NewShowPage;

#[derive(Template)]
#[template(path = "errors/404.html")]
pub struct NotFoundPage;

#[derive(Template)]
#[template(path = "errors/500.html")]
pub struct ServerErrorPage;
