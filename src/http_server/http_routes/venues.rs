use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::{Form, cookie::CookieJar};
use chrono::Utc;

use super::RecordId;
use crate::error::{BookingError, RecordKind};
use crate::http_server::{
    error::AppError,
    flash::{self, Action},
    forms::{SearchForm, VenueForm},
    state::AppState,
    views::{SearchPage, VenueFormPage, VenuePage, VenuesPage, render},
};
use crate::services::venue::VenueService;

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let areas = VenueService::new(state.db.clone())
        .list_by_area(Utc::now())
        .await?;
    render(&VenuesPage { areas })
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Result<Html<String>, AppError> {
    let results = VenueService::new(state.db.clone())
        .search(&form.search_term, Utc::now())
        .await?;
    render(&SearchPage::new("venues", form.search_term, results))
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), AppError> {
    let detail = VenueService::new(state.db.clone())
        .detail(id, Utc::now())
        .await?;
    let (jar, flash) = flash::take(jar);
    Ok((jar, render(&VenuePage::new(detail, flash))?))
}

pub async fn create_form() -> Result<Html<String>, AppError> {
    render(&VenueFormPage::create())
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> (CookieJar, Redirect) {
    let name = form.display_name();
    let result = VenueService::new(state.db.clone())
        .create(form.into_new_venue())
        .await;

    let message = flash::outcome(RecordKind::Venue, Some(&name), Action::Listed, &result);
    (flash::push(jar, &message), Redirect::to("/"))
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Html<String>, AppError> {
    let venue = VenueService::new(state.db.clone()).get(id).await?;
    render(&VenueFormPage::edit(&venue))
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> (CookieJar, Redirect) {
    let submitted_name = form.display_name();
    let result = VenueService::new(state.db.clone())
        .update(id, form.into_changes())
        .await;

    let name = match &result {
        Ok(venue) => venue.name.clone(),
        Err(_) => submitted_name,
    };
    let message = flash::outcome(RecordKind::Venue, Some(&name), Action::Updated, &result);
    (
        flash::push(jar, &message),
        Redirect::to(&format!("/venues/{id}")),
    )
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
    jar: CookieJar,
) -> (CookieJar, StatusCode) {
    let result = VenueService::new(state.db.clone())
        .delete(id)
        .await
        .and_then(|removed| match removed {
            0 => Err(BookingError::not_found(RecordKind::Venue, id)),
            removed => Ok(removed),
        });

    let status = match &result {
        Ok(_) => StatusCode::NO_CONTENT,
        Err(err) if err.is_not_found() => StatusCode::NOT_FOUND,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = flash::outcome(RecordKind::Venue, None, Action::Deleted, &result);
    (flash::push(jar, &message), status)
}
