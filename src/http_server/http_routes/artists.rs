use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::{Form, cookie::CookieJar};
use chrono::Utc;

use super::RecordId;
use crate::error::RecordKind;
use crate::http_server::{
    error::AppError,
    flash::{self, Action},
    forms::{ArtistForm, SearchForm},
    state::AppState,
    views::{ArtistFormPage, ArtistPage, ArtistsPage, SearchPage, render},
};
use crate::services::artist::ArtistService;

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let artists = ArtistService::new(state.db.clone()).list().await?;
    render(&ArtistsPage { artists })
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Result<Html<String>, AppError> {
    let results = ArtistService::new(state.db.clone())
        .search(&form.search_term, Utc::now())
        .await?;
    render(&SearchPage::new("artists", form.search_term, results))
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), AppError> {
    let detail = ArtistService::new(state.db.clone())
        .detail(id, Utc::now())
        .await?;
    let (jar, flash) = flash::take(jar);
    Ok((jar, render(&ArtistPage::new(detail, flash))?))
}

pub async fn create_form() -> Result<Html<String>, AppError> {
    render(&ArtistFormPage::create())
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> (CookieJar, Redirect) {
    let name = form.display_name();
    let result = ArtistService::new(state.db.clone())
        .create(form.into_new_artist())
        .await;

    let message = flash::outcome(RecordKind::Artist, Some(&name), Action::Listed, &result);
    (flash::push(jar, &message), Redirect::to("/"))
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Html<String>, AppError> {
    let artist = ArtistService::new(state.db.clone()).get(id).await?;
    render(&ArtistFormPage::edit(&artist))
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> (CookieJar, Redirect) {
    let submitted_name = form.display_name();
    let result = ArtistService::new(state.db.clone())
        .update(id, form.into_changes())
        .await;

    let name = match &result {
        Ok(artist) => artist.name.clone(),
        Err(_) => submitted_name,
    };
    let message = flash::outcome(RecordKind::Artist, Some(&name), Action::Updated, &result);
    (
        flash::push(jar, &message),
        Redirect::to(&format!("/artists/{id}")),
    )
}
