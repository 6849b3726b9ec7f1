use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::{Form, cookie::CookieJar};

use crate::error::RecordKind;
use crate::http_server::{
    error::AppError,
    flash::{self, Action},
    forms::ShowForm,
    state::AppState,
    views::{NewShowPage, ShowRow, ShowsPage, render},
};
use crate::services::show::ShowService;

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let shows = ShowService::new(state.db.clone()).list().await?;
    render(&ShowsPage {
        shows: shows.into_iter().map(ShowRow::from).collect(),
    })
}

pub async fn create_form() -> Result<Html<String>, AppError> {
    render(&NewShowPage)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ShowForm>,
) -> (CookieJar, Redirect) {
    let result = match form.into_new_show() {
        Ok(new_show) => ShowService::new(state.db.clone()).create(new_show).await,
        Err(err) => Err(err),
    };

    let message = flash::outcome(RecordKind::Show, None, Action::Listed, &result);
    (flash::push(jar, &message), Redirect::to("/"))
}
