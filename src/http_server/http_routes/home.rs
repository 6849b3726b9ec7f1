use axum::response::Html;
use axum_extra::extract::cookie::CookieJar;

use crate::http_server::{
    error::AppError,
    flash,
    views::{HomePage, render},
};

pub async fn index(jar: CookieJar) -> Result<(CookieJar, Html<String>), AppError> {
    let (jar, flash) = flash::take(jar);
    Ok((jar, render(&HomePage { flash })?))
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
