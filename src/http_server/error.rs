use std::any::Any;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::error::BookingError;
use crate::http_server::views::{NotFoundPage, ServerErrorPage, render};

/// Failure of a request handler. Rendered as one of the two fixed error pages;
/// internal detail only goes to the log.
pub enum AppError {
    NotFound,
    Internal(color_eyre::Report),
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound => f.write_str("NotFound"),
            AppError::Internal(report) => report.fmt(f),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        if err.is_not_found() {
            log::debug!("{err}");
            AppError::NotFound
        } else {
            AppError::Internal(err.into())
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        AppError::Internal(color_eyre::eyre::eyre!("Failed to render template: {err}"))
    }
}

fn error_page<T: askama::Template>(status: StatusCode, page: T, fallback: &'static str) -> Response {
    match render(&page) {
        Ok(html) => (status, html).into_response(),
        Err(_) => (status, Html(fallback)).into_response(),
    }
}

// Tell axum how to convert `AppError` into a response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => error_page(StatusCode::NOT_FOUND, NotFoundPage, "Not Found"),
            AppError::Internal(err) => {
                log::error!("{err:?}");
                error_page(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ServerErrorPage,
                    "Something went wrong",
                )
            }
        }
    }
}

/// Response for a handler that panicked: the 500 page, with the panic message
/// logged.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic".to_string()
    };
    AppError::Internal(color_eyre::eyre::eyre!("Handler panicked: {detail}")).into_response()
}
