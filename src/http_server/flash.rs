//! One-shot notices carried across a redirect in a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::error::RecordKind;

const FLASH_COOKIE: &str = "flash";

/// Store `message` for the next page that shows flash messages.
pub fn push(jar: CookieJar, message: &str) -> CookieJar {
    let value = urlencoding::encode(message).into_owned();
    jar.add(
        Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true),
    )
}

/// Read and clear the pending message, if any.
pub fn take(jar: CookieJar) -> (CookieJar, Option<String>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };

    let message = urlencoding::decode(cookie.value())
        .map(|message| message.into_owned())
        .ok();
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), message)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Listed,
    Updated,
    Deleted,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Listed => "listed",
            Action::Updated => "updated",
            Action::Deleted => "deleted",
        }
    }
}

/// The user-facing message for the outcome of a mutation. Failures get a
/// generic message; the detailed error is logged.
pub fn outcome<T, E: std::fmt::Display>(
    kind: RecordKind,
    name: Option<&str>,
    action: Action,
    result: &Result<T, E>,
) -> String {
    let subject = match name {
        Some(name) => format!("{kind} {name}"),
        None => kind.to_string(),
    };

    match result {
        Ok(_) => format!("{subject} was successfully {}!", action.verb()),
        Err(err) => {
            log::warn!("{subject} could not be {}: {err}", action.verb());
            format!(
                "An error occurred. {subject} could not be {}.",
                action.verb()
            )
        }
    }
}
