//! HTTP handlers for fyyur-web

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::error::AppError;
use crate::flash::{self, Flash};

pub mod artists;
pub mod health;
pub mod pages;
pub mod shows;
pub mod venues;

pub use health::health_routes;

/// Parse an id path segment
///
/// A segment that is not an integer names no entity, so it is a 404 rather
/// than axum's default 400 path rejection.
pub(crate) fn parse_id(raw: &str, kind: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::NotFound(format!("{} {} not found", kind, raw)))
}

/// 303 to `to`, queueing `flash` for the page it lands on
pub(crate) fn redirect_with_flash(jar: CookieJar, flash: Flash, to: &str) -> Response {
    (flash::set(jar, flash), Redirect::to(to)).into_response()
}
