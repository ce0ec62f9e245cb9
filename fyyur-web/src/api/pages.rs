//! Home page and the not-found fallback

use axum::http::Uri;
use axum::response::Html;
use axum_extra::extract::cookie::CookieJar;

use crate::error::AppError;
use crate::flash;
use crate::templates::{render, HomePage};

/// GET /
pub async fn home(jar: CookieJar) -> Result<(CookieJar, Html<String>), AppError> {
    let (jar, flashes) = flash::take(jar);
    Ok((jar, render(&HomePage { flashes })?))
}

/// Any path no route claims
pub async fn not_found(uri: Uri) -> AppError {
    tracing::debug!(path = %uri.path(), "No route");
    AppError::NotFound(format!("Nothing lives at {}", uri.path()))
}
