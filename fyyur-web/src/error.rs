//! HTTP error type
//!
//! Every handler returns `Result<_, AppError>`; the error renders as an HTML
//! page with the matching status code. Store failures are logged with their
//! detail while the page shows only a short message.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::templates::ErrorPage;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) | AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show in the browser
    pub fn public_message(&self) -> String {
        match self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) | AppError::Conflict(msg) => {
                msg.clone()
            }
            AppError::Internal(msg) => msg.clone(),
            AppError::Template(_) => "The page could not be rendered.".to_string(),
        }
    }

    /// Convert a store error, replacing 500-class detail with `failure`
    ///
    /// The underlying error is logged; client-side errors keep their own text.
    pub fn with_failure(err: fyyur_common::Error, failure: impl Into<String>) -> Self {
        let failure = failure.into();
        match err {
            fyyur_common::Error::NotFound(msg) => AppError::NotFound(msg),
            fyyur_common::Error::InvalidInput(msg) => AppError::BadRequest(msg),
            fyyur_common::Error::Conflict(msg) => AppError::Conflict(msg),
            other => {
                tracing::error!(error = %other, "{}", failure);
                AppError::Internal(failure)
            }
        }
    }
}

impl From<fyyur_common::Error> for AppError {
    fn from(err: fyyur_common::Error) -> Self {
        AppError::with_failure(err, "An error occurred. Please try again.")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AppError::Template(err) = &self {
            tracing::error!(error = %err, "Template rendering failed");
        }

        let page = ErrorPage {
            flashes: Vec::new(),
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.public_message(),
        };

        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "Error page rendering failed");
                (status, self.public_message()).into_response()
            }
        }
    }
}
