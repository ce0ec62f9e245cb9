//! Show listing and creation

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::{cookie::CookieJar, Form};

use super::redirect_with_flash;
use crate::db;
use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::forms::ShowForm;
use crate::templates::{render, ShowFormPage, ShowsPage};
use crate::views::show_listings;
use crate::AppState;

/// GET /shows
pub async fn list_shows(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), AppError> {
    let shows = db::list_show_details(&state.db)
        .await
        .map_err(|e| AppError::with_failure(e, "Shows could not be loaded."))?;

    let (jar, flashes) = flash::take(jar);
    let page = ShowsPage {
        flashes,
        shows: show_listings(&shows),
    };
    Ok((jar, render(&page)?))
}

/// GET /shows/create
pub async fn create_show_form(jar: CookieJar) -> Result<(CookieJar, Html<String>), AppError> {
    let (jar, flashes) = flash::take(jar);
    let page = ShowFormPage {
        flashes,
        form: ShowForm::default(),
        errors: Vec::new(),
    };
    Ok((jar, render(&page)?))
}

fn rejected(form: ShowForm, errors: Vec<String>) -> Result<Response, AppError> {
    let page = ShowFormPage {
        flashes: Vec::new(),
        form,
        errors,
    };
    Ok((StatusCode::BAD_REQUEST, render(&page)?).into_response())
}

/// POST /shows/create
///
/// An unknown venue or artist id re-renders the form like any other
/// invalid input.
pub async fn create_show(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ShowForm>,
) -> Result<Response, AppError> {
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => return rejected(form, errors.messages()),
    };

    match db::insert_show(&state.db, &draft).await {
        Ok(_) => Ok(redirect_with_flash(
            jar,
            Flash::success("Show was successfully listed!"),
            "/",
        )),
        Err(fyyur_common::Error::InvalidInput(msg)) => rejected(form, vec![msg]),
        Err(e) => {
            tracing::error!(error = %e, "Show insert failed");
            Ok(redirect_with_flash(
                jar,
                Flash::error("An error occurred. Show could not be listed."),
                "/",
            ))
        }
    }
}
