//! Venue pages and mutations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::{cookie::CookieJar, Form};
use fyyur_common::time::now_naive;

use super::{parse_id, redirect_with_flash};
use crate::db;
use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::forms::{SearchForm, VenueForm};
use crate::templates::{render, SearchPage, VenueFormPage, VenuePage, VenuesPage};
use crate::views::{
    group_venues_by_area, partition_shows, search_by_name, upcoming_counts_by_venue, Perspective,
    VenueDetail,
};
use crate::AppState;

/// GET /venues
///
/// Venues grouped by (city, state) with their upcoming show counts.
pub async fn list_venues(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), AppError> {
    let venues = db::list_venues(&state.db)
        .await
        .map_err(|e| AppError::with_failure(e, "Venues could not be loaded."))?;
    let shows = db::list_shows(&state.db)
        .await
        .map_err(|e| AppError::with_failure(e, "Venues could not be loaded."))?;

    let areas = group_venues_by_area(&venues, &shows, &now_naive());
    let (jar, flashes) = flash::take(jar);
    Ok((jar, render(&VenuesPage { flashes, areas })?))
}

/// POST /venues/search
pub async fn search_venues(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(search): Form<SearchForm>,
) -> Result<(CookieJar, Html<String>), AppError> {
    let venues = db::list_venues(&state.db).await?;
    let shows = db::list_shows(&state.db).await?;

    let upcoming = upcoming_counts_by_venue(&shows, &now_naive());
    let results = search_by_name(&venues, &upcoming, &search.search_term);
    tracing::debug!(term = %search.search_term, count = results.count, "Venue search");

    let (jar, flashes) = flash::take(jar);
    let page = SearchPage {
        flashes,
        entity: "venues",
        search_term: search.search_term,
        results,
    };
    Ok((jar, render(&page)?))
}

/// GET /venues/:id
pub async fn show_venue(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(raw_id): Path<String>,
) -> Result<(CookieJar, Html<String>), AppError> {
    let id = parse_id(&raw_id, "Venue")?;
    let venue = db::get_venue(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue {} not found", id)))?;
    let shows = db::shows_for_venue(&state.db, id).await?;

    let (jar, flashes) = flash::take(jar);
    let page = VenuePage {
        flashes,
        venue: VenueDetail::from(&venue),
        shows: partition_shows(&shows, Perspective::Venue, &now_naive()),
    };
    Ok((jar, render(&page)?))
}

/// GET /venues/create
pub async fn create_venue_form(jar: CookieJar) -> Result<(CookieJar, Html<String>), AppError> {
    let (jar, flashes) = flash::take(jar);
    let page = VenueFormPage {
        flashes,
        ..VenueFormPage::new("List a new venue", "/venues/create", VenueForm::default())
    };
    Ok((jar, render(&page)?))
}

/// POST /venues/create
///
/// Invalid input re-renders the form (400). A store failure is reported as
/// an error flash on the home page; nothing is written.
pub async fn create_venue(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> Result<Response, AppError> {
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => {
            let page = VenueFormPage {
                errors: errors.messages(),
                ..VenueFormPage::new("List a new venue", "/venues/create", form)
            };
            return Ok((StatusCode::BAD_REQUEST, render(&page)?).into_response());
        }
    };

    match db::insert_venue(&state.db, &draft).await {
        Ok(venue) => Ok(redirect_with_flash(
            jar,
            Flash::success(format!("Venue {} was successfully listed!", venue.name)),
            "/",
        )),
        Err(e) => {
            tracing::error!(error = %e, name = %draft.name, "Venue insert failed");
            Ok(redirect_with_flash(
                jar,
                Flash::error(format!(
                    "An error occurred. Venue {} could not be listed.",
                    draft.name
                )),
                "/",
            ))
        }
    }
}

/// GET /venues/:id/edit
pub async fn edit_venue_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(raw_id): Path<String>,
) -> Result<(CookieJar, Html<String>), AppError> {
    let id = parse_id(&raw_id, "Venue")?;
    let venue = db::get_venue(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue {} not found", id)))?;

    let (jar, flashes) = flash::take(jar);
    let page = VenueFormPage {
        flashes,
        ..VenueFormPage::new(
            format!("Edit venue {}", venue.name),
            format!("/venues/{}/edit", id),
            VenueForm::from(&venue.to_draft()),
        )
    };
    Ok((jar, render(&page)?))
}

/// POST /venues/:id/edit
pub async fn edit_venue(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(raw_id): Path<String>,
    Form(form): Form<VenueForm>,
) -> Result<Response, AppError> {
    let id = parse_id(&raw_id, "Venue")?;
    let current = db::get_venue(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue {} not found", id)))?;

    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => {
            let page = VenueFormPage {
                errors: errors.messages(),
                ..VenueFormPage::new(
                    format!("Edit venue {}", current.name),
                    format!("/venues/{}/edit", id),
                    form,
                )
            };
            return Ok((StatusCode::BAD_REQUEST, render(&page)?).into_response());
        }
    };

    let detail_url = format!("/venues/{}", id);
    match db::update_venue(&state.db, id, &draft).await {
        Ok(venue) => Ok(redirect_with_flash(
            jar,
            Flash::success(format!("Venue {} was successfully updated!", venue.name)),
            &detail_url,
        )),
        Err(fyyur_common::Error::NotFound(msg)) => Err(AppError::NotFound(msg)),
        Err(e) => {
            tracing::error!(error = %e, venue_id = id, "Venue update failed");
            Ok(redirect_with_flash(
                jar,
                Flash::error(format!(
                    "An error occurred. Venue {} could not be updated.",
                    current.name
                )),
                &detail_url,
            ))
        }
    }
}

/// DELETE /venues/:id
///
/// Answers 404 for an unknown id and 409 while the venue still has shows.
pub async fn delete_venue(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&raw_id, "Venue")?;
    let venue = db::delete_venue(&state.db, id)
        .await
        .map_err(|e| AppError::with_failure(e, "An error occurred. The venue could not be deleted."))?;

    Ok(redirect_with_flash(
        jar,
        Flash::success(format!("Venue {} was successfully deleted.", venue.name)),
        "/",
    ))
}
