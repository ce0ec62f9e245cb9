//! Artist pages and mutations

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
use crate::forms::{ArtistForm, SearchForm};
use crate::templates::{render, ArtistFormPage, ArtistPage, ArtistsPage, SearchPage};
use crate::views::{
    artist_summaries, partition_shows, search_by_name, upcoming_counts_by_artist, ArtistDetail,
    Perspective,
};
use crate::AppState;

/// GET /artists
pub async fn list_artists(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), AppError> {
    let artists = db::list_artists(&state.db)
        .await
        .map_err(|e| AppError::with_failure(e, "Artists could not be loaded."))?;

    let (jar, flashes) = flash::take(jar);
    let page = ArtistsPage {
        flashes,
        artists: artist_summaries(&artists),
    };
    Ok((jar, render(&page)?))
}

/// POST /artists/search
pub async fn search_artists(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(search): Form<SearchForm>,
) -> Result<(CookieJar, Html<String>), AppError> {
    let artists = db::list_artists(&state.db).await?;
    let shows = db::list_shows(&state.db).await?;

    let upcoming = upcoming_counts_by_artist(&shows, &now_naive());
    let results = search_by_name(&artists, &upcoming, &search.search_term);
    tracing::debug!(term = %search.search_term, count = results.count, "Artist search");

    let (jar, flashes) = flash::take(jar);
    let page = SearchPage {
        flashes,
        entity: "artists",
        search_term: search.search_term,
        results,
    };
    Ok((jar, render(&page)?))
}

/// GET /artists/:id
pub async fn show_artist(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(raw_id): Path<String>,
) -> Result<(CookieJar, Html<String>), AppError> {
    let id = parse_id(&raw_id, "Artist")?;
    let artist = db::get_artist(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Artist {} not found", id)))?;
    let shows = db::shows_for_artist(&state.db, id).await?;

    let (jar, flashes) = flash::take(jar);
    let page = ArtistPage {
        flashes,
        artist: ArtistDetail::from(&artist),
        shows: partition_shows(&shows, Perspective::Artist, &now_naive()),
    };
    Ok((jar, render(&page)?))
}

/// GET /artists/create
pub async fn create_artist_form(jar: CookieJar) -> Result<(CookieJar, Html<String>), AppError> {
    let (jar, flashes) = flash::take(jar);
    let page = ArtistFormPage {
        flashes,
        ..ArtistFormPage::new("List a new artist", "/artists/create", ArtistForm::default())
    };
    Ok((jar, render(&page)?))
}

/// POST /artists/create
pub async fn create_artist(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> Result<Response, AppError> {
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => {
            let page = ArtistFormPage {
                errors: errors.messages(),
                ..ArtistFormPage::new("List a new artist", "/artists/create", form)
            };
            return Ok((StatusCode::BAD_REQUEST, render(&page)?).into_response());
        }
    };

    match db::insert_artist(&state.db, &draft).await {
        Ok(artist) => Ok(redirect_with_flash(
            jar,
            Flash::success(format!("Artist {} was successfully listed!", artist.name)),
            "/",
        )),
        Err(e) => {
            tracing::error!(error = %e, name = %draft.name, "Artist insert failed");
            Ok(redirect_with_flash(
                jar,
                Flash::error(format!(
                    "An error occurred. Artist {} could not be listed.",
                    draft.name
                )),
                "/",
            ))
        }
    }
}

/// GET /artists/:id/edit
pub async fn edit_artist_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(raw_id): Path<String>,
) -> Result<(CookieJar, Html<String>), AppError> {
    let id = parse_id(&raw_id, "Artist")?;
    let artist = db::get_artist(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Artist {} not found", id)))?;

    let (jar, flashes) = flash::take(jar);
    let page = ArtistFormPage {
        flashes,
        ..ArtistFormPage::new(
            format!("Edit artist {}", artist.name),
            format!("/artists/{}/edit", id),
            ArtistForm::from(&artist.to_draft()),
        )
    };
    Ok((jar, render(&page)?))
}

/// POST /artists/:id/edit
pub async fn edit_artist(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(raw_id): Path<String>,
    Form(form): Form<ArtistForm>,
) -> Result<Response, AppError> {
    let id = parse_id(&raw_id, "Artist")?;
    let current = db::get_artist(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Artist {} not found", id)))?;

    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => {
            let page = ArtistFormPage {
                errors: errors.messages(),
                ..ArtistFormPage::new(
                    format!("Edit artist {}", current.name),
                    format!("/artists/{}/edit", id),
                    form,
                )
            };
            return Ok((StatusCode::BAD_REQUEST, render(&page)?).into_response());
        }
    };

    let detail_url = format!("/artists/{}", id);
    match db::update_artist(&state.db, id, &draft).await {
        Ok(artist) => Ok(redirect_with_flash(
            jar,
            Flash::success(format!("Artist {} was successfully updated!", artist.name)),
            &detail_url,
        )),
        Err(fyyur_common::Error::NotFound(msg)) => Err(AppError::NotFound(msg)),
        Err(e) => {
            tracing::error!(error = %e, artist_id = id, "Artist update failed");
            Ok(redirect_with_flash(
                jar,
                Flash::error(format!(
                    "An error occurred. Artist {} could not be updated.",
                    current.name
                )),
                &detail_url,
            ))
        }
    }
}
