//! Compiled page templates
//!
//! Each page struct carries the pending flash messages for the banner in
//! `base.html`; everything else is a prebuilt view-model from [`crate::views`].

use askama::Template;
use axum::response::Html;

use crate::error::AppError;
use crate::flash::Flash;
use crate::forms::{ArtistForm, Choice, ShowForm, VenueForm};
use crate::views::{
    Area, ArtistDetail, ArtistSummary, PartitionedShows, SearchResults, ShowListing, VenueDetail,
};

/// Render a page into an HTML response body
pub fn render<T: Template>(page: &T) -> Result<Html<String>, AppError> {
    Ok(Html(page.render()?))
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomePage {
    pub flashes: Vec<Flash>,
}

#[derive(Template)]
#[template(path = "pages/venues.html")]
pub struct VenuesPage {
    pub flashes: Vec<Flash>,
    pub areas: Vec<Area>,
}

#[derive(Template)]
#[template(path = "pages/artists.html")]
pub struct ArtistsPage {
    pub flashes: Vec<Flash>,
    pub artists: Vec<ArtistSummary>,
}

#[derive(Template)]
#[template(path = "pages/shows.html")]
pub struct ShowsPage {
    pub flashes: Vec<Flash>,
    pub shows: Vec<ShowListing>,
}

/// Search results for either venues or artists
#[derive(Template)]
#[template(path = "pages/search.html")]
pub struct SearchPage {
    pub flashes: Vec<Flash>,
    /// URL prefix of the result links and the search form: `venues` or `artists`
    pub entity: &'static str,
    pub search_term: String,
    pub results: SearchResults,
}

#[derive(Template)]
#[template(path = "pages/show_venue.html")]
pub struct VenuePage {
    pub flashes: Vec<Flash>,
    pub venue: VenueDetail,
    pub shows: PartitionedShows,
}

#[derive(Template)]
#[template(path = "pages/show_artist.html")]
pub struct ArtistPage {
    pub flashes: Vec<Flash>,
    pub artist: ArtistDetail,
    pub shows: PartitionedShows,
}

#[derive(Template)]
#[template(path = "forms/venue.html")]
pub struct VenueFormPage {
    pub flashes: Vec<Flash>,
    pub heading: String,
    pub action: String,
    pub form: VenueForm,
    pub states: Vec<Choice>,
    pub genres: Vec<Choice>,
    pub errors: Vec<String>,
}

impl VenueFormPage {
    pub fn new(heading: impl Into<String>, action: impl Into<String>, form: VenueForm) -> Self {
        Self {
            flashes: Vec::new(),
            heading: heading.into(),
            action: action.into(),
            states: crate::forms::state_choices(&form.state),
            genres: crate::forms::genre_choices(&form.genres),
            form,
            errors: Vec::new(),
        }
    }
}

#[derive(Template)]
#[template(path = "forms/artist.html")]
pub struct ArtistFormPage {
    pub flashes: Vec<Flash>,
    pub heading: String,
    pub action: String,
    pub form: ArtistForm,
    pub states: Vec<Choice>,
    pub genres: Vec<Choice>,
    pub errors: Vec<String>,
}

impl ArtistFormPage {
    pub fn new(heading: impl Into<String>, action: impl Into<String>, form: ArtistForm) -> Self {
        Self {
            flashes: Vec::new(),
            heading: heading.into(),
            action: action.into(),
            states: crate::forms::state_choices(&form.state),
            genres: crate::forms::genre_choices(&form.genres),
            form,
            errors: Vec::new(),
        }
    }
}

#[derive(Template)]
#[template(path = "forms/show.html")]
pub struct ShowFormPage {
    pub flashes: Vec<Flash>,
    pub form: ShowForm,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "errors/error.html")]
pub struct ErrorPage {
    pub flashes: Vec<Flash>,
    pub status: u16,
    pub title: String,
    pub message: String,
}
