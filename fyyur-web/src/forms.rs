//! Typed request models for the create/edit forms
//!
//! Each form deserializes every field leniently (missing means empty) and
//! then `validate()` turns it into a store draft or a [`FormError`] listing
//! every problem. The same struct prefills the form page on GET and on a
//! failed POST.

use fyyur_common::choices::{is_known_genre, is_known_state, GENRES, STATES};
use fyyur_common::db::{ArtistDraft, ShowDraft, VenueDraft};
use fyyur_common::time::parse_datetime;
use serde::Deserialize;
use thiserror::Error;

/// A single field problem
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// All problems found in one submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} invalid field(s)", .errors.len())]
pub struct FormError {
    pub errors: Vec<FieldError>,
}

impl FormError {
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

/// Collects field errors while a form is checked
#[derive(Debug, Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn required(&mut self, field: &'static str, value: &str) -> String {
        let value = value.trim();
        if value.is_empty() {
            self.errors.push(FieldError::Missing(field));
        }
        value.to_string()
    }

    fn invalid(&mut self, field: &'static str, reason: impl Into<String>) {
        self.errors.push(FieldError::Invalid {
            field,
            reason: reason.into(),
        });
    }

    fn state(&mut self, value: &str) -> String {
        let state = self.required("state", value);
        if !state.is_empty() && !is_known_state(&state) {
            self.invalid("state", format!("unknown state '{}'", state));
        }
        state
    }

    fn genres(&mut self, values: &[String]) -> Vec<String> {
        let mut genres: Vec<String> = Vec::new();
        for genre in values.iter().map(|g| g.trim()).filter(|g| !g.is_empty()) {
            if !is_known_genre(genre) {
                self.invalid("genres", format!("unknown genre '{}'", genre));
            } else if !genres.iter().any(|g| g == genre) {
                genres.push(genre.to_string());
            }
        }
        genres
    }

    fn link(&mut self, field: &'static str, value: &str) -> Option<String> {
        let value = optional(value)?;
        if !(value.starts_with("http://") || value.starts_with("https://")) {
            self.invalid(field, "must be an http(s) URL");
        }
        Some(value)
    }

    fn phone(&mut self, value: &str) -> Option<String> {
        let value = optional(value)?;
        let allowed = |c: char| c.is_ascii_digit() || " -().+".contains(c);
        if !value.chars().all(allowed) || !value.chars().any(|c| c.is_ascii_digit()) {
            self.invalid("phone", "must contain only digits, spaces, and - ( ) +");
        }
        Some(value)
    }

    fn id(&mut self, field: &'static str, value: &str) -> i64 {
        let raw = self.required(field, value);
        if raw.is_empty() {
            return 0;
        }
        match raw.parse::<i64>() {
            Ok(id) if id > 0 => id,
            _ => {
                self.invalid(field, format!("'{}' is not a valid id", raw));
                0
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, FormError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(FormError {
                errors: self.errors,
            })
        }
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// One `<option>` of a select box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

pub fn state_choices(selected: &str) -> Vec<Choice> {
    STATES
        .iter()
        .map(|state| Choice {
            value: state.to_string(),
            label: state.to_string(),
            selected: *state == selected,
        })
        .collect()
}

pub fn genre_choices(selected: &[String]) -> Vec<Choice> {
    GENRES
        .iter()
        .map(|genre| Choice {
            value: genre.to_string(),
            label: genre.to_string(),
            selected: selected.iter().any(|g| g == genre),
        })
        .collect()
}

// ============================================================================
// Venue
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VenueForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub image_link: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub facebook_link: String,
    #[serde(default)]
    pub website: String,
    /// Checkbox: present (any value, even empty) means checked
    #[serde(default, deserialize_with = "checkbox")]
    pub seeking_talent: Option<String>,
    #[serde(default)]
    pub seeking_description: String,
}

/// Keeps an empty checkbox value as `Some`; a bare `Option` would read it as absent
fn checkbox<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}

impl VenueForm {
    pub fn seeking_talent(&self) -> bool {
        self.seeking_talent.is_some()
    }

    pub fn validate(&self) -> Result<VenueDraft, FormError> {
        let mut check = Checker::default();

        let draft = VenueDraft {
            name: check.required("name", &self.name),
            city: check.required("city", &self.city),
            state: check.state(&self.state),
            address: check.required("address", &self.address),
            phone: check.phone(&self.phone),
            website: check.link("website", &self.website),
            facebook_link: check.link("facebook_link", &self.facebook_link),
            genres: check.genres(&self.genres),
            image_link: check.link("image_link", &self.image_link),
            seeking_talent: self.seeking_talent(),
            seeking_description: optional(&self.seeking_description),
        };

        check.finish(draft)
    }
}

impl From<&VenueDraft> for VenueForm {
    fn from(draft: &VenueDraft) -> Self {
        Self {
            name: draft.name.clone(),
            city: draft.city.clone(),
            state: draft.state.clone(),
            address: draft.address.clone(),
            phone: draft.phone.clone().unwrap_or_default(),
            image_link: draft.image_link.clone().unwrap_or_default(),
            genres: draft.genres.clone(),
            facebook_link: draft.facebook_link.clone().unwrap_or_default(),
            website: draft.website.clone().unwrap_or_default(),
            seeking_talent: draft.seeking_talent.then(|| "y".to_string()),
            seeking_description: draft.seeking_description.clone().unwrap_or_default(),
        }
    }
}

// ============================================================================
// Artist
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArtistForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub image_link: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub facebook_link: String,
}

impl ArtistForm {
    pub fn validate(&self) -> Result<ArtistDraft, FormError> {
        let mut check = Checker::default();

        let draft = ArtistDraft {
            name: check.required("name", &self.name),
            city: check.required("city", &self.city),
            state: check.state(&self.state),
            phone: check.phone(&self.phone),
            genres: check.genres(&self.genres),
            image_link: check.link("image_link", &self.image_link),
            facebook_link: check.link("facebook_link", &self.facebook_link),
        };

        check.finish(draft)
    }
}

impl From<&ArtistDraft> for ArtistForm {
    fn from(draft: &ArtistDraft) -> Self {
        Self {
            name: draft.name.clone(),
            city: draft.city.clone(),
            state: draft.state.clone(),
            phone: draft.phone.clone().unwrap_or_default(),
            image_link: draft.image_link.clone().unwrap_or_default(),
            genres: draft.genres.clone(),
            facebook_link: draft.facebook_link.clone().unwrap_or_default(),
        }
    }
}

// ============================================================================
// Show
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShowForm {
    #[serde(default)]
    pub artist_id: String,
    #[serde(default)]
    pub venue_id: String,
    #[serde(default)]
    pub start_time: String,
}

impl ShowForm {
    pub fn validate(&self) -> Result<ShowDraft, FormError> {
        let mut check = Checker::default();

        let artist_id = check.id("artist_id", &self.artist_id);
        let venue_id = check.id("venue_id", &self.venue_id);
        let raw_start = check.required("start_time", &self.start_time);
        let start_time = if raw_start.is_empty() {
            None
        } else {
            match parse_datetime(&raw_start) {
                Ok(dt) => Some(dt),
                Err(_) => {
                    check.invalid("start_time", format!("'{}' is not a date/time", raw_start));
                    None
                }
            }
        };

        match start_time {
            Some(start_time) => check.finish(ShowDraft {
                venue_id,
                artist_id,
                start_time,
            }),
            None => Err(FormError {
                errors: check.errors,
            }),
        }
    }
}

/// Body of `POST /venues/search` and `POST /artists/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}
