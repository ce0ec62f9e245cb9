//! View-model builders
//!
//! Pure functions that reshape fetched records into the structures the
//! pages render: venues grouped by area, shows split into past and
//! upcoming, name search results. "Now" is always passed in so callers
//! (and tests) control the past/upcoming boundary.

use chrono::NaiveDateTime;
use fyyur_common::db::{Artist, Show, ShowDetail, Venue};
use fyyur_common::time::{format_naive, DateFormat};
use serde::Serialize;
use std::collections::HashMap;

/// A show is upcoming when it starts strictly after `now`
pub fn is_upcoming(start_time: &NaiveDateTime, now: &NaiveDateTime) -> bool {
    start_time > now
}

/// Upcoming show counts keyed by venue id
pub fn upcoming_counts_by_venue(shows: &[Show], now: &NaiveDateTime) -> HashMap<i64, usize> {
    let mut counts = HashMap::new();
    for show in shows.iter().filter(|s| is_upcoming(&s.start_time, now)) {
        *counts.entry(show.venue_id).or_insert(0) += 1;
    }
    counts
}

/// Upcoming show counts keyed by artist id
pub fn upcoming_counts_by_artist(shows: &[Show], now: &NaiveDateTime) -> HashMap<i64, usize> {
    let mut counts = HashMap::new();
    for show in shows.iter().filter(|s| is_upcoming(&s.start_time, now)) {
        *counts.entry(show.artist_id).or_insert(0) += 1;
    }
    counts
}

// ============================================================================
// Venue grouping
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Venues sharing one (city, state) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// Group venues by (city, state) in first-seen order
///
/// Areas only come from existing venues, so none is ever empty. Each venue
/// appears exactly once, carrying its count of upcoming shows.
pub fn group_venues_by_area(venues: &[Venue], shows: &[Show], now: &NaiveDateTime) -> Vec<Area> {
    let upcoming = upcoming_counts_by_venue(shows, now);
    let mut areas: Vec<Area> = Vec::new();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();

    for venue in venues {
        let key = (venue.city.as_str(), venue.state.as_str());
        let slot = *index.entry(key).or_insert_with(|| {
            areas.push(Area {
                city: venue.city.clone(),
                state: venue.state.clone(),
                venues: Vec::new(),
            });
            areas.len() - 1
        });

        areas[slot].venues.push(VenueSummary {
            id: venue.id,
            name: venue.name.clone(),
            num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
        });
    }

    areas
}

// ============================================================================
// Show partitioning
// ============================================================================

/// Which side of a show the detail page is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perspective {
    /// A venue page: each show is presented by its artist
    Venue,
    /// An artist page: each show is presented by its venue
    Artist,
}

/// One show as seen from the other side of the venue/artist link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowCard {
    pub counterpart_id: i64,
    pub counterpart_name: String,
    pub counterpart_image_link: String,
    pub start_time: NaiveDateTime,
    pub start_time_display: String,
}

impl ShowCard {
    fn from_detail(show: &ShowDetail, perspective: Perspective) -> Self {
        let (id, name, image) = match perspective {
            Perspective::Venue => (show.artist_id, &show.artist_name, &show.artist_image_link),
            Perspective::Artist => (show.venue_id, &show.venue_name, &show.venue_image_link),
        };

        Self {
            counterpart_id: id,
            counterpart_name: name.clone(),
            counterpart_image_link: image.clone().unwrap_or_default(),
            start_time: show.start_time,
            start_time_display: format_naive(&show.start_time, DateFormat::Medium),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartitionedShows {
    pub past: Vec<ShowCard>,
    pub upcoming: Vec<ShowCard>,
}

impl PartitionedShows {
    pub fn past_count(&self) -> usize {
        self.past.len()
    }

    pub fn upcoming_count(&self) -> usize {
        self.upcoming.len()
    }
}

/// Split shows into past (`start_time <= now`) and upcoming (`> now`)
///
/// Every show lands in exactly one list, in input order, carrying its own
/// counterpart's id, name and image.
pub fn partition_shows(
    shows: &[ShowDetail],
    perspective: Perspective,
    now: &NaiveDateTime,
) -> PartitionedShows {
    let mut partitioned = PartitionedShows::default();

    for show in shows {
        let card = ShowCard::from_detail(show, perspective);
        if is_upcoming(&show.start_time, now) {
            partitioned.upcoming.push(card);
        } else {
            partitioned.past.push(card);
        }
    }

    partitioned
}

// ============================================================================
// Search
// ============================================================================

/// Anything listed by id and name
pub trait Listed {
    fn id(&self) -> i64;
    fn name(&self) -> &str;
}

impl Listed for Venue {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Listed for Artist {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<SearchHit>,
}

/// Case-insensitive substring match on the name
///
/// A blank term matches everything.
pub fn name_matches(name: &str, term: &str) -> bool {
    term.trim().is_empty() || name.to_lowercase().contains(&term.to_lowercase())
}

/// Entities whose name contains `term`, with their upcoming show counts
pub fn search_by_name<T: Listed>(
    items: &[T],
    upcoming: &HashMap<i64, usize>,
    term: &str,
) -> SearchResults {
    let data: Vec<SearchHit> = items
        .iter()
        .filter(|item| name_matches(item.name(), term))
        .map(|item| SearchHit {
            id: item.id(),
            name: item.name().to_string(),
            num_upcoming_shows: upcoming.get(&item.id()).copied().unwrap_or(0),
        })
        .collect();

    SearchResults {
        count: data.len(),
        data,
    }
}

// ============================================================================
// Listings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
}

pub fn artist_summaries(artists: &[Artist]) -> Vec<ArtistSummary> {
    artists
        .iter()
        .map(|artist| ArtistSummary {
            id: artist.id,
            name: artist.name.clone(),
        })
        .collect()
}

/// One row of the all-shows page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
}

pub fn show_listings(shows: &[ShowDetail]) -> Vec<ShowListing> {
    shows
        .iter()
        .map(|show| ShowListing {
            venue_id: show.venue_id,
            venue_name: show.venue_name.clone(),
            artist_id: show.artist_id,
            artist_name: show.artist_name.clone(),
            artist_image_link: show.artist_image_link.clone().unwrap_or_default(),
            start_time: format_naive(&show.start_time, DateFormat::Full),
        })
        .collect()
}

// ============================================================================
// Detail pages
// ============================================================================

/// Venue fields ready for display (absent values are empty strings)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VenueDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: String,
    pub facebook_link: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
    pub image_link: String,
}

impl From<&Venue> for VenueDetail {
    fn from(venue: &Venue) -> Self {
        Self {
            id: venue.id,
            name: venue.name.clone(),
            genres: venue.genres.clone(),
            address: venue.address.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            phone: venue.phone.clone().unwrap_or_default(),
            website: venue.website.clone().unwrap_or_default(),
            facebook_link: venue.facebook_link.clone().unwrap_or_default(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.clone().unwrap_or_default(),
            image_link: venue.image_link.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtistDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub facebook_link: String,
    pub image_link: String,
}

impl From<&Artist> for ArtistDetail {
    fn from(artist: &Artist) -> Self {
        Self {
            id: artist.id,
            name: artist.name.clone(),
            genres: artist.genres.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone().unwrap_or_default(),
            facebook_link: artist.facebook_link.clone().unwrap_or_default(),
            image_link: artist.image_link.clone().unwrap_or_default(),
        }
    }
}
