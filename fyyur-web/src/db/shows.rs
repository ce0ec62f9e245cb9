//! Show queries
//!
//! Detail pages need each show joined to both its venue and its artist, so
//! the per-entity queries return [`ShowDetail`] rows.

use fyyur_common::db::{Show, ShowDetail, ShowDraft};
use fyyur_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::rollback;

const DETAIL_SELECT: &str = r#"
    SELECT s.id AS show_id, s.start_time,
           v.id AS venue_id, v.name AS venue_name, v.image_link AS venue_image_link,
           a.id AS artist_id, a.name AS artist_name, a.image_link AS artist_image_link
    FROM shows s
    JOIN venues v ON v.id = s.venue_id
    JOIN artists a ON a.id = s.artist_id
"#;

fn show_from_row(row: &SqliteRow) -> Result<Show> {
    Ok(Show {
        id: row.try_get("id")?,
        venue_id: row.try_get("venue_id")?,
        artist_id: row.try_get("artist_id")?,
        start_time: row.try_get("start_time")?,
    })
}

fn detail_from_row(row: &SqliteRow) -> Result<ShowDetail> {
    Ok(ShowDetail {
        show_id: row.try_get("show_id")?,
        venue_id: row.try_get("venue_id")?,
        venue_name: row.try_get("venue_name")?,
        venue_image_link: row.try_get("venue_image_link")?,
        artist_id: row.try_get("artist_id")?,
        artist_name: row.try_get("artist_name")?,
        artist_image_link: row.try_get("artist_image_link")?,
        start_time: row.try_get("start_time")?,
    })
}

/// Every show row, unjoined (input to the upcoming-show counters)
pub async fn list_shows(pool: &SqlitePool) -> Result<Vec<Show>> {
    let rows = sqlx::query("SELECT id, venue_id, artist_id, start_time FROM shows ORDER BY id")
        .fetch_all(pool)
        .await?;

    rows.iter().map(show_from_row).collect()
}

/// Every show joined to its venue and artist, newest first
pub async fn list_show_details(pool: &SqlitePool) -> Result<Vec<ShowDetail>> {
    let rows = sqlx::query(&format!("{} ORDER BY s.start_time DESC, s.id DESC", DETAIL_SELECT))
        .fetch_all(pool)
        .await?;

    rows.iter().map(detail_from_row).collect()
}

pub async fn shows_for_venue(pool: &SqlitePool, venue_id: i64) -> Result<Vec<ShowDetail>> {
    let rows = sqlx::query(&format!(
        "{} WHERE s.venue_id = ? ORDER BY s.start_time, s.id",
        DETAIL_SELECT
    ))
    .bind(venue_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(detail_from_row).collect()
}

pub async fn shows_for_artist(pool: &SqlitePool, artist_id: i64) -> Result<Vec<ShowDetail>> {
    let rows = sqlx::query(&format!(
        "{} WHERE s.artist_id = ? ORDER BY s.start_time, s.id",
        DETAIL_SELECT
    ))
    .bind(artist_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(detail_from_row).collect()
}

async fn exists(
    tx: &mut sqlx::SqliteConnection,
    table: &'static str,
    id: i64,
) -> std::result::Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar(&format!("SELECT id FROM {} WHERE id = ?", table))
        .bind(id)
        .fetch_optional(tx)
        .await?;
    Ok(found.is_some())
}

/// Insert a show linking an existing venue and artist
///
/// Unknown venue or artist ids are [`Error::InvalidInput`].
pub async fn insert_show(pool: &SqlitePool, draft: &ShowDraft) -> Result<Show> {
    let mut tx = pool.begin().await?;

    for (table, id, label) in [
        ("venues", draft.venue_id, "Venue"),
        ("artists", draft.artist_id, "Artist"),
    ] {
        match exists(&mut tx, table, id).await {
            Ok(true) => {}
            Ok(false) => {
                rollback(tx, "shows::insert").await;
                return Err(Error::InvalidInput(format!("{} {} does not exist", label, id)));
            }
            Err(e) => {
                rollback(tx, "shows::insert").await;
                return Err(e.into());
            }
        }
    }

    let result = sqlx::query("INSERT INTO shows (venue_id, artist_id, start_time) VALUES (?, ?, ?)")
        .bind(draft.venue_id)
        .bind(draft.artist_id)
        .bind(draft.start_time)
        .execute(&mut *tx)
        .await;

    match result {
        Ok(done) => {
            tx.commit().await?;
            let id = done.last_insert_rowid();
            tracing::info!(
                show_id = id,
                venue_id = draft.venue_id,
                artist_id = draft.artist_id,
                "Show created"
            );
            Ok(Show {
                id,
                venue_id: draft.venue_id,
                artist_id: draft.artist_id,
                start_time: draft.start_time,
            })
        }
        Err(e) => {
            rollback(tx, "shows::insert").await;
            let err = Error::from(e);
            if err.is_foreign_key_violation() {
                Err(Error::InvalidInput(
                    "Show references an unknown venue or artist".to_string(),
                ))
            } else {
                Err(err)
            }
        }
    }
}
