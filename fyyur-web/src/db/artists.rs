//! Artist queries

use fyyur_common::db::{Artist, ArtistDraft};
use fyyur_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{Row, SqlitePool};

use super::rollback;

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, genres, image_link, facebook_link";

fn artist_from_row(row: &SqliteRow) -> Result<Artist> {
    let Json(genres): Json<Vec<String>> = row.try_get("genres")?;
    Ok(Artist {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        phone: row.try_get("phone")?,
        genres,
        image_link: row.try_get("image_link")?,
        facebook_link: row.try_get("facebook_link")?,
    })
}

pub async fn list_artists(pool: &SqlitePool) -> Result<Vec<Artist>> {
    let rows = sqlx::query(&format!("SELECT {} FROM artists ORDER BY id", ARTIST_COLUMNS))
        .fetch_all(pool)
        .await?;

    rows.iter().map(artist_from_row).collect()
}

pub async fn get_artist(pool: &SqlitePool, id: i64) -> Result<Option<Artist>> {
    let row = sqlx::query(&format!("SELECT {} FROM artists WHERE id = ?", ARTIST_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(artist_from_row).transpose()
}

pub async fn insert_artist(pool: &SqlitePool, draft: &ArtistDraft) -> Result<Artist> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO artists (name, city, state, phone, genres, image_link, facebook_link)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&draft.name)
    .bind(&draft.city)
    .bind(&draft.state)
    .bind(&draft.phone)
    .bind(Json(&draft.genres))
    .bind(&draft.image_link)
    .bind(&draft.facebook_link)
    .execute(&mut *tx)
    .await;

    match result {
        Ok(done) => {
            tx.commit().await?;
            let id = done.last_insert_rowid();
            tracing::info!(artist_id = id, name = %draft.name, "Artist created");
            Ok(Artist::from_draft(id, draft.clone()))
        }
        Err(e) => {
            rollback(tx, "artists::insert").await;
            Err(e.into())
        }
    }
}

pub async fn update_artist(pool: &SqlitePool, id: i64, draft: &ArtistDraft) -> Result<Artist> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE artists SET
            name = ?, city = ?, state = ?, phone = ?, genres = ?,
            image_link = ?, facebook_link = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&draft.name)
    .bind(&draft.city)
    .bind(&draft.state)
    .bind(&draft.phone)
    .bind(Json(&draft.genres))
    .bind(&draft.image_link)
    .bind(&draft.facebook_link)
    .bind(id)
    .execute(&mut *tx)
    .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => {
            rollback(tx, "artists::update").await;
            Err(Error::NotFound(format!("Artist {}", id)))
        }
        Ok(_) => {
            tx.commit().await?;
            tracing::info!(artist_id = id, "Artist updated");
            Ok(Artist::from_draft(id, draft.clone()))
        }
        Err(e) => {
            rollback(tx, "artists::update").await;
            Err(e.into())
        }
    }
}
