//! Venue queries

use fyyur_common::db::{Venue, VenueDraft};
use fyyur_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{Row, SqlitePool};

use super::rollback;

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, website, facebook_link, \
                             genres, image_link, seeking_talent, seeking_description";

fn venue_from_row(row: &SqliteRow) -> Result<Venue> {
    let Json(genres): Json<Vec<String>> = row.try_get("genres")?;
    Ok(Venue {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        address: row.try_get("address")?,
        phone: row.try_get("phone")?,
        website: row.try_get("website")?,
        facebook_link: row.try_get("facebook_link")?,
        genres,
        image_link: row.try_get("image_link")?,
        seeking_talent: row.try_get("seeking_talent")?,
        seeking_description: row.try_get("seeking_description")?,
    })
}

/// All venues in id order
pub async fn list_venues(pool: &SqlitePool) -> Result<Vec<Venue>> {
    let rows = sqlx::query(&format!("SELECT {} FROM venues ORDER BY id", VENUE_COLUMNS))
        .fetch_all(pool)
        .await?;

    rows.iter().map(venue_from_row).collect()
}

pub async fn get_venue(pool: &SqlitePool, id: i64) -> Result<Option<Venue>> {
    let row = sqlx::query(&format!("SELECT {} FROM venues WHERE id = ?", VENUE_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(venue_from_row).transpose()
}

/// Insert a venue, returning it with its assigned id
pub async fn insert_venue(pool: &SqlitePool, draft: &VenueDraft) -> Result<Venue> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO venues (
            name, city, state, address, phone, website, facebook_link,
            genres, image_link, seeking_talent, seeking_description
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&draft.name)
    .bind(&draft.city)
    .bind(&draft.state)
    .bind(&draft.address)
    .bind(&draft.phone)
    .bind(&draft.website)
    .bind(&draft.facebook_link)
    .bind(Json(&draft.genres))
    .bind(&draft.image_link)
    .bind(draft.seeking_talent)
    .bind(&draft.seeking_description)
    .execute(&mut *tx)
    .await;

    match result {
        Ok(done) => {
            tx.commit().await?;
            let id = done.last_insert_rowid();
            tracing::info!(venue_id = id, name = %draft.name, "Venue created");
            Ok(Venue::from_draft(id, draft.clone()))
        }
        Err(e) => {
            rollback(tx, "venues::insert").await;
            Err(e.into())
        }
    }
}

/// Overwrite every writable column of venue `id`
pub async fn update_venue(pool: &SqlitePool, id: i64, draft: &VenueDraft) -> Result<Venue> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE venues SET
            name = ?, city = ?, state = ?, address = ?, phone = ?, website = ?,
            facebook_link = ?, genres = ?, image_link = ?, seeking_talent = ?,
            seeking_description = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&draft.name)
    .bind(&draft.city)
    .bind(&draft.state)
    .bind(&draft.address)
    .bind(&draft.phone)
    .bind(&draft.website)
    .bind(&draft.facebook_link)
    .bind(Json(&draft.genres))
    .bind(&draft.image_link)
    .bind(draft.seeking_talent)
    .bind(&draft.seeking_description)
    .bind(id)
    .execute(&mut *tx)
    .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => {
            rollback(tx, "venues::update").await;
            Err(Error::NotFound(format!("Venue {}", id)))
        }
        Ok(_) => {
            tx.commit().await?;
            tracing::info!(venue_id = id, "Venue updated");
            Ok(Venue::from_draft(id, draft.clone()))
        }
        Err(e) => {
            rollback(tx, "venues::update").await;
            Err(e.into())
        }
    }
}

/// Delete venue `id`, returning the removed record
///
/// A venue still referenced by shows is left in place and reported as
/// [`Error::Conflict`].
pub async fn delete_venue(pool: &SqlitePool, id: i64) -> Result<Venue> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query(&format!("SELECT {} FROM venues WHERE id = ?", VENUE_COLUMNS))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await;

    let venue = match existing {
        Ok(Some(row)) => match venue_from_row(&row) {
            Ok(venue) => venue,
            Err(e) => {
                rollback(tx, "venues::delete").await;
                return Err(e);
            }
        },
        Ok(None) => {
            rollback(tx, "venues::delete").await;
            return Err(Error::NotFound(format!("Venue {}", id)));
        }
        Err(e) => {
            rollback(tx, "venues::delete").await;
            return Err(e.into());
        }
    };

    let shows: std::result::Result<i64, sqlx::Error> =
        sqlx::query_scalar("SELECT COUNT(*) FROM shows WHERE venue_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await;

    match shows {
        Ok(0) => {}
        Ok(count) => {
            rollback(tx, "venues::delete").await;
            tracing::warn!(venue_id = id, shows = count, "Venue delete refused");
            return Err(Error::Conflict(format!(
                "Venue {} still has shows and cannot be deleted",
                venue.name
            )));
        }
        Err(e) => {
            rollback(tx, "venues::delete").await;
            return Err(e.into());
        }
    }

    let result = sqlx::query("DELETE FROM venues WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await;

    match result {
        Ok(_) => {
            tx.commit().await?;
            tracing::info!(venue_id = id, name = %venue.name, "Venue deleted");
            Ok(venue)
        }
        Err(e) => {
            rollback(tx, "venues::delete").await;
            let err = Error::from(e);
            if err.is_foreign_key_violation() {
                Err(Error::Conflict(format!(
                    "Venue {} still has shows and cannot be deleted",
                    venue.name
                )))
            } else {
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{artist_draft, memory_pool, venue_draft};
    use crate::db::{insert_artist, insert_show};
    use fyyur_common::db::ShowDraft;
    use fyyur_common::time::parse_datetime;

    #[tokio::test]
    async fn test_insert_then_get() {
        let pool = memory_pool().await;
        let mut draft = venue_draft("The Musical Hop", "San Francisco", "CA");
        draft.seeking_talent = true;
        draft.website = Some("https://www.themusicalhop.com".to_string());

        let created = insert_venue(&pool, &draft).await.unwrap();
        let fetched = get_venue(&pool, created.id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.genres, vec!["Jazz".to_string()]);
        assert!(fetched.seeking_talent);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let pool = memory_pool().await;
        assert!(get_venue(&pool, 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_in_id_order() {
        let pool = memory_pool().await;
        insert_venue(&pool, &venue_draft("B", "X", "CA")).await.unwrap();
        insert_venue(&pool, &venue_draft("A", "Y", "NY")).await.unwrap();

        let names: Vec<String> = list_venues(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_update_overwrites_fields() {
        let pool = memory_pool().await;
        let venue = insert_venue(&pool, &venue_draft("Old", "SF", "CA")).await.unwrap();

        let mut draft = venue.to_draft();
        draft.name = "New".to_string();
        draft.genres = vec!["Soul".to_string(), "Funk".to_string()];
        update_venue(&pool, venue.id, &draft).await.unwrap();

        let fetched = get_venue(&pool, venue.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "New");
        assert_eq!(fetched.genres, vec!["Soul".to_string(), "Funk".to_string()]);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let pool = memory_pool().await;
        let result = update_venue(&pool, 7, &venue_draft("X", "SF", "CA")).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let pool = memory_pool().await;
        let venue = insert_venue(&pool, &venue_draft("Gone", "SF", "CA")).await.unwrap();

        let deleted = delete_venue(&pool, venue.id).await.unwrap();

        assert_eq!(deleted.name, "Gone");
        assert!(get_venue(&pool, venue.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let pool = memory_pool().await;
        assert!(matches!(delete_venue(&pool, 1).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_with_shows_is_conflict() {
        let pool = memory_pool().await;
        let venue = insert_venue(&pool, &venue_draft("Busy", "SF", "CA")).await.unwrap();
        let artist = insert_artist(&pool, &artist_draft("Band")).await.unwrap();
        insert_show(
            &pool,
            &ShowDraft {
                venue_id: venue.id,
                artist_id: artist.id,
                start_time: parse_datetime("2035-04-01 20:00").unwrap(),
            },
        )
        .await
        .unwrap();

        let result = delete_venue(&pool, venue.id).await;

        match result {
            Err(Error::Conflict(msg)) => assert!(msg.contains("Busy")),
            other => panic!("expected conflict, got {:?}", other),
        }
        assert!(get_venue(&pool, venue.id).await.unwrap().is_some());
        let shows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shows")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(shows, 1);
    }
}
