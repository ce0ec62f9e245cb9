//! Integration tests for fyyur-web pages and mutations
//!
//! Every test drives the real router against a fresh in-memory store.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use chrono::{Duration, NaiveDateTime};
use fyyur_common::config::DatabaseLocation;
use fyyur_common::db::{init_database, ArtistDraft, ShowDraft, VenueDraft};
use fyyur_common::time::now_naive;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot` method
use fyyur_web::{build_router, db, AppState};

/// Test helper: fresh in-memory store with the schema applied
async fn setup_test_db() -> SqlitePool {
    init_database(&DatabaseLocation::from_setting("sqlite::memory:"))
        .await
        .expect("Should open in-memory database")
}

fn setup_app(db: SqlitePool) -> axum::Router {
    build_router(AppState::new(db))
}

fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: urlencoded form POST
fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &axum::Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn extract_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

/// `name=value` of the flash cookie the response sets
fn flash_cookie(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("fyyur_flash="))
        .and_then(|v| v.split(';').next())
        .expect("Should set flash cookie")
        .to_string()
}

fn venue(name: &str, city: &str, state: &str) -> VenueDraft {
    VenueDraft {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        address: "1805 Geary Blvd".to_string(),
        genres: vec!["Rock n Roll".to_string()],
        ..Default::default()
    }
}

fn artist(name: &str) -> ArtistDraft {
    ArtistDraft {
        name: name.to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        genres: vec!["Jazz".to_string()],
        ..Default::default()
    }
}

async fn add_show(pool: &SqlitePool, venue_id: i64, artist_id: i64, start_time: NaiveDateTime) {
    db::insert_show(
        pool,
        &ShowDraft {
            venue_id,
            artist_id,
            start_time,
        },
    )
    .await
    .expect("Should insert show");
}

// =============================================================================
// Health and fallbacks
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(setup_test_db().await);

    let response = send(&app, test_request("GET", "/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&extract_text(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "fyyur-web");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].as_i64().unwrap() >= 0);
}

#[tokio::test]
async fn test_unknown_path_renders_not_found_page() {
    let app = setup_app(setup_test_db().await);

    let response = send(&app, test_request("GET", "/nowhere")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(extract_text(response).await.contains("404"));
}

#[tokio::test]
async fn test_home_page() {
    let app = setup_app(setup_test_db().await);

    let response = send(&app, test_request("GET", "/")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(extract_text(response).await.contains("Fyyur"));
}

// =============================================================================
// Venues
// =============================================================================

#[tokio::test]
async fn test_venues_grouped_by_city_and_state() {
    let pool = setup_test_db().await;
    let fillmore = db::insert_venue(&pool, &venue("The Fillmore", "San Francisco", "CA"))
        .await
        .unwrap();
    assert_eq!(fillmore.id, 1);
    let app = setup_app(pool);

    let response = send(&app, test_request("GET", "/venues")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = extract_text(response).await;
    assert_eq!(html.matches("San Francisco, CA").count(), 1);
    assert!(html.contains(r#"<a href="/venues/1">The Fillmore</a>"#));
    assert!(html.contains("0 upcoming"));
}

#[tokio::test]
async fn test_create_venue_redirects_home_with_flash() {
    let pool = setup_test_db().await;
    let app = setup_app(pool.clone());

    let response = send(
        &app,
        form_request(
            "/venues/create",
            "name=The+Fillmore&city=San+Francisco&state=CA&address=1805+Geary+Blvd\
             &genres=Jazz&genres=Reggae&seeking_talent=y",
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let cookie = flash_cookie(&response);

    let venues = db::list_venues(&pool).await.unwrap();
    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0].genres, vec!["Jazz".to_string(), "Reggae".to_string()]);
    assert!(venues[0].seeking_talent);

    // The next page shows the message once and clears it
    let request = Request::builder()
        .uri("/")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert!(response.headers().contains_key(header::SET_COOKIE));
    let html = extract_text(response).await;
    assert!(html.contains("Venue The Fillmore was successfully listed!"));
}

#[tokio::test]
async fn test_seeking_talent_checked_by_presence_alone() {
    let pool = setup_test_db().await;
    let app = setup_app(pool.clone());

    let response = send(
        &app,
        form_request(
            "/venues/create",
            "name=Empty+Box&city=Oakland&state=CA&address=1+Main+St&seeking_talent=",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = send(
        &app,
        form_request("/venues/create", "name=No+Box&city=Oakland&state=CA&address=2+Main+St"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let venues = db::list_venues(&pool).await.unwrap();
    let empty_box = venues.iter().find(|v| v.name == "Empty Box").unwrap();
    let no_box = venues.iter().find(|v| v.name == "No Box").unwrap();
    assert!(empty_box.seeking_talent);
    assert!(!no_box.seeking_talent);
}

#[tokio::test]
async fn test_create_venue_missing_field_writes_nothing() {
    let pool = setup_test_db().await;
    let app = setup_app(pool.clone());

    let response = send(
        &app,
        form_request("/venues/create", "city=San+Francisco&state=CA&address=1805+Geary+Blvd"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = extract_text(response).await;
    assert!(html.contains("name is required"));
    // Entered values survive the re-render
    assert!(html.contains(r#"value="San Francisco""#));
    assert!(db::list_venues(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_venue_rejects_unknown_state() {
    let pool = setup_test_db().await;
    let app = setup_app(pool.clone());

    let response = send(
        &app,
        form_request("/venues/create", "name=X&city=Y&state=ZZ&address=Z"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(db::list_venues(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_venues_case_insensitive() {
    let pool = setup_test_db().await;
    db::insert_venue(&pool, &venue("The Musical Hop", "San Francisco", "CA")).await.unwrap();
    db::insert_venue(&pool, &venue("The Dueling Pianos Bar", "New York", "NY")).await.unwrap();
    db::insert_venue(&pool, &venue("Park Square Live Music", "San Francisco", "CA")).await.unwrap();
    let app = setup_app(pool);

    let html = extract_text(send(&app, form_request("/venues/search", "search_term=MUSIC")).await).await;
    assert!(html.contains(r#"for "MUSIC": 2"#) || html.contains("for &quot;MUSIC&quot;: 2"));
    assert!(html.contains("The Musical Hop"));
    assert!(html.contains("Park Square Live Music"));
    assert!(!html.contains("The Dueling Pianos Bar"));

    let html = extract_text(send(&app, form_request("/venues/search", "search_term=")).await).await;
    assert!(html.contains(": 3</h3>"));
}

#[tokio::test]
async fn test_venue_detail_not_found() {
    let app = setup_app(setup_test_db().await);

    for uri in ["/venues/99", "/venues/abc", "/venues/99/edit"] {
        let response = send(&app, test_request("GET", uri)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn test_venue_detail_upcoming_shows_carry_their_own_artist() {
    let pool = setup_test_db().await;
    let hop = db::insert_venue(&pool, &venue("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let petals = db::insert_artist(&pool, &artist("Guns N Petals")).await.unwrap();
    let quevedo = db::insert_artist(&pool, &artist("Matt Quevedo")).await.unwrap();
    let sax = db::insert_artist(&pool, &artist("The Wild Sax Band")).await.unwrap();

    let now = now_naive();
    add_show(&pool, hop.id, petals.id, now - Duration::days(30)).await;
    add_show(&pool, hop.id, quevedo.id, now + Duration::days(30)).await;
    add_show(&pool, hop.id, sax.id, now + Duration::days(60)).await;
    let app = setup_app(pool);

    let response = send(&app, test_request("GET", &format!("/venues/{}", hop.id))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = extract_text(response).await;
    assert!(html.contains("2 Upcoming Shows"));
    assert!(html.contains("1 Past Show"));
    for a in [&petals, &quevedo, &sax] {
        assert!(html.contains(&format!(r#"<a href="/artists/{}">{}</a>"#, a.id, a.name)));
    }
}

#[tokio::test]
async fn test_edit_venue() {
    let pool = setup_test_db().await;
    let fillmore = db::insert_venue(&pool, &venue("The Fillmore", "San Francisco", "CA"))
        .await
        .unwrap();
    let app = setup_app(pool.clone());

    let uri = format!("/venues/{}/edit", fillmore.id);
    let html = extract_text(send(&app, test_request("GET", &uri)).await).await;
    assert!(html.contains(r#"value="The Fillmore""#));
    assert!(html.contains(r#"<option value="CA" selected>"#));

    let response = send(
        &app,
        form_request(&uri, "name=The+New+Fillmore&city=Oakland&state=CA&address=1+Main+St"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/venues/{}", fillmore.id));

    let updated = db::get_venue(&pool, fillmore.id).await.unwrap().unwrap();
    assert_eq!(updated.name, "The New Fillmore");
    assert_eq!(updated.city, "Oakland");
    assert!(updated.genres.is_empty());
}

#[tokio::test]
async fn test_edit_missing_venue_is_not_found() {
    let app = setup_app(setup_test_db().await);

    let response = send(
        &app,
        form_request("/venues/42/edit", "name=X&city=Y&state=CA&address=Z"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_venue() {
    let pool = setup_test_db().await;
    let gone = db::insert_venue(&pool, &venue("Gone", "San Francisco", "CA")).await.unwrap();
    let app = setup_app(pool.clone());

    let response = send(&app, test_request("DELETE", &format!("/venues/{}", gone.id))).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(db::get_venue(&pool, gone.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_missing_venue_is_not_found() {
    let app = setup_app(setup_test_db().await);

    let response = send(&app, test_request("DELETE", "/venues/1")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_venue_with_shows_is_conflict() {
    let pool = setup_test_db().await;
    let busy = db::insert_venue(&pool, &venue("Busy", "San Francisco", "CA")).await.unwrap();
    let band = db::insert_artist(&pool, &artist("Band")).await.unwrap();
    add_show(&pool, busy.id, band.id, now_naive() + Duration::days(1)).await;
    let app = setup_app(pool.clone());

    let response = send(&app, test_request("DELETE", &format!("/venues/{}", busy.id))).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(db::get_venue(&pool, busy.id).await.unwrap().is_some());
    assert_eq!(db::list_shows(&pool).await.unwrap().len(), 1);
}

// =============================================================================
// Artists
// =============================================================================

#[tokio::test]
async fn test_list_and_search_artists() {
    let pool = setup_test_db().await;
    db::insert_artist(&pool, &artist("Guns N Petals")).await.unwrap();
    db::insert_artist(&pool, &artist("Matt Quevedo")).await.unwrap();
    db::insert_artist(&pool, &artist("The Wild Sax Band")).await.unwrap();
    let app = setup_app(pool);

    let html = extract_text(send(&app, test_request("GET", "/artists")).await).await;
    assert!(html.contains(r#"<a href="/artists/1">Guns N Petals</a>"#));
    assert!(html.contains(r#"<a href="/artists/3">The Wild Sax Band</a>"#));

    let html = extract_text(send(&app, form_request("/artists/search", "search_term=band")).await).await;
    assert!(html.contains(": 1</h3>"));
    assert!(html.contains("The Wild Sax Band"));

    let html = extract_text(send(&app, form_request("/artists/search", "search_term=A")).await).await;
    assert!(html.contains(": 3</h3>"));
}

#[tokio::test]
async fn test_artist_detail_partitions_shows() {
    let pool = setup_test_db().await;
    let hop = db::insert_venue(&pool, &venue("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let square = db::insert_venue(&pool, &venue("Park Square", "San Francisco", "CA"))
        .await
        .unwrap();
    let petals = db::insert_artist(&pool, &artist("Guns N Petals")).await.unwrap();
    let now = now_naive();
    add_show(&pool, hop.id, petals.id, now - Duration::days(3)).await;
    add_show(&pool, square.id, petals.id, now + Duration::days(3)).await;
    let app = setup_app(pool);

    let response = send(&app, test_request("GET", &format!("/artists/{}", petals.id))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = extract_text(response).await;
    assert!(html.contains("1 Upcoming Show"));
    assert!(html.contains("1 Past Show"));
    assert!(html.contains(&format!(r#"<a href="/venues/{}">Park Square</a>"#, square.id)));
}

#[tokio::test]
async fn test_artist_not_found() {
    let app = setup_app(setup_test_db().await);

    for uri in ["/artists/7", "/artists/x", "/artists/7/edit"] {
        let response = send(&app, test_request("GET", uri)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn test_create_and_edit_artist() {
    let pool = setup_test_db().await;
    let app = setup_app(pool.clone());

    let response = send(
        &app,
        form_request(
            "/artists/create",
            "name=Matt+Quevedo&city=New+York&state=NY&phone=300-400-5000&genres=Jazz",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let created = db::list_artists(&pool).await.unwrap().remove(0);
    assert_eq!(created.phone.as_deref(), Some("300-400-5000"));

    let response = send(
        &app,
        form_request(
            &format!("/artists/{}/edit", created.id),
            "name=Matt+Quevedo&city=Boston&state=MA",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/artists/{}", created.id));

    let updated = db::get_artist(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(updated.city, "Boston");
    assert!(updated.phone.is_none());
}

#[tokio::test]
async fn test_create_artist_invalid_genre() {
    let pool = setup_test_db().await;
    let app = setup_app(pool.clone());

    let response = send(
        &app,
        form_request("/artists/create", "name=X&city=Y&state=CA&genres=Polka"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(db::list_artists(&pool).await.unwrap().is_empty());
}

// =============================================================================
// Shows
// =============================================================================

#[tokio::test]
async fn test_create_show_and_list() {
    let pool = setup_test_db().await;
    let hop = db::insert_venue(&pool, &venue("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let petals = db::insert_artist(&pool, &artist("Guns N Petals")).await.unwrap();
    let app = setup_app(pool.clone());

    let response = send(
        &app,
        form_request(
            "/shows/create",
            &format!(
                "artist_id={}&venue_id={}&start_time=2019-05-21+21%3A30%3A00",
                petals.id, hop.id
            ),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let html = extract_text(send(&app, test_request("GET", "/shows")).await).await;
    assert!(html.contains("Guns N Petals"));
    assert!(html.contains("The Musical Hop"));
    assert!(html.contains("Tuesday May, 21, 2019 at 9:30PM"));
}

#[tokio::test]
async fn test_create_show_unknown_venue_rejected() {
    let pool = setup_test_db().await;
    let petals = db::insert_artist(&pool, &artist("Guns N Petals")).await.unwrap();
    let app = setup_app(pool.clone());

    let response = send(
        &app,
        form_request(
            "/shows/create",
            &format!("artist_id={}&venue_id=99&start_time=2035-04-01+20%3A00", petals.id),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(extract_text(response).await.contains("Venue 99 does not exist"));
    assert!(db::list_shows(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_show_bad_time_rejected() {
    let app = setup_app(setup_test_db().await);

    let response = send(
        &app,
        form_request("/shows/create", "artist_id=1&venue_id=1&start_time=soon"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// On-disk store
// =============================================================================

#[tokio::test]
async fn test_file_backed_store_persists_between_pools() {
    let dir = tempfile::tempdir().unwrap();
    let location = DatabaseLocation::Path(dir.path().join("fyyur.db"));

    let pool = init_database(&location).await.unwrap();
    let app = setup_app(pool.clone());
    let response = send(
        &app,
        form_request("/venues/create", "name=Kept&city=Austin&state=TX&address=1+Main+St"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    pool.close().await;

    let reopened = init_database(&location).await.unwrap();
    let venues = db::list_venues(&reopened).await.unwrap();
    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0].name, "Kept");
}
