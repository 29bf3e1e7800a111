use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use themetadb::{AppState, config::Config, crud};
use tower::ServiceExt;

async fn spawn_app() -> (Router, Arc<AppState>) {
    let state = AppState::connect(Config::in_memory()).await.expect("Failed to create app state");
    (themetadb::router(state.clone()), state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

#[tokio::test]
async fn test_inception_scenario() {
    let (app, _) = spawn_app().await;

    let (status, body) =
        send(&app, "POST", "/movies", Some(json!({"name": "Inception", "year": 2010}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 1, "name": "Inception", "year": 2010, "external_ids": []}));

    let (status, body) =
        send(&app, "POST", "/movies", Some(json!({"name": "Inception", "year": 2020}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Movie with name already exists");

    let (status, body) = send(&app, "GET", "/movies", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["year"], 2010);

    let (status, body) = send(&app, "DELETE", "/movie/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "name": "Inception", "year": 2010, "external_ids": []}));

    let (status, body) = send(&app, "GET", "/movie/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Movie not found");
}

#[tokio::test]
async fn test_read_movie_includes_external_ids() {
    let (app, state) = spawn_app().await;

    let imdb = crud::create_provider(&state.db, "imdb", "IMDb", "https://www.imdb.com/").await.unwrap();
    let (_, created) =
        send(&app, "POST", "/movies", Some(json!({"name": "The Matrix", "year": 1999}))).await;
    let id = created["id"].as_i64().unwrap() as i32;
    crud::link_external_id(&state.db, id, imdb.id, "tt0133093").await.unwrap();

    let (status, body) = send(&app, "GET", &format!("/movie/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["external_ids"],
        json!([{
            "provider": {"id": imdb.id, "slug": "imdb", "name": "IMDb", "url": "https://www.imdb.com/"},
            "id": "tt0133093"
        }])
    );
}

#[tokio::test]
async fn test_create_ignores_client_supplied_id() {
    let (app, _) = spawn_app().await;

    let (status, body) =
        send(&app, "POST", "/movies", Some(json!({"id": 77, "name": "Heat", "year": 1995}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);

    let (status, _) = send(&app, "GET", "/movie/77", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_without_year() {
    let (app, _) = spawn_app().await;

    let (status, body) = send(&app, "POST", "/movies", Some(json!({"name": "Untitled"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["year"], Value::Null);
}

#[tokio::test]
async fn test_validation_errors_do_not_write() {
    let (app, _) = spawn_app().await;

    let long_name = "x".repeat(129);
    let (status, _) = send(&app, "POST", "/movies", Some(json!({"name": long_name}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let bad_url = json!({
        "name": "Heat",
        "external_ids": [{
            "provider": {"id": 1, "slug": "imdb", "name": "IMDb", "url": "not a url"},
            "id": "tt0113277"
        }]
    });
    let (status, _) = send(&app, "POST", "/movies", Some(bad_url)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, "POST", "/movies", Some(json!({"year": 1995}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("missing field `name`"));

    let (_, body) = send(&app, "GET", "/movies", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_delete_missing_movie() {
    let (app, _) = spawn_app().await;
    send(&app, "POST", "/movies", Some(json!({"name": "Alien", "year": 1979}))).await;

    let (status, body) = send(&app, "DELETE", "/movie/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Movie not found");

    let (_, body) = send(&app, "GET", "/movies", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_paging() {
    let (app, _) = spawn_app().await;
    for (name, year) in [("Alien", 1979), ("Aliens", 1986), ("Alien 3", 1992), ("Prometheus", 2012)] {
        let (status, _) =
            send(&app, "POST", "/movies", Some(json!({"name": name, "year": year}))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, first) = send(&app, "GET", "/movies?skip=0&limit=2", None).await;
    let (_, second) = send(&app, "GET", "/movies?skip=2&limit=2", None).await;
    let (_, third) = send(&app, "GET", "/movies?skip=4&limit=2", None).await;

    let names = |page: &Value| -> Vec<String> {
        page.as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(names(&first), ["Alien", "Aliens"]);
    assert_eq!(names(&second), ["Alien 3", "Prometheus"]);
    assert!(names(&third).is_empty());
}

#[tokio::test]
async fn test_non_numeric_movie_id() {
    let (app, _) = spawn_app().await;

    let (status, body) = send(&app, "GET", "/movie/abc", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let (status, body) = send(&app, "DELETE", "/movie/abc", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_malformed_json_body() {
    let (app, _) = spawn_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/movies")
        .header("Content-Type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert!(status.is_client_error());
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_oversized_skip() {
    let (app, _) = spawn_app().await;
    send(&app, "POST", "/movies", Some(json!({"name": "Alien", "year": 1979}))).await;

    let (status, body) = send(&app, "GET", "/movies?skip=9223372036854775808", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, "GET", "/movies?skip=18446744073709551615&limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, "GET", "/movies?skip=18446744073709551616", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let (status, body) = send(&app, "GET", "/movies?limit=18446744073709551615", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_duplicate_creates() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        database_url: format!("sqlite://{}?mode=rwc", dir.path().join("themetadb.db").display()),
        db_max_connections: 4,
        ..Config::in_memory()
    };
    let state = AppState::connect(config).await.expect("Failed to create app state");
    let app = themetadb::router(state);

    let payload = json!({"name": "Inception", "year": 2010});
    let (first, second) = tokio::join!(
        send(&app, "POST", "/movies", Some(payload.clone())),
        send(&app, "POST", "/movies", Some(payload)),
    );

    let mut statuses = [first.0, second.0];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::BAD_REQUEST]);
    let rejected = if first.0 == StatusCode::BAD_REQUEST { first.1 } else { second.1 };
    assert_eq!(rejected["detail"], "Movie with name already exists");

    let (_, body) = send(&app, "GET", "/movies", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}
