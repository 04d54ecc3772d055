use axum::http::StatusCode;
use cricket_fantasy::api::{self, AppState};
use cricket_fantasy::config::Config;
use cricket_fantasy::db::init_db;
use cricket_fantasy::Repository;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

async fn setup_test_app() -> (axum::Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();

    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));

    let config = Config {
        port: 0,
        database_path: db_path,
        squad_team_cap: 7,
    };

    (api::create_router(AppState::new(repo, config)), temp_dir)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _temp) = setup_test_app().await;
    let (status, json) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_ready_endpoint() {
    let (app, _temp) = setup_test_app().await;
    let (status, json) = get(app, "/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ready");
}

#[tokio::test]
async fn test_empty_collections() {
    let (app, _temp) = setup_test_app().await;

    let (status, json) = get(app.clone(), "/v1/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["users"], serde_json::json!([]));

    let (status, json) = get(app.clone(), "/v1/matches").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["matches"], serde_json::json!([]));

    let (status, json) = get(app, "/v1/fantasy-teams").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["fantasyTeams"], serde_json::json!([]));
}

#[tokio::test]
async fn test_unknown_match_is_not_found() {
    let (app, _temp) = setup_test_app().await;

    let (status, json) = get(app.clone(), "/v1/matches/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["kind"], "NotFound");

    let (status, _) = get(app.clone(), "/v1/player-performances/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(app, "/v1/fantasy-teams/1/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
