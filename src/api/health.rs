use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Ready once the database answers a trivial query.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.repo.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "ready"}))),
        Err(e) => {
            tracing::warn!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "unavailable"})),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::repo::test_support::setup_repo;

    #[tokio::test]
    async fn test_health_returns_ok() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_ready_returns_ready() {
        let (repo, _temp) = setup_repo().await;
        let config = Config {
            port: 0,
            database_path: ":memory:".to_string(),
            squad_team_cap: 7,
        };
        let (status, Json(body)) = ready(State(AppState::new(repo, config))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }
}
