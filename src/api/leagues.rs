use axum::extract::{rejection::JsonRejection, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{require_name, AppState};
use crate::domain::{League, UserId};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeagueRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_by: UserId,
}

#[derive(Debug, Serialize)]
pub struct LeaguesResponse {
    pub leagues: Vec<League>,
}

pub async fn create_league(
    State(state): State<AppState>,
    payload: Result<Json<CreateLeagueRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<League>), AppError> {
    let Json(req) = payload?;
    let name = require_name("name", &req.name, 255)?;

    let league = state
        .repo
        .insert_league(&name, req.description.as_deref(), req.created_by)
        .await?;
    Ok((StatusCode::CREATED, Json(league)))
}

pub async fn list_leagues(
    State(state): State<AppState>,
) -> Result<Json<LeaguesResponse>, AppError> {
    let leagues = state.repo.list_leagues().await?;
    Ok(Json(LeaguesResponse { leagues }))
}
