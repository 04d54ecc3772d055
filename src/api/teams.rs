use axum::extract::{rejection::JsonRejection, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{require_name, AppState};
use crate::domain::{LeagueId, Team};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    pub name: String,
    pub league_id: LeagueId,
}

#[derive(Debug, Serialize)]
pub struct TeamsResponse {
    pub teams: Vec<Team>,
}

pub async fn create_team(
    State(state): State<AppState>,
    payload: Result<Json<CreateTeamRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Team>), AppError> {
    let Json(req) = payload?;
    let name = require_name("name", &req.name, 255)?;
    let team = state.repo.insert_team(&name, req.league_id).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

pub async fn list_teams(State(state): State<AppState>) -> Result<Json<TeamsResponse>, AppError> {
    let teams = state.repo.list_teams().await?;
    Ok(Json(TeamsResponse { teams }))
}
