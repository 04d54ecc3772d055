use axum::extract::{rejection::JsonRejection, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{require_name, AppState};
use crate::domain::{Player, Role, TeamId};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    pub name: String,
    pub role: String,
    pub team_id: TeamId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayersQuery {
    pub team_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PlayersResponse {
    pub players: Vec<Player>,
}

pub async fn create_player(
    State(state): State<AppState>,
    payload: Result<Json<CreatePlayerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Player>), AppError> {
    let Json(req) = payload?;
    let name = require_name("name", &req.name, 255)?;
    let role: Role = req
        .role
        .parse()
        .map_err(|e| AppError::validation(format!("The role is invalid: {}", e)))?;

    let player = state.repo.insert_player(&name, role, req.team_id).await?;
    Ok((StatusCode::CREATED, Json(player)))
}

pub async fn list_players(
    Query(params): Query<PlayersQuery>,
    State(state): State<AppState>,
) -> Result<Json<PlayersResponse>, AppError> {
    let players = state
        .repo
        .list_players(params.team_id.map(TeamId::new))
        .await?;
    Ok(Json(PlayersResponse { players }))
}
