use axum::extract::{rejection::JsonRejection, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{MatchId, MatchPlayer, ParticipationEntry, PlayerId};
use crate::engine::plan_participation;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertMatchPlayersRequest {
    pub match_id: MatchId,
    pub players: Vec<ParticipationEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPlayersResponse {
    pub match_players: Vec<MatchPlayer>,
}

pub async fn upsert_match_players(
    State(state): State<AppState>,
    payload: Result<Json<UpsertMatchPlayersRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MatchPlayersResponse>), AppError> {
    let Json(req) = payload?;
    if req.players.is_empty() {
        return Err(AppError::validation("The players field is required."));
    }

    let fixture = state
        .repo
        .get_match(req.match_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Match {} not found", req.match_id)))?;

    let ids: Vec<PlayerId> = req.players.iter().map(|p| p.player_id).collect();
    let players = state.repo.get_players(&ids).await?;
    let planned = plan_participation(&fixture, &players, &req.players)?;

    let match_players = state.repo.upsert_match_players(fixture.id, &planned).await?;
    tracing::info!(
        match_id = %fixture.id,
        players = match_players.len(),
        "Match participation updated"
    );
    Ok((
        StatusCode::CREATED,
        Json(MatchPlayersResponse { match_players }),
    ))
}

pub async fn list_match_players(
    Path(match_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<MatchPlayersResponse>, AppError> {
    let match_id = MatchId::new(match_id);
    if state.repo.get_match(match_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Match {} not found", match_id)));
    }
    let match_players = state.repo.list_match_players(match_id).await?;
    Ok(Json(MatchPlayersResponse { match_players }))
}
