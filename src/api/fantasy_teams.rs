use axum::extract::{rejection::JsonRejection, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{FantasySquad, MatchId, SquadSubmission, UserId};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadsQuery {
    pub match_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadsResponse {
    pub fantasy_teams: Vec<FantasySquad>,
}

/// Submit a squad. Identity travels in the body as `userId`.
pub async fn submit_squad(
    State(state): State<AppState>,
    payload: Result<Json<SquadSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<FantasySquad>), AppError> {
    let Json(submission) = payload?;
    let squad = state.squads.submit(&submission).await?;
    Ok((StatusCode::CREATED, Json(squad)))
}

pub async fn list_squads(
    Query(params): Query<SquadsQuery>,
    State(state): State<AppState>,
) -> Result<Json<SquadsResponse>, AppError> {
    let fantasy_teams = state
        .repo
        .list_squads(params.match_id.map(MatchId::new))
        .await?;
    Ok(Json(SquadsResponse { fantasy_teams }))
}

pub async fn get_squad(
    Path((user_id, match_id)): Path<(i64, i64)>,
    State(state): State<AppState>,
) -> Result<Json<FantasySquad>, AppError> {
    let (user_id, match_id) = (UserId::new(user_id), MatchId::new(match_id));
    state
        .repo
        .get_squad(user_id, match_id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No fantasy team for user {} in match {}",
                user_id, match_id
            ))
        })
}
