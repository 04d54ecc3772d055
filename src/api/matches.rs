use axum::extract::{rejection::JsonRejection, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::domain::{Match, MatchDraft, MatchId};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub matches: Vec<Match>,
}

fn check_draft(draft: &MatchDraft) -> Result<(), AppError> {
    if draft.team_a_id == draft.team_b_id {
        return Err(AppError::BadRequest {
            kind: "SameTeams",
            message: "Team A and team B must be different teams.".to_string(),
        });
    }
    if draft.venue.as_deref().is_some_and(|v| v.chars().count() > 255) {
        return Err(AppError::validation(
            "The venue may not be greater than 255 characters.",
        ));
    }
    Ok(())
}

pub async fn create_match(
    State(state): State<AppState>,
    payload: Result<Json<MatchDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Match>), AppError> {
    let Json(draft) = payload?;
    check_draft(&draft)?;

    let created = state.repo.insert_match(&draft).await?;
    tracing::info!(match_id = %created.id, "Match created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_matches(
    State(state): State<AppState>,
) -> Result<Json<MatchesResponse>, AppError> {
    let matches = state.repo.list_matches().await?;
    Ok(Json(MatchesResponse { matches }))
}

pub async fn get_match(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Match>, AppError> {
    let id = MatchId::new(id);
    state
        .repo
        .get_match(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Match {} not found", id)))
}

pub async fn update_match(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    payload: Result<Json<MatchDraft>, JsonRejection>,
) -> Result<Json<Match>, AppError> {
    let Json(draft) = payload?;
    check_draft(&draft)?;

    let id = MatchId::new(id);
    state
        .repo
        .update_match(id, &draft)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Match {} not found", id)))
}

pub async fn delete_match(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id = MatchId::new(id);
    if state.repo.delete_match(id).await? {
        tracing::info!(match_id = %id, "Match deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Match {} not found", id)))
    }
}
