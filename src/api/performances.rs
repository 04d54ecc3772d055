use axum::extract::{rejection::JsonRejection, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use super::AppState;
use crate::domain::{MatchId, ScoredPerformance};
use crate::engine::{breakdown, PointsBreakdown};
use crate::error::AppError;
use crate::orchestration::PerformanceRecorder;

#[derive(Debug, Serialize)]
pub struct PerformancesResponse {
    pub performances: Vec<PerformanceDto>,
}

#[derive(Debug, Serialize)]
pub struct PerformanceDto {
    #[serde(flatten)]
    pub performance: ScoredPerformance,
    pub breakdown: PointsBreakdown,
}

impl From<ScoredPerformance> for PerformanceDto {
    fn from(performance: ScoredPerformance) -> Self {
        let breakdown = breakdown(&performance.stats);
        Self {
            performance,
            breakdown,
        }
    }
}

/// Score and store one record or an array of records.
pub async fn record_performances(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<PerformancesResponse>), AppError> {
    let Json(body) = payload?;
    let records = PerformanceRecorder::parse_body(body)?;
    if records.is_empty() {
        return Err(AppError::validation("At least one performance is required."));
    }

    let scored = state.recorder.record(&records).await?;
    Ok((
        StatusCode::CREATED,
        Json(PerformancesResponse {
            performances: scored.into_iter().map(PerformanceDto::from).collect(),
        }),
    ))
}

pub async fn list_performances(
    Path(match_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<PerformancesResponse>, AppError> {
    let match_id = MatchId::new(match_id);
    if state.repo.get_match(match_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Match {} not found", match_id)));
    }
    let performances = state.repo.list_performances(match_id).await?;
    Ok(Json(PerformancesResponse {
        performances: performances.into_iter().map(PerformanceDto::from).collect(),
    }))
}
