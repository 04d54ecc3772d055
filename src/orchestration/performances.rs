use crate::db::Repository;
use crate::domain::{
    InvalidStatistics, MatchId, MatchPlayerId, PerformanceRecord, PerformanceStats,
    ScoredPerformance,
};
use crate::engine::score_stats;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Scores raw statistics and stores them against match participation.
#[derive(Clone)]
pub struct PerformanceRecorder {
    repo: Arc<Repository>,
}

impl PerformanceRecorder {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// Parse a request body holding one record or an array of records.
    pub fn parse_body(body: Value) -> Result<Vec<PerformanceRecord>, RecordingError> {
        let values = match body {
            Value::Array(items) => items,
            single => vec![single],
        };

        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                PerformanceRecord::from_json(value)
                    .map_err(|source| RecordingError::InvalidStatistics { index, source })
            })
            .collect()
    }

    /// Score and upsert a batch, refreshing squad points for every match
    /// the batch touched in the same transaction.
    ///
    /// The batch is all-or-nothing: any invalid record or unknown
    /// participation id rejects it before anything is written, and a failed
    /// refresh rolls back the upsert.
    pub async fn record(
        &self,
        records: &[PerformanceRecord],
    ) -> Result<Vec<ScoredPerformance>, RecordingError> {
        let mut scored = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let stats = PerformanceStats::try_from(&record.input).map_err(|source| {
                warn!(
                    match_player_id = %record.match_player_id,
                    "Rejected performance: {}", source
                );
                RecordingError::InvalidStatistics { index, source }
            })?;
            let points = score_stats(&stats);
            debug!(match_player_id = %record.match_player_id, points, "Scored performance");
            scored.push(ScoredPerformance {
                match_player_id: record.match_player_id,
                stats,
                points,
            });
        }

        if scored.is_empty() {
            return Ok(scored);
        }

        let ids: Vec<MatchPlayerId> = scored.iter().map(|s| s.match_player_id).collect();
        let participation = self.repo.get_match_players(&ids).await?;
        if let Some(missing) = ids.iter().find(|id| !participation.contains_key(*id)) {
            warn!(match_player_id = %missing, "Rejected performance batch: unknown participation");
            return Err(RecordingError::UnknownParticipation(*missing));
        }

        let matches: Vec<MatchId> = participation
            .values()
            .map(|mp| mp.match_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let squads = self.repo.record_performances(&scored, &matches).await?;
        info!(
            matches = matches.len(),
            performances = scored.len(),
            squads,
            "Recorded performances"
        );

        Ok(scored)
    }
}

#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("Record {index}: {source}")]
    InvalidStatistics {
        index: usize,
        #[source]
        source: InvalidStatistics,
    },
    #[error("Match player {0} does not exist.")]
    UnknownParticipation(MatchPlayerId),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}
