//! Match and match-participation operations for the repository.

use crate::domain::{LeagueId, Match, MatchDraft, MatchId, MatchPlayer, MatchPlayerId, PlayerId, TeamId};
use crate::engine::Participation;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::collections::HashMap;

use super::{decode_error, now_ms, placeholders, Repository, CHUNK_SIZE};

#[derive(Debug, thiserror::Error)]
#[error("match_date_ms out of range: {0}")]
struct MatchDateOutOfRange(i64);

fn match_from_row(row: &SqliteRow) -> Result<Match, sqlx::Error> {
    let ms: i64 = row.get("match_date_ms");
    let match_date: DateTime<Utc> = Utc
        .timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| decode_error(MatchDateOutOfRange(ms)))?;

    Ok(Match {
        id: MatchId::new(row.get("id")),
        league_id: LeagueId::new(row.get("fantasy_league_id")),
        team_a_id: TeamId::new(row.get("team_a_id")),
        team_b_id: TeamId::new(row.get("team_b_id")),
        match_date,
        venue: row.get("venue"),
    })
}

fn match_player_from_row(row: &SqliteRow) -> MatchPlayer {
    MatchPlayer {
        id: MatchPlayerId::new(row.get("id")),
        match_id: MatchId::new(row.get("match_id")),
        player_id: PlayerId::new(row.get("player_id")),
        team_id: TeamId::new(row.get("team_id")),
        is_playing_11: row.get::<i32, _>("is_playing_11") != 0,
        is_bench: row.get::<i32, _>("is_bench") != 0,
    }
}

const MATCH_COLUMNS: &str = "id, fantasy_league_id, team_a_id, team_b_id, match_date_ms, venue";
const MATCH_PLAYER_COLUMNS: &str = "id, match_id, player_id, team_id, is_playing_11, is_bench";

impl Repository {
    // =========================================================================
    // Matches
    // =========================================================================

    /// Insert a match.
    ///
    /// # Errors
    /// Returns an error if the insert fails (e.g. unknown league or team).
    pub async fn insert_match(&self, draft: &MatchDraft) -> Result<Match, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO matches (fantasy_league_id, team_a_id, team_b_id, match_date_ms, venue, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(draft.league_id.as_i64())
        .bind(draft.team_a_id.as_i64())
        .bind(draft.team_b_id.as_i64())
        .bind(draft.match_date.timestamp_millis())
        .bind(draft.venue.as_deref())
        .bind(now_ms())
        .execute(&self.pool)
        .await?;

        Ok(Match {
            id: MatchId::new(result.last_insert_rowid()),
            league_id: draft.league_id,
            team_a_id: draft.team_a_id,
            team_b_id: draft.team_b_id,
            match_date: draft.match_date,
            venue: draft.venue.clone(),
        })
    }

    pub async fn get_match(&self, id: MatchId) -> Result<Option<Match>, sqlx::Error> {
        let sql = format!("SELECT {} FROM matches WHERE id = ?", MATCH_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(match_from_row).transpose()
    }

    /// List matches, earliest first.
    pub async fn list_matches(&self) -> Result<Vec<Match>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM matches ORDER BY match_date_ms ASC, id ASC",
            MATCH_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(match_from_row).collect()
    }

    /// Replace a match's fields. Returns `None` if the match does not exist.
    pub async fn update_match(
        &self,
        id: MatchId,
        draft: &MatchDraft,
    ) -> Result<Option<Match>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE matches
            SET fantasy_league_id = ?, team_a_id = ?, team_b_id = ?, match_date_ms = ?, venue = ?
            WHERE id = ?
            "#,
        )
        .bind(draft.league_id.as_i64())
        .bind(draft.team_a_id.as_i64())
        .bind(draft.team_b_id.as_i64())
        .bind(draft.match_date.timestamp_millis())
        .bind(draft.venue.as_deref())
        .bind(id.as_i64())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_match(id).await
    }

    /// Delete a match and, via cascade, its participation, squads and performances.
    pub async fn delete_match(&self, id: MatchId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM matches WHERE id = ?")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Match participation
    // =========================================================================

    /// Upsert participation rows for a match in a single transaction.
    ///
    /// Rows are keyed by `(match_id, player_id)`; existing rows have their
    /// flags and team overwritten.
    pub async fn upsert_match_players(
        &self,
        match_id: MatchId,
        participations: &[Participation],
    ) -> Result<Vec<MatchPlayer>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let created_at = now_ms();

        for p in participations {
            sqlx::query(
                r#"
                INSERT INTO match_players (match_id, player_id, team_id, is_playing_11, is_bench, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(match_id, player_id) DO UPDATE SET
                    team_id = excluded.team_id,
                    is_playing_11 = excluded.is_playing_11,
                    is_bench = excluded.is_bench
                "#,
            )
            .bind(match_id.as_i64())
            .bind(p.player_id.as_i64())
            .bind(p.team_id.as_i64())
            .bind(p.is_playing_11)
            .bind(p.is_bench)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let ids: Vec<PlayerId> = participations.iter().map(|p| p.player_id).collect();
        let mut rows = self.list_match_players(match_id).await?;
        rows.retain(|mp| ids.contains(&mp.player_id));
        Ok(rows)
    }

    /// All participation rows for a match, ordered by id.
    pub async fn list_match_players(
        &self,
        match_id: MatchId,
    ) -> Result<Vec<MatchPlayer>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM match_players WHERE match_id = ? ORDER BY id ASC",
            MATCH_PLAYER_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(match_id.as_i64())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(match_player_from_row).collect())
    }

    /// Fetch participation rows by id. Unknown ids are absent from the map.
    pub async fn get_match_players(
        &self,
        ids: &[MatchPlayerId],
    ) -> Result<HashMap<MatchPlayerId, MatchPlayer>, sqlx::Error> {
        let mut out = HashMap::with_capacity(ids.len());

        for chunk in ids.chunks(CHUNK_SIZE) {
            let sql = format!(
                "SELECT {} FROM match_players WHERE id IN ({})",
                MATCH_PLAYER_COLUMNS,
                placeholders(chunk.len())
            );
            let mut query = sqlx::query(&sql);
            for id in chunk {
                query = query.bind(id.as_i64());
            }
            for row in query.fetch_all(&self.pool).await? {
                let mp = match_player_from_row(&row);
                out.insert(mp.id, mp);
            }
        }

        Ok(out)
    }
}
