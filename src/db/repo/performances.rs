//! Scored performance operations for the repository.

use crate::domain::{MatchId, MatchPlayerId, PerformanceStats, ScoredPerformance};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;

use super::squads::refresh_squad_points;
use super::{decode_error, now_ms, Repository};

const PERFORMANCE_COLUMNS: &str = r#"
    pp.match_player_id, pp.runs, pp.fours, pp.sixes, pp.balls_faced,
    pp.wickets, pp.lbw_or_bowled, pp.maidens, pp.no_balls, pp.wides, pp.byes, pp.leg_byes,
    pp.catches, pp.stumpings, pp.run_outs, pp.points
"#;

fn count(row: &SqliteRow, column: &str) -> Result<u32, sqlx::Error> {
    let value: i64 = row.get(column);
    u32::try_from(value).map_err(decode_error)
}

fn performance_from_row(row: &SqliteRow) -> Result<ScoredPerformance, sqlx::Error> {
    Ok(ScoredPerformance {
        match_player_id: MatchPlayerId::new(row.get("match_player_id")),
        stats: PerformanceStats {
            runs: count(row, "runs")?,
            fours: count(row, "fours")?,
            sixes: count(row, "sixes")?,
            balls_faced: count(row, "balls_faced")?,
            wickets: count(row, "wickets")?,
            lbw_or_bowled: row.get::<i32, _>("lbw_or_bowled") != 0,
            maidens: count(row, "maidens")?,
            no_balls: count(row, "no_balls")?,
            wides: count(row, "wides")?,
            byes: count(row, "byes")?,
            leg_byes: count(row, "leg_byes")?,
            catches: count(row, "catches")?,
            stumpings: count(row, "stumpings")?,
            run_outs: count(row, "run_outs")?,
        },
        points: row.get("points"),
    })
}

/// Insert or overwrite scored performances on `conn`.
///
/// Keyed by `match_player_id`: re-submitting corrected statistics replaces
/// the previous record, leaving exactly one per participation.
async fn upsert_performances(
    conn: &mut SqliteConnection,
    performances: &[ScoredPerformance],
) -> Result<(), sqlx::Error> {
    let now = now_ms();

    for perf in performances {
        let s = &perf.stats;
        sqlx::query(
            r#"
            INSERT INTO player_performances (
                match_player_id, runs, fours, sixes, balls_faced,
                wickets, lbw_or_bowled, maidens, no_balls, wides, byes, leg_byes,
                catches, stumpings, run_outs, points, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(match_player_id) DO UPDATE SET
                runs = excluded.runs,
                fours = excluded.fours,
                sixes = excluded.sixes,
                balls_faced = excluded.balls_faced,
                wickets = excluded.wickets,
                lbw_or_bowled = excluded.lbw_or_bowled,
                maidens = excluded.maidens,
                no_balls = excluded.no_balls,
                wides = excluded.wides,
                byes = excluded.byes,
                leg_byes = excluded.leg_byes,
                catches = excluded.catches,
                stumpings = excluded.stumpings,
                run_outs = excluded.run_outs,
                points = excluded.points,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(perf.match_player_id.as_i64())
        .bind(i64::from(s.runs))
        .bind(i64::from(s.fours))
        .bind(i64::from(s.sixes))
        .bind(i64::from(s.balls_faced))
        .bind(i64::from(s.wickets))
        .bind(s.lbw_or_bowled)
        .bind(i64::from(s.maidens))
        .bind(i64::from(s.no_balls))
        .bind(i64::from(s.wides))
        .bind(i64::from(s.byes))
        .bind(i64::from(s.leg_byes))
        .bind(i64::from(s.catches))
        .bind(i64::from(s.stumpings))
        .bind(i64::from(s.run_outs))
        .bind(perf.points)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

impl Repository {
    /// Upsert scored performances and refresh squad points for `match_ids`
    /// in a single transaction. Returns the number of squads refreshed.
    ///
    /// Either every performance and every refreshed total is written, or
    /// nothing is.
    pub async fn record_performances(
        &self,
        performances: &[ScoredPerformance],
        match_ids: &[MatchId],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        upsert_performances(&mut *tx, performances).await?;

        let mut squads = 0;
        for match_id in match_ids {
            squads += refresh_squad_points(&mut *tx, *match_id).await?;
        }

        tx.commit().await?;
        Ok(squads)
    }

    pub async fn get_performance(
        &self,
        match_player_id: MatchPlayerId,
    ) -> Result<Option<ScoredPerformance>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM player_performances pp WHERE pp.match_player_id = ?",
            PERFORMANCE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(match_player_id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(performance_from_row).transpose()
    }

    /// Scored performances for every participant of a match, highest points first.
    pub async fn list_performances(
        &self,
        match_id: MatchId,
    ) -> Result<Vec<ScoredPerformance>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {}
            FROM player_performances pp
            JOIN match_players mp ON mp.id = pp.match_player_id
            WHERE mp.match_id = ?
            ORDER BY pp.points DESC, pp.match_player_id ASC
            "#,
            PERFORMANCE_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(match_id.as_i64())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(performance_from_row).collect()
    }
}
