//! Fantasy squad operations for the repository.

use crate::domain::{
    FantasySquad, MatchId, PlayerId, SquadId, SquadMember, SquadSubmission, UserId,
};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;

use super::{now_ms, Repository};

fn squad_from_row(row: &SqliteRow) -> FantasySquad {
    FantasySquad {
        id: SquadId::new(row.get("id")),
        user_id: UserId::new(row.get("user_id")),
        match_id: MatchId::new(row.get("match_id")),
        team_name: row.get("team_name"),
        total_points: row.get("total_points"),
        members: Vec::new(),
    }
}

fn member_from_row(row: &SqliteRow) -> SquadMember {
    SquadMember {
        player_id: PlayerId::new(row.get("player_id")),
        is_playing_xi: row.get::<i32, _>("is_playing_xi") != 0,
        is_bench: row.get::<i32, _>("is_bench") != 0,
        is_captain: row.get::<i32, _>("is_captain") != 0,
        is_vice_captain: row.get::<i32, _>("is_vice_captain") != 0,
        points: row.get("points"),
    }
}

impl Repository {
    /// Whether `user_id` already has a squad for `match_id`.
    pub async fn squad_exists(&self, user_id: UserId, match_id: MatchId) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM fantasy_teams WHERE user_id = ? AND match_id = ?")
            .bind(user_id.as_i64())
            .bind(match_id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Persist a validated squad and its membership rows atomically.
    ///
    /// # Errors
    /// Returns a unique-violation database error if the user already has a
    /// squad for the match.
    pub async fn insert_squad(&self, submission: &SquadSubmission) -> Result<FantasySquad, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO fantasy_teams (user_id, match_id, team_name, total_points, created_at)
            VALUES (?, ?, ?, 0, ?)
            "#,
        )
        .bind(submission.user_id.as_i64())
        .bind(submission.match_id.as_i64())
        .bind(submission.team_name.as_str())
        .bind(now_ms())
        .execute(&mut *tx)
        .await?;
        let squad_id = SquadId::new(result.last_insert_rowid());

        let members = submission.members();
        for member in &members {
            sqlx::query(
                r#"
                INSERT INTO fantasy_team_players (
                    fantasy_team_id, player_id, is_playing_xi, is_bench,
                    is_captain, is_vice_captain, points
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(squad_id.as_i64())
            .bind(member.player_id.as_i64())
            .bind(member.is_playing_xi)
            .bind(member.is_bench)
            .bind(member.is_captain)
            .bind(member.is_vice_captain)
            .bind(member.points)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(FantasySquad {
            id: squad_id,
            user_id: submission.user_id,
            match_id: submission.match_id,
            team_name: submission.team_name.clone(),
            total_points: 0,
            members,
        })
    }

    /// A user's squad for a match, with its membership rows.
    pub async fn get_squad(
        &self,
        user_id: UserId,
        match_id: MatchId,
    ) -> Result<Option<FantasySquad>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, match_id, team_name, total_points
            FROM fantasy_teams
            WHERE user_id = ? AND match_id = ?
            "#,
        )
        .bind(user_id.as_i64())
        .bind(match_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut squad = squad_from_row(&row);

        let members = sqlx::query(
            r#"
            SELECT player_id, is_playing_xi, is_bench, is_captain, is_vice_captain, points
            FROM fantasy_team_players
            WHERE fantasy_team_id = ?
            ORDER BY is_bench ASC, id ASC
            "#,
        )
        .bind(squad.id.as_i64())
        .fetch_all(&self.pool)
        .await?;
        squad.members = members.iter().map(member_from_row).collect();

        Ok(Some(squad))
    }

    /// All squads without membership rows, optionally for one match.
    pub async fn list_squads(&self, match_id: Option<MatchId>) -> Result<Vec<FantasySquad>, sqlx::Error> {
        let rows = match match_id {
            Some(match_id) => {
                sqlx::query(
                    r#"
                    SELECT id, user_id, match_id, team_name, total_points
                    FROM fantasy_teams WHERE match_id = ? ORDER BY id ASC
                    "#,
                )
                .bind(match_id.as_i64())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, user_id, match_id, team_name, total_points FROM fantasy_teams ORDER BY id ASC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows.iter().map(squad_from_row).collect())
    }
}

/// Copy scored points onto every squad for `match_id`.
///
/// Each member gets its player's performance points for the match (0 when
/// none are recorded); each squad total is the sum over its playing XI.
/// Returns the number of squads updated.
pub(super) async fn refresh_squad_points(
    conn: &mut SqliteConnection,
    match_id: MatchId,
) -> Result<u64, sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE fantasy_team_players
        SET points = COALESCE((
            SELECT pp.points
            FROM player_performances pp
            JOIN match_players mp ON mp.id = pp.match_player_id
            WHERE mp.match_id = ? AND mp.player_id = fantasy_team_players.player_id
        ), 0)
        WHERE fantasy_team_id IN (SELECT id FROM fantasy_teams WHERE match_id = ?)
        "#,
    )
    .bind(match_id.as_i64())
    .bind(match_id.as_i64())
    .execute(&mut *conn)
    .await?;

    let result = sqlx::query(
        r#"
        UPDATE fantasy_teams
        SET total_points = COALESCE((
            SELECT SUM(ftp.points)
            FROM fantasy_team_players ftp
            WHERE ftp.fantasy_team_id = fantasy_teams.id AND ftp.is_playing_xi = 1
        ), 0)
        WHERE match_id = ?
        "#,
    )
    .bind(match_id.as_i64())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn test_insert_and_fetch_squad() {
        let (repo, _temp) = setup_repo().await;
        let seeded = seed_fixture(&repo).await;
        let sub = standard_squad(&seeded);

        assert!(!repo.squad_exists(sub.user_id, sub.match_id).await.unwrap());
        let inserted = repo.insert_squad(&sub).await.unwrap();
        assert!(repo.squad_exists(sub.user_id, sub.match_id).await.unwrap());

        let fetched = repo.get_squad(sub.user_id, sub.match_id).await.unwrap().unwrap();
        assert_eq!(fetched.id, inserted.id);
        assert_eq!(fetched.members.len(), 14);
        assert_eq!(fetched.members.iter().filter(|m| m.is_bench).count(), 3);
        assert_eq!(fetched.members.iter().filter(|m| m.is_captain).count(), 1);
        assert!(fetched.members.iter().all(|m| m.points == 0));
        assert_eq!(fetched.total_points, 0);
    }

    #[tokio::test]
    async fn test_second_squad_for_same_match_violates_unique() {
        let (repo, _temp) = setup_repo().await;
        let seeded = seed_fixture(&repo).await;
        let sub = standard_squad(&seeded);

        repo.insert_squad(&sub).await.unwrap();
        let err = repo.insert_squad(&sub).await.unwrap_err();
        assert!(err
            .as_database_error()
            .map(|e| e.is_unique_violation())
            .unwrap_or(false));

        // The failed transaction left no orphan membership rows behind.
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM fantasy_team_players")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(count, 14);
    }

    #[tokio::test]
    async fn test_list_squads_filters_by_match() {
        let (repo, _temp) = setup_repo().await;
        let seeded = seed_fixture(&repo).await;
        repo.insert_squad(&standard_squad(&seeded)).await.unwrap();

        assert_eq!(repo.list_squads(None).await.unwrap().len(), 1);
        assert_eq!(
            repo.list_squads(Some(seeded.fixture.id)).await.unwrap().len(),
            1
        );
        assert!(repo
            .list_squads(Some(MatchId::new(999)))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_squad() {
        let (repo, _temp) = setup_repo().await;
        assert!(repo
            .get_squad(UserId::new(1), MatchId::new(1))
            .await
            .unwrap()
            .is_none());
    }
}
