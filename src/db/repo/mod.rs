//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct for all database operations.
//! Methods are organized across submodules by concern:
//! - `mod.rs` - Users, leagues, teams, and players
//! - `matches.rs` - Matches and match participation
//! - `squads.rs` - Fantasy squads and their membership rows
//! - `performances.rs` - Scored player performances

mod matches;
mod performances;
mod squads;

use crate::domain::{League, LeagueId, Player, PlayerId, Role, Team, TeamId, User, UserId, UserRole};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::collections::HashMap;

/// SQLite has a 999 parameter limit; chunk to 500 for safety margin.
const CHUNK_SIZE: usize = 500;

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn decode_error<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}

fn player_from_row(row: &SqliteRow) -> Result<Player, sqlx::Error> {
    let role: String = row.get("role");
    Ok(Player {
        id: PlayerId::new(row.get("id")),
        name: row.get("name"),
        role: role.parse::<Role>().map_err(decode_error)?,
        team_id: TeamId::new(row.get("team_id")),
    })
}

#[derive(Debug, thiserror::Error)]
#[error("unknown user role: {0}")]
struct UnknownUserRole(String);

fn user_from_row(row: &SqliteRow) -> Result<User, sqlx::Error> {
    let role: String = row.get("role");
    Ok(User {
        id: UserId::new(row.get("id")),
        name: row.get("name"),
        email: row.get("email"),
        role: UserRole::parse(&role).ok_or_else(|| decode_error(UnknownUserRole(role.clone())))?,
    })
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Round-trip a trivial query to confirm the database is reachable.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a user.
    ///
    /// # Errors
    /// Returns an error if the insert fails (e.g. the email is taken).
    pub async fn insert_user(
        &self,
        name: &str,
        email: &str,
        role: UserRole,
    ) -> Result<User, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO users (name, email, role, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(email)
        .bind(role.as_str())
        .bind(now_ms())
        .execute(&self.pool)
        .await?;

        Ok(User {
            id: UserId::new(result.last_insert_rowid()),
            name: name.to_string(),
            email: email.to_string(),
            role,
        })
    }

    pub async fn list_users(&self) -> Result<Vec<User>, sqlx::Error> {
        let rows = sqlx::query("SELECT id, name, email, role FROM users ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(user_from_row).collect()
    }

    pub async fn get_user(&self, id: UserId) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query("SELECT id, name, email, role FROM users WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    // =========================================================================
    // Leagues
    // =========================================================================

    /// Insert a league owned by `created_by`.
    ///
    /// # Errors
    /// Returns an error if the insert fails (e.g. unknown creator).
    pub async fn insert_league(
        &self,
        name: &str,
        description: Option<&str>,
        created_by: UserId,
    ) -> Result<League, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO fantasy_leagues (name, description, created_by, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(description)
        .bind(created_by.as_i64())
        .bind(now_ms())
        .execute(&self.pool)
        .await?;

        Ok(League {
            id: LeagueId::new(result.last_insert_rowid()),
            name: name.to_string(),
            description: description.map(str::to_string),
            created_by,
        })
    }

    pub async fn list_leagues(&self) -> Result<Vec<League>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT id, name, description, created_by FROM fantasy_leagues ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| League {
                id: LeagueId::new(row.get("id")),
                name: row.get("name"),
                description: row.get("description"),
                created_by: UserId::new(row.get("created_by")),
            })
            .collect())
    }

    // =========================================================================
    // Teams
    // =========================================================================

    /// Insert a real-world team into a league.
    ///
    /// # Errors
    /// Returns an error if the insert fails (e.g. unknown league).
    pub async fn insert_team(&self, name: &str, league_id: LeagueId) -> Result<Team, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO teams (name, fantasy_league_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(name)
        .bind(league_id.as_i64())
        .bind(now_ms())
        .execute(&self.pool)
        .await?;

        Ok(Team {
            id: TeamId::new(result.last_insert_rowid()),
            name: name.to_string(),
            league_id,
        })
    }

    pub async fn list_teams(&self) -> Result<Vec<Team>, sqlx::Error> {
        let rows = sqlx::query("SELECT id, name, fantasy_league_id FROM teams ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| Team {
                id: TeamId::new(row.get("id")),
                name: row.get("name"),
                league_id: LeagueId::new(row.get("fantasy_league_id")),
            })
            .collect())
    }

    // =========================================================================
    // Players
    // =========================================================================

    /// Insert a player into a team.
    ///
    /// # Errors
    /// Returns an error if the insert fails (e.g. unknown team).
    pub async fn insert_player(
        &self,
        name: &str,
        role: Role,
        team_id: TeamId,
    ) -> Result<Player, sqlx::Error> {
        let result =
            sqlx::query("INSERT INTO players (name, role, team_id, created_at) VALUES (?, ?, ?, ?)")
                .bind(name)
                .bind(role.code())
                .bind(team_id.as_i64())
                .bind(now_ms())
                .execute(&self.pool)
                .await?;

        Ok(Player {
            id: PlayerId::new(result.last_insert_rowid()),
            name: name.to_string(),
            role,
            team_id,
        })
    }

    /// List players, optionally restricted to one team.
    pub async fn list_players(&self, team_id: Option<TeamId>) -> Result<Vec<Player>, sqlx::Error> {
        let rows = match team_id {
            Some(team_id) => {
                sqlx::query(
                    "SELECT id, name, role, team_id FROM players WHERE team_id = ? ORDER BY id ASC",
                )
                .bind(team_id.as_i64())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query("SELECT id, name, role, team_id FROM players ORDER BY id ASC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        rows.iter().map(player_from_row).collect()
    }

    /// Fetch the given players by id. Unknown ids are absent from the map.
    pub async fn get_players(
        &self,
        ids: &[PlayerId],
    ) -> Result<HashMap<PlayerId, Player>, sqlx::Error> {
        let mut out = HashMap::with_capacity(ids.len());

        for chunk in ids.chunks(CHUNK_SIZE) {
            let sql = format!(
                "SELECT id, name, role, team_id FROM players WHERE id IN ({})",
                placeholders(chunk.len())
            );
            let mut query = sqlx::query(&sql);
            for id in chunk {
                query = query.bind(id.as_i64());
            }

            for row in query.fetch_all(&self.pool).await? {
                let player = player_from_row(&row)?;
                out.insert(player.id, player);
            }
        }

        Ok(out)
    }
}
