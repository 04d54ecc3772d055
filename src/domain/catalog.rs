//! Catalog records managed by administrators: users, leagues, teams,
//! players, matches, and per-match participation.

use crate::domain::{LeagueId, MatchId, MatchPlayerId, PlayerId, Role, TeamId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "user" => Some(UserRole::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_by: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub league_id: LeagueId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    pub team_id: TeamId,
}

/// A scheduled fixture between two teams of a league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub league_id: LeagueId,
    pub team_a_id: TeamId,
    pub team_b_id: TeamId,
    pub match_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

impl Match {
    pub fn involves(&self, team: TeamId) -> bool {
        team == self.team_a_id || team == self.team_b_id
    }
}

/// Fields an administrator supplies to create or update a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDraft {
    pub league_id: LeagueId,
    pub team_a_id: TeamId,
    pub team_b_id: TeamId,
    pub match_date: DateTime<Utc>,
    #[serde(default)]
    pub venue: Option<String>,
}

/// A player's participation record for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPlayer {
    pub id: MatchPlayerId,
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub is_playing_11: bool,
    pub is_bench: bool,
}

/// Requested participation for one player, before it is checked and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationEntry {
    pub player_id: PlayerId,
    #[serde(default)]
    pub is_playing_11: bool,
    #[serde(default)]
    pub is_bench: bool,
}
