//! Fantasy squad types: the roster snapshot a squad is checked against, the
//! submission itself, and the membership rows persisted for it.

use crate::domain::{MatchId, PlayerId, Role, SquadId, TeamId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of players in the playing XI.
pub const PLAYING_XI_SIZE: usize = 11;
/// Number of bench players.
pub const BENCH_SIZE: usize = 3;
/// Full squad size (playing XI + bench).
pub const SQUAD_SIZE: usize = PLAYING_XI_SIZE + BENCH_SIZE;

/// The attributes of a real-world player the composition rules consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterPlayer {
    pub id: PlayerId,
    pub role: Role,
    pub team_id: TeamId,
}

/// Snapshot of the players a submission refers to, plus the two teams playing the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRoster {
    pub match_id: MatchId,
    pub team_a: TeamId,
    pub team_b: TeamId,
    players: HashMap<PlayerId, RosterPlayer>,
}

impl MatchRoster {
    pub fn new<I>(match_id: MatchId, team_a: TeamId, team_b: TeamId, players: I) -> Self
    where
        I: IntoIterator<Item = RosterPlayer>,
    {
        Self {
            match_id,
            team_a,
            team_b,
            players: players.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn get(&self, id: PlayerId) -> Option<&RosterPlayer> {
        self.players.get(&id)
    }

    /// Whether `team` is one of the two sides in this match.
    pub fn is_playing(&self, team: TeamId) -> bool {
        team == self.team_a || team == self.team_b
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// A user's proposed squad for a match, as parsed from client input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadSubmission {
    pub user_id: UserId,
    pub match_id: MatchId,
    pub team_name: String,
    pub playing_eleven: Vec<PlayerId>,
    pub bench: Vec<PlayerId>,
    pub captain_id: PlayerId,
    pub vice_captain_id: PlayerId,
}

impl SquadSubmission {
    /// All selected ids, playing XI first then bench.
    pub fn all_player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.playing_eleven.iter().chain(self.bench.iter()).copied()
    }

    pub fn is_in_playing_eleven(&self, id: PlayerId) -> bool {
        self.playing_eleven.contains(&id)
    }

    /// Membership rows for a freshly persisted squad, each seeded with zero points.
    pub fn members(&self) -> Vec<SquadMember> {
        self.all_player_ids()
            .map(|player_id| SquadMember {
                player_id,
                is_playing_xi: self.playing_eleven.contains(&player_id),
                is_bench: self.bench.contains(&player_id),
                is_captain: player_id == self.captain_id,
                is_vice_captain: player_id == self.vice_captain_id,
                points: 0,
            })
            .collect()
    }
}

/// One player's membership in a persisted squad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadMember {
    pub player_id: PlayerId,
    pub is_playing_xi: bool,
    pub is_bench: bool,
    pub is_captain: bool,
    pub is_vice_captain: bool,
    pub points: i64,
}

/// A persisted fantasy squad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FantasySquad {
    pub id: SquadId,
    pub user_id: UserId,
    pub match_id: MatchId,
    pub team_name: String,
    pub total_points: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<SquadMember>,
}
