//! In-memory roster for tests and tooling that run without a database.

use super::{RosterError, RosterLookup};
use crate::domain::{MatchId, MatchRoster, PlayerId, RosterPlayer, TeamId};
use async_trait::async_trait;
use std::collections::HashMap;

/// Roster source backed by predefined matches and players.
#[derive(Debug, Clone, Default)]
pub struct MockRoster {
    matches: HashMap<MatchId, (TeamId, TeamId)>,
    players: Vec<RosterPlayer>,
}

impl MockRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a match between two teams.
    pub fn with_match(mut self, match_id: MatchId, team_a: TeamId, team_b: TeamId) -> Self {
        self.matches.insert(match_id, (team_a, team_b));
        self
    }

    pub fn with_player(mut self, player: RosterPlayer) -> Self {
        self.players.push(player);
        self
    }

    pub fn with_players(mut self, players: impl IntoIterator<Item = RosterPlayer>) -> Self {
        self.players.extend(players);
        self
    }
}

#[async_trait]
impl RosterLookup for MockRoster {
    async fn match_roster(
        &self,
        match_id: MatchId,
        player_ids: &[PlayerId],
    ) -> Result<MatchRoster, RosterError> {
        let (team_a, team_b) = self
            .matches
            .get(&match_id)
            .copied()
            .ok_or(RosterError::MatchNotFound(match_id))?;

        Ok(MatchRoster::new(
            match_id,
            team_a,
            team_b,
            self.players
                .iter()
                .filter(|p| player_ids.contains(&p.id))
                .copied(),
        ))
    }
}
