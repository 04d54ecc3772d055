//! Roster lookup: resolves the players a squad submission refers to.
//!
//! The composition rules are pure and take a [`MatchRoster`] snapshot; this
//! trait is the seam that produces one, from the database in production and
//! from memory in tests.

use crate::db::Repository;
use crate::domain::{MatchId, MatchRoster, PlayerId, RosterPlayer};
use async_trait::async_trait;
use thiserror::Error;

pub mod mock;

pub use mock::MockRoster;

#[async_trait]
pub trait RosterLookup: Send + Sync {
    /// Build the roster snapshot for `match_id` covering `player_ids`.
    ///
    /// Ids that do not resolve are simply absent from the snapshot; the
    /// validator rejects them. Players from other teams are included so the
    /// validator can report them precisely.
    async fn match_roster(
        &self,
        match_id: MatchId,
        player_ids: &[PlayerId],
    ) -> Result<MatchRoster, RosterError>;
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Match {0} not found")]
    MatchNotFound(MatchId),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

#[async_trait]
impl RosterLookup for Repository {
    async fn match_roster(
        &self,
        match_id: MatchId,
        player_ids: &[PlayerId],
    ) -> Result<MatchRoster, RosterError> {
        let fixture = self
            .get_match(match_id)
            .await?
            .ok_or(RosterError::MatchNotFound(match_id))?;

        let players = self.get_players(player_ids).await?;
        Ok(MatchRoster::new(
            match_id,
            fixture.team_a_id,
            fixture.team_b_id,
            players.into_values().map(|p| RosterPlayer {
                id: p.id,
                role: p.role,
                team_id: p.team_id,
            }),
        ))
    }
}
