//! Rules for registering which players take part in a match.

use crate::domain::{Match, ParticipationEntry, Player, PlayerId, TeamId, BENCH_SIZE};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParticipationError {
    #[error("Player {player_id} (team {team_id}) does not belong to a team in this match.")]
    PlayerNotInMatch { player_id: PlayerId, team_id: TeamId },
    #[error("Player {0} does not exist.")]
    UnknownPlayer(PlayerId),
    #[error("You can only assign {} players to the bench.", BENCH_SIZE)]
    BenchFull,
}

/// A checked participation row ready to be upserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participation {
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub is_playing_11: bool,
    pub is_bench: bool,
}

/// Check requested participation for `fixture` against the known players.
///
/// Entries are processed in order; the first failure aborts the whole batch.
pub fn plan_participation(
    fixture: &Match,
    players: &HashMap<PlayerId, Player>,
    entries: &[ParticipationEntry],
) -> Result<Vec<Participation>, ParticipationError> {
    let mut bench_count = 0usize;
    let mut planned = Vec::with_capacity(entries.len());

    for entry in entries {
        let player = players
            .get(&entry.player_id)
            .ok_or(ParticipationError::UnknownPlayer(entry.player_id))?;

        if !fixture.involves(player.team_id) {
            return Err(ParticipationError::PlayerNotInMatch {
                player_id: player.id,
                team_id: player.team_id,
            });
        }

        if entry.is_bench {
            if bench_count >= BENCH_SIZE {
                return Err(ParticipationError::BenchFull);
            }
            bench_count += 1;
        }

        planned.push(Participation {
            player_id: player.id,
            team_id: player.team_id,
            is_playing_11: entry.is_playing_11,
            is_bench: entry.is_bench,
        });
    }

    Ok(planned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LeagueId, MatchId, Role};
    use chrono::{TimeZone, Utc};

    fn fixture() -> Match {
        Match {
            id: MatchId(1),
            league_id: LeagueId(1),
            team_a_id: TeamId(10),
            team_b_id: TeamId(20),
            match_date: Utc.with_ymd_and_hms(2025, 11, 20, 14, 0, 0).unwrap(),
            venue: None,
        }
    }

    fn players() -> HashMap<PlayerId, Player> {
        [(1, 10), (2, 10), (3, 20), (4, 20), (5, 20), (6, 30)]
            .into_iter()
            .map(|(id, team)| {
                (
                    PlayerId(id),
                    Player {
                        id: PlayerId(id),
                        name: format!("Player {}", id),
                        role: Role::Batter,
                        team_id: TeamId(team),
                    },
                )
            })
            .collect()
    }

    fn entry(id: i64, is_bench: bool) -> ParticipationEntry {
        ParticipationEntry {
            player_id: PlayerId(id),
            is_playing_11: !is_bench,
            is_bench,
        }
    }

    #[test]
    fn test_team_copied_from_player() {
        let planned = plan_participation(&fixture(), &players(), &[entry(1, false), entry(3, true)])
            .unwrap();
        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].team_id, TeamId(10));
        assert_eq!(planned[1].team_id, TeamId(20));
        assert!(planned[1].is_bench);
    }

    #[test]
    fn test_player_from_other_team_rejected() {
        let err = plan_participation(&fixture(), &players(), &[entry(6, false)]).unwrap_err();
        assert_eq!(
            err,
            ParticipationError::PlayerNotInMatch {
                player_id: PlayerId(6),
                team_id: TeamId(30),
            }
        );
    }

    #[test]
    fn test_fourth_bench_player_rejected() {
        let entries = [entry(1, true), entry(2, true), entry(3, true), entry(4, true)];
        assert_eq!(
            plan_participation(&fixture(), &players(), &entries),
            Err(ParticipationError::BenchFull)
        );
    }

    #[test]
    fn test_unknown_player_rejected() {
        assert_eq!(
            plan_participation(&fixture(), &players(), &[entry(99, false)]),
            Err(ParticipationError::UnknownPlayer(PlayerId(99)))
        );
    }
}
