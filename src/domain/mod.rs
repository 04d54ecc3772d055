//! Domain types for the fantasy-cricket service.
//!
//! This module provides:
//! - Identifier newtypes and player roles
//! - Catalog records (leagues, teams, players, matches, participation)
//! - Squad submissions and the roster snapshot they are checked against
//! - Raw and checked performance statistics

pub mod catalog;
pub mod performance;
pub mod primitives;
pub mod squad;

pub use catalog::{
    League, Match, MatchDraft, MatchPlayer, ParticipationEntry, Player, Team, User, UserRole,
};
pub use performance::{
    InvalidStatistics, PerformanceInput, PerformanceRecord, PerformanceStats, ScoredPerformance,
};
pub use primitives::{
    LeagueId, MatchId, MatchPlayerId, PlayerId, Role, RoleCounts, RoleParseError, SquadId, TeamId,
    UserId,
};
pub use squad::{
    FantasySquad, MatchRoster, RosterPlayer, SquadMember, SquadSubmission, BENCH_SIZE,
    PLAYING_XI_SIZE, SQUAD_SIZE,
};
