//! Squad composition rules.
//!
//! A squad is checked in a fixed order and the first failing rule is
//! reported: eligibility, leadership, full-squad role bounds, playing-XI
//! role bounds, then the per-team cap.

use crate::domain::{
    MatchId, MatchRoster, PlayerId, Role, RoleCounts, RosterPlayer, SquadSubmission, TeamId,
    UserId, BENCH_SIZE, PLAYING_XI_SIZE,
};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Inclusive head-count bound for one role. `max == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleBound {
    pub role: Role,
    pub min: usize,
    pub max: Option<usize>,
}

impl RoleBound {
    pub const fn between(role: Role, min: usize, max: usize) -> Self {
        Self {
            role,
            min,
            max: Some(max),
        }
    }

    pub const fn at_least(role: Role, min: usize) -> Self {
        Self {
            role,
            min,
            max: None,
        }
    }

    pub fn admits(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

impl fmt::Display for RoleBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{} {}", self.min, max, self.role.plural_label()),
            None => write!(f, "at least {} {}", self.min, self.role.plural_label()),
        }
    }
}

/// The thresholds a squad is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionRules {
    /// Bounds over all 14 players, in evaluation order.
    pub squad_bounds: Vec<RoleBound>,
    /// Bounds over the playing XI, in evaluation order.
    pub xi_bounds: Vec<RoleBound>,
    /// Most players a squad may take from one real-world team.
    pub team_cap: usize,
}

pub const DEFAULT_TEAM_CAP: usize = 7;

impl Default for CompositionRules {
    fn default() -> Self {
        Self {
            squad_bounds: vec![
                RoleBound::at_least(Role::WicketKeeper, 2),
                RoleBound::between(Role::Batter, 2, 6),
                RoleBound::between(Role::Bowler, 2, 6),
                RoleBound::between(Role::AllRounder, 2, 5),
            ],
            xi_bounds: vec![
                RoleBound::between(Role::WicketKeeper, 1, 2),
                RoleBound::between(Role::Batter, 2, 5),
                RoleBound::between(Role::Bowler, 2, 6),
                RoleBound::between(Role::AllRounder, 2, 5),
            ],
            team_cap: DEFAULT_TEAM_CAP,
        }
    }
}

impl CompositionRules {
    pub fn with_team_cap(mut self, team_cap: usize) -> Self {
        self.team_cap = team_cap;
        self
    }
}

/// A role count that fell outside its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleBoundViolation {
    pub bound: RoleBound,
    pub count: usize,
}

impl fmt::Display for RoleBoundViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "must have {} (got {})", self.bound, self.count)
    }
}

/// Why the selected players do not form an eligible 14.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterFault {
    WrongPlayingElevenSize { actual: usize },
    WrongBenchSize { actual: usize },
    DuplicatePlayer(PlayerId),
    UnknownPlayer(PlayerId),
    OutsideMatch { player_id: PlayerId, team_id: TeamId },
    RosterForOtherMatch { expected: MatchId, actual: MatchId },
}

impl fmt::Display for RosterFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterFault::WrongPlayingElevenSize { actual } => write!(
                f,
                "playing 11 must list {} players, got {}",
                PLAYING_XI_SIZE, actual
            ),
            RosterFault::WrongBenchSize { actual } => {
                write!(f, "bench must list {} players, got {}", BENCH_SIZE, actual)
            }
            RosterFault::DuplicatePlayer(id) => write!(f, "player {} is selected twice", id),
            RosterFault::UnknownPlayer(id) => write!(f, "player {} is not on the roster", id),
            RosterFault::OutsideMatch { player_id, team_id } => write!(
                f,
                "player {} plays for team {}, which is not in this match",
                player_id, team_id
            ),
            RosterFault::RosterForOtherMatch { expected, actual } => write!(
                f,
                "roster belongs to match {}, submission is for match {}",
                actual, expected
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leadership {
    Captain,
    ViceCaptain,
}

impl fmt::Display for Leadership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leadership::Captain => f.write_str("Captain"),
            Leadership::ViceCaptain => f.write_str("Vice-captain"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    #[error("You have already submitted a team for this match (user {user_id}, match {match_id}).")]
    DuplicateSubmission { user_id: UserId, match_id: MatchId },
    #[error("All 14 players must be valid and from the two teams playing: {0}.")]
    InvalidRoster(RosterFault),
    #[error("{role} must be in the playing 11 (player {player_id}).")]
    LeadershipNotInXi {
        role: Leadership,
        player_id: PlayerId,
    },
    #[error("Captain and vice-captain must be different players (player {0}).")]
    LeadershipConflict(PlayerId),
    #[error("Full team {0}.")]
    SquadRoleBoundsViolated(RoleBoundViolation),
    #[error("Playing 11 {0}.")]
    XiRoleBoundsViolated(RoleBoundViolation),
    #[error("Cannot select more than {cap} players from the same team (team {team_id} has {count}).")]
    TeamCapExceeded {
        team_id: TeamId,
        count: usize,
        cap: usize,
    },
}

impl CompositionError {
    /// Stable machine-readable name for this failure.
    pub fn kind(&self) -> &'static str {
        match self {
            CompositionError::DuplicateSubmission { .. } => "DuplicateSubmission",
            CompositionError::InvalidRoster(_) => "InvalidRoster",
            CompositionError::LeadershipNotInXi { .. } => "LeadershipNotInXI",
            CompositionError::LeadershipConflict(_) => "LeadershipConflict",
            CompositionError::SquadRoleBoundsViolated(_) => "SquadRoleBoundsViolated",
            CompositionError::XiRoleBoundsViolated(_) => "XiRoleBoundsViolated",
            CompositionError::TeamCapExceeded { .. } => "TeamCapExceeded",
        }
    }
}

/// Checks proposed squads against a set of [`CompositionRules`].
#[derive(Debug, Clone, Default)]
pub struct TeamCompositionValidator {
    rules: CompositionRules,
}

impl TeamCompositionValidator {
    pub fn new(rules: CompositionRules) -> Self {
        Self { rules }
    }

    /// Accept or reject `submission` against the eligible players in `roster`.
    ///
    /// Pure: reads only its arguments. Duplicate-submission detection needs
    /// the store and happens before this is called.
    pub fn validate(
        &self,
        submission: &SquadSubmission,
        roster: &MatchRoster,
    ) -> Result<(), CompositionError> {
        let squad = resolve_squad(submission, roster).map_err(CompositionError::InvalidRoster)?;

        check_leadership(submission)?;

        let full = RoleCounts::tally(squad.iter().map(|p| p.role));
        check_bounds(&self.rules.squad_bounds, &full)
            .map_err(CompositionError::SquadRoleBoundsViolated)?;

        // resolve_squad keeps submission order, so the XI is the first eleven.
        let xi = RoleCounts::tally(squad[..PLAYING_XI_SIZE].iter().map(|p| p.role));
        check_bounds(&self.rules.xi_bounds, &xi).map_err(CompositionError::XiRoleBoundsViolated)?;

        self.check_team_cap(&squad)
    }

    fn check_team_cap(&self, squad: &[&RosterPlayer]) -> Result<(), CompositionError> {
        let mut per_team: BTreeMap<TeamId, usize> = BTreeMap::new();
        for player in squad {
            *per_team.entry(player.team_id).or_default() += 1;
        }

        match per_team
            .into_iter()
            .find(|(_, count)| *count > self.rules.team_cap)
        {
            Some((team_id, count)) => Err(CompositionError::TeamCapExceeded {
                team_id,
                count,
                cap: self.rules.team_cap,
            }),
            None => Ok(()),
        }
    }
}

/// Validate with the default rules.
pub fn validate_squad(
    submission: &SquadSubmission,
    roster: &MatchRoster,
) -> Result<(), CompositionError> {
    TeamCompositionValidator::default().validate(submission, roster)
}

/// Check the XI and bench sizes, which need no roster to verify.
pub fn check_selection_sizes(submission: &SquadSubmission) -> Result<(), RosterFault> {
    if submission.playing_eleven.len() != PLAYING_XI_SIZE {
        return Err(RosterFault::WrongPlayingElevenSize {
            actual: submission.playing_eleven.len(),
        });
    }
    if submission.bench.len() != BENCH_SIZE {
        return Err(RosterFault::WrongBenchSize {
            actual: submission.bench.len(),
        });
    }
    Ok(())
}

fn resolve_squad<'a>(
    submission: &SquadSubmission,
    roster: &'a MatchRoster,
) -> Result<Vec<&'a RosterPlayer>, RosterFault> {
    if roster.match_id != submission.match_id {
        return Err(RosterFault::RosterForOtherMatch {
            expected: submission.match_id,
            actual: roster.match_id,
        });
    }
    check_selection_sizes(submission)?;

    let mut seen = HashSet::new();
    let mut squad = Vec::with_capacity(PLAYING_XI_SIZE + BENCH_SIZE);
    for id in submission.all_player_ids() {
        if !seen.insert(id) {
            return Err(RosterFault::DuplicatePlayer(id));
        }
        let player = roster.get(id).ok_or(RosterFault::UnknownPlayer(id))?;
        if !roster.is_playing(player.team_id) {
            return Err(RosterFault::OutsideMatch {
                player_id: id,
                team_id: player.team_id,
            });
        }
        squad.push(player);
    }

    Ok(squad)
}

fn check_leadership(submission: &SquadSubmission) -> Result<(), CompositionError> {
    for (role, player_id) in [
        (Leadership::Captain, submission.captain_id),
        (Leadership::ViceCaptain, submission.vice_captain_id),
    ] {
        if !submission.is_in_playing_eleven(player_id) {
            return Err(CompositionError::LeadershipNotInXi { role, player_id });
        }
    }
    if submission.captain_id == submission.vice_captain_id {
        return Err(CompositionError::LeadershipConflict(submission.captain_id));
    }
    Ok(())
}

fn check_bounds(bounds: &[RoleBound], counts: &RoleCounts) -> Result<(), RoleBoundViolation> {
    for bound in bounds {
        let count = counts.get(bound.role);
        if !bound.admits(count) {
            return Err(RoleBoundViolation {
                bound: *bound,
                count,
            });
        }
    }
    Ok(())
}
