//! Pure rule engines: squad composition, match participation, and scoring.

pub mod composition;
pub mod participation;
pub mod scoring;

pub use composition::{
    check_selection_sizes, validate_squad, CompositionError, CompositionRules, Leadership, RoleBound, RoleBoundViolation,
    RosterFault, TeamCompositionValidator, DEFAULT_TEAM_CAP,
};
pub use participation::{plan_participation, Participation, ParticipationError};
pub use scoring::{breakdown, score, score_stats, PointsBreakdown};
