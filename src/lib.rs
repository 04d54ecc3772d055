pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod roster;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{
    FantasySquad, MatchRoster, PerformanceInput, PerformanceStats, Role, RosterPlayer,
    ScoredPerformance, SquadSubmission,
};
pub use engine::{score, validate_squad, CompositionError, TeamCompositionValidator};
pub use error::AppError;
pub use roster::{MockRoster, RosterError, RosterLookup};
