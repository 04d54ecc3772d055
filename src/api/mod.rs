pub mod fantasy_teams;
pub mod health;
pub mod leagues;
pub mod match_players;
pub mod matches;
pub mod performances;
pub mod players;
pub mod teams;
pub mod users;

use crate::config::Config;
use crate::db::Repository;
use crate::engine::TeamCompositionValidator;
use crate::error::AppError;
use crate::orchestration::{PerformanceRecorder, SquadService};
use crate::roster::RosterLookup;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
    pub squads: Arc<SquadService>,
    pub recorder: Arc<PerformanceRecorder>,
}

impl AppState {
    /// Wire services over `repo`, which also serves as the roster source.
    pub fn new(repo: Arc<Repository>, config: Config) -> Self {
        let roster: Arc<dyn RosterLookup> = repo.clone();
        Self::with_roster(repo, roster, config)
    }

    pub fn with_roster(
        repo: Arc<Repository>,
        roster: Arc<dyn RosterLookup>,
        config: Config,
    ) -> Self {
        let validator = TeamCompositionValidator::new(config.composition_rules());
        let squads = Arc::new(SquadService::new(roster, repo.clone(), validator));
        let recorder = Arc::new(PerformanceRecorder::new(repo.clone()));
        Self {
            repo,
            config,
            squads,
            recorder,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/users", post(users::create_user).get(users::list_users))
        .route(
            "/v1/leagues",
            post(leagues::create_league).get(leagues::list_leagues),
        )
        .route("/v1/teams", post(teams::create_team).get(teams::list_teams))
        .route(
            "/v1/players",
            post(players::create_player).get(players::list_players),
        )
        .route(
            "/v1/matches",
            post(matches::create_match).get(matches::list_matches),
        )
        .route(
            "/v1/matches/:id",
            get(matches::get_match)
                .put(matches::update_match)
                .delete(matches::delete_match),
        )
        .route("/v1/match-players", post(match_players::upsert_match_players))
        .route(
            "/v1/match-players/:match_id",
            get(match_players::list_match_players),
        )
        .route(
            "/v1/fantasy-teams",
            post(fantasy_teams::submit_squad).get(fantasy_teams::list_squads),
        )
        .route(
            "/v1/fantasy-teams/:user_id/:match_id",
            get(fantasy_teams::get_squad),
        )
        .route(
            "/v1/player-performances",
            post(performances::record_performances),
        )
        .route(
            "/v1/player-performances/:match_id",
            get(performances::list_performances),
        )
        .layer(cors)
        .with_state(state)
}

/// Reject blank names and names longer than `max` characters.
pub(crate) fn require_name(field: &str, value: &str, max: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("The {} field is required.", field)));
    }
    if trimmed.chars().count() > max {
        return Err(AppError::validation(format!(
            "The {} may not be greater than {} characters.",
            field, max
        )));
    }
    Ok(trimmed.to_string())
}
