use crate::db::Repository;
use crate::domain::{FantasySquad, SquadSubmission, UserId};
use crate::engine::{check_selection_sizes, CompositionError, TeamCompositionValidator};
use crate::roster::{RosterError, RosterLookup};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Longest team name accepted for a squad.
pub const MAX_TEAM_NAME_LEN: usize = 100;

/// Accepts squad submissions: duplicate check, roster lookup, validation,
/// and persistence.
#[derive(Clone)]
pub struct SquadService {
    roster: Arc<dyn RosterLookup>,
    repo: Arc<Repository>,
    validator: TeamCompositionValidator,
}

impl SquadService {
    pub fn new(
        roster: Arc<dyn RosterLookup>,
        repo: Arc<Repository>,
        validator: TeamCompositionValidator,
    ) -> Self {
        Self {
            roster,
            repo,
            validator,
        }
    }

    /// Validate and persist a squad with all member points at zero.
    ///
    /// A second squad, or one with a wrongly sized XI or bench, is rejected
    /// before the roster is fetched. A concurrent insert that loses the race
    /// on the unique constraint is reported as a duplicate. The team name is
    /// stored trimmed.
    pub async fn submit(
        &self,
        submission: &SquadSubmission,
    ) -> Result<FantasySquad, SubmissionError> {
        let user_id = submission.user_id;
        let match_id = submission.match_id;

        let name = submission.team_name.trim();
        if name.is_empty() || name.chars().count() > MAX_TEAM_NAME_LEN {
            return Err(SubmissionError::InvalidTeamName);
        }

        if self.repo.get_user(user_id).await?.is_none() {
            return Err(SubmissionError::UnknownUser(user_id));
        }

        if self.repo.squad_exists(user_id, match_id).await? {
            warn!(%user_id, %match_id, "Rejected squad: duplicate submission");
            return Err(CompositionError::DuplicateSubmission { user_id, match_id }.into());
        }

        if let Err(fault) = check_selection_sizes(submission) {
            let err = CompositionError::InvalidRoster(fault);
            warn!(%user_id, %match_id, kind = err.kind(), "Rejected squad: {}", err);
            return Err(err.into());
        }

        let ids: Vec<_> = submission.all_player_ids().collect();
        let roster = self.roster.match_roster(match_id, &ids).await?;

        if let Err(err) = self.validator.validate(submission, &roster) {
            warn!(%user_id, %match_id, kind = err.kind(), "Rejected squad: {}", err);
            return Err(err.into());
        }

        let submission = SquadSubmission {
            team_name: name.to_string(),
            ..submission.clone()
        };
        match self.repo.insert_squad(&submission).await {
            Ok(squad) => {
                info!(%user_id, %match_id, squad_id = %squad.id, "Squad persisted");
                Ok(squad)
            }
            Err(err) if is_unique_violation(&err) => {
                warn!(%user_id, %match_id, "Rejected squad: lost insert race");
                Err(CompositionError::DuplicateSubmission { user_id, match_id }.into())
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Composition(#[from] CompositionError),
    #[error("The team name is required and may not exceed {} characters.", MAX_TEAM_NAME_LEN)]
    InvalidTeamName,
    #[error("User {0} does not exist.")]
    UnknownUser(UserId),
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repo::test_support::{seed_fixture, setup_repo, standard_squad};
    use crate::domain::{MatchId, RosterPlayer, PLAYING_XI_SIZE};
    use crate::engine::{CompositionRules, RosterFault};
    use crate::roster::MockRoster;

    fn service(repo: &Arc<Repository>) -> SquadService {
        SquadService::new(repo.clone(), repo.clone(), TeamCompositionValidator::default())
    }

    #[tokio::test]
    async fn test_submit_persists_valid_squad() {
        let (repo, _temp) = setup_repo().await;
        let seeded = seed_fixture(&repo).await;

        let squad = service(&repo).submit(&standard_squad(&seeded)).await.unwrap();
        assert_eq!(squad.members.len(), 14);
        assert_eq!(squad.total_points, 0);

        let stored = repo
            .get_squad(seeded.user.id, seeded.fixture.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, squad.id);
    }

    #[tokio::test]
    async fn test_second_submission_is_duplicate() {
        let (repo, _temp) = setup_repo().await;
        let seeded = seed_fixture(&repo).await;
        let svc = service(&repo);
        svc.submit(&standard_squad(&seeded)).await.unwrap();

        let err = svc.submit(&standard_squad(&seeded)).await.unwrap_err();
        assert!(matches!(
            err,
            SubmissionError::Composition(CompositionError::DuplicateSubmission { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_checked_before_roster_lookup() {
        let (repo, _temp) = setup_repo().await;
        let seeded = seed_fixture(&repo).await;
        service(&repo).submit(&standard_squad(&seeded)).await.unwrap();

        // An empty mock would fail with MatchNotFound if it were consulted.
        let svc = SquadService::new(
            Arc::new(MockRoster::new()),
            repo.clone(),
            TeamCompositionValidator::default(),
        );
        let err = svc.submit(&standard_squad(&seeded)).await.unwrap_err();
        assert!(matches!(
            err,
            SubmissionError::Composition(CompositionError::DuplicateSubmission { .. })
        ));
    }

    #[tokio::test]
    async fn test_rejected_squad_is_not_persisted() {
        let (repo, _temp) = setup_repo().await;
        let seeded = seed_fixture(&repo).await;
        let mut sub = standard_squad(&seeded);
        sub.captain_id = seeded.team_a[5].id; // bench player

        let err = service(&repo).submit(&sub).await.unwrap_err();
        match err {
            SubmissionError::Composition(e) => assert_eq!(e.kind(), "LeadershipNotInXI"),
            other => panic!("expected composition error, got {other:?}"),
        }
        assert!(!repo
            .squad_exists(seeded.user.id, seeded.fixture.id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_configured_team_cap_applies() {
        let (repo, _temp) = setup_repo().await;
        let seeded = seed_fixture(&repo).await;
        let svc = SquadService::new(
            repo.clone(),
            repo.clone(),
            TeamCompositionValidator::new(CompositionRules::default().with_team_cap(6)),
        );

        let err = svc.submit(&standard_squad(&seeded)).await.unwrap_err();
        match err {
            SubmissionError::Composition(e) => assert_eq!(e.kind(), "TeamCapExceeded"),
            other => panic!("expected composition error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_user_and_match() {
        let (repo, _temp) = setup_repo().await;
        let seeded = seed_fixture(&repo).await;
        let svc = service(&repo);

        let mut sub = standard_squad(&seeded);
        sub.user_id = UserId::new(404);
        assert!(matches!(
            svc.submit(&sub).await.unwrap_err(),
            SubmissionError::UnknownUser(_)
        ));

        let mut sub = standard_squad(&seeded);
        sub.match_id = MatchId::new(404);
        assert!(matches!(
            svc.submit(&sub).await.unwrap_err(),
            SubmissionError::Roster(RosterError::MatchNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_team_name_rejected() {
        let (repo, _temp) = setup_repo().await;
        let seeded = seed_fixture(&repo).await;
        let mut sub = standard_squad(&seeded);
        sub.team_name = "   ".to_string();

        assert!(matches!(
            service(&repo).submit(&sub).await.unwrap_err(),
            SubmissionError::InvalidTeamName
        ));
    }

    #[tokio::test]
    async fn test_validation_runs_against_mock_roster() {
        let (repo, _temp) = setup_repo().await;
        let seeded = seed_fixture(&repo).await;

        // Mock roster that only knows team A: team B players fail to resolve.
        let mock = MockRoster::new()
            .with_match(
                seeded.fixture.id,
                seeded.fixture.team_a_id,
                seeded.fixture.team_b_id,
            )
            .with_players(seeded.team_a.iter().map(|p| RosterPlayer {
                id: p.id,
                role: p.role,
                team_id: p.team_id,
            }));
        let svc = SquadService::new(
            Arc::new(mock),
            repo.clone(),
            TeamCompositionValidator::default(),
        );

        match svc.submit(&standard_squad(&seeded)).await.unwrap_err() {
            SubmissionError::Composition(e) => assert_eq!(e.kind(), "InvalidRoster"),
            other => panic!("expected composition error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_team_name_stored_trimmed() {
        let (repo, _temp) = setup_repo().await;
        let seeded = seed_fixture(&repo).await;
        let mut sub = standard_squad(&seeded);
        sub.team_name = "  Chasers  ".to_string();

        let squad = service(&repo).submit(&sub).await.unwrap();
        assert_eq!(squad.team_name, "Chasers");

        let stored = repo
            .get_squad(seeded.user.id, seeded.fixture.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.team_name, "Chasers");
    }

    #[tokio::test]
    async fn test_selection_sizes_checked_before_roster_lookup() {
        let (repo, _temp) = setup_repo().await;
        let seeded = seed_fixture(&repo).await;
        let mut sub = standard_squad(&seeded);
        sub.playing_eleven.push(seeded.team_b[4].id);

        // An empty mock would fail with MatchNotFound if it were consulted.
        let svc = SquadService::new(
            Arc::new(MockRoster::new()),
            repo.clone(),
            TeamCompositionValidator::default(),
        );
        match svc.submit(&sub).await.unwrap_err() {
            SubmissionError::Composition(CompositionError::InvalidRoster(fault)) => assert_eq!(
                fault,
                RosterFault::WrongPlayingElevenSize {
                    actual: PLAYING_XI_SIZE + 1
                }
            ),
            other => panic!("expected size fault, got {other:?}"),
        }
    }
}
