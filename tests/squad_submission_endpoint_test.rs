use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use cricket_fantasy::api::{self, AppState};
use cricket_fantasy::config::Config;
use cricket_fantasy::db::init_db;
use cricket_fantasy::domain::{MatchDraft, Player, Role, UserRole};
use cricket_fantasy::Repository;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

struct TestApp {
    app: axum::Router,
    user_id: i64,
    match_id: i64,
    team_a: Vec<Player>,
    team_b: Vec<Player>,
    _temp: TempDir,
}

async fn setup_test_app(team_cap: usize) -> TestApp {
    use Role::*;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));

    let user = repo
        .insert_user("Priya", "priya@example.com", UserRole::User)
        .await
        .unwrap();
    let league = repo.insert_league("Premier", None, user.id).await.unwrap();
    let a = repo.insert_team("Lions", league.id).await.unwrap();
    let b = repo.insert_team("Tigers", league.id).await.unwrap();

    let roles_a = [WicketKeeper, Batter, Batter, AllRounder, Bowler, Batter, Bowler];
    let roles_b = [Batter, Batter, AllRounder, AllRounder, Bowler, WicketKeeper, Bowler];
    let mut team_a = Vec::new();
    for (i, role) in roles_a.into_iter().enumerate() {
        team_a.push(repo.insert_player(&format!("A{}", i), role, a.id).await.unwrap());
    }
    let mut team_b = Vec::new();
    for (i, role) in roles_b.into_iter().enumerate() {
        team_b.push(repo.insert_player(&format!("B{}", i), role, b.id).await.unwrap());
    }

    let fixture = repo
        .insert_match(&MatchDraft {
            league_id: league.id,
            team_a_id: a.id,
            team_b_id: b.id,
            match_date: Utc.with_ymd_and_hms(2025, 11, 20, 14, 0, 0).unwrap(),
            venue: None,
        })
        .await
        .unwrap();

    let config = Config {
        port: 0,
        database_path: db_path,
        squad_team_cap: team_cap,
    };

    TestApp {
        app: api::create_router(AppState::new(repo, config)),
        user_id: user.id.as_i64(),
        match_id: fixture.id.as_i64(),
        team_a,
        team_b,
        _temp: temp_dir,
    }
}

fn ids(players: &[&Player]) -> Vec<i64> {
    players.iter().map(|p| p.id.as_i64()).collect()
}

/// A squad that satisfies every rule: 7 + 7 split, 2 WK, 5 BAT, 3 ALL, 4 BOWL.
fn valid_squad(t: &TestApp) -> Value {
    let (a, b) = (&t.team_a, &t.team_b);
    json!({
        "userId": t.user_id,
        "matchId": t.match_id,
        "teamName": "Night Owls",
        "playingEleven": ids(&[&a[0], &a[1], &a[2], &a[3], &a[4], &a[6], &b[0], &b[1], &b[2], &b[3], &b[6]]),
        "bench": ids(&[&a[5], &b[4], &b[5]]),
        "captainId": a[1].id.as_i64(),
        "viceCaptainId": b[2].id.as_i64(),
    })
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = axum::http::Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_valid_squad_is_created_with_zero_points() {
    let t = setup_test_app(7).await;

    let (status, body) = send(&t.app, "POST", "/v1/fantasy-teams", Some(valid_squad(&t))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["teamName"], "Night Owls");
    assert_eq!(body["totalPoints"], 0);

    let members = body["members"].as_array().unwrap();
    assert_eq!(members.len(), 14);
    assert_eq!(members.iter().filter(|m| m["isBench"] == true).count(), 3);
    assert_eq!(members.iter().filter(|m| m["isCaptain"] == true).count(), 1);
    assert!(members.iter().all(|m| m["points"] == 0));

    let uri = format!("/v1/fantasy-teams/{}/{}", t.user_id, t.match_id);
    let (status, fetched) = send(&t.app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], body["id"]);
    assert_eq!(fetched["members"].as_array().unwrap().len(), 14);

    let uri = format!("/v1/fantasy-teams?matchId={}", t.match_id);
    let (_, listed) = send(&t.app, "GET", &uri, None).await;
    assert_eq!(listed["fantasyTeams"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_second_submission_is_rejected_as_duplicate() {
    let t = setup_test_app(7).await;

    let (status, _) = send(&t.app, "POST", "/v1/fantasy-teams", Some(valid_squad(&t))).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut again = valid_squad(&t);
    again["teamName"] = json!("Second Try");
    let (status, body) = send(&t.app, "POST", "/v1/fantasy-teams", Some(again)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "DuplicateSubmission");
}

#[tokio::test]
async fn test_rule_violations_report_their_kind() {
    let t = setup_test_app(7).await;
    let (a, b) = (&t.team_a, &t.team_b);

    // Bench player as captain.
    let mut squad = valid_squad(&t);
    squad["captainId"] = json!(a[5].id.as_i64());
    let (status, body) = send(&t.app, "POST", "/v1/fantasy-teams", Some(squad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "LeadershipNotInXI");

    // Captain doubles as vice-captain.
    let mut squad = valid_squad(&t);
    squad["viceCaptainId"] = json!(a[1].id.as_i64());
    let (_, body) = send(&t.app, "POST", "/v1/fantasy-teams", Some(squad)).await;
    assert_eq!(body["kind"], "LeadershipConflict");

    // Same player on the XI and the bench.
    let mut squad = valid_squad(&t);
    squad["bench"] = json!(ids(&[&a[0], &b[4], &b[5]]));
    let (_, body) = send(&t.app, "POST", "/v1/fantasy-teams", Some(squad)).await;
    assert_eq!(body["kind"], "InvalidRoster");

    // Ten players in the XI.
    let mut squad = valid_squad(&t);
    squad["playingEleven"] =
        json!(ids(&[&a[0], &a[1], &a[2], &a[3], &a[4], &a[6], &b[0], &b[1], &b[2], &b[3]]));
    let (_, body) = send(&t.app, "POST", "/v1/fantasy-teams", Some(squad)).await;
    assert_eq!(body["kind"], "InvalidRoster");

    // Both wicket keepers benched leaves the XI without one.
    let mut squad = valid_squad(&t);
    squad["playingEleven"] =
        json!(ids(&[&a[5], &a[1], &a[2], &a[3], &a[4], &a[6], &b[0], &b[1], &b[2], &b[3], &b[6]]));
    squad["bench"] = json!(ids(&[&a[0], &b[4], &b[5]]));
    let (_, body) = send(&t.app, "POST", "/v1/fantasy-teams", Some(squad)).await;
    assert_eq!(body["kind"], "XiRoleBoundsViolated");

    // Nothing was stored for any of the rejected attempts.
    let uri = format!("/v1/fantasy-teams/{}/{}", t.user_id, t.match_id);
    let (status, _) = send(&t.app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A corrected resubmission is accepted.
    let (status, _) = send(&t.app, "POST", "/v1/fantasy-teams", Some(valid_squad(&t))).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_configured_team_cap_is_enforced() {
    let t = setup_test_app(6).await;

    let (status, body) = send(&t.app, "POST", "/v1/fantasy-teams", Some(valid_squad(&t))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "TeamCapExceeded");
}

#[tokio::test]
async fn test_unknown_match_and_user() {
    let t = setup_test_app(7).await;

    let mut squad = valid_squad(&t);
    squad["matchId"] = json!(999);
    let (status, _) = send(&t.app, "POST", "/v1/fantasy-teams", Some(squad)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut squad = valid_squad(&t);
    squad["userId"] = json!(999);
    let (status, body) = send(&t.app, "POST", "/v1/fantasy-teams", Some(squad)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "ValidationFailed");
}
