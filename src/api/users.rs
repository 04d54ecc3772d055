use axum::extract::{rejection::JsonRejection, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{require_name, AppState};
use crate::domain::{User, UserRole};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<UserRole>,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let Json(req) = payload?;
    let name = require_name("name", &req.name, 255)?;

    let email = req.email.trim();
    if !is_plausible_email(email) {
        return Err(AppError::validation("The email must be a valid email address."));
    }

    let user = state
        .repo
        .insert_user(&name, email, req.role.unwrap_or(UserRole::User))
        .await?;
    tracing::info!(user_id = %user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, AppError> {
    let users = state.repo.list_users().await?;
    Ok(Json(UsersResponse { users }))
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
