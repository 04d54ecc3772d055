use crate::domain::InvalidStatistics;
use crate::engine::{CompositionError, ParticipationError};
use crate::orchestration::{RecordingError, SubmissionError};
use crate::roster::RosterError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Not found: {0}")]
    NotFound(String),
    /// The request was understood but breaks a rule.
    #[error("{message}")]
    BadRequest { kind: &'static str, message: String },
    /// The request carries values that cannot be accepted as data.
    #[error("{message}")]
    Unprocessable { kind: &'static str, message: String },
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Unprocessable {
            kind: "ValidationFailed",
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Internal(_) => "Internal",
            AppError::NotFound(_) => "NotFound",
            AppError::BadRequest { kind, .. } | AppError::Unprocessable { kind, .. } => *kind,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_foreign_key_violation() {
                return AppError::BadRequest {
                    kind: "InvalidReference",
                    message: "A referenced record does not exist.".to_string(),
                };
            }
            if db_err.is_unique_violation() {
                return AppError::BadRequest {
                    kind: "AlreadyExists",
                    message: "A record with these values already exists.".to_string(),
                };
            }
        }
        AppError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::BadRequest {
            kind: "MalformedRequest",
            message: err.body_text(),
        }
    }
}

impl From<CompositionError> for AppError {
    fn from(err: CompositionError) -> Self {
        AppError::BadRequest {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<InvalidStatistics> for AppError {
    fn from(err: InvalidStatistics) -> Self {
        AppError::Unprocessable {
            kind: "InvalidStatistics",
            message: err.to_string(),
        }
    }
}

impl From<ParticipationError> for AppError {
    fn from(err: ParticipationError) -> Self {
        let kind = match err {
            ParticipationError::PlayerNotInMatch { .. } => "PlayerNotInMatch",
            ParticipationError::UnknownPlayer(_) => "UnknownPlayer",
            ParticipationError::BenchFull => "BenchFull",
        };
        AppError::BadRequest {
            kind,
            message: err.to_string(),
        }
    }
}

impl From<RosterError> for AppError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::MatchNotFound(_) => AppError::NotFound(err.to_string()),
            RosterError::Db(e) => e.into(),
        }
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Composition(e) => e.into(),
            SubmissionError::InvalidTeamName | SubmissionError::UnknownUser(_) => {
                AppError::Unprocessable {
                    kind: "ValidationFailed",
                    message: err.to_string(),
                }
            }
            SubmissionError::Roster(e) => e.into(),
            SubmissionError::Db(e) => e.into(),
        }
    }
}

impl From<RecordingError> for AppError {
    fn from(err: RecordingError) -> Self {
        match err {
            RecordingError::InvalidStatistics { .. } => AppError::Unprocessable {
                kind: "InvalidStatistics",
                message: err.to_string(),
            },
            RecordingError::UnknownParticipation(_) => AppError::Unprocessable {
                kind: "UnknownParticipation",
                message: err.to_string(),
            },
            RecordingError::Db(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), "{}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}
