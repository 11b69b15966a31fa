//! Mapping of tournament errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use swiss_tournament::TournamentError;

/// JSON error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler error wrapping a [`TournamentError`]
#[derive(Debug)]
pub struct ApiError(pub TournamentError);

impl From<TournamentError> for ApiError {
    fn from(err: TournamentError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            TournamentError::NotFound(_) => StatusCode::NOT_FOUND,
            TournamentError::NoCurrentTournament => StatusCode::CONFLICT,
            TournamentError::EmptyName
            | TournamentError::SamePlayer(_)
            | TournamentError::InvalidWinner { .. }
            | TournamentError::PlayerNotInTournament { .. } => StatusCode::BAD_REQUEST,
            TournamentError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            TournamentError::Database(_) | TournamentError::Migration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Tournament operation failed");
        }

        let body = ErrorResponse {
            error: self.0.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<Json<T>, ApiError>;
