//! Tournament management API handlers.
//!
//! # Examples
//!
//! Create a tournament and make it current:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/tournaments \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Club Championship"}'
//! ```

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use swiss_tournament::tournament::{TournamentId, TournamentInfo};

use super::error::ApiResult;
use super::request_id::RequestId;
use super::{AppState, logged};
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct CreateTournamentRequest {
    pub name: String,
    /// Defaults to `true`
    #[serde(default = "default_true")]
    pub set_as_current: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct SetCurrentRequest {
    pub id: TournamentId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentResponse {
    pub id: Option<TournamentId>,
}

/// List all tournaments, newest first.
pub async fn list_tournaments(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<Vec<TournamentInfo>> {
    let tournaments = logged(
        &request_id,
        "list_tournaments",
        state.tournament_manager.list_tournaments(),
    )
    .await?;
    Ok(Json(tournaments))
}

/// Create a tournament.
///
/// # Errors
///
/// - `400 Bad Request`: Blank name
pub async fn create_tournament(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<CreateTournamentRequest>,
) -> ApiResult<CreatedResponse> {
    let id = logged(
        &request_id,
        "create_tournament",
        state
            .tournament_manager
            .create_tournament(&request.name, request.set_as_current),
    )
    .await?;
    metrics::tournaments_created_total();
    Ok(Json(CreatedResponse { id }))
}

/// Delete every tournament with its players and matches.
pub async fn delete_tournaments(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<DeletedResponse> {
    let deleted = logged(
        &request_id,
        "delete_tournaments",
        state.tournament_manager.delete_tournaments(),
    )
    .await?;
    Ok(Json(DeletedResponse { deleted }))
}

pub async fn count_tournaments(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<CountResponse> {
    let count = logged(
        &request_id,
        "count_tournaments",
        state.tournament_manager.count_tournaments(),
    )
    .await?;
    Ok(Json(CountResponse { count }))
}

/// Get the current tournament ID (`null` when none is set).
pub async fn get_current(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<CurrentResponse> {
    let id = logged(
        &request_id,
        "current_tournament",
        state.tournament_manager.current_tournament(),
    )
    .await?;
    Ok(Json(CurrentResponse { id }))
}

/// Switch the current tournament.
///
/// # Errors
///
/// - `404 Not Found`: Tournament doesn't exist
pub async fn set_current(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SetCurrentRequest>,
) -> ApiResult<CurrentResponse> {
    logged(
        &request_id,
        "set_current_tournament",
        state.tournament_manager.set_current_tournament(request.id),
    )
    .await?;
    Ok(Json(CurrentResponse {
        id: Some(request.id),
    }))
}

/// Get a single tournament.
///
/// # Errors
///
/// - `404 Not Found`: Tournament doesn't exist
pub async fn get_tournament(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(tournament_id): Path<TournamentId>,
) -> ApiResult<TournamentInfo> {
    let tournament = logged(
        &request_id,
        "get_tournament",
        state.tournament_manager.get_tournament(tournament_id),
    )
    .await?;
    Ok(Json(tournament))
}
