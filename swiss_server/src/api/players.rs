//! Player registration API handlers.
//!
//! Bulk endpoints take a `scope` query parameter: `current` (default) limits
//! the operation to the current tournament, `all` spans every tournament.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;
use swiss_tournament::tournament::{Player, Scope, TournamentId};

use super::error::ApiResult;
use super::request_id::RequestId;
use super::{AppState, logged};
use super::tournaments::{CountResponse, CreatedResponse, DeletedResponse};
use crate::metrics;

#[derive(Debug, Default, Deserialize)]
pub struct ScopeQuery {
    #[serde(default)]
    pub scope: Scope,
}

#[derive(Debug, Deserialize)]
pub struct RegisterPlayerRequest {
    pub name: String,
    /// Omit to register for the current tournament
    #[serde(default)]
    pub tournament_id: Option<TournamentId>,
}

pub async fn list_players(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<Vec<Player>> {
    let players = logged(
        &request_id,
        "list_players",
        state.tournament_manager.list_players(query.scope),
    )
    .await?;
    Ok(Json(players))
}

/// Register a player.
///
/// # Errors
///
/// - `400 Bad Request`: Blank name
/// - `404 Not Found`: Explicit tournament doesn't exist
/// - `409 Conflict`: No tournament given and no current tournament set
pub async fn register_player(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RegisterPlayerRequest>,
) -> ApiResult<CreatedResponse> {
    let id = logged(
        &request_id,
        "register_player",
        state
            .tournament_manager
            .register_player(&request.name, request.tournament_id),
    )
    .await?;
    metrics::players_registered_total();
    Ok(Json(CreatedResponse { id }))
}

pub async fn count_players(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<CountResponse> {
    let count = logged(
        &request_id,
        "count_players",
        state.tournament_manager.count_players(query.scope),
    )
    .await?;
    Ok(Json(CountResponse { count }))
}

/// Delete players along with their matches.
pub async fn delete_players(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<DeletedResponse> {
    let deleted = logged(
        &request_id,
        "delete_players",
        state.tournament_manager.delete_players(query.scope),
    )
    .await?;
    Ok(Json(DeletedResponse { deleted }))
}
