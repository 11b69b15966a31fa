//! Match reporting, standings and pairings API handlers.
//!
//! # Examples
//!
//! Report a win:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/matches \
//!   -H "Content-Type: application/json" \
//!   -d '{"player_a": 1, "player_b": 2, "winner": 1}'
//! ```
//!
//! Report a tie by omitting `winner`:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/matches \
//!   -H "Content-Type: application/json" \
//!   -d '{"player_a": 3, "player_b": 4}'
//! ```

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use swiss_tournament::tournament::{MatchReport, Pairing, Standing};

use super::error::ApiResult;
use super::request_id::RequestId;
use super::{AppState, logged};
use super::players::ScopeQuery;
use super::tournaments::{CreatedResponse, DeletedResponse};
use crate::metrics;

/// Record a match outcome.
///
/// # Errors
///
/// - `400 Bad Request`: Same player twice, winner not in the match, or a
///   player outside the target tournament
/// - `404 Not Found`: Explicit tournament doesn't exist
/// - `409 Conflict`: No tournament given and no current tournament set
pub async fn report_match(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(report): Json<MatchReport>,
) -> ApiResult<CreatedResponse> {
    let id = logged(
        &request_id,
        "report_match",
        state.tournament_manager.report_match(report),
    )
    .await?;
    metrics::matches_reported_total(report.is_tie());
    Ok(Json(CreatedResponse { id }))
}

pub async fn delete_matches(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<DeletedResponse> {
    let deleted = logged(
        &request_id,
        "delete_matches",
        state.tournament_manager.delete_matches(query.scope),
    )
    .await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// Standings of the current tournament, first place first.
pub async fn standings(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<Vec<Standing>> {
    let standings = logged(
        &request_id,
        "player_standings",
        state.tournament_manager.player_standings(),
    )
    .await?;
    Ok(Json(standings))
}

/// Next-round pairings of the current tournament.
pub async fn pairings(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<Vec<Pairing>> {
    let pairings = logged(
        &request_id,
        "swiss_pairings",
        state.tournament_manager.swiss_pairings(),
    )
    .await?;
    Ok(Json(pairings))
}
