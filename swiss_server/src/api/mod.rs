//! HTTP API for the tournament server.
//!
//! # Modules
//!
//! - [`tournaments`]: Create, list, switch and delete tournaments
//! - [`players`]: Register, list, count and delete players
//! - [`matches`]: Report and delete matches, read standings and pairings
//! - [`request_id`]: Request correlation, access logging and request metrics
//! - [`error`]: Mapping of tournament errors onto HTTP status codes
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use swiss_server::api::{create_router, AppState};
//! use swiss_tournament::{Database, DatabaseConfig, TournamentManager};
//! use std::sync::Arc;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let db = Database::new(&DatabaseConfig::from_env()).await?;
//! let state = AppState {
//!     tournament_manager: Arc::new(TournamentManager::new(Arc::new(db.pool().clone()))),
//!     database: db,
//! };
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod matches;
pub mod players;
pub mod request_id;
pub mod tournaments;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use swiss_tournament::{
    Database, TournamentManager, TournamentResult, db::timeouts::with_default_timeout,
};
use tower_http::cors::CorsLayer;

use crate::logging;
use request_id::RequestId;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub tournament_manager: Arc<TournamentManager>,
    /// Database handle used by the health check
    pub database: Database,
}

/// Await a tournament operation and log it against the request that issued it
pub(crate) async fn logged<F, T>(
    request_id: &RequestId,
    operation: &str,
    future: F,
) -> TournamentResult<T>
where
    F: Future<Output = TournamentResult<T>>,
{
    let started = Instant::now();
    let result = future.await;
    logging::log_database_operation(
        request_id.as_str(),
        operation,
        started.elapsed().as_millis() as u64,
        result.is_ok(),
    );
    result
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Endpoint Summary
///
/// ```text
/// GET    /health                             - Health check
/// GET    /api/v1/tournaments                 - List tournaments
/// POST   /api/v1/tournaments                 - Create tournament
/// DELETE /api/v1/tournaments                 - Delete all tournaments
/// GET    /api/v1/tournaments/count           - Count tournaments
/// GET    /api/v1/tournaments/current         - Current tournament ID
/// PUT    /api/v1/tournaments/current         - Switch current tournament
/// GET    /api/v1/tournaments/{id}            - Tournament details
/// GET    /api/v1/players?scope=current|all   - List players
/// POST   /api/v1/players                     - Register player
/// DELETE /api/v1/players?scope=current|all   - Delete players
/// GET    /api/v1/players/count?scope=...     - Count players
/// POST   /api/v1/matches                     - Report match
/// DELETE /api/v1/matches?scope=current|all   - Delete matches
/// GET    /api/v1/standings                   - Current standings
/// GET    /api/v1/pairings                    - Next-round pairings
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", create_v1_router())
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route(
            "/tournaments",
            get(tournaments::list_tournaments)
                .post(tournaments::create_tournament)
                .delete(tournaments::delete_tournaments),
        )
        .route("/tournaments/count", get(tournaments::count_tournaments))
        .route(
            "/tournaments/current",
            get(tournaments::get_current).put(tournaments::set_current),
        )
        .route("/tournaments/{tournament_id}", get(tournaments::get_tournament))
        .route(
            "/players",
            get(players::list_players)
                .post(players::register_player)
                .delete(players::delete_players),
        )
        .route("/players/count", get(players::count_players))
        .route(
            "/matches",
            axum::routing::post(matches::report_match).delete(matches::delete_matches),
        )
        .route("/standings", get(matches::standings))
        .route("/pairings", get(matches::pairings))
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` if the database answers, `503 Service Unavailable` otherwise.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = with_default_timeout(state.database.health_check())
        .await
        .is_ok();

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
