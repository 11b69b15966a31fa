//! Tournament error types.

use std::time::Duration;

use thiserror::Error;

use super::models::{PlayerId, TournamentId};
use crate::db::timeouts::TimeoutError;

/// Tournament errors
#[derive(Debug, Error)]
pub enum TournamentError {
    /// Tournament does not exist
    #[error("Tournament not found: {0}")]
    NotFound(TournamentId),

    /// Operation defaults to the current tournament but none is set
    #[error("No current tournament is set")]
    NoCurrentTournament,

    /// Tournament or player name is blank
    #[error("Name must not be empty")]
    EmptyName,

    /// A player cannot be matched against themselves
    #[error("Player {0} cannot play against themselves")]
    SamePlayer(PlayerId),

    /// Winner is neither of the two players
    #[error("Invalid winner {winner} for a match between players {player_a} and {player_b}")]
    InvalidWinner {
        winner: PlayerId,
        player_a: PlayerId,
        player_b: PlayerId,
    },

    /// Player is unknown or registered for a different tournament
    #[error("Player {player} is not registered for tournament {tournament}")]
    PlayerNotInTournament {
        player: PlayerId,
        tournament: TournamentId,
    },

    /// Query did not complete in time
    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<TimeoutError> for TournamentError {
    fn from(err: TimeoutError) -> Self {
        match err {
            TimeoutError::Timeout(duration) => TournamentError::Timeout(duration),
            TimeoutError::Database(e) => TournamentError::Database(e),
        }
    }
}

impl TournamentError {
    /// Whether the caller supplied bad input, as opposed to an infrastructure failure
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            TournamentError::EmptyName
                | TournamentError::SamePlayer(_)
                | TournamentError::InvalidWinner { .. }
                | TournamentError::PlayerNotInTournament { .. }
        )
    }

    /// Get a client-safe error message that doesn't leak database internals
    pub fn client_message(&self) -> String {
        match self {
            TournamentError::Database(_) | TournamentError::Migration(_) => {
                "Internal server error".to_string()
            }
            TournamentError::Timeout(_) => "Database is not responding".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;
