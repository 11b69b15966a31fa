//! Tournament data models for Swiss-system events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{TournamentError, TournamentResult};

/// Tournament ID type
pub type TournamentId = i64;

/// Player ID type
pub type PlayerId = i64;

/// Match ID type
pub type MatchId = i64;

/// Which tournaments a bulk operation applies to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Only rows belonging to the current tournament
    #[default]
    #[serde(alias = "current")]
    CurrentTournament,
    /// Rows of every tournament
    #[serde(alias = "all")]
    AllTournaments,
}

impl Scope {
    pub fn is_current_only(self) -> bool {
        self == Scope::CurrentTournament
    }
}

/// Tournament summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentInfo {
    /// Tournament ID
    pub id: TournamentId,
    /// Tournament name
    pub name: String,
    /// Whether this is the current tournament
    pub is_current: bool,
    /// Registered players
    pub player_count: i64,
    /// Reported matches
    pub match_count: i64,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
}

/// Registered player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Full name as registered, need not be unique
    pub name: String,
    pub tournament_id: TournamentId,
    pub registered_at: DateTime<Utc>,
}

/// One row of the current tournament's standings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based position; ties are broken by the database view
    pub rank: i64,
    pub id: PlayerId,
    pub name: String,
    /// Matches won
    pub wins: i64,
    /// Matches played
    pub matches: i64,
    /// Matches tied
    pub draws: i64,
}

impl Standing {
    /// Matches lost
    pub fn losses(&self) -> i64 {
        self.matches - self.wins - self.draws
    }
}

/// Player side of a pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedPlayer {
    pub id: PlayerId,
    pub name: String,
}

/// Next-round matchup between two players adjacent in the standings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    /// 1-based board number
    pub pairing: i64,
    pub first: PairedPlayer,
    /// `None` when `first` sits out the round with a bye
    pub second: Option<PairedPlayer>,
}

impl Pairing {
    pub fn is_bye(&self) -> bool {
        self.second.is_none()
    }
}

/// Outcome of a single match, ready to be recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    /// First player; the order of `player_a` and `player_b` does not matter
    pub player_a: PlayerId,
    /// Second player
    pub player_b: PlayerId,
    /// Winning player, or `None` for a tie
    #[serde(default)]
    pub winner: Option<PlayerId>,
    /// Tournament the match belongs to, or `None` for the current tournament
    #[serde(default)]
    pub tournament_id: Option<TournamentId>,
}

impl MatchReport {
    /// Match won by `winner`
    pub fn win(player_a: PlayerId, player_b: PlayerId, winner: PlayerId) -> Self {
        Self {
            player_a,
            player_b,
            winner: Some(winner),
            tournament_id: None,
        }
    }

    /// Tied match
    pub fn tie(player_a: PlayerId, player_b: PlayerId) -> Self {
        Self {
            player_a,
            player_b,
            winner: None,
            tournament_id: None,
        }
    }

    /// Record against a specific tournament instead of the current one
    pub fn in_tournament(mut self, tournament_id: TournamentId) -> Self {
        self.tournament_id = Some(tournament_id);
        self
    }

    pub fn is_tie(&self) -> bool {
        self.winner.is_none()
    }

    /// Reject reports the schema would refuse, before touching the database
    pub fn validate(&self) -> TournamentResult<()> {
        if self.player_a == self.player_b {
            return Err(TournamentError::SamePlayer(self.player_a));
        }

        match self.winner {
            Some(winner) if winner != self.player_a && winner != self.player_b => {
                Err(TournamentError::InvalidWinner {
                    winner,
                    player_a: self.player_a,
                    player_b: self.player_b,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Trimmed, non-empty tournament or player name
pub(crate) fn normalize_name(name: &str) -> TournamentResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(TournamentError::EmptyName)
    } else {
        Ok(trimmed)
    }
}
