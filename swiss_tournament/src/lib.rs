//! # Swiss Tournament
//!
//! Bookkeeping for Swiss-system tournaments backed by PostgreSQL.
//!
//! Players with similar win records are paired each round. The ranking and
//! pairing rules live in the database schema as the `standings` and
//! `next_round_matchups` views; this crate ships that schema as embedded
//! migrations and wraps every operation in a typed, async API.
//!
//! ## Core Modules
//!
//! - [`db`]: Connection pool, configuration, migrations and query timeouts
//! - [`tournament`]: Tournaments, players, matches, standings and pairings

/// Database connection pool, configuration and migrations.
pub mod db;

/// Tournament bookkeeping on top of the database.
pub mod tournament;

pub use db::{Database, DatabaseConfig};
pub use tournament::{
    MatchReport, Pairing, Scope, Standing, TournamentError, TournamentManager, TournamentResult,
};
