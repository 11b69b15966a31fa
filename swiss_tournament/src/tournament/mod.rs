//! Swiss-system tournament bookkeeping.
//!
//! This module provides:
//! - Tournament creation and the "current tournament" pointer
//! - Player registration
//! - Match reporting, including ties
//! - Standings and next-round pairings read from the database views
//!
//! ## Example
//!
//! ```no_run
//! use swiss_tournament::db::Database;
//! use swiss_tournament::tournament::{MatchReport, TournamentManager};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     db.migrate().await?;
//!     let manager = TournamentManager::new(Arc::new(db.pool().clone()));
//!
//!     manager.create_tournament("Club Championship", true).await?;
//!     let anand = manager.register_player("Viswanathan Anand", None).await?;
//!     let kramnik = manager.register_player("Vladimir Kramnik", None).await?;
//!
//!     manager.report_match(MatchReport::win(anand, kramnik, anand)).await?;
//!
//!     for pairing in manager.swiss_pairings().await? {
//!         println!("{pairing:?}");
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{TournamentError, TournamentResult};
pub use manager::TournamentManager;
pub use models::{
    MatchId, MatchReport, PairedPlayer, Pairing, Player, PlayerId, Scope, Standing, TournamentId,
    TournamentInfo,
};
