//! Walkthrough of two tournaments sharing one database.
//!
//! Run against a local PostgreSQL instance:
//!
//! ```bash
//! DATABASE_URL=postgres://postgres@localhost/tournament \
//!     RUST_LOG=info cargo run -p swiss_tournament --example basic_usage
//! ```

use std::sync::Arc;

use swiss_tournament::db::{Database, DatabaseConfig};
use swiss_tournament::tournament::{MatchReport, TournamentManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::builder().format_target(false).init();

    let db = Database::new(&DatabaseConfig::from_env()).await?;
    db.migrate().await?;
    let manager = TournamentManager::new(Arc::new(db.pool().clone()));

    // Start from an empty database.
    manager.delete_tournaments().await?;

    // Tournament A is created without becoming current; Tournament B becomes current.
    let tournament_a = manager.create_tournament("Tournament A", false).await?;
    let tournament_b = manager.create_tournament("Tournament B", true).await?;

    // Registered for the current tournament, B.
    let p1 = manager.register_player("Player 1", None).await?;
    let p2 = manager.register_player("Player 2", None).await?;

    // Registered for A explicitly.
    let p3 = manager.register_player("Not Current A", Some(tournament_a)).await?;
    let p4 = manager.register_player("Not Current B", Some(tournament_a)).await?;

    // Switch to A and report a match there, then report one for B without switching back.
    manager.set_current_tournament(tournament_a).await?;
    manager.report_match(MatchReport::win(p3, p4, p3)).await?;
    manager
        .report_match(MatchReport::win(p1, p2, p1).in_tournament(tournament_b))
        .await?;

    // Standings and pairings always describe the current tournament.
    for id in [tournament_a, tournament_b] {
        manager.set_current_tournament(id).await?;
        let info = manager.get_tournament(id).await?;
        println!("== {} ==", info.name);

        for standing in manager.player_standings().await? {
            println!(
                "  #{} {} ({} wins / {} matches)",
                standing.rank, standing.name, standing.wins, standing.matches
            );
        }

        for pairing in manager.swiss_pairings().await? {
            match &pairing.second {
                Some(second) => println!(
                    "  board {}: {} vs {}",
                    pairing.pairing, pairing.first.name, second.name
                ),
                None => println!("  board {}: {} has a bye", pairing.pairing, pairing.first.name),
            }
        }
    }

    db.close().await;
    Ok(())
}
