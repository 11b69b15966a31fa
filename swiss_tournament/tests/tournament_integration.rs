//! Integration tests for tournament bookkeeping against PostgreSQL.
//!
//! These tests need a live database reachable through `DATABASE_URL` and
//! share the global "current tournament" pointer, so they run serially and
//! are ignored by default:
//!
//! ```bash
//! DATABASE_URL=postgres://postgres@localhost/tournament_test \
//!     cargo test -p swiss_tournament -- --ignored
//! ```

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use serial_test::serial;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use swiss_tournament::db::{Database, DatabaseConfig, MIGRATOR};
use swiss_tournament::tournament::{
    MatchReport, Scope, TournamentError, TournamentManager,
};

/// Connect, migrate and wipe all tournaments
async fn setup() -> TournamentManager {
    let db = Database::new(&DatabaseConfig::from_env())
        .await
        .expect("Failed to connect to test database");
    db.migrate().await.expect("Failed to migrate test database");

    let manager = TournamentManager::new(Arc::new(db.pool().clone()));
    manager
        .delete_tournaments()
        .await
        .expect("Failed to reset tournaments");
    manager
}

// ============================================================================
// Tournaments
// ============================================================================

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_create_and_count_tournaments() {
    let manager = setup().await;
    assert_eq!(manager.count_tournaments().await.unwrap(), 0);

    let first = manager.create_tournament("Spring Open", true).await.unwrap();
    let second = manager.create_tournament("Summer Open", false).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(manager.count_tournaments().await.unwrap(), 2);
    assert_eq!(manager.current_tournament().await.unwrap(), Some(first));
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_delete_tournaments_clears_everything() {
    let manager = setup().await;

    let id = manager.create_tournament("Doomed", true).await.unwrap();
    let a = manager.register_player("Alpha", None).await.unwrap();
    let b = manager.register_player("Beta", None).await.unwrap();
    manager
        .report_match(MatchReport::win(a, b, a).in_tournament(id))
        .await
        .unwrap();

    let deleted = manager.delete_tournaments().await.unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(manager.count_tournaments().await.unwrap(), 0);
    assert_eq!(manager.count_players(Scope::AllTournaments).await.unwrap(), 0);
    assert_eq!(manager.current_tournament().await.unwrap(), None);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_blank_tournament_name_rejected() {
    let manager = setup().await;

    let err = manager.create_tournament("   ", true).await.unwrap_err();
    assert!(matches!(err, TournamentError::EmptyName));
    assert_eq!(manager.count_tournaments().await.unwrap(), 0);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_set_current_tournament() {
    let manager = setup().await;

    let a = manager.create_tournament("A", false).await.unwrap();
    let b = manager.create_tournament("B", true).await.unwrap();
    assert_eq!(manager.current_tournament().await.unwrap(), Some(b));

    manager.set_current_tournament(a).await.unwrap();
    assert_eq!(manager.current_tournament().await.unwrap(), Some(a));

    let err = manager.set_current_tournament(b + 1000).await.unwrap_err();
    assert!(matches!(err, TournamentError::NotFound(id) if id == b + 1000));
    assert_eq!(manager.current_tournament().await.unwrap(), Some(a));
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_get_and_list_tournaments() {
    let manager = setup().await;

    let older = manager.create_tournament("Older", false).await.unwrap();
    let newer = manager.create_tournament("Newer", true).await.unwrap();
    manager.register_player("Solo", None).await.unwrap();

    let info = manager.get_tournament(newer).await.unwrap();
    assert_eq!(info.name, "Newer");
    assert!(info.is_current);
    assert_eq!(info.player_count, 1);
    assert_eq!(info.match_count, 0);

    let list = manager.list_tournaments().await.unwrap();
    let ids: Vec<_> = list.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![newer, older]);
    assert!(!list[1].is_current);

    let err = manager.get_tournament(newer + 1000).await.unwrap_err();
    assert!(matches!(err, TournamentError::NotFound(_)));
}

// ============================================================================
// Players
// ============================================================================

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_register_requires_current_tournament() {
    let manager = setup().await;

    let err = manager.register_player("Nobody", None).await.unwrap_err();
    assert!(matches!(err, TournamentError::NoCurrentTournament));

    let err = manager.register_player("Nobody", Some(1)).await.unwrap_err();
    assert!(matches!(err, TournamentError::NotFound(1)));
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_count_current_players_without_current_tournament() {
    let manager = setup().await;
    let other = manager.create_tournament("Unselected", false).await.unwrap();
    manager.register_player("Nissa Revane", Some(other)).await.unwrap();

    assert_eq!(manager.current_tournament().await.unwrap(), None);
    assert_eq!(manager.count_players(Scope::CurrentTournament).await.unwrap(), 0);
    assert_eq!(manager.count_players(Scope::AllTournaments).await.unwrap(), 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_register_and_count_players_by_scope() {
    let manager = setup().await;

    let other = manager.create_tournament("Other", false).await.unwrap();
    let current = manager.create_tournament("Current", true).await.unwrap();

    manager.register_player("Chandra Nalaar", None).await.unwrap();
    manager.register_player("Jace Beleren", None).await.unwrap();
    manager.register_player("Liliana Vess", Some(other)).await.unwrap();

    assert_eq!(manager.count_players(Scope::CurrentTournament).await.unwrap(), 2);
    assert_eq!(manager.count_players(Scope::AllTournaments).await.unwrap(), 3);

    let players = manager.list_players(Scope::CurrentTournament).await.unwrap();
    assert_eq!(players.len(), 2);
    assert!(players.iter().all(|p| p.tournament_id == current));
    assert_eq!(players[0].name, "Chandra Nalaar");
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_duplicate_player_names_allowed() {
    let manager = setup().await;
    manager.create_tournament("Twins", true).await.unwrap();

    let first = manager.register_player("Sam Smith", None).await.unwrap();
    let second = manager.register_player("Sam Smith", None).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(manager.count_players(Scope::CurrentTournament).await.unwrap(), 2);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_delete_players_by_scope() {
    let manager = setup().await;

    let other = manager.create_tournament("Other", false).await.unwrap();
    manager.create_tournament("Current", true).await.unwrap();
    let a = manager.register_player("A", None).await.unwrap();
    let b = manager.register_player("B", None).await.unwrap();
    manager.register_player("C", Some(other)).await.unwrap();
    manager.report_match(MatchReport::win(a, b, a)).await.unwrap();

    let deleted = manager.delete_players(Scope::CurrentTournament).await.unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(manager.count_players(Scope::AllTournaments).await.unwrap(), 1);
    assert!(manager.player_standings().await.unwrap().is_empty());

    manager.delete_players(Scope::AllTournaments).await.unwrap();
    assert_eq!(manager.count_players(Scope::AllTournaments).await.unwrap(), 0);
}

// ============================================================================
// Matches and standings
// ============================================================================

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_standings_before_matches() {
    let manager = setup().await;
    manager.create_tournament("Fresh", true).await.unwrap();

    let melpomene = manager.register_player("Melpomene Murray", None).await.unwrap();
    let randy = manager.register_player("Randy Schwartz", None).await.unwrap();

    let standings = manager.player_standings().await.unwrap();
    assert_eq!(standings.len(), 2);
    assert_eq!(standings[0].id, melpomene);
    assert_eq!(standings[1].id, randy);
    for (i, standing) in standings.iter().enumerate() {
        assert_eq!(standing.rank, i as i64 + 1);
        assert_eq!(standing.wins, 0);
        assert_eq!(standing.matches, 0);
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_report_matches_updates_standings() {
    let manager = setup().await;
    manager.create_tournament("Reported", true).await.unwrap();

    let bruno = manager.register_player("Bruno Walton", None).await.unwrap();
    let boots = manager.register_player("Boots O'Neal", None).await.unwrap();
    let cathy = manager.register_player("Cathy Burton", None).await.unwrap();
    let diane = manager.register_player("Diane Grant", None).await.unwrap();

    manager.report_match(MatchReport::win(bruno, boots, bruno)).await.unwrap();
    manager.report_match(MatchReport::win(cathy, diane, cathy)).await.unwrap();

    let standings = manager.player_standings().await.unwrap();
    let leaders: Vec<_> = standings[..2].iter().map(|s| s.id).collect();
    assert_eq!(leaders, vec![bruno, cathy]);

    for standing in &standings {
        assert_eq!(standing.matches, 1);
        let expected_wins = if standing.id == bruno || standing.id == cathy { 1 } else { 0 };
        assert_eq!(standing.wins, expected_wins);
        assert_eq!(standing.losses(), 1 - expected_wins);
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_tie_counts_as_draw() {
    let manager = setup().await;
    manager.create_tournament("Drawn", true).await.unwrap();

    let a = manager.register_player("A", None).await.unwrap();
    let b = manager.register_player("B", None).await.unwrap();
    manager.report_match(MatchReport::tie(a, b)).await.unwrap();

    for standing in manager.player_standings().await.unwrap() {
        assert_eq!(standing.matches, 1);
        assert_eq!(standing.wins, 0);
        assert_eq!(standing.draws, 1);
        assert_eq!(standing.losses(), 0);
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_invalid_reports_record_nothing() {
    let manager = setup().await;
    let other = manager.create_tournament("Elsewhere", false).await.unwrap();
    manager.create_tournament("Here", true).await.unwrap();

    let a = manager.register_player("A", None).await.unwrap();
    let b = manager.register_player("B", None).await.unwrap();
    let outsider = manager.register_player("Outsider", Some(other)).await.unwrap();

    let err = manager
        .report_match(MatchReport::win(a, b, outsider))
        .await
        .unwrap_err();
    assert!(matches!(err, TournamentError::InvalidWinner { .. }));

    let err = manager.report_match(MatchReport::tie(a, a)).await.unwrap_err();
    assert!(matches!(err, TournamentError::SamePlayer(_)));

    let err = manager
        .report_match(MatchReport::win(a, outsider, a))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TournamentError::PlayerNotInTournament { player, .. } if player == outsider
    ));

    assert!(
        manager
            .player_standings()
            .await
            .unwrap()
            .iter()
            .all(|s| s.matches == 0)
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_report_requires_current_tournament() {
    let manager = setup().await;
    let other = manager.create_tournament("Unselected", false).await.unwrap();
    let a = manager.register_player("A", Some(other)).await.unwrap();
    let b = manager.register_player("B", Some(other)).await.unwrap();

    let err = manager.report_match(MatchReport::win(a, b, a)).await.unwrap_err();
    assert!(matches!(err, TournamentError::NoCurrentTournament));

    // The same match is accepted once the tournament is named explicitly
    manager
        .report_match(MatchReport::win(a, b, a).in_tournament(other))
        .await
        .unwrap();
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_report_in_unknown_tournament() {
    let manager = setup().await;
    let current = manager.create_tournament("Here", true).await.unwrap();
    let a = manager.register_player("A", None).await.unwrap();
    let b = manager.register_player("B", None).await.unwrap();

    let unknown = current + 1000;
    let err = manager
        .report_match(MatchReport::tie(a, b).in_tournament(unknown))
        .await
        .unwrap_err();
    assert!(matches!(err, TournamentError::NotFound(id) if id == unknown));
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_report_after_players_removed() {
    let manager = setup().await;
    manager.create_tournament("Here", true).await.unwrap();
    let a = manager.register_player("A", None).await.unwrap();
    let b = manager.register_player("B", None).await.unwrap();

    manager.delete_players(Scope::CurrentTournament).await.unwrap();

    let err = manager.report_match(MatchReport::win(a, b, b)).await.unwrap_err();
    assert!(matches!(
        err,
        TournamentError::PlayerNotInTournament { player, .. } if player == a
    ));
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_delete_matches_by_scope() {
    let manager = setup().await;
    let other = manager.create_tournament("Other", true).await.unwrap();
    let x = manager.register_player("X", None).await.unwrap();
    let y = manager.register_player("Y", None).await.unwrap();
    manager.report_match(MatchReport::win(x, y, y)).await.unwrap();

    manager.create_tournament("Current", true).await.unwrap();
    let a = manager.register_player("A", None).await.unwrap();
    let b = manager.register_player("B", None).await.unwrap();
    manager.report_match(MatchReport::win(a, b, a)).await.unwrap();

    assert_eq!(manager.delete_matches(Scope::CurrentTournament).await.unwrap(), 1);
    assert_eq!(manager.get_tournament(other).await.unwrap().match_count, 1);

    assert_eq!(manager.delete_matches(Scope::AllTournaments).await.unwrap(), 1);
    assert_eq!(manager.get_tournament(other).await.unwrap().match_count, 0);
    assert_eq!(manager.count_players(Scope::AllTournaments).await.unwrap(), 4);
}

// ============================================================================
// Pairings
// ============================================================================

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_pairings_follow_standings() {
    let manager = setup().await;
    manager.create_tournament("Paired", true).await.unwrap();

    let twilight = manager.register_player("Twilight Sparkle", None).await.unwrap();
    let fluttershy = manager.register_player("Fluttershy", None).await.unwrap();
    let applejack = manager.register_player("Applejack", None).await.unwrap();
    let pinkie = manager.register_player("Pinkie Pie", None).await.unwrap();

    manager
        .report_match(MatchReport::win(twilight, fluttershy, twilight))
        .await
        .unwrap();
    manager
        .report_match(MatchReport::win(applejack, pinkie, applejack))
        .await
        .unwrap();

    let pairings = manager.swiss_pairings().await.unwrap();
    assert_eq!(pairings.len(), 2);

    let pairs: Vec<_> = pairings
        .iter()
        .map(|p| (p.first.id, p.second.as_ref().map(|s| s.id)))
        .collect();
    assert_eq!(
        pairs,
        vec![(twilight, Some(applejack)), (fluttershy, Some(pinkie))]
    );
    assert_eq!(pairings[0].pairing, 1);
    assert_eq!(pairings[1].pairing, 2);
    assert_eq!(pairings[0].first.name, "Twilight Sparkle");
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_odd_field_gets_bye() {
    let manager = setup().await;
    manager.create_tournament("Odd", true).await.unwrap();

    manager.register_player("One", None).await.unwrap();
    manager.register_player("Two", None).await.unwrap();
    let three = manager.register_player("Three", None).await.unwrap();

    let pairings = manager.swiss_pairings().await.unwrap();
    assert_eq!(pairings.len(), 2);
    assert!(!pairings[0].is_bye());
    assert!(pairings[1].is_bye());
    assert_eq!(pairings[1].first.id, three);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_views_only_see_current_tournament() {
    let manager = setup().await;

    let tournament_a = manager.create_tournament("Tournament A", false).await.unwrap();
    let tournament_b = manager.create_tournament("Tournament B", true).await.unwrap();

    let p1 = manager.register_player("Player 1", None).await.unwrap();
    let p2 = manager.register_player("Player 2", None).await.unwrap();
    let p3 = manager.register_player("Not Current A", Some(tournament_a)).await.unwrap();
    let p4 = manager.register_player("Not Current B", Some(tournament_a)).await.unwrap();

    manager.set_current_tournament(tournament_a).await.unwrap();
    manager.report_match(MatchReport::win(p3, p4, p3)).await.unwrap();
    manager
        .report_match(MatchReport::win(p1, p2, p1).in_tournament(tournament_b))
        .await
        .unwrap();

    let standings = manager.player_standings().await.unwrap();
    let ids: Vec<_> = standings.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![p3, p4]);

    manager.set_current_tournament(tournament_b).await.unwrap();
    let pairings = manager.swiss_pairings().await.unwrap();
    assert_eq!(pairings.len(), 1);
    assert_eq!(pairings[0].first.id, p1);
    assert_eq!(pairings[0].second.as_ref().map(|s| s.id), Some(p2));
}

// ============================================================================
// Timestamps
// ============================================================================

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_timestamps_are_utc_regardless_of_session_time_zone() {
    let config = DatabaseConfig::from_env();
    let options = PgConnectOptions::from_str(&config.database_url)
        .expect("Invalid DATABASE_URL")
        .options([("timezone", "Pacific/Chatham")]);
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect_with(options)
        .await
        .expect("Failed to connect to test database");
    MIGRATOR.run(&pool).await.expect("Failed to migrate test database");

    let manager = TournamentManager::new(Arc::new(pool));
    manager.delete_tournaments().await.unwrap();

    let before = Utc::now();
    let id = manager.create_tournament("Chatham Cup", true).await.unwrap();
    manager.register_player("Islander", None).await.unwrap();
    let after = Utc::now();

    let slack = chrono::Duration::seconds(30);
    let created_at = manager.get_tournament(id).await.unwrap().created_at;
    assert!(created_at >= before - slack && created_at <= after + slack);

    let registered_at = manager.list_players(Scope::CurrentTournament).await.unwrap()[0]
        .registered_at;
    assert!(registered_at >= before - slack && registered_at <= after + slack);
}
