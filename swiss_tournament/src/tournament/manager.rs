//! Tournament manager issuing the statements behind every tournament operation.
//!
//! Standings order and next-round pairings are read from the `standings` and
//! `next_round_matchups` views; nothing here ranks or pairs players itself.

use super::errors::{TournamentError, TournamentResult};
use super::models::{
    MatchId, MatchReport, PairedPlayer, Pairing, Player, PlayerId, Scope, Standing,
    TournamentId, TournamentInfo, normalize_name,
};
use crate::db::timeouts::{with_default_timeout, with_long_timeout};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::sync::Arc;

const TOURNAMENT_COLUMNS: &str = r#"
    SELECT t.id, t.name, t.created_at,
           COALESCE(t.id = get_current_tournament_id(), FALSE) AS is_current,
           (SELECT count(*) FROM players p WHERE p.tournament = t.id) AS player_count,
           (SELECT count(*) FROM matches m WHERE m.tournament = t.id) AS match_count
    FROM tournaments t
"#;

/// Tournament manager
#[derive(Clone)]
pub struct TournamentManager {
    pool: Arc<PgPool>,
}

impl TournamentManager {
    /// Create a new tournament manager
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Delete every tournament along with all players and matches
    ///
    /// Runs in a single transaction so no orphaned players or matches survive.
    /// Returns the number of tournaments removed.
    pub async fn delete_tournaments(&self) -> TournamentResult<u64> {
        let deleted = with_long_timeout(async {
            let mut tx = self.pool.begin().await?;
            sqlx::query("DELETE FROM matches").execute(&mut *tx).await?;
            sqlx::query("DELETE FROM players").execute(&mut *tx).await?;
            sqlx::query("DELETE FROM current_tournament")
                .execute(&mut *tx)
                .await?;
            let result = sqlx::query("DELETE FROM tournaments")
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            Ok::<_, sqlx::Error>(result.rows_affected())
        })
        .await?;

        log::info!("Deleted all tournaments ({deleted} removed)");
        Ok(deleted)
    }

    /// Create a new tournament, optionally making it the current one
    pub async fn create_tournament(
        &self,
        name: &str,
        set_as_current: bool,
    ) -> TournamentResult<TournamentId> {
        let name = normalize_name(name)?;

        let id = with_default_timeout(async {
            let mut tx = self.pool.begin().await?;
            let id: TournamentId =
                sqlx::query("INSERT INTO tournaments (name) VALUES ($1) RETURNING id")
                    .bind(name)
                    .fetch_one(&mut *tx)
                    .await?
                    .get("id");

            if set_as_current {
                sqlx::query("SELECT set_current_tournament_id($1)")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
            }

            tx.commit().await?;
            Ok::<_, sqlx::Error>(id)
        })
        .await?;

        log::info!(
            "Created tournament '{name}' (#{id}){}",
            if set_as_current { " as current" } else { "" }
        );
        Ok(id)
    }

    /// Make `tournament_id` the tournament that defaults and views refer to
    pub async fn set_current_tournament(&self, tournament_id: TournamentId) -> TournamentResult<()> {
        let row = with_default_timeout(
            sqlx::query("SELECT set_current_tournament_id(id) FROM tournaments WHERE id = $1")
                .bind(tournament_id)
                .fetch_optional(self.pool.as_ref()),
        )
        .await?;

        if row.is_none() {
            return Err(TournamentError::NotFound(tournament_id));
        }

        log::info!("Set the current tournament to #{tournament_id}");
        Ok(())
    }

    /// ID of the current tournament, if one is set
    pub async fn current_tournament(&self) -> TournamentResult<Option<TournamentId>> {
        let row = with_default_timeout(
            sqlx::query("SELECT get_current_tournament_id() AS id").fetch_one(self.pool.as_ref()),
        )
        .await?;

        Ok(row.get("id"))
    }

    /// Number of tournaments
    pub async fn count_tournaments(&self) -> TournamentResult<i64> {
        let row = with_default_timeout(
            sqlx::query("SELECT count(*) AS count FROM tournaments").fetch_one(self.pool.as_ref()),
        )
        .await?;

        let count: i64 = row.get("count");
        log::debug!("Found {count} tournaments");
        Ok(count)
    }

    /// Get tournament information
    pub async fn get_tournament(&self, tournament_id: TournamentId) -> TournamentResult<TournamentInfo> {
        let sql = format!("{TOURNAMENT_COLUMNS} WHERE t.id = $1");
        let row = with_default_timeout(
            sqlx::query(&sql)
                .bind(tournament_id)
                .fetch_optional(self.pool.as_ref()),
        )
        .await?
        .ok_or(TournamentError::NotFound(tournament_id))?;

        Ok(tournament_from_row(&row))
    }

    /// List all tournaments, newest first
    pub async fn list_tournaments(&self) -> TournamentResult<Vec<TournamentInfo>> {
        let sql = format!("{TOURNAMENT_COLUMNS} ORDER BY t.created_at DESC, t.id DESC");
        let rows = with_default_timeout(sqlx::query(&sql).fetch_all(self.pool.as_ref())).await?;

        Ok(rows.iter().map(tournament_from_row).collect())
    }

    /// Remove match records; deleting players is not required
    pub async fn delete_matches(&self, scope: Scope) -> TournamentResult<u64> {
        let sql = if scope.is_current_only() {
            "DELETE FROM matches WHERE tournament = get_current_tournament_id()"
        } else {
            "DELETE FROM matches"
        };

        let result = with_default_timeout(sqlx::query(sql).execute(self.pool.as_ref())).await?;
        log::info!("Deleted {} matches ({scope:?})", result.rows_affected());
        Ok(result.rows_affected())
    }

    /// Remove player records; their matches are removed with them
    pub async fn delete_players(&self, scope: Scope) -> TournamentResult<u64> {
        let sql = if scope.is_current_only() {
            "DELETE FROM players WHERE tournament = get_current_tournament_id()"
        } else {
            "DELETE FROM players"
        };

        let result = with_default_timeout(sqlx::query(sql).execute(self.pool.as_ref())).await?;
        log::info!("Deleted {} players ({scope:?})", result.rows_affected());
        Ok(result.rows_affected())
    }

    /// Number of registered players
    ///
    /// With [`Scope::CurrentTournament`] and no current tournament this is 0.
    pub async fn count_players(&self, scope: Scope) -> TournamentResult<i64> {
        let sql = if scope.is_current_only() {
            "SELECT count(*) AS count FROM players WHERE tournament = get_current_tournament_id()"
        } else {
            "SELECT count(*) AS count FROM players"
        };

        let row = with_default_timeout(sqlx::query(sql).fetch_one(self.pool.as_ref())).await?;
        let count: i64 = row.get("count");
        log::debug!("Found {count} players ({scope:?})");
        Ok(count)
    }

    /// Register a player
    ///
    /// The database assigns the player's ID. `tournament` of `None` registers
    /// the player for the current tournament.
    pub async fn register_player(
        &self,
        name: &str,
        tournament: Option<TournamentId>,
    ) -> TournamentResult<PlayerId> {
        let name = normalize_name(name)?;
        let tournament_id = self.resolve_tournament(tournament).await?;

        let row = with_default_timeout(
            sqlx::query("INSERT INTO players (name, tournament) VALUES ($1, $2) RETURNING id")
                .bind(name)
                .bind(tournament_id)
                .fetch_one(self.pool.as_ref()),
        )
        .await?;

        let id: PlayerId = row.get("id");
        log::info!("'{name}' was added as player {id} in tournament #{tournament_id}");
        Ok(id)
    }

    /// List registered players in registration order
    pub async fn list_players(&self, scope: Scope) -> TournamentResult<Vec<Player>> {
        let sql = if scope.is_current_only() {
            "SELECT id, name, tournament, registered_at FROM players
             WHERE tournament = get_current_tournament_id() ORDER BY id"
        } else {
            "SELECT id, name, tournament, registered_at FROM players ORDER BY id"
        };

        let rows = with_default_timeout(sqlx::query(sql).fetch_all(self.pool.as_ref())).await?;

        Ok(rows
            .into_iter()
            .map(|row| Player {
                id: row.get("id"),
                name: row.get("name"),
                tournament_id: row.get("tournament"),
                registered_at: row.get("registered_at"),
            })
            .collect())
    }

    /// Players of the current tournament with their win records, first place first
    pub async fn player_standings(&self) -> TournamentResult<Vec<Standing>> {
        let rows = with_default_timeout(
            sqlx::query(
                "SELECT id, name, matches, wins, draws, rank FROM standings ORDER BY rank",
            )
            .fetch_all(self.pool.as_ref()),
        )
        .await?;

        let standings: Vec<Standing> = rows
            .into_iter()
            .map(|row| Standing {
                rank: row.get("rank"),
                id: row.get("id"),
                name: row.get("name"),
                wins: row.get("wins"),
                matches: row.get("matches"),
                draws: row.get("draws"),
            })
            .collect();

        log::debug!("Standings: {standings:?}");
        Ok(standings)
    }

    /// Record the outcome of a single match
    pub async fn report_match(&self, report: MatchReport) -> TournamentResult<MatchId> {
        if let Err(e) = report.validate() {
            log::warn!("Rejected match report: {e}");
            return Err(e);
        }

        let tournament_id = self.resolve_tournament(report.tournament_id).await?;

        let outcome = with_default_timeout(async {
            let mut tx = self.pool.begin().await?;

            // Lock both players until the match row is in
            let registered: Vec<PlayerId> = sqlx::query_scalar(
                "SELECT id FROM players WHERE tournament = $1 AND id = ANY($2) FOR SHARE",
            )
            .bind(tournament_id)
            .bind(vec![report.player_a, report.player_b])
            .fetch_all(&mut *tx)
            .await?;

            if let Some(player) = [report.player_a, report.player_b]
                .into_iter()
                .find(|player| !registered.contains(player))
            {
                return Ok::<_, sqlx::Error>(Err(player));
            }

            let id: MatchId = sqlx::query(
                "INSERT INTO matches (tournament, player_a, player_b, winner)
                 VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .bind(tournament_id)
            .bind(report.player_a)
            .bind(report.player_b)
            .bind(report.winner)
            .fetch_one(&mut *tx)
            .await?
            .get("id");

            tx.commit().await?;
            Ok(Ok(id))
        })
        .await?;

        let id = outcome.map_err(|player| TournamentError::PlayerNotInTournament {
            player,
            tournament: tournament_id,
        })?;

        log::info!(
            "Recorded match {id} between players {} and {} in tournament #{tournament_id}",
            report.player_a,
            report.player_b
        );
        Ok(id)
    }

    /// Pairs of players for the next round of the current tournament
    ///
    /// Each player is paired with the player adjacent in the standings. With an
    /// odd number of players the last-ranked one receives a bye.
    pub async fn swiss_pairings(&self) -> TournamentResult<Vec<Pairing>> {
        let rows = with_default_timeout(
            sqlx::query(
                "SELECT pairing, id1, name1, id2, name2 FROM next_round_matchups ORDER BY pairing",
            )
            .fetch_all(self.pool.as_ref()),
        )
        .await?;

        let pairings: Vec<Pairing> = rows
            .into_iter()
            .map(|row| {
                let second_id: Option<PlayerId> = row.get("id2");
                let second_name: Option<String> = row.get("name2");
                Pairing {
                    pairing: row.get("pairing"),
                    first: PairedPlayer {
                        id: row.get("id1"),
                        name: row.get("name1"),
                    },
                    second: second_id
                        .zip(second_name)
                        .map(|(id, name)| PairedPlayer { id, name }),
                }
            })
            .collect();

        log::debug!("Swiss pairings: {pairings:?}");
        Ok(pairings)
    }

    /// Explicit tournament if it exists, otherwise the current one
    async fn resolve_tournament(
        &self,
        requested: Option<TournamentId>,
    ) -> TournamentResult<TournamentId> {
        match requested {
            Some(tournament_id) => {
                let exists: bool = with_default_timeout(
                    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM tournaments WHERE id = $1)")
                        .bind(tournament_id)
                        .fetch_one(self.pool.as_ref()),
                )
                .await?;

                if exists {
                    Ok(tournament_id)
                } else {
                    Err(TournamentError::NotFound(tournament_id))
                }
            }
            None => self
                .current_tournament()
                .await?
                .ok_or(TournamentError::NoCurrentTournament),
        }
    }
}

fn tournament_from_row(row: &PgRow) -> TournamentInfo {
    TournamentInfo {
        id: row.get("id"),
        name: row.get("name"),
        is_current: row.get("is_current"),
        player_count: row.get("player_count"),
        match_count: row.get("match_count"),
        created_at: row.get("created_at"),
    }
}
