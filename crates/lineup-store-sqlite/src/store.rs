//! [`SqliteStore`], the SQLite implementation of [`LeagueStore`].

use std::path::Path;

use uuid::Uuid;

use lineup_core::{
  Scope,
  contract::{Contract, SignPlayer, Transfer},
  eligibility::{self, Eligibility},
  game::{AccrualReport, Game, NewGame},
  player::{NewPlayer, Player, Team},
  season::{NewSeason, Season},
  store::LeagueStore,
  suspension::{GameEvent, NewSuspension, Suspension, SuspensionPolicy, SuspensionUpdate},
  timeline::{self, TimelineEntry},
};

use crate::{
  Error, Result, contracts, ledger,
  query::{
    contracts_of_player, find_game, find_player, find_suspension, find_team, list_seasons,
    load_calendar, require_game, require_player, require_team, suspensions_by,
  },
  registry,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Lineup league store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` on the database thread and hand back its own result.
  async fn with_conn<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut rusqlite::Connection) -> Result<T> + Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }
}

// ─── LeagueStore impl ────────────────────────────────────────────────────────

impl LeagueStore for SqliteStore {
  type Error = Error;

  // ── Players, teams, seasons ───────────────────────────────────────────

  async fn add_player(&self, scope: Scope, input: NewPlayer) -> Result<Player> {
    let player = self.with_conn(move |conn| registry::add_player(conn, scope, input)).await?;
    tracing::info!(
      organization_id = %scope.organization_id,
      actor = %scope.acting_user_id,
      player_id = %player.player_id,
      "player added"
    );
    Ok(player)
  }

  async fn get_player(&self, scope: Scope, player_id: Uuid) -> Result<Option<Player>> {
    self.with_conn(move |conn| find_player(conn, scope, player_id)).await
  }

  async fn delete_player(&self, scope: Scope, player_id: Uuid) -> Result<()> {
    self.with_conn(move |conn| registry::delete_player(conn, scope, player_id)).await?;
    tracing::info!(
      organization_id = %scope.organization_id,
      actor = %scope.acting_user_id,
      %player_id,
      "player deleted"
    );
    Ok(())
  }

  async fn add_team(&self, scope: Scope, name: String) -> Result<Team> {
    let team = self.with_conn(move |conn| registry::add_team(conn, scope, name)).await?;
    tracing::info!(
      organization_id = %scope.organization_id,
      actor = %scope.acting_user_id,
      team_id = %team.team_id,
      "team added"
    );
    Ok(team)
  }

  async fn get_team(&self, scope: Scope, team_id: Uuid) -> Result<Option<Team>> {
    self.with_conn(move |conn| find_team(conn, scope, team_id)).await
  }

  async fn add_season(&self, scope: Scope, input: NewSeason) -> Result<Season> {
    let season = self.with_conn(move |conn| registry::add_season(conn, scope, input)).await?;
    tracing::info!(
      organization_id = %scope.organization_id,
      actor = %scope.acting_user_id,
      season_id = %season.season_id,
      name = %season.name,
      "season added"
    );
    Ok(season)
  }

  async fn list_seasons(&self, scope: Scope) -> Result<Vec<Season>> {
    self.with_conn(move |conn| list_seasons(conn, scope)).await
  }

  // ── Games ─────────────────────────────────────────────────────────────

  async fn schedule_game(&self, scope: Scope, input: NewGame) -> Result<Game> {
    let game = self.with_conn(move |conn| registry::schedule_game(conn, scope, input)).await?;
    tracing::info!(
      organization_id = %scope.organization_id,
      actor = %scope.acting_user_id,
      game_id = %game.game_id,
      "game scheduled"
    );
    Ok(game)
  }

  async fn get_game(&self, scope: Scope, game_id: Uuid) -> Result<Option<Game>> {
    self.with_conn(move |conn| find_game(conn, scope, game_id)).await
  }

  // ── Contracts ─────────────────────────────────────────────────────────

  async fn sign_player(&self, scope: Scope, input: SignPlayer) -> Result<Contract> {
    let contract = self.with_conn(move |conn| contracts::sign(conn, scope, input)).await?;
    tracing::info!(
      organization_id = %scope.organization_id,
      actor = %scope.acting_user_id,
      contract_id = %contract.contract_id,
      player_id = %contract.player_id,
      team_id = %contract.team_id,
      "player signed"
    );
    Ok(contract)
  }

  async fn transfer(&self, scope: Scope, contract_id: Uuid, input: Transfer) -> Result<Contract> {
    let (closed, opened) = self
      .with_conn(move |conn| contracts::transfer(conn, scope, contract_id, input))
      .await?;
    tracing::info!(
      organization_id = %scope.organization_id,
      actor = %scope.acting_user_id,
      player_id = %opened.player_id,
      closed = %closed.contract_id,
      opened = %opened.contract_id,
      from_team = %closed.team_id,
      to_team = %opened.team_id,
      "player transferred"
    );
    Ok(opened)
  }

  async fn release(
    &self,
    scope: Scope,
    contract_id: Uuid,
    effective_season_id: Uuid,
  ) -> Result<Contract> {
    let closed = self
      .with_conn(move |conn| contracts::release(conn, scope, contract_id, effective_season_id))
      .await?;
    tracing::info!(
      organization_id = %scope.organization_id,
      actor = %scope.acting_user_id,
      %contract_id,
      player_id = %closed.player_id,
      "player released"
    );
    Ok(closed)
  }

  async fn roster_for_season(
    &self,
    scope: Scope,
    team_id: Uuid,
    season_id: Uuid,
  ) -> Result<Vec<Contract>> {
    self.with_conn(move |conn| contracts::roster(conn, scope, team_id, season_id)).await
  }

  async fn contracts_for_player(&self, scope: Scope, player_id: Uuid) -> Result<Vec<Contract>> {
    self.with_conn(move |conn| contracts_of_player(conn, scope, player_id)).await
  }

  async fn player_timeline(&self, scope: Scope, player_id: Uuid) -> Result<Vec<TimelineEntry>> {
    self
      .with_conn(move |conn| {
        require_player(conn, scope, player_id)?;
        let history = contracts_of_player(conn, scope, player_id)?;
        let calendar = load_calendar(conn, scope)?;
        Ok(timeline::classify(history, &calendar))
      })
      .await
  }

  // ── Suspensions ───────────────────────────────────────────────────────

  async fn issue_suspension(&self, scope: Scope, input: NewSuspension) -> Result<Suspension> {
    let suspension = self.with_conn(move |conn| ledger::issue(conn, scope, input)).await?;
    tracing::info!(
      organization_id = %scope.organization_id,
      actor = %scope.acting_user_id,
      suspension_id = %suspension.suspension_id,
      player_id = %suspension.player_id,
      games = suspension.suspended_games,
      "suspension issued"
    );
    Ok(suspension)
  }

  async fn issue_from_event(
    &self,
    scope: Scope,
    event: GameEvent,
    policy: SuspensionPolicy,
  ) -> Result<Option<Suspension>> {
    let game_event_id = event.game_event_id;
    let issued = self
      .with_conn(move |conn| ledger::issue_from_event(conn, scope, &event, &policy))
      .await?;
    match &issued {
      Some((suspension, true)) => tracing::info!(
        organization_id = %scope.organization_id,
        actor = %scope.acting_user_id,
        %game_event_id,
        suspension_id = %suspension.suspension_id,
        games = suspension.suspended_games,
        "suspension issued from game event"
      ),
      Some((suspension, false)) => tracing::debug!(
        organization_id = %scope.organization_id,
        %game_event_id,
        suspension_id = %suspension.suspension_id,
        "game event already processed"
      ),
      None => tracing::debug!(
        organization_id = %scope.organization_id,
        %game_event_id,
        "game event carries no suspension"
      ),
    }
    Ok(issued.map(|(suspension, _)| suspension))
  }

  async fn update_suspension(
    &self,
    scope: Scope,
    suspension_id: Uuid,
    update: SuspensionUpdate,
  ) -> Result<Suspension> {
    let suspension = self
      .with_conn(move |conn| ledger::update(conn, scope, suspension_id, update))
      .await?;
    tracing::info!(
      organization_id = %scope.organization_id,
      actor = %scope.acting_user_id,
      %suspension_id,
      games = suspension.suspended_games,
      "suspension updated"
    );
    Ok(suspension)
  }

  async fn delete_suspension(&self, scope: Scope, suspension_id: Uuid) -> Result<()> {
    self.with_conn(move |conn| ledger::delete(conn, scope, suspension_id)).await?;
    tracing::info!(
      organization_id = %scope.organization_id,
      actor = %scope.acting_user_id,
      %suspension_id,
      "suspension deleted"
    );
    Ok(())
  }

  async fn get_suspension(&self, scope: Scope, suspension_id: Uuid) -> Result<Option<Suspension>> {
    self.with_conn(move |conn| find_suspension(conn, scope, suspension_id)).await
  }

  async fn suspensions_for_game(&self, scope: Scope, game_id: Uuid) -> Result<Vec<Suspension>> {
    self
      .with_conn(move |conn| {
        require_game(conn, scope, game_id)?;
        suspensions_by(conn, scope, "game_id", game_id, false)
      })
      .await
  }

  async fn active_suspensions_for_player(
    &self,
    scope: Scope,
    player_id: Uuid,
  ) -> Result<Vec<Suspension>> {
    self
      .with_conn(move |conn| {
        require_player(conn, scope, player_id)?;
        suspensions_by(conn, scope, "player_id", player_id, true)
      })
      .await
  }

  // ── Serving accrual ───────────────────────────────────────────────────

  async fn accrue_service(
    &self,
    scope: Scope,
    team_id: Uuid,
    game_id: Uuid,
  ) -> Result<AccrualReport> {
    let report = self
      .with_conn(move |conn| ledger::accrue(conn, scope, team_id, game_id))
      .await?;
    tracing::info!(
      organization_id = %scope.organization_id,
      actor = %scope.acting_user_id,
      %game_id,
      %team_id,
      credited = report.credited.len(),
      closed = report.closed.len(),
      already_applied = report.already_applied.len(),
      "service accrued"
    );
    Ok(report)
  }

  async fn complete_game(&self, scope: Scope, game_id: Uuid) -> Result<AccrualReport> {
    let report = self
      .with_conn(move |conn| ledger::complete_game(conn, scope, game_id))
      .await?;
    tracing::info!(
      organization_id = %scope.organization_id,
      actor = %scope.acting_user_id,
      %game_id,
      credited = report.credited.len(),
      closed = report.closed.len(),
      already_applied = report.already_applied.len(),
      "game completed"
    );
    Ok(report)
  }

  // ── Eligibility ───────────────────────────────────────────────────────

  async fn is_eligible(
    &self,
    scope: Scope,
    player_id: Uuid,
    team_id: Uuid,
    game_id: Uuid,
  ) -> Result<Eligibility> {
    let verdict = self
      .with_conn(move |conn| {
        let game = require_game(conn, scope, game_id)?;
        require_player(conn, scope, player_id)?;
        require_team(conn, scope, team_id)?;
        let calendar = load_calendar(conn, scope)?;
        let history = contracts_of_player(conn, scope, player_id)?;
        let active = suspensions_by(conn, scope, "player_id", player_id, true)?;
        Ok(eligibility::resolve(player_id, team_id, &game, &calendar, &history, &active))
      })
      .await?;
    tracing::debug!(
      organization_id = %scope.organization_id,
      %player_id,
      %team_id,
      %game_id,
      eligible = verdict.eligible,
      "eligibility resolved"
    );
    Ok(verdict)
  }
}
