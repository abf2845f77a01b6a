//! The `LeagueStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `lineup-store-sqlite`).
//! Higher layers (`lineup-api`, `lineup-server`) depend on this abstraction,
//! not on any concrete backend.
//!
//! Every method takes the caller's [`Scope`]; records outside its
//! organization are invisible.

use std::future::Future;

use uuid::Uuid;

use crate::{
  Error, Scope,
  contract::{Contract, SignPlayer, Transfer},
  eligibility::Eligibility,
  game::{AccrualReport, Game, NewGame},
  player::{NewPlayer, Player, Team},
  season::{NewSeason, Season},
  suspension::{GameEvent, NewSuspension, Suspension, SuspensionPolicy, SuspensionUpdate},
  timeline::TimelineEntry,
};

/// Backend errors expose the domain failure behind them, if there is one,
/// so callers can tell a rejected command from a broken database.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn domain(&self) -> Option<&Error>;
}

impl StoreError for Error {
  fn domain(&self) -> Option<&Error> { Some(self) }
}

/// Abstraction over a Lineup store backend.
///
/// Write operations either fully apply or are rejected; a backend must never
/// leave a transfer half done or credit a game to a suspension twice.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait LeagueStore: Send + Sync {
  type Error: StoreError;

  // ── Players, teams, seasons ───────────────────────────────────────────

  fn add_player(
    &self,
    scope: Scope,
    input: NewPlayer,
  ) -> impl Future<Output = Result<Player, Self::Error>> + Send + '_;

  fn get_player(
    &self,
    scope: Scope,
    player_id: Uuid,
  ) -> impl Future<Output = Result<Option<Player>, Self::Error>> + Send + '_;

  /// Delete a player. Rejected while any contract or suspension still
  /// references them.
  fn delete_player(
    &self,
    scope: Scope,
    player_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn add_team(
    &self,
    scope: Scope,
    name: String,
  ) -> impl Future<Output = Result<Team, Self::Error>> + Send + '_;

  fn get_team(
    &self,
    scope: Scope,
    team_id: Uuid,
  ) -> impl Future<Output = Result<Option<Team>, Self::Error>> + Send + '_;

  /// Add a season. Rejected if its dates intersect an existing season.
  fn add_season(
    &self,
    scope: Scope,
    input: NewSeason,
  ) -> impl Future<Output = Result<Season, Self::Error>> + Send + '_;

  /// All seasons of the organization, ordered by start date.
  fn list_seasons(
    &self,
    scope: Scope,
  ) -> impl Future<Output = Result<Vec<Season>, Self::Error>> + Send + '_;

  // ── Games ─────────────────────────────────────────────────────────────

  fn schedule_game(
    &self,
    scope: Scope,
    input: NewGame,
  ) -> impl Future<Output = Result<Game, Self::Error>> + Send + '_;

  fn get_game(
    &self,
    scope: Scope,
    game_id: Uuid,
  ) -> impl Future<Output = Result<Option<Game>, Self::Error>> + Send + '_;

  // ── Contracts ─────────────────────────────────────────────────────────

  /// Open a contract for a free agent, starting in `input.season_id`.
  fn sign_player(
    &self,
    scope: Scope,
    input: SignPlayer,
  ) -> impl Future<Output = Result<Contract, Self::Error>> + Send + '_;

  /// Close the open contract `contract_id` and open its successor with the
  /// new team, atomically. Returns the new contract.
  fn transfer(
    &self,
    scope: Scope,
    contract_id: Uuid,
    input: Transfer,
  ) -> impl Future<Output = Result<Contract, Self::Error>> + Send + '_;

  /// Close the open contract `contract_id` with no successor; the player is
  /// a free agent from `effective_season_id` onward. Returns the closed
  /// contract.
  fn release(
    &self,
    scope: Scope,
    contract_id: Uuid,
    effective_season_id: Uuid,
  ) -> impl Future<Output = Result<Contract, Self::Error>> + Send + '_;

  /// Contracts of `team_id` whose span includes `season_id`.
  fn roster_for_season(
    &self,
    scope: Scope,
    team_id: Uuid,
    season_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Contract>, Self::Error>> + Send + '_;

  /// The player's full contract history, in no particular order.
  fn contracts_for_player(
    &self,
    scope: Scope,
    player_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Contract>, Self::Error>> + Send + '_;

  /// The player's contract history classified into career events, oldest
  /// first.
  fn player_timeline(
    &self,
    scope: Scope,
    player_id: Uuid,
  ) -> impl Future<Output = Result<Vec<TimelineEntry>, Self::Error>> + Send + '_;

  // ── Suspensions ───────────────────────────────────────────────────────

  fn issue_suspension(
    &self,
    scope: Scope,
    input: NewSuspension,
  ) -> impl Future<Output = Result<Suspension, Self::Error>> + Send + '_;

  /// Issue the suspension `policy` derives from `event`, if it qualifies.
  fn issue_from_event(
    &self,
    scope: Scope,
    event: GameEvent,
    policy: SuspensionPolicy,
  ) -> impl Future<Output = Result<Option<Suspension>, Self::Error>> + Send + '_;

  /// Edit an active suspension. Fully served suspensions are immutable.
  fn update_suspension(
    &self,
    scope: Scope,
    suspension_id: Uuid,
    update: SuspensionUpdate,
  ) -> impl Future<Output = Result<Suspension, Self::Error>> + Send + '_;

  /// Administrative removal, regardless of state.
  fn delete_suspension(
    &self,
    scope: Scope,
    suspension_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_suspension(
    &self,
    scope: Scope,
    suspension_id: Uuid,
  ) -> impl Future<Output = Result<Option<Suspension>, Self::Error>> + Send + '_;

  /// Suspensions triggered by events of `game_id`.
  fn suspensions_for_game(
    &self,
    scope: Scope,
    game_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Suspension>, Self::Error>> + Send + '_;

  fn active_suspensions_for_player(
    &self,
    scope: Scope,
    player_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Suspension>, Self::Error>> + Send + '_;

  // ── Serving accrual ───────────────────────────────────────────────────

  /// Credit `game_id` to the active suspensions of `team_id`. At most once
  /// per (suspension, game); replays are no-ops.
  fn accrue_service(
    &self,
    scope: Scope,
    team_id: Uuid,
    game_id: Uuid,
  ) -> impl Future<Output = Result<AccrualReport, Self::Error>> + Send + '_;

  /// Mark `game_id` completed and credit it for both teams in one
  /// transaction.
  fn complete_game(
    &self,
    scope: Scope,
    game_id: Uuid,
  ) -> impl Future<Output = Result<AccrualReport, Self::Error>> + Send + '_;

  // ── Eligibility ───────────────────────────────────────────────────────

  /// Whether `player_id` may be fielded for `team_id` in `game_id`. Never
  /// mutates state.
  fn is_eligible(
    &self,
    scope: Scope,
    player_id: Uuid,
    team_id: Uuid,
    game_id: Uuid,
  ) -> impl Future<Output = Result<Eligibility, Self::Error>> + Send + '_;
}
