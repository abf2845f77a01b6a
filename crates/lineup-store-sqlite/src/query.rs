//! Tenant-scoped lookups shared by the command modules.
//!
//! These run inside a `tokio_rusqlite` closure, usually on an open
//! transaction (which derefs to [`Connection`]), so reads and the writes that
//! depend on them see the same snapshot.

use lineup_core::{
  Entity, Scope,
  contract::Contract,
  game::Game,
  player::{Player, Team},
  season::{Season, SeasonCalendar},
  suspension::Suspension,
};
use rusqlite::{Connection, OptionalExtension as _, params};
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    CONTRACT_COLUMNS, GAME_COLUMNS, PLAYER_COLUMNS, RawContract, RawGame, RawPlayer, RawSeason,
    RawSuspension, RawTeam, SEASON_COLUMNS, SUSPENSION_COLUMNS, TEAM_COLUMNS, encode_uuid,
  },
};

fn not_found(entity: Entity, id: Uuid) -> crate::Error {
  lineup_core::Error::NotFound(entity, id).into()
}

// ─── Players and teams ───────────────────────────────────────────────────────

pub fn find_player(conn: &Connection, scope: Scope, player_id: Uuid) -> Result<Option<Player>> {
  conn
    .query_row(
      &format!(
        "SELECT {PLAYER_COLUMNS} FROM players WHERE player_id = ?1 AND organization_id = ?2"
      ),
      params![encode_uuid(player_id), encode_uuid(scope.organization_id)],
      RawPlayer::from_row,
    )
    .optional()?
    .map(RawPlayer::into_player)
    .transpose()
}

pub fn require_player(conn: &Connection, scope: Scope, player_id: Uuid) -> Result<Player> {
  find_player(conn, scope, player_id)?.ok_or_else(|| not_found(Entity::Player, player_id))
}

pub fn find_team(conn: &Connection, scope: Scope, team_id: Uuid) -> Result<Option<Team>> {
  conn
    .query_row(
      &format!("SELECT {TEAM_COLUMNS} FROM teams WHERE team_id = ?1 AND organization_id = ?2"),
      params![encode_uuid(team_id), encode_uuid(scope.organization_id)],
      RawTeam::from_row,
    )
    .optional()?
    .map(RawTeam::into_team)
    .transpose()
}

pub fn require_team(conn: &Connection, scope: Scope, team_id: Uuid) -> Result<Team> {
  find_team(conn, scope, team_id)?.ok_or_else(|| not_found(Entity::Team, team_id))
}

// ─── Seasons and games ───────────────────────────────────────────────────────

pub fn list_seasons(conn: &Connection, scope: Scope) -> Result<Vec<Season>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {SEASON_COLUMNS} FROM seasons WHERE organization_id = ?1 ORDER BY starts_on"
  ))?;
  let raws = stmt
    .query_map(params![encode_uuid(scope.organization_id)], RawSeason::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawSeason::into_season).collect()
}

pub fn load_calendar(conn: &Connection, scope: Scope) -> Result<SeasonCalendar> {
  Ok(SeasonCalendar::new(list_seasons(conn, scope)?))
}

pub fn find_game(conn: &Connection, scope: Scope, game_id: Uuid) -> Result<Option<Game>> {
  conn
    .query_row(
      &format!("SELECT {GAME_COLUMNS} FROM games WHERE game_id = ?1 AND organization_id = ?2"),
      params![encode_uuid(game_id), encode_uuid(scope.organization_id)],
      RawGame::from_row,
    )
    .optional()?
    .map(RawGame::into_game)
    .transpose()
}

pub fn require_game(conn: &Connection, scope: Scope, game_id: Uuid) -> Result<Game> {
  find_game(conn, scope, game_id)?.ok_or_else(|| not_found(Entity::Game, game_id))
}

// ─── Contracts ───────────────────────────────────────────────────────────────

pub fn find_contract(conn: &Connection, scope: Scope, contract_id: Uuid) -> Result<Option<Contract>> {
  conn
    .query_row(
      &format!(
        "SELECT {CONTRACT_COLUMNS} FROM contracts
         WHERE contract_id = ?1 AND organization_id = ?2"
      ),
      params![encode_uuid(contract_id), encode_uuid(scope.organization_id)],
      RawContract::from_row,
    )
    .optional()?
    .map(RawContract::into_contract)
    .transpose()
}

pub fn require_contract(conn: &Connection, scope: Scope, contract_id: Uuid) -> Result<Contract> {
  find_contract(conn, scope, contract_id)?.ok_or_else(|| not_found(Entity::Contract, contract_id))
}

pub fn contracts_of_player(conn: &Connection, scope: Scope, player_id: Uuid) -> Result<Vec<Contract>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {CONTRACT_COLUMNS} FROM contracts WHERE player_id = ?1 AND organization_id = ?2"
  ))?;
  let raws = stmt
    .query_map(
      params![encode_uuid(player_id), encode_uuid(scope.organization_id)],
      RawContract::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawContract::into_contract).collect()
}

// ─── Suspensions ─────────────────────────────────────────────────────────────

pub fn find_suspension(
  conn: &Connection,
  scope: Scope,
  suspension_id: Uuid,
) -> Result<Option<Suspension>> {
  conn
    .query_row(
      &format!(
        "SELECT {SUSPENSION_COLUMNS} FROM suspensions
         WHERE suspension_id = ?1 AND organization_id = ?2"
      ),
      params![encode_uuid(suspension_id), encode_uuid(scope.organization_id)],
      RawSuspension::from_row,
    )
    .optional()?
    .map(RawSuspension::into_suspension)
    .transpose()
}

pub fn require_suspension(conn: &Connection, scope: Scope, suspension_id: Uuid) -> Result<Suspension> {
  find_suspension(conn, scope, suspension_id)?
    .ok_or_else(|| not_found(Entity::Suspension, suspension_id))
}

/// Suspensions of the organization where `column = id`, oldest first.
/// `column` is always a literal chosen by this crate.
pub fn suspensions_by(
  conn: &Connection,
  scope: Scope,
  column: &'static str,
  id: Uuid,
  active_only: bool,
) -> Result<Vec<Suspension>> {
  let active = if active_only { "AND served_games < suspended_games" } else { "" };
  let mut stmt = conn.prepare(&format!(
    "SELECT {SUSPENSION_COLUMNS} FROM suspensions
     WHERE {column} = ?1 AND organization_id = ?2 {active}
     ORDER BY created_at, suspension_id"
  ))?;
  let raws = stmt
    .query_map(
      params![encode_uuid(id), encode_uuid(scope.organization_id)],
      RawSuspension::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawSuspension::into_suspension).collect()
}
