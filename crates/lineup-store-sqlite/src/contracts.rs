//! Contract commands: sign, transfer, release.
//!
//! Each runs in one `IMMEDIATE` transaction, so the write lock is held from
//! the first read of the player's open contract until commit. The close of
//! an open contract is additionally guarded by `end_season_id IS NULL`; if
//! that update touches no row, someone else closed it first and the command
//! aborts with a conflict.

use chrono::Utc;
use lineup_core::{
  Error as CoreError, Scope,
  contract::{Contract, SignPlayer, Transfer, ensure_starts_after_history},
};
use rusqlite::{Connection, Transaction, TransactionBehavior, params};
use uuid::Uuid;

use crate::{
  Result,
  encode::{RawContract, encode_date, encode_dt, encode_uuid},
  query::{contracts_of_player, load_calendar, require_contract, require_player, require_team},
};

fn insert_contract(tx: &Transaction<'_>, contract: &Contract) -> Result<()> {
  tx.execute(
    "INSERT INTO contracts (
       contract_id, organization_id, player_id, team_id, position,
       jersey_number, start_season_id, end_season_id, created_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    params![
      encode_uuid(contract.contract_id),
      encode_uuid(contract.organization_id),
      encode_uuid(contract.player_id),
      encode_uuid(contract.team_id),
      contract.position.as_str(),
      contract.jersey_number,
      encode_uuid(contract.start_season_id),
      contract.end_season_id.map(encode_uuid),
      encode_dt(contract.created_at),
    ],
  )?;
  Ok(())
}

/// Set `end_season_id` on a contract that must still be open.
fn close_open_contract(
  tx: &Transaction<'_>,
  scope: Scope,
  contract_id: Uuid,
  end_season_id: Uuid,
) -> Result<()> {
  let changed = tx.execute(
    "UPDATE contracts SET end_season_id = ?1
     WHERE contract_id = ?2 AND organization_id = ?3 AND end_season_id IS NULL",
    params![
      encode_uuid(end_season_id),
      encode_uuid(contract_id),
      encode_uuid(scope.organization_id),
    ],
  )?;
  if changed != 1 {
    return Err(CoreError::ConcurrentModification(contract_id).into());
  }
  Ok(())
}

/// Load `contract_id` and insist it is the player's open contract.
fn open_contract(tx: &Transaction<'_>, scope: Scope, contract_id: Uuid) -> Result<Contract> {
  let contract = require_contract(tx, scope, contract_id)?;
  if !contract.is_open() {
    return Err(CoreError::ContractNotOpen(contract_id).into());
  }
  Ok(contract)
}

pub fn sign(conn: &mut Connection, scope: Scope, input: SignPlayer) -> Result<Contract> {
  input.validate()?;
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  require_player(&tx, scope, input.player_id)?;
  require_team(&tx, scope, input.team_id)?;
  let calendar = load_calendar(&tx, scope)?;
  calendar.require(input.season_id)?;

  let history = contracts_of_player(&tx, scope, input.player_id)?;
  if history.iter().any(Contract::is_open) {
    return Err(CoreError::AlreadyContracted(input.player_id).into());
  }
  ensure_starts_after_history(&calendar, input.player_id, &history, input.season_id)?;

  let contract = Contract {
    contract_id:     Uuid::new_v4(),
    organization_id: scope.organization_id,
    player_id:       input.player_id,
    team_id:         input.team_id,
    position:        input.position,
    jersey_number:   input.jersey_number,
    start_season_id: input.season_id,
    end_season_id:   None,
    created_at:      Utc::now(),
  };
  insert_contract(&tx, &contract)?;
  tx.commit()?;
  Ok(contract)
}

/// Returns `(closed, opened)`.
pub fn transfer(
  conn: &mut Connection,
  scope: Scope,
  contract_id: Uuid,
  input: Transfer,
) -> Result<(Contract, Contract)> {
  input.validate()?;
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let mut current = open_contract(&tx, scope, contract_id)?;
  // Everything that can reject the transfer is checked before the close.
  require_team(&tx, scope, input.new_team_id)?;
  let calendar = load_calendar(&tx, scope)?;
  let closing = current.closing_season(&calendar, input.effective_season_id)?;

  close_open_contract(&tx, scope, contract_id, closing)?;
  current.end_season_id = Some(closing);

  let same_team = current.team_id == input.new_team_id;
  let next = Contract {
    contract_id:     Uuid::new_v4(),
    organization_id: scope.organization_id,
    player_id:       current.player_id,
    team_id:         input.new_team_id,
    position:        input.position.unwrap_or(current.position),
    jersey_number:   input
      .jersey_number
      .or(if same_team { current.jersey_number } else { None }),
    start_season_id: input.effective_season_id,
    end_season_id:   None,
    created_at:      Utc::now(),
  };
  insert_contract(&tx, &next)?;
  tx.commit()?;
  Ok((current, next))
}

pub fn release(
  conn: &mut Connection,
  scope: Scope,
  contract_id: Uuid,
  effective_season_id: Uuid,
) -> Result<Contract> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let mut current = open_contract(&tx, scope, contract_id)?;
  let calendar = load_calendar(&tx, scope)?;
  let closing = current.closing_season(&calendar, effective_season_id)?;

  close_open_contract(&tx, scope, contract_id, closing)?;
  current.end_season_id = Some(closing);
  tx.commit()?;
  Ok(current)
}

/// Contracts of `team_id` whose span includes `season_id`.
pub fn roster(
  conn: &Connection,
  scope: Scope,
  team_id: Uuid,
  season_id: Uuid,
) -> Result<Vec<Contract>> {
  require_team(conn, scope, team_id)?;
  let calendar = load_calendar(conn, scope)?;
  let target = calendar.require(season_id)?;
  let target_starts = encode_date(target.starts_on);

  let mut stmt = conn.prepare(
    "SELECT c.contract_id, c.organization_id, c.player_id, c.team_id, c.position,
            c.jersey_number, c.start_season_id, c.end_season_id, c.created_at
     FROM contracts c
     JOIN seasons s      ON s.season_id = c.start_season_id
     LEFT JOIN seasons e ON e.season_id = c.end_season_id
     WHERE c.organization_id = ?1
       AND c.team_id = ?2
       AND s.starts_on <= ?3
       AND (c.end_season_id IS NULL OR ?3 <= e.starts_on)
     ORDER BY c.jersey_number, c.created_at",
  )?;
  let raws = stmt
    .query_map(
      params![encode_uuid(scope.organization_id), encode_uuid(team_id), target_starts],
      RawContract::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawContract::into_contract).collect()
}
