//! Suspension ledger commands and the serving accrual process.
//!
//! Service credit is recorded one row per (suspension, game) in
//! `suspension_service`. A game is credited to a suspension only if no such
//! row exists yet, and the row and the `served_games` increment are written
//! in the same transaction, so replaying a game completion is a no-op.

use std::collections::HashSet;

use chrono::Utc;
use lineup_core::{
  Error as CoreError, Scope,
  game::{AccrualReport, Game, GameStatus},
  suspension::{GameEvent, NewSuspension, Suspension, SuspensionPolicy, SuspensionUpdate},
};
use rusqlite::{Connection, OptionalExtension as _, Transaction, TransactionBehavior, params};
use uuid::Uuid;

use crate::{
  Result,
  encode::{decode_uuid, encode_dt, encode_status, encode_uuid},
  query::{require_game, require_player, require_suspension, require_team, suspensions_by},
};

fn insert_suspension(tx: &Transaction<'_>, s: &Suspension) -> Result<()> {
  tx.execute(
    "INSERT INTO suspensions (
       suspension_id, organization_id, player_id, team_id, suspension_type,
       suspended_games, served_games, reason, game_event_id, game_id, created_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    params![
      encode_uuid(s.suspension_id),
      encode_uuid(s.organization_id),
      encode_uuid(s.player_id),
      encode_uuid(s.team_id),
      s.suspension_type.as_str(),
      s.suspended_games,
      s.served_games,
      s.reason,
      s.game_event_id.map(encode_uuid),
      s.game_id.map(encode_uuid),
      encode_dt(s.created_at),
    ],
  )?;
  Ok(())
}

fn issue_in(tx: &Transaction<'_>, scope: Scope, input: NewSuspension) -> Result<Suspension> {
  input.validate()?;
  require_player(tx, scope, input.player_id)?;
  require_team(tx, scope, input.team_id)?;
  if let Some(game_id) = input.game_id {
    let game = require_game(tx, scope, game_id)?;
    if !game.involves(input.team_id) {
      return Err(
        CoreError::Validation(format!("team {} did not play game {game_id}", input.team_id))
          .into(),
      );
    }
  }

  let suspension = Suspension {
    suspension_id:   Uuid::new_v4(),
    organization_id: scope.organization_id,
    player_id:       input.player_id,
    team_id:         input.team_id,
    suspension_type: input.suspension_type,
    suspended_games: input.suspended_games,
    served_games:    0,
    reason:          input.reason,
    game_event_id:   input.game_event_id,
    game_id:         input.game_id,
    created_at:      Utc::now(),
  };
  insert_suspension(tx, &suspension)?;
  Ok(suspension)
}

pub fn issue(conn: &mut Connection, scope: Scope, input: NewSuspension) -> Result<Suspension> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let suspension = issue_in(&tx, scope, input)?;
  tx.commit()?;
  Ok(suspension)
}

/// Returns `(suspension, newly_issued)`. An event reported twice yields the
/// suspension issued the first time.
pub fn issue_from_event(
  conn: &mut Connection,
  scope: Scope,
  event: &GameEvent,
  policy: &SuspensionPolicy,
) -> Result<Option<(Suspension, bool)>> {
  let Some(input) = policy.derive(event) else {
    return Ok(None);
  };
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let existing: Option<String> = tx
    .query_row(
      "SELECT suspension_id FROM suspensions
       WHERE game_event_id = ?1 AND organization_id = ?2
       ORDER BY created_at LIMIT 1",
      params![encode_uuid(event.game_event_id), encode_uuid(scope.organization_id)],
      |row| row.get(0),
    )
    .optional()?;
  if let Some(id) = existing {
    let suspension = require_suspension(&tx, scope, decode_uuid(&id)?)?;
    return Ok(Some((suspension, false)));
  }

  let suspension = issue_in(&tx, scope, input)?;
  tx.commit()?;
  Ok(Some((suspension, true)))
}

pub fn update(
  conn: &mut Connection,
  scope: Scope,
  suspension_id: Uuid,
  update: SuspensionUpdate,
) -> Result<Suspension> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let current = require_suspension(&tx, scope, suspension_id)?;
  let next = update.apply(&current)?;

  tx.execute(
    "UPDATE suspensions
     SET suspension_type = ?1, suspended_games = ?2, reason = ?3
     WHERE suspension_id = ?4 AND organization_id = ?5",
    params![
      next.suspension_type.as_str(),
      next.suspended_games,
      next.reason,
      encode_uuid(suspension_id),
      encode_uuid(scope.organization_id),
    ],
  )?;
  tx.commit()?;
  Ok(next)
}

pub fn delete(conn: &mut Connection, scope: Scope, suspension_id: Uuid) -> Result<()> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  require_suspension(&tx, scope, suspension_id)?;
  let id = encode_uuid(suspension_id);
  let org = encode_uuid(scope.organization_id);
  tx.execute(
    "DELETE FROM suspension_service WHERE suspension_id = ?1 AND organization_id = ?2",
    params![id, org],
  )?;
  tx.execute(
    "DELETE FROM suspensions WHERE suspension_id = ?1 AND organization_id = ?2",
    params![id, org],
  )?;
  tx.commit()?;
  Ok(())
}

// ─── Serving accrual ─────────────────────────────────────────────────────────

/// Credit `game` to every suspension of `team_id` it counts toward.
fn accrue_in(
  tx: &Transaction<'_>,
  scope: Scope,
  team_id: Uuid,
  game: &Game,
) -> Result<AccrualReport> {
  let game_id = encode_uuid(game.game_id);
  let org = encode_uuid(scope.organization_id);

  let credited_before: HashSet<Uuid> = {
    let mut stmt = tx.prepare(
      "SELECT suspension_id FROM suspension_service WHERE game_id = ?1 AND organization_id = ?2",
    )?;
    let ids = stmt
      .query_map(params![game_id, org], |row| row.get::<_, String>(0))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    ids.iter().map(|id| decode_uuid(id)).collect::<Result<_>>()?
  };

  let mut report = AccrualReport::new(game.game_id);
  let credited_at = encode_dt(Utc::now());

  for suspension in suspensions_by(tx, scope, "team_id", team_id, false)? {
    if credited_before.contains(&suspension.suspension_id) {
      report.already_applied.push(suspension.suspension_id);
      continue;
    }
    if !suspension.credited_by(game.game_id, game.starts_at) {
      continue;
    }

    let id = encode_uuid(suspension.suspension_id);
    tx.execute(
      "INSERT INTO suspension_service (suspension_id, game_id, organization_id, credited_at)
       VALUES (?1, ?2, ?3, ?4)",
      params![id, game_id, org, credited_at],
    )?;
    tx.execute(
      "UPDATE suspensions SET served_games = MIN(served_games + 1, suspended_games)
       WHERE suspension_id = ?1 AND organization_id = ?2",
      params![id, org],
    )?;

    report.credited.push(suspension.suspension_id);
    if suspension.served_games + 1 >= suspension.suspended_games {
      report.closed.push(suspension.suspension_id);
    }
  }
  Ok(report)
}

pub fn accrue(conn: &mut Connection, scope: Scope, team_id: Uuid, game_id: Uuid) -> Result<AccrualReport> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let game = require_game(&tx, scope, game_id)?;
  if !game.involves(team_id) {
    return Err(CoreError::Validation(format!("team {team_id} did not play game {game_id}")).into());
  }
  let report = accrue_in(&tx, scope, team_id, &game)?;
  tx.commit()?;
  Ok(report)
}

pub fn complete_game(conn: &mut Connection, scope: Scope, game_id: Uuid) -> Result<AccrualReport> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let game = require_game(&tx, scope, game_id)?;

  tx.execute(
    "UPDATE games SET status = ?1 WHERE game_id = ?2 AND organization_id = ?3",
    params![
      encode_status(GameStatus::Completed),
      encode_uuid(game_id),
      encode_uuid(scope.organization_id),
    ],
  )?;

  let mut report = accrue_in(&tx, scope, game.home_team_id, &game)?;
  report.merge(accrue_in(&tx, scope, game.away_team_id, &game)?);
  tx.commit()?;
  Ok(report)
}
