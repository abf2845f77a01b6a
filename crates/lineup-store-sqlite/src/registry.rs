//! Players, teams, seasons and games: the records contracts and suspensions
//! point at.

use chrono::Utc;
use lineup_core::{
  Error as CoreError, Scope,
  game::{Game, GameStatus, NewGame},
  player::{NewPlayer, Player, Team},
  season::{NewSeason, Season},
};
use rusqlite::{Connection, TransactionBehavior, params};
use uuid::Uuid;

use crate::{
  Result,
  encode::{encode_date, encode_dt, encode_status, encode_uuid},
  query::{load_calendar, require_player, require_team},
};

pub fn add_player(conn: &Connection, scope: Scope, input: NewPlayer) -> Result<Player> {
  if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
    return Err(CoreError::Validation("player first and last name are required".into()).into());
  }
  let player = Player {
    player_id:       Uuid::new_v4(),
    organization_id: scope.organization_id,
    first_name:      input.first_name,
    last_name:       input.last_name,
    date_of_birth:   input.date_of_birth,
    nationality:     input.nationality,
    photo:           input.photo,
    created_at:      Utc::now(),
  };
  conn.execute(
    "INSERT INTO players (
       player_id, organization_id, first_name, last_name,
       date_of_birth, nationality, photo, created_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    params![
      encode_uuid(player.player_id),
      encode_uuid(player.organization_id),
      player.first_name,
      player.last_name,
      player.date_of_birth.map(encode_date),
      player.nationality,
      player.photo,
      encode_dt(player.created_at),
    ],
  )?;
  Ok(player)
}

pub fn delete_player(conn: &mut Connection, scope: Scope, player_id: Uuid) -> Result<()> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  require_player(&tx, scope, player_id)?;

  let id = encode_uuid(player_id);
  let org = encode_uuid(scope.organization_id);
  let references: i64 = tx.query_row(
    "SELECT (SELECT COUNT(*) FROM contracts   WHERE player_id = ?1 AND organization_id = ?2)
          + (SELECT COUNT(*) FROM suspensions WHERE player_id = ?1 AND organization_id = ?2)",
    params![id, org],
    |row| row.get(0),
  )?;
  if references > 0 {
    return Err(CoreError::PlayerReferenced(player_id).into());
  }

  tx.execute(
    "DELETE FROM players WHERE player_id = ?1 AND organization_id = ?2",
    params![id, org],
  )?;
  tx.commit()?;
  Ok(())
}

pub fn add_team(conn: &Connection, scope: Scope, name: String) -> Result<Team> {
  if name.trim().is_empty() {
    return Err(CoreError::Validation("team name must not be empty".into()).into());
  }
  let team = Team {
    team_id: Uuid::new_v4(),
    organization_id: scope.organization_id,
    name,
    created_at: Utc::now(),
  };
  conn.execute(
    "INSERT INTO teams (team_id, organization_id, name, created_at) VALUES (?1, ?2, ?3, ?4)",
    params![
      encode_uuid(team.team_id),
      encode_uuid(team.organization_id),
      team.name,
      encode_dt(team.created_at),
    ],
  )?;
  Ok(team)
}

pub fn add_season(conn: &mut Connection, scope: Scope, input: NewSeason) -> Result<Season> {
  input.validate()?;
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let calendar = load_calendar(&tx, scope)?;
  if let Some(clash) = calendar.overlapping(input.starts_on, input.ends_on) {
    return Err(CoreError::OverlappingSeason(clash.season_id).into());
  }

  let season = Season {
    season_id:       Uuid::new_v4(),
    organization_id: scope.organization_id,
    name:            input.name,
    starts_on:       input.starts_on,
    ends_on:         input.ends_on,
    created_at:      Utc::now(),
  };
  tx.execute(
    "INSERT INTO seasons (season_id, organization_id, name, starts_on, ends_on, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![
      encode_uuid(season.season_id),
      encode_uuid(season.organization_id),
      season.name,
      encode_date(season.starts_on),
      encode_date(season.ends_on),
      encode_dt(season.created_at),
    ],
  )?;
  tx.commit()?;
  Ok(season)
}

pub fn schedule_game(conn: &mut Connection, scope: Scope, input: NewGame) -> Result<Game> {
  input.validate()?;
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  load_calendar(&tx, scope)?.require(input.season_id)?;
  require_team(&tx, scope, input.home_team_id)?;
  require_team(&tx, scope, input.away_team_id)?;

  let game = Game {
    game_id:         Uuid::new_v4(),
    organization_id: scope.organization_id,
    season_id:       input.season_id,
    home_team_id:    input.home_team_id,
    away_team_id:    input.away_team_id,
    starts_at:       input.starts_at,
    status:          GameStatus::Scheduled,
  };
  tx.execute(
    "INSERT INTO games (
       game_id, organization_id, season_id, home_team_id, away_team_id, starts_at, status
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    params![
      encode_uuid(game.game_id),
      encode_uuid(game.organization_id),
      encode_uuid(game.season_id),
      encode_uuid(game.home_team_id),
      encode_uuid(game.away_team_id),
      encode_dt(game.starts_at),
      encode_status(game.status),
    ],
  )?;
  tx.commit()?;
  Ok(game)
}
