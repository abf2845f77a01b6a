//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and calendar dates as
//! `YYYY-MM-DD`. UUIDs are stored as hyphenated lowercase strings. Enums are
//! stored as their snake_case names.

use chrono::{DateTime, NaiveDate, Utc};
use lineup_core::{
  contract::{Contract, Position},
  game::{Game, GameStatus},
  player::{Player, Team},
  season::Season,
  suspension::{Suspension, SuspensionType},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

// ─── Dates and times ──────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums and counters ───────────────────────────────────────────────────────

pub fn encode_status(s: GameStatus) -> &'static str {
  match s {
    GameStatus::Scheduled => "scheduled",
    GameStatus::Completed => "completed",
  }
}

fn decode_status(s: &str) -> Result<GameStatus> {
  match s {
    "scheduled" => Ok(GameStatus::Scheduled),
    "completed" => Ok(GameStatus::Completed),
    other => Err(Error::Decode { column: "games.status", value: other.to_owned() }),
  }
}

fn decode_position(s: &str) -> Result<Position> {
  Position::parse(s).ok_or_else(|| Error::Decode {
    column: "contracts.position",
    value:  s.to_owned(),
  })
}

fn decode_suspension_type(s: &str) -> Result<SuspensionType> {
  SuspensionType::parse(s).ok_or_else(|| Error::Decode {
    column: "suspensions.suspension_type",
    value:  s.to_owned(),
  })
}

fn decode_count(column: &'static str, n: i64) -> Result<u32> {
  u32::try_from(n).map_err(|_| Error::Decode { column, value: n.to_string() })
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const PLAYER_COLUMNS: &str = "player_id, organization_id, first_name, last_name, \
                                  date_of_birth, nationality, photo, created_at";

/// Raw values read directly from a `players` row.
pub struct RawPlayer {
  pub player_id:       String,
  pub organization_id: String,
  pub first_name:      String,
  pub last_name:       String,
  pub date_of_birth:   Option<String>,
  pub nationality:     Option<String>,
  pub photo:           Option<String>,
  pub created_at:      String,
}

impl RawPlayer {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      player_id:       row.get(0)?,
      organization_id: row.get(1)?,
      first_name:      row.get(2)?,
      last_name:       row.get(3)?,
      date_of_birth:   row.get(4)?,
      nationality:     row.get(5)?,
      photo:           row.get(6)?,
      created_at:      row.get(7)?,
    })
  }

  pub fn into_player(self) -> Result<Player> {
    Ok(Player {
      player_id:       decode_uuid(&self.player_id)?,
      organization_id: decode_uuid(&self.organization_id)?,
      first_name:      self.first_name,
      last_name:       self.last_name,
      date_of_birth:   self.date_of_birth.as_deref().map(decode_date).transpose()?,
      nationality:     self.nationality,
      photo:           self.photo,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

pub const TEAM_COLUMNS: &str = "team_id, organization_id, name, created_at";

pub struct RawTeam {
  pub team_id:         String,
  pub organization_id: String,
  pub name:            String,
  pub created_at:      String,
}

impl RawTeam {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      team_id:         row.get(0)?,
      organization_id: row.get(1)?,
      name:            row.get(2)?,
      created_at:      row.get(3)?,
    })
  }

  pub fn into_team(self) -> Result<Team> {
    Ok(Team {
      team_id:         decode_uuid(&self.team_id)?,
      organization_id: decode_uuid(&self.organization_id)?,
      name:            self.name,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

pub const SEASON_COLUMNS: &str =
  "season_id, organization_id, name, starts_on, ends_on, created_at";

pub struct RawSeason {
  pub season_id:       String,
  pub organization_id: String,
  pub name:            String,
  pub starts_on:       String,
  pub ends_on:         String,
  pub created_at:      String,
}

impl RawSeason {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      season_id:       row.get(0)?,
      organization_id: row.get(1)?,
      name:            row.get(2)?,
      starts_on:       row.get(3)?,
      ends_on:         row.get(4)?,
      created_at:      row.get(5)?,
    })
  }

  pub fn into_season(self) -> Result<Season> {
    Ok(Season {
      season_id:       decode_uuid(&self.season_id)?,
      organization_id: decode_uuid(&self.organization_id)?,
      name:            self.name,
      starts_on:       decode_date(&self.starts_on)?,
      ends_on:         decode_date(&self.ends_on)?,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

pub const GAME_COLUMNS: &str =
  "game_id, organization_id, season_id, home_team_id, away_team_id, starts_at, status";

pub struct RawGame {
  pub game_id:         String,
  pub organization_id: String,
  pub season_id:       String,
  pub home_team_id:    String,
  pub away_team_id:    String,
  pub starts_at:       String,
  pub status:          String,
}

impl RawGame {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      game_id:         row.get(0)?,
      organization_id: row.get(1)?,
      season_id:       row.get(2)?,
      home_team_id:    row.get(3)?,
      away_team_id:    row.get(4)?,
      starts_at:       row.get(5)?,
      status:          row.get(6)?,
    })
  }

  pub fn into_game(self) -> Result<Game> {
    Ok(Game {
      game_id:         decode_uuid(&self.game_id)?,
      organization_id: decode_uuid(&self.organization_id)?,
      season_id:       decode_uuid(&self.season_id)?,
      home_team_id:    decode_uuid(&self.home_team_id)?,
      away_team_id:    decode_uuid(&self.away_team_id)?,
      starts_at:       decode_dt(&self.starts_at)?,
      status:          decode_status(&self.status)?,
    })
  }
}

pub const CONTRACT_COLUMNS: &str = "contract_id, organization_id, player_id, team_id, position, \
                                    jersey_number, start_season_id, end_season_id, created_at";

/// Raw values read directly from a `contracts` row.
pub struct RawContract {
  pub contract_id:     String,
  pub organization_id: String,
  pub player_id:       String,
  pub team_id:         String,
  pub position:        String,
  pub jersey_number:   Option<i64>,
  pub start_season_id: String,
  pub end_season_id:   Option<String>,
  pub created_at:      String,
}

impl RawContract {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      contract_id:     row.get(0)?,
      organization_id: row.get(1)?,
      player_id:       row.get(2)?,
      team_id:         row.get(3)?,
      position:        row.get(4)?,
      jersey_number:   row.get(5)?,
      start_season_id: row.get(6)?,
      end_season_id:   row.get(7)?,
      created_at:      row.get(8)?,
    })
  }

  pub fn into_contract(self) -> Result<Contract> {
    let jersey_number = self
      .jersey_number
      .map(|n| {
        u8::try_from(n).map_err(|_| Error::Decode {
          column: "contracts.jersey_number",
          value:  n.to_string(),
        })
      })
      .transpose()?;

    Ok(Contract {
      contract_id: decode_uuid(&self.contract_id)?,
      organization_id: decode_uuid(&self.organization_id)?,
      player_id: decode_uuid(&self.player_id)?,
      team_id: decode_uuid(&self.team_id)?,
      position: decode_position(&self.position)?,
      jersey_number,
      start_season_id: decode_uuid(&self.start_season_id)?,
      end_season_id: decode_opt_uuid(self.end_season_id)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const SUSPENSION_COLUMNS: &str = "suspension_id, organization_id, player_id, team_id, \
                                      suspension_type, suspended_games, served_games, reason, \
                                      game_event_id, game_id, created_at";

/// Raw values read directly from a `suspensions` row.
pub struct RawSuspension {
  pub suspension_id:   String,
  pub organization_id: String,
  pub player_id:       String,
  pub team_id:         String,
  pub suspension_type: String,
  pub suspended_games: i64,
  pub served_games:    i64,
  pub reason:          Option<String>,
  pub game_event_id:   Option<String>,
  pub game_id:         Option<String>,
  pub created_at:      String,
}

impl RawSuspension {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      suspension_id:   row.get(0)?,
      organization_id: row.get(1)?,
      player_id:       row.get(2)?,
      team_id:         row.get(3)?,
      suspension_type: row.get(4)?,
      suspended_games: row.get(5)?,
      served_games:    row.get(6)?,
      reason:          row.get(7)?,
      game_event_id:   row.get(8)?,
      game_id:         row.get(9)?,
      created_at:      row.get(10)?,
    })
  }

  pub fn into_suspension(self) -> Result<Suspension> {
    Ok(Suspension {
      suspension_id:   decode_uuid(&self.suspension_id)?,
      organization_id: decode_uuid(&self.organization_id)?,
      player_id:       decode_uuid(&self.player_id)?,
      team_id:         decode_uuid(&self.team_id)?,
      suspension_type: decode_suspension_type(&self.suspension_type)?,
      suspended_games: decode_count("suspensions.suspended_games", self.suspended_games)?,
      served_games:    decode_count("suspensions.served_games", self.served_games)?,
      reason:          self.reason,
      game_event_id:   decode_opt_uuid(self.game_event_id)?,
      game_id:         decode_opt_uuid(self.game_id)?,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}
