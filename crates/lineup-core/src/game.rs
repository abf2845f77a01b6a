//! Games as seen by the eligibility engine.
//!
//! The game-reporting subsystem owns games; this record keeps only what
//! eligibility and serving accrual need: the season, the two teams, the
//! start instant and whether the game has been completed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
  Scheduled,
  Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
  pub game_id:         Uuid,
  pub organization_id: Uuid,
  pub season_id:       Uuid,
  pub home_team_id:    Uuid,
  pub away_team_id:    Uuid,
  pub starts_at:       DateTime<Utc>,
  pub status:          GameStatus,
}

impl Game {
  pub fn involves(&self, team_id: Uuid) -> bool {
    self.home_team_id == team_id || self.away_team_id == team_id
  }
}

/// Input to [`crate::store::LeagueStore::schedule_game`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewGame {
  pub season_id:    Uuid,
  pub home_team_id: Uuid,
  pub away_team_id: Uuid,
  pub starts_at:    DateTime<Utc>,
}

impl NewGame {
  pub fn validate(&self) -> Result<()> {
    if self.home_team_id == self.away_team_id {
      return Err(Error::Validation("a team cannot play itself".into()));
    }
    Ok(())
  }
}

/// Outcome of applying one completed game to the suspension ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualReport {
  pub game_id:         Uuid,
  /// Suspensions whose `served_games` advanced by one.
  pub credited:        Vec<Uuid>,
  /// The subset of `credited` that became fully served.
  pub closed:          Vec<Uuid>,
  /// Suspensions this game had already been credited to; left untouched.
  pub already_applied: Vec<Uuid>,
}

impl AccrualReport {
  pub fn new(game_id: Uuid) -> Self { Self { game_id, ..Default::default() } }

  pub fn merge(&mut self, other: AccrualReport) {
    self.credited.extend(other.credited);
    self.closed.extend(other.closed);
    self.already_applied.extend(other.already_applied);
  }
}
