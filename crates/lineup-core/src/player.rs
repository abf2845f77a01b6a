//! Players and teams: the two identities a contract connects.
//!
//! A player is never owned by a team. Which team a player belongs to at any
//! point is answered by the contract history, not by a field on either side.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
  pub player_id:       Uuid,
  pub organization_id: Uuid,
  pub first_name:      String,
  pub last_name:       String,
  pub date_of_birth:   Option<NaiveDate>,
  /// ISO 3166 alpha-2/alpha-3 code or free text; not validated.
  pub nationality:     Option<String>,
  /// Path or URL of the player photo; storage is handled elsewhere.
  pub photo:           Option<String>,
  pub created_at:      DateTime<Utc>,
}

impl Player {
  pub fn full_name(&self) -> String { format!("{} {}", self.first_name, self.last_name) }

  /// Age in whole years on `as_of`, if the date of birth is known.
  pub fn age(&self, as_of: NaiveDate) -> Option<u32> {
    self.date_of_birth.map(|dob| age(dob, as_of))
  }
}

/// Input to [`crate::store::LeagueStore::add_player`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewPlayer {
  pub first_name:    String,
  pub last_name:     String,
  pub date_of_birth: Option<NaiveDate>,
  pub nationality:   Option<String>,
  pub photo:         Option<String>,
}

impl NewPlayer {
  pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
    Self {
      first_name:    first_name.into(),
      last_name:     last_name.into(),
      date_of_birth: None,
      nationality:   None,
      photo:         None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
  pub team_id:         Uuid,
  pub organization_id: Uuid,
  pub name:            String,
  pub created_at:      DateTime<Utc>,
}

/// Whole years elapsed between `dob` and `as_of`; zero if `as_of` precedes
/// `dob`.
pub fn age(dob: NaiveDate, as_of: NaiveDate) -> u32 {
  if as_of < dob {
    return 0;
  }
  let mut years = as_of.year() - dob.year();
  if (as_of.month(), as_of.day()) < (dob.month(), dob.day()) {
    years -= 1;
  }
  years.max(0) as u32
}
