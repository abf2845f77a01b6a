//! Contracts: a player's association with one team over a span of seasons.
//!
//! A contract whose `end_season_id` is `None` is *open*: it names the
//! player's current team. A player holds at most one open contract. Starting
//! a new contract always closes the previous open one, so spans of different
//! teams never overlap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  season::SeasonCalendar,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
  Forward,
  Defense,
  Goalie,
}

impl Position {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Forward => "forward",
      Self::Defense => "defense",
      Self::Goalie => "goalie",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "forward" => Some(Self::Forward),
      "defense" => Some(Self::Defense),
      "goalie" => Some(Self::Goalie),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
  pub contract_id:     Uuid,
  pub organization_id: Uuid,
  pub player_id:       Uuid,
  pub team_id:         Uuid,
  pub position:        Position,
  /// Uniqueness per team and season is the roster screen's concern.
  pub jersey_number:   Option<u8>,
  pub start_season_id: Uuid,
  /// `None` while the contract is open.
  pub end_season_id:   Option<Uuid>,
  pub created_at:      DateTime<Utc>,
}

impl Contract {
  pub fn is_open(&self) -> bool { self.end_season_id.is_none() }

  /// Whether this contract's span includes `season_id`.
  pub fn covers(&self, calendar: &SeasonCalendar, season_id: Uuid) -> bool {
    calendar.covers(self.start_season_id, self.end_season_id, season_id)
  }

  /// The season this contract ends with when it stops being effective from
  /// `effective_season_id` onward: the season immediately preceding it.
  ///
  /// The effective season must start strictly after this contract's start
  /// season, otherwise the closed span would end before it begins.
  pub fn closing_season(
    &self,
    calendar: &SeasonCalendar,
    effective_season_id: Uuid,
  ) -> Result<Uuid> {
    let effective = calendar.require(effective_season_id)?;
    let start = calendar.require(self.start_season_id)?;
    if effective.starts_on <= start.starts_on {
      return Err(Error::EffectiveSeasonTooEarly {
        contract:  self.contract_id,
        effective: effective_season_id,
      });
    }
    calendar
      .preceding(effective_season_id)
      .map(|s| s.season_id)
      .ok_or(Error::EffectiveSeasonTooEarly {
        contract:  self.contract_id,
        effective: effective_season_id,
      })
  }
}

/// Reject a new contract for `player_id` beginning in `start_season_id` if
/// any of the player's closed contracts ends in or after that season.
///
/// Open contracts are handled separately: signing requires there be none,
/// and a transfer closes it first.
pub fn ensure_starts_after_history(
  calendar: &SeasonCalendar,
  player_id: Uuid,
  history: &[Contract],
  start_season_id: Uuid,
) -> Result<()> {
  let starts_on = calendar.require(start_season_id)?.starts_on;
  let clash = history
    .iter()
    .filter(|c| c.player_id == player_id)
    .filter_map(|c| c.end_season_id)
    .filter_map(|end| calendar.starts_on(end))
    .any(|ended| ended >= starts_on);
  if clash {
    return Err(Error::OverlappingContract {
      player: player_id,
      season: start_season_id,
    });
  }
  Ok(())
}

fn validate_jersey(jersey_number: Option<u8>) -> Result<()> {
  match jersey_number {
    Some(n) if n > 99 => Err(Error::Validation(format!(
      "jersey number {n} is outside 0-99"
    ))),
    _ => Ok(()),
  }
}

// ─── Command inputs ──────────────────────────────────────────────────────────

/// Input to [`crate::store::LeagueStore::sign_player`].
#[derive(Debug, Clone, Deserialize)]
pub struct SignPlayer {
  pub player_id:     Uuid,
  pub team_id:       Uuid,
  pub season_id:     Uuid,
  pub position:      Position,
  pub jersey_number: Option<u8>,
}

impl SignPlayer {
  pub fn validate(&self) -> Result<()> { validate_jersey(self.jersey_number) }
}

/// Input to [`crate::store::LeagueStore::transfer`].
///
/// `position` and `jersey_number` default to the closed contract's values.
#[derive(Debug, Clone, Deserialize)]
pub struct Transfer {
  pub new_team_id:         Uuid,
  pub effective_season_id: Uuid,
  pub position:            Option<Position>,
  pub jersey_number:       Option<u8>,
}

impl Transfer {
  pub fn validate(&self) -> Result<()> { validate_jersey(self.jersey_number) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::season::tests::season;

  fn contract(player: Uuid, start: Uuid, end: Option<Uuid>) -> Contract {
    Contract {
      contract_id:     Uuid::new_v4(),
      organization_id: Uuid::nil(),
      player_id:       player,
      team_id:         Uuid::new_v4(),
      position:        Position::Forward,
      jersey_number:   None,
      start_season_id: start,
      end_season_id:   end,
      created_at:      Utc::now(),
    }
  }

  #[test]
  fn position_roundtrips_through_str() {
    for p in [Position::Forward, Position::Defense, Position::Goalie] {
      assert_eq!(Position::parse(p.as_str()), Some(p));
    }
    assert_eq!(Position::parse("winger"), None);
  }

  #[test]
  fn closing_season_is_the_one_before_effective() {
    let (a, b, c) = (season("21", 2021), season("22", 2022), season("23", 2023));
    let cal = SeasonCalendar::new(vec![a.clone(), b.clone(), c.clone()]);
    let k = contract(Uuid::new_v4(), a.season_id, None);

    assert_eq!(k.closing_season(&cal, c.season_id).unwrap(), b.season_id);
    assert_eq!(k.closing_season(&cal, b.season_id).unwrap(), a.season_id);
  }

  #[test]
  fn closing_season_rejects_effective_at_or_before_start() {
    let (a, b) = (season("21", 2021), season("22", 2022));
    let cal = SeasonCalendar::new(vec![a.clone(), b.clone()]);
    let k = contract(Uuid::new_v4(), b.season_id, None);

    assert!(matches!(
      k.closing_season(&cal, b.season_id),
      Err(Error::EffectiveSeasonTooEarly { .. })
    ));
    assert!(matches!(
      k.closing_season(&cal, a.season_id),
      Err(Error::EffectiveSeasonTooEarly { .. })
    ));
  }

  #[test]
  fn new_contract_must_start_after_closed_history() {
    let (a, b, c) = (season("21", 2021), season("22", 2022), season("23", 2023));
    let cal = SeasonCalendar::new(vec![a.clone(), b.clone(), c.clone()]);
    let player = Uuid::new_v4();
    let history = vec![contract(player, a.season_id, Some(b.season_id))];

    assert!(ensure_starts_after_history(&cal, player, &history, c.season_id).is_ok());
    assert!(matches!(
      ensure_starts_after_history(&cal, player, &history, b.season_id),
      Err(Error::OverlappingContract { .. })
    ));
  }

  #[test]
  fn jersey_number_bounds() {
    let sign = SignPlayer {
      player_id:     Uuid::new_v4(),
      team_id:       Uuid::new_v4(),
      season_id:     Uuid::new_v4(),
      position:      Position::Goalie,
      jersey_number: Some(100),
    };
    assert!(matches!(sign.validate(), Err(Error::Validation(_))));
  }
}
