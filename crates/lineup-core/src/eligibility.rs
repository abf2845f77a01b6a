//! Eligibility: may this player be fielded for this team in this game?
//!
//! A read-only decision over the contract history and the player's active
//! suspensions. Checking eligibility never advances suspension service; only
//! game completion does.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  contract::Contract,
  game::Game,
  season::SeasonCalendar,
  suspension::Suspension,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IneligibilityReason {
  /// No contract with the team covers the game's season.
  NotOnRoster,
  /// Active suspensions incurred with the team still have games to serve.
  Suspended {
    /// Sum of remaining games across `suspension_ids`.
    remaining_games: u32,
    suspension_ids:  Vec<Uuid>,
  },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
  pub eligible: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reason:   Option<IneligibilityReason>,
}

impl Eligibility {
  pub fn eligible() -> Self { Self { eligible: true, reason: None } }

  pub fn ineligible(reason: IneligibilityReason) -> Self {
    Self { eligible: false, reason: Some(reason) }
  }

  pub fn remaining_games(&self) -> Option<u32> {
    match &self.reason {
      Some(IneligibilityReason::Suspended { remaining_games, .. }) => Some(*remaining_games),
      _ => None,
    }
  }
}

/// Decide eligibility of `player_id` for `team_id` in `game`.
///
/// `contracts` is the player's contract history and `suspensions` the
/// player's suspensions; entries for other players are ignored.
pub fn resolve(
  player_id: Uuid,
  team_id: Uuid,
  game: &Game,
  calendar: &SeasonCalendar,
  contracts: &[Contract],
  suspensions: &[Suspension],
) -> Eligibility {
  let on_roster = contracts.iter().any(|c| {
    c.player_id == player_id && c.team_id == team_id && c.covers(calendar, game.season_id)
  });
  if !on_roster {
    return Eligibility::ineligible(IneligibilityReason::NotOnRoster);
  }

  let blocking: Vec<&Suspension> = suspensions
    .iter()
    .filter(|s| s.player_id == player_id && s.team_id == team_id)
    .filter(|s| s.remaining_games() >= 1)
    .collect();
  if blocking.is_empty() {
    return Eligibility::eligible();
  }

  Eligibility::ineligible(IneligibilityReason::Suspended {
    remaining_games: blocking.iter().map(|s| s.remaining_games()).sum(),
    suspension_ids:  blocking.iter().map(|s| s.suspension_id).collect(),
  })
}
