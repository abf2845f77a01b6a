//! Career timeline: a player's contract history narrated as events.
//!
//! Classification is a pure function of the stored contracts and the season
//! calendar. The same history always yields the same timeline, whatever
//! order the contracts were loaded in.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{contract::Contract, season::SeasonCalendar};

/// The career event a contract represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CareerEvent {
  /// First known contract, or a re-signing with the same team in the same
  /// role.
  Signed,
  /// Moved from a different team.
  Transfer,
  /// Same team, new position.
  PositionChange,
  /// The open contract. Takes precedence over how it began.
  Active,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
  pub contract: Contract,
  pub event:    CareerEvent,
}

/// Chronological order: start season, then creation time, then id so ties
/// between identical backfills stay deterministic. Contracts whose start
/// season is missing from the calendar sort last.
fn chronological(calendar: &SeasonCalendar, a: &Contract, b: &Contract) -> Ordering {
  let start = |c: &Contract| calendar.starts_on(c.start_season_id);
  match (start(a), start(b)) {
    (Some(x), Some(y)) => x.cmp(&y),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  }
  .then_with(|| a.created_at.cmp(&b.created_at))
  .then_with(|| a.contract_id.cmp(&b.contract_id))
}

/// Label each contract and return the entries oldest first.
pub fn classify(mut contracts: Vec<Contract>, calendar: &SeasonCalendar) -> Vec<TimelineEntry> {
  contracts.sort_by(|a, b| chronological(calendar, a, b));

  let mut entries: Vec<TimelineEntry> = Vec::with_capacity(contracts.len());
  for contract in contracts {
    let event = if contract.is_open() {
      CareerEvent::Active
    } else {
      match entries.last() {
        None => CareerEvent::Signed,
        Some(prev) if prev.contract.team_id != contract.team_id => CareerEvent::Transfer,
        Some(prev) if prev.contract.position != contract.position => {
          CareerEvent::PositionChange
        }
        Some(_) => CareerEvent::Signed,
      }
    };
    entries.push(TimelineEntry { contract, event });
  }
  entries
}
