//! Error types for `lineup-core`.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// The kinds of record an error can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
  Player,
  Team,
  Season,
  Contract,
  Suspension,
  Game,
}

impl fmt::Display for Entity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Player => "player",
      Self::Team => "team",
      Self::Season => "season",
      Self::Contract => "contract",
      Self::Suspension => "suspension",
      Self::Game => "game",
    })
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// The record does not exist, or belongs to another organization.
  #[error("{0} not found: {1}")]
  NotFound(Entity, Uuid),

  #[error("contract {0} is not open")]
  ContractNotOpen(Uuid),

  #[error("player {0} already has an open contract")]
  AlreadyContracted(Uuid),

  #[error("effective season {effective} does not start after contract {contract} begins")]
  EffectiveSeasonTooEarly { contract: Uuid, effective: Uuid },

  #[error("contract for player {player} starting in season {season} overlaps an earlier contract")]
  OverlappingContract { player: Uuid, season: Uuid },

  #[error("season overlaps existing season {0}")]
  OverlappingSeason(Uuid),

  #[error("contract {0} was modified concurrently")]
  ConcurrentModification(Uuid),

  #[error("player {0} is still referenced by contracts or suspensions")]
  PlayerReferenced(Uuid),

  #[error("suspension {0} is fully served and can no longer be edited")]
  SuspensionServed(Uuid),

  #[error("invalid input: {0}")]
  Validation(String),
}

/// The user-facing failure class of an [`Error`]. `Internal` is reserved for
/// backend failures that carry no domain error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  NotFound,
  Conflict,
  InvalidState,
  Validation,
  Internal,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::NotFound(..) | Self::ContractNotOpen(_) => ErrorKind::NotFound,
      Self::AlreadyContracted(_)
      | Self::EffectiveSeasonTooEarly { .. }
      | Self::OverlappingContract { .. }
      | Self::OverlappingSeason(_)
      | Self::ConcurrentModification(_)
      | Self::PlayerReferenced(_) => ErrorKind::Conflict,
      Self::SuspensionServed(_) => ErrorKind::InvalidState,
      Self::Validation(_) => ErrorKind::Validation,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
