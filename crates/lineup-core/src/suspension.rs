//! Suspensions: disciplinary sanctions counted in games.
//!
//! A suspension is *active* while `served_games < suspended_games` and
//! closed once the two are equal. Served history is immutable: an edit is
//! only accepted while the suspension is active.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuspensionType {
  MatchPenalty,
  GameMisconduct,
  GrossMisconduct,
  /// Issued by league officials outside any game.
  Administrative,
}

impl SuspensionType {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::MatchPenalty => "match_penalty",
      Self::GameMisconduct => "game_misconduct",
      Self::GrossMisconduct => "gross_misconduct",
      Self::Administrative => "administrative",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "match_penalty" => Some(Self::MatchPenalty),
      "game_misconduct" => Some(Self::GameMisconduct),
      "gross_misconduct" => Some(Self::GrossMisconduct),
      "administrative" => Some(Self::Administrative),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suspension {
  pub suspension_id:   Uuid,
  pub organization_id: Uuid,
  pub player_id:       Uuid,
  /// The team the player was playing for when suspended. Only that team's
  /// games count toward service.
  pub team_id:         Uuid,
  pub suspension_type: SuspensionType,
  pub suspended_games: u32,
  pub served_games:    u32,
  pub reason:          Option<String>,
  /// The infraction that triggered the suspension, if any.
  pub game_event_id:   Option<Uuid>,
  /// The game `game_event_id` belongs to.
  pub game_id:         Option<Uuid>,
  pub created_at:      DateTime<Utc>,
}

impl Suspension {
  pub fn is_active(&self) -> bool { self.served_games < self.suspended_games }

  pub fn remaining_games(&self) -> u32 {
    self.suspended_games.saturating_sub(self.served_games)
  }

  /// Whether a completed `game_id` that started at `starts_at` counts toward
  /// this suspension.
  ///
  /// The suspension must predate the game, and the game in which the
  /// infraction happened never counts.
  pub fn credited_by(&self, game_id: Uuid, starts_at: DateTime<Utc>) -> bool {
    self.is_active() && self.created_at < starts_at && self.game_id != Some(game_id)
  }
}

/// Input to [`crate::store::LeagueStore::issue_suspension`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewSuspension {
  pub player_id:       Uuid,
  pub team_id:         Uuid,
  pub suspension_type: SuspensionType,
  pub suspended_games: u32,
  pub reason:          Option<String>,
  pub game_event_id:   Option<Uuid>,
  pub game_id:         Option<Uuid>,
}

impl NewSuspension {
  pub fn validate(&self) -> Result<()> {
    validate_games(self.suspended_games)?;
    if self.game_event_id.is_some() != self.game_id.is_some() {
      return Err(Error::Validation(
        "game_event_id and game_id must be given together".into(),
      ));
    }
    Ok(())
  }
}

/// Editable fields of an active suspension. `None` leaves a field as is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuspensionUpdate {
  pub suspension_type: Option<SuspensionType>,
  pub suspended_games: Option<u32>,
  pub reason:          Option<String>,
}

impl SuspensionUpdate {
  /// Apply the edit to `current`, enforcing that served history stays
  /// immutable and `served_games <= suspended_games` still holds.
  pub fn apply(self, current: &Suspension) -> Result<Suspension> {
    if !current.is_active() {
      return Err(Error::SuspensionServed(current.suspension_id));
    }
    let mut next = current.clone();
    if let Some(t) = self.suspension_type {
      next.suspension_type = t;
    }
    if let Some(games) = self.suspended_games {
      validate_games(games)?;
      if games < current.served_games {
        return Err(Error::Validation(format!(
          "suspended_games {games} is below the {} games already served",
          current.served_games
        )));
      }
      next.suspended_games = games;
    }
    if let Some(reason) = self.reason {
      next.reason = Some(reason);
    }
    Ok(next)
  }
}

fn validate_games(games: u32) -> Result<()> {
  if games < 1 {
    return Err(Error::Validation("suspended_games must be at least 1".into()));
  }
  Ok(())
}

// ─── Derivation from game events ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyKind {
  Minor,
  Major,
  Misconduct,
  GameMisconduct,
  MatchPenalty,
  GrossMisconduct,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEventKind {
  Penalty { penalty: PenaltyKind, minutes: u32 },
  Goal,
  Other,
}

/// An in-game occurrence reported by the game-reporting subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
  pub game_event_id: Uuid,
  pub game_id:       Uuid,
  pub player_id:     Uuid,
  pub team_id:       Uuid,
  pub period:        u8,
  /// Elapsed game clock within the period.
  pub clock_seconds: u32,
  pub kind:          GameEventKind,
  pub description:   Option<String>,
}

/// Games a qualifying penalty suspends a player for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuspensionPolicy {
  pub match_penalty_games:    u32,
  pub game_misconduct_games:  u32,
  pub gross_misconduct_games: u32,
}

impl Default for SuspensionPolicy {
  fn default() -> Self {
    Self {
      match_penalty_games:    1,
      game_misconduct_games:  1,
      gross_misconduct_games: 1,
    }
  }
}

impl SuspensionPolicy {
  /// The suspension a game event triggers, if any.
  pub fn derive(&self, event: &GameEvent) -> Option<NewSuspension> {
    let GameEventKind::Penalty { penalty, minutes } = event.kind else {
      return None;
    };
    let (suspension_type, games) = match penalty {
      PenaltyKind::MatchPenalty => (SuspensionType::MatchPenalty, self.match_penalty_games),
      PenaltyKind::GameMisconduct => (SuspensionType::GameMisconduct, self.game_misconduct_games),
      PenaltyKind::GrossMisconduct => {
        (SuspensionType::GrossMisconduct, self.gross_misconduct_games)
      }
      PenaltyKind::Minor | PenaltyKind::Major | PenaltyKind::Misconduct => return None,
    };
    if games == 0 {
      return None;
    }
    Some(NewSuspension {
      player_id:       event.player_id,
      team_id:         event.team_id,
      suspension_type,
      suspended_games: games,
      reason:          event.description.clone().or_else(|| {
        Some(format!(
          "{} ({minutes} min), period {} at {}:{:02}",
          suspension_type.as_str(),
          event.period,
          event.clock_seconds / 60,
          event.clock_seconds % 60
        ))
      }),
      game_event_id:   Some(event.game_event_id),
      game_id:         Some(event.game_id),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn suspension(suspended: u32, served: u32) -> Suspension {
    Suspension {
      suspension_id:   Uuid::new_v4(),
      organization_id: Uuid::nil(),
      player_id:       Uuid::new_v4(),
      team_id:         Uuid::new_v4(),
      suspension_type: SuspensionType::GameMisconduct,
      suspended_games: suspended,
      served_games:    served,
      reason:          None,
      game_event_id:   None,
      game_id:         None,
      created_at:      Utc::now(),
    }
  }

  fn penalty(penalty: PenaltyKind, minutes: u32) -> GameEvent {
    GameEvent {
      game_event_id: Uuid::new_v4(),
      game_id:       Uuid::new_v4(),
      player_id:     Uuid::new_v4(),
      team_id:       Uuid::new_v4(),
      period:        2,
      clock_seconds: 754,
      kind:          GameEventKind::Penalty { penalty, minutes },
      description:   None,
    }
  }

  #[test]
  fn active_and_remaining() {
    let s = suspension(3, 1);
    assert!(s.is_active());
    assert_eq!(s.remaining_games(), 2);
    assert!(!suspension(2, 2).is_active());
  }

  #[test]
  fn update_rejected_once_served() {
    let served = suspension(2, 2);
    let err = SuspensionUpdate { suspended_games: Some(4), ..Default::default() }
      .apply(&served)
      .unwrap_err();
    assert!(matches!(err, Error::SuspensionServed(id) if id == served.suspension_id));
  }

  #[test]
  fn update_cannot_drop_below_served() {
    let s = suspension(5, 3);
    let err = SuspensionUpdate { suspended_games: Some(2), ..Default::default() }
      .apply(&s)
      .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let ok = SuspensionUpdate {
      suspended_games: Some(3),
      reason: Some("reduced on appeal".into()),
      ..Default::default()
    }
    .apply(&s)
    .unwrap();
    assert_eq!(ok.suspended_games, 3);
    assert!(!ok.is_active());
    assert_eq!(ok.reason.as_deref(), Some("reduced on appeal"));
  }

  #[test]
  fn zero_games_is_invalid() {
    let input = NewSuspension {
      player_id:       Uuid::new_v4(),
      team_id:         Uuid::new_v4(),
      suspension_type: SuspensionType::Administrative,
      suspended_games: 0,
      reason:          None,
      game_event_id:   None,
      game_id:         None,
    };
    assert!(matches!(input.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn origin_game_never_credits() {
    let mut s = suspension(2, 0);
    let origin = Uuid::new_v4();
    s.game_id = Some(origin);
    let later = s.created_at + chrono::Duration::hours(1);
    assert!(!s.credited_by(origin, later));
    assert!(s.credited_by(Uuid::new_v4(), later));
    assert!(!s.credited_by(Uuid::new_v4(), s.created_at));
  }

  #[test]
  fn policy_derives_from_qualifying_penalties() {
    let policy = SuspensionPolicy { game_misconduct_games: 2, ..Default::default() };

    let event = penalty(PenaltyKind::GameMisconduct, 10);
    let derived = policy.derive(&event).unwrap();
    assert_eq!(derived.suspension_type, SuspensionType::GameMisconduct);
    assert_eq!(derived.suspended_games, 2);
    assert_eq!(derived.game_event_id, Some(event.game_event_id));
    assert_eq!(derived.game_id, Some(event.game_id));
    assert_eq!(
      derived.reason.as_deref(),
      Some("game_misconduct (10 min), period 2 at 12:34")
    );

    assert!(policy.derive(&penalty(PenaltyKind::Minor, 2)).is_none());
    assert!(policy.derive(&penalty(PenaltyKind::Misconduct, 10)).is_none());
  }

  #[test]
  fn zero_game_policy_derives_nothing() {
    let policy = SuspensionPolicy { match_penalty_games: 0, ..Default::default() };
    assert!(policy.derive(&penalty(PenaltyKind::MatchPenalty, 5)).is_none());
  }
}
