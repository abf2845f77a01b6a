//! Seasons and the calendar that orders them.
//!
//! Seasons within one organization never overlap and are totally ordered by
//! start date. Contract spans are expressed as season ids, so every question
//! of the form "does this span include that season" goes through
//! [`SeasonCalendar`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Entity, Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
  pub season_id:       Uuid,
  pub organization_id: Uuid,
  pub name:            String,
  pub starts_on:       NaiveDate,
  pub ends_on:         NaiveDate,
  pub created_at:      DateTime<Utc>,
}

impl Season {
  /// Whether the closed date ranges of the two seasons intersect.
  pub fn overlaps(&self, starts_on: NaiveDate, ends_on: NaiveDate) -> bool {
    self.starts_on <= ends_on && starts_on <= self.ends_on
  }
}

/// Input to [`crate::store::LeagueStore::add_season`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewSeason {
  pub name:      String,
  pub starts_on: NaiveDate,
  pub ends_on:   NaiveDate,
}

impl NewSeason {
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::Validation("season name must not be empty".into()));
    }
    if self.ends_on < self.starts_on {
      return Err(Error::Validation(format!(
        "season ends on {} before it starts on {}",
        self.ends_on, self.starts_on
      )));
    }
    Ok(())
  }
}

// ─── Calendar ────────────────────────────────────────────────────────────────

/// The seasons of one organization, ordered by start date.
#[derive(Debug, Clone, Default)]
pub struct SeasonCalendar {
  seasons: Vec<Season>,
}

impl SeasonCalendar {
  pub fn new(mut seasons: Vec<Season>) -> Self {
    seasons.sort_by(|a, b| {
      a.starts_on
        .cmp(&b.starts_on)
        .then_with(|| a.season_id.cmp(&b.season_id))
    });
    Self { seasons }
  }

  pub fn seasons(&self) -> &[Season] { &self.seasons }

  pub fn get(&self, season_id: Uuid) -> Option<&Season> {
    self.seasons.iter().find(|s| s.season_id == season_id)
  }

  /// Like [`Self::get`], but a missing season is a `NotFound` error.
  pub fn require(&self, season_id: Uuid) -> Result<&Season> {
    self
      .get(season_id)
      .ok_or(Error::NotFound(Entity::Season, season_id))
  }

  pub fn starts_on(&self, season_id: Uuid) -> Option<NaiveDate> {
    self.get(season_id).map(|s| s.starts_on)
  }

  /// The latest season starting before `season_id` starts.
  pub fn preceding(&self, season_id: Uuid) -> Option<&Season> {
    let starts_on = self.starts_on(season_id)?;
    self
      .seasons
      .iter()
      .rev()
      .find(|s| s.starts_on < starts_on)
  }

  /// Whether the span `[start, end]` (open-ended when `end` is `None`)
  /// includes `target`. Unknown seasons never match.
  pub fn covers(&self, start: Uuid, end: Option<Uuid>, target: Uuid) -> bool {
    let (Some(from), Some(at)) = (self.starts_on(start), self.starts_on(target)) else {
      return false;
    };
    if at < from {
      return false;
    }
    match end {
      None => true,
      Some(end) => self.starts_on(end).is_some_and(|until| at <= until),
    }
  }

  /// The first existing season whose dates intersect the given range.
  pub fn overlapping(&self, starts_on: NaiveDate, ends_on: NaiveDate) -> Option<&Season> {
    self.seasons.iter().find(|s| s.overlaps(starts_on, ends_on))
  }
}
