//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, NaiveDate, Utc};
use lineup_core::{
  Error as CoreError, ErrorKind, Scope,
  contract::{Contract, Position, SignPlayer, Transfer},
  eligibility::IneligibilityReason,
  game::{Game, GameStatus, NewGame},
  player::NewPlayer,
  season::{NewSeason, Season},
  store::LeagueStore,
  suspension::{
    GameEvent, GameEventKind, NewSuspension, PenaltyKind, SuspensionPolicy, SuspensionType,
    SuspensionUpdate,
  },
  timeline::CareerEvent,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn kind(err: &Error) -> Option<ErrorKind> {
  match err {
    Error::Core(e) => Some(e.kind()),
    _ => None,
  }
}

/// One organization with three consecutive seasons, two teams and a player.
struct League {
  store:  SqliteStore,
  scope:  Scope,
  s22:    Season,
  s23:    Season,
  s24:    Season,
  home:   Uuid,
  away:   Uuid,
  player: Uuid,
}

fn new_season(name: &str, year: i32) -> NewSeason {
  NewSeason {
    name:      name.to_owned(),
    starts_on: NaiveDate::from_ymd_opt(year, 9, 1).unwrap(),
    ends_on:   NaiveDate::from_ymd_opt(year + 1, 4, 30).unwrap(),
  }
}

async fn league() -> League {
  let store = store().await;
  let scope = Scope::new(Uuid::new_v4(), Uuid::new_v4());

  // Added out of order on purpose; the calendar sorts by date.
  let s23 = store.add_season(scope, new_season("2023-24", 2023)).await.unwrap();
  let s22 = store.add_season(scope, new_season("2022-23", 2022)).await.unwrap();
  let s24 = store.add_season(scope, new_season("2024-25", 2024)).await.unwrap();

  let home = store.add_team(scope, "Harbour Gulls".into()).await.unwrap().team_id;
  let away = store.add_team(scope, "Ridge Foxes".into()).await.unwrap().team_id;
  let player = store
    .add_player(scope, NewPlayer::new("Mika", "Lind"))
    .await
    .unwrap()
    .player_id;

  League { store, scope, s22, s23, s24, home, away, player }
}

impl League {
  async fn sign(&self, team_id: Uuid, season: &Season) -> Contract {
    self
      .store
      .sign_player(self.scope, SignPlayer {
        player_id: self.player,
        team_id,
        season_id: season.season_id,
        position: Position::Forward,
        jersey_number: Some(17),
      })
      .await
      .unwrap()
  }

  /// A game between the two teams `days` from now.
  async fn game(&self, season: &Season, days: i64) -> Game {
    self
      .store
      .schedule_game(self.scope, NewGame {
        season_id:    season.season_id,
        home_team_id: self.home,
        away_team_id: self.away,
        starts_at:    Utc::now() + Duration::days(days),
      })
      .await
      .unwrap()
  }

  async fn suspend(&self, games: u32) -> Uuid {
    self
      .store
      .issue_suspension(self.scope, NewSuspension {
        player_id:       self.player,
        team_id:         self.home,
        suspension_type: SuspensionType::Administrative,
        suspended_games: games,
        reason:          Some("conduct review".into()),
        game_event_id:   None,
        game_id:         None,
      })
      .await
      .unwrap()
      .suspension_id
  }

  fn event(&self, game_id: Uuid, penalty: PenaltyKind) -> GameEvent {
    GameEvent {
      game_event_id: Uuid::new_v4(),
      game_id,
      player_id: self.player,
      team_id: self.home,
      period: 2,
      clock_seconds: 754,
      kind: GameEventKind::Penalty { penalty, minutes: 10 },
      description: None,
    }
  }
}

// ─── Seasons and players ─────────────────────────────────────────────────────

#[tokio::test]
async fn seasons_are_listed_by_start_date() {
  let l = league().await;
  let names: Vec<_> = l
    .store
    .list_seasons(l.scope)
    .await
    .unwrap()
    .into_iter()
    .map(|s| s.name)
    .collect();
  assert_eq!(names, ["2022-23", "2023-24", "2024-25"]);
}

#[tokio::test]
async fn overlapping_season_is_rejected() {
  let l = league().await;
  let err = l
    .store
    .add_season(l.scope, NewSeason {
      name:      "Summer cup".into(),
      starts_on: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
      ends_on:   NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::OverlappingSeason(id)) if id == l.s22.season_id));
  assert_eq!(kind(&err), Some(ErrorKind::Conflict));
}

#[tokio::test]
async fn referenced_player_cannot_be_deleted() {
  let l = league().await;
  l.sign(l.home, &l.s22).await;

  let err = l.store.delete_player(l.scope, l.player).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::PlayerReferenced(_))));

  let free = l.store.add_player(l.scope, NewPlayer::new("Ola", "Berg")).await.unwrap();
  l.store.delete_player(l.scope, free.player_id).await.unwrap();
  assert!(l.store.get_player(l.scope, free.player_id).await.unwrap().is_none());
}

#[tokio::test]
async fn game_between_same_team_is_rejected() {
  let l = league().await;
  let err = l
    .store
    .schedule_game(l.scope, NewGame {
      season_id:    l.s22.season_id,
      home_team_id: l.home,
      away_team_id: l.home,
      starts_at:    Utc::now(),
    })
    .await
    .unwrap_err();
  assert_eq!(kind(&err), Some(ErrorKind::Validation));
}

// ─── Contracts ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn transfer_closes_old_contract_and_opens_new_one() {
  let l = league().await;
  let first = l.sign(l.home, &l.s22).await;

  let next = l
    .store
    .transfer(l.scope, first.contract_id, Transfer {
      new_team_id:         l.away,
      effective_season_id: l.s23.season_id,
      position:            None,
      jersey_number:       None,
    })
    .await
    .unwrap();
  assert_eq!(next.team_id, l.away);
  assert_eq!(next.start_season_id, l.s23.season_id);
  assert_eq!(next.position, Position::Forward);
  assert_eq!(next.jersey_number, None, "jersey does not follow to a new team");

  let history = l.store.contracts_for_player(l.scope, l.player).await.unwrap();
  assert_eq!(history.len(), 2);
  assert_eq!(history.iter().filter(|c| c.is_open()).count(), 1);
  let closed = history.iter().find(|c| c.contract_id == first.contract_id).unwrap();
  assert_eq!(closed.end_season_id, Some(l.s22.season_id));
}

#[tokio::test]
async fn second_open_contract_is_rejected() {
  let l = league().await;
  l.sign(l.home, &l.s22).await;

  let err = l
    .store
    .sign_player(l.scope, SignPlayer {
      player_id:     l.player,
      team_id:       l.away,
      season_id:     l.s23.season_id,
      position:      Position::Defense,
      jersey_number: None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::AlreadyContracted(_))));
  assert_eq!(kind(&err), Some(ErrorKind::Conflict));
}

#[tokio::test]
async fn failed_transfer_leaves_contract_open() {
  let l = league().await;
  let first = l.sign(l.home, &l.s22).await;

  let err = l
    .store
    .transfer(l.scope, first.contract_id, Transfer {
      new_team_id:         Uuid::new_v4(),
      effective_season_id: l.s23.season_id,
      position:            None,
      jersey_number:       None,
    })
    .await
    .unwrap_err();
  assert_eq!(kind(&err), Some(ErrorKind::NotFound));

  let history = l.store.contracts_for_player(l.scope, l.player).await.unwrap();
  assert_eq!(history.len(), 1);
  assert!(history[0].is_open());
}

#[tokio::test]
async fn transfer_must_start_after_contract_start() {
  let l = league().await;
  let first = l.sign(l.home, &l.s22).await;

  let err = l
    .store
    .transfer(l.scope, first.contract_id, Transfer {
      new_team_id:         l.away,
      effective_season_id: l.s22.season_id,
      position:            None,
      jersey_number:       None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::EffectiveSeasonTooEarly { .. })));
}

#[tokio::test]
async fn released_contract_cannot_be_transferred() {
  let l = league().await;
  let first = l.sign(l.home, &l.s22).await;

  let closed = l
    .store
    .release(l.scope, first.contract_id, l.s23.season_id)
    .await
    .unwrap();
  assert_eq!(closed.end_season_id, Some(l.s22.season_id));

  let err = l
    .store
    .transfer(l.scope, first.contract_id, Transfer {
      new_team_id:         l.away,
      effective_season_id: l.s24.season_id,
      position:            None,
      jersey_number:       None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::ContractNotOpen(_))));
}

#[tokio::test]
async fn free_agent_resigns_only_after_last_contract() {
  let l = league().await;
  let first = l.sign(l.home, &l.s22).await;
  l.store.release(l.scope, first.contract_id, l.s24.season_id).await.unwrap();

  let err = l
    .store
    .sign_player(l.scope, SignPlayer {
      player_id:     l.player,
      team_id:       l.away,
      season_id:     l.s23.season_id,
      position:      Position::Forward,
      jersey_number: None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::OverlappingContract { .. })));

  let again = l.sign(l.away, &l.s24).await;
  assert!(again.is_open());
}

#[tokio::test]
async fn roster_follows_contract_spans() {
  let l = league().await;
  let first = l.sign(l.home, &l.s22).await;
  l.store
    .transfer(l.scope, first.contract_id, Transfer {
      new_team_id:         l.away,
      effective_season_id: l.s23.season_id,
      position:            None,
      jersey_number:       Some(9),
    })
    .await
    .unwrap();

  let roster = |team: Uuid, season: Uuid| l.store.roster_for_season(l.scope, team, season);
  assert_eq!(roster(l.home, l.s22.season_id).await.unwrap().len(), 1);
  assert!(roster(l.home, l.s23.season_id).await.unwrap().is_empty());
  assert!(roster(l.away, l.s22.season_id).await.unwrap().is_empty());
  assert_eq!(roster(l.away, l.s23.season_id).await.unwrap()[0].jersey_number, Some(9));
  assert_eq!(roster(l.away, l.s24.season_id).await.unwrap().len(), 1, "open contract runs on");
}

// ─── Timeline ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn timeline_labels_career_moves() {
  let l = league().await;
  let first = l.sign(l.home, &l.s22).await;
  let second = l
    .store
    .transfer(l.scope, first.contract_id, Transfer {
      new_team_id:         l.home,
      effective_season_id: l.s23.season_id,
      position:            Some(Position::Defense),
      jersey_number:       None,
    })
    .await
    .unwrap();
  assert_eq!(second.jersey_number, Some(17), "jersey carries over within a team");
  l.store
    .transfer(l.scope, second.contract_id, Transfer {
      new_team_id:         l.away,
      effective_season_id: l.s24.season_id,
      position:            None,
      jersey_number:       None,
    })
    .await
    .unwrap();

  let events: Vec<_> = l
    .store
    .player_timeline(l.scope, l.player)
    .await
    .unwrap()
    .into_iter()
    .map(|e| e.event)
    .collect();
  assert_eq!(events, [CareerEvent::Signed, CareerEvent::PositionChange, CareerEvent::Active]);
}

#[tokio::test]
async fn timeline_of_unknown_player_is_not_found() {
  let l = league().await;
  let err = l.store.player_timeline(l.scope, Uuid::new_v4()).await.unwrap_err();
  assert_eq!(kind(&err), Some(ErrorKind::NotFound));
}

// ─── Suspensions and accrual ─────────────────────────────────────────────────

#[tokio::test]
async fn suspended_player_reports_remaining_games() {
  let l = league().await;
  l.sign(l.home, &l.s22).await;
  let suspension_id = l.suspend(3).await;

  let g1 = l.game(&l.s22, 1).await;
  let g2 = l.game(&l.s22, 2).await;
  let report = l.store.complete_game(l.scope, g1.game_id).await.unwrap();
  assert_eq!(report.credited, [suspension_id]);
  assert!(report.closed.is_empty());

  let verdict = l.store.is_eligible(l.scope, l.player, l.home, g2.game_id).await.unwrap();
  assert!(!verdict.eligible);
  assert_eq!(verdict.reason, Some(IneligibilityReason::Suspended {
    remaining_games: 2,
    suspension_ids:  vec![suspension_id],
  }));
}

#[tokio::test]
async fn serving_every_game_restores_eligibility() {
  let l = league().await;
  l.sign(l.home, &l.s22).await;
  let suspension_id = l.suspend(2).await;

  let games = [l.game(&l.s22, 1).await, l.game(&l.s22, 2).await, l.game(&l.s22, 3).await];
  l.store.complete_game(l.scope, games[0].game_id).await.unwrap();
  let report = l.store.complete_game(l.scope, games[1].game_id).await.unwrap();
  assert_eq!(report.closed, [suspension_id]);

  let served = l.store.get_suspension(l.scope, suspension_id).await.unwrap().unwrap();
  assert_eq!(served.served_games, 2);
  assert!(!served.is_active());
  assert!(
    l.store
      .active_suspensions_for_player(l.scope, l.player)
      .await
      .unwrap()
      .is_empty()
  );

  let verdict = l.store.is_eligible(l.scope, l.player, l.home, games[2].game_id).await.unwrap();
  assert!(verdict.eligible);
  assert_eq!(verdict.reason, None);
}

#[tokio::test]
async fn replayed_completion_credits_nothing() {
  let l = league().await;
  l.sign(l.home, &l.s22).await;
  let suspension_id = l.suspend(3).await;
  let g1 = l.game(&l.s22, 1).await;

  l.store.complete_game(l.scope, g1.game_id).await.unwrap();
  let replay = l.store.complete_game(l.scope, g1.game_id).await.unwrap();
  assert!(replay.credited.is_empty());
  assert_eq!(replay.already_applied, [suspension_id]);

  let again = l.store.accrue_service(l.scope, l.home, g1.game_id).await.unwrap();
  assert!(again.credited.is_empty());

  let s = l.store.get_suspension(l.scope, suspension_id).await.unwrap().unwrap();
  assert_eq!(s.served_games, 1);
  let game = l.store.get_game(l.scope, g1.game_id).await.unwrap().unwrap();
  assert_eq!(game.status, GameStatus::Completed);
}

#[tokio::test]
async fn accrual_for_a_team_that_did_not_play_is_rejected() {
  let l = league().await;
  let g1 = l.game(&l.s22, 1).await;
  let outsider = l.store.add_team(l.scope, "Valley Owls".into()).await.unwrap();
  let err = l
    .store
    .accrue_service(l.scope, outsider.team_id, g1.game_id)
    .await
    .unwrap_err();
  assert_eq!(kind(&err), Some(ErrorKind::Validation));
}

#[tokio::test]
async fn penalty_game_does_not_count_toward_its_own_suspension() {
  let l = league().await;
  l.sign(l.home, &l.s22).await;
  let g1 = l.game(&l.s22, 1).await;
  let g2 = l.game(&l.s22, 2).await;

  let event = l.event(g1.game_id, PenaltyKind::GameMisconduct);
  let suspension = l
    .store
    .issue_from_event(l.scope, event, SuspensionPolicy::default())
    .await
    .unwrap()
    .expect("game misconduct suspends");
  assert_eq!(suspension.suspension_type, SuspensionType::GameMisconduct);
  assert_eq!(suspension.game_id, Some(g1.game_id));

  let report = l.store.complete_game(l.scope, g1.game_id).await.unwrap();
  assert!(report.credited.is_empty());

  let for_game = l.store.suspensions_for_game(l.scope, g1.game_id).await.unwrap();
  assert_eq!(for_game.len(), 1);

  let report = l.store.complete_game(l.scope, g2.game_id).await.unwrap();
  assert_eq!(report.closed, [suspension.suspension_id]);
}

#[tokio::test]
async fn game_event_is_processed_once() {
  let l = league().await;
  let g1 = l.game(&l.s22, 1).await;
  let event = l.event(g1.game_id, PenaltyKind::MatchPenalty);
  let policy = SuspensionPolicy { match_penalty_games: 3, ..SuspensionPolicy::default() };

  let first = l.store.issue_from_event(l.scope, event.clone(), policy).await.unwrap().unwrap();
  let second = l.store.issue_from_event(l.scope, event, policy).await.unwrap().unwrap();
  assert_eq!(first.suspension_id, second.suspension_id);
  assert_eq!(first.suspended_games, 3);

  let minor = l.event(g1.game_id, PenaltyKind::Minor);
  assert!(l.store.issue_from_event(l.scope, minor, policy).await.unwrap().is_none());
  assert_eq!(l.store.suspensions_for_game(l.scope, g1.game_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn served_suspension_is_read_only() {
  let l = league().await;
  l.sign(l.home, &l.s22).await;
  let suspension_id = l.suspend(1).await;
  let g1 = l.game(&l.s22, 1).await;
  l.store.complete_game(l.scope, g1.game_id).await.unwrap();

  let err = l
    .store
    .update_suspension(l.scope, suspension_id, SuspensionUpdate {
      suspended_games: Some(4),
      ..SuspensionUpdate::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::SuspensionServed(_))));
  assert_eq!(kind(&err), Some(ErrorKind::InvalidState));

  l.store.delete_suspension(l.scope, suspension_id).await.unwrap();
  assert!(l.store.get_suspension(l.scope, suspension_id).await.unwrap().is_none());
}

#[tokio::test]
async fn active_suspension_can_be_extended() {
  let l = league().await;
  let suspension_id = l.suspend(1).await;

  let updated = l
    .store
    .update_suspension(l.scope, suspension_id, SuspensionUpdate {
      suspension_type: Some(SuspensionType::GrossMisconduct),
      suspended_games: Some(5),
      reason:          None,
    })
    .await
    .unwrap();
  assert_eq!(updated.suspended_games, 5);
  assert_eq!(updated.reason.as_deref(), Some("conduct review"));

  let stored = l.store.get_suspension(l.scope, suspension_id).await.unwrap().unwrap();
  assert_eq!(stored.suspension_type, SuspensionType::GrossMisconduct);
}

#[tokio::test]
async fn player_without_contract_is_not_on_roster() {
  let l = league().await;
  l.sign(l.home, &l.s22).await;
  let g1 = l.game(&l.s22, 1).await;

  let verdict = l.store.is_eligible(l.scope, l.player, l.away, g1.game_id).await.unwrap();
  assert_eq!(verdict.reason, Some(IneligibilityReason::NotOnRoster));

  let later = l.game(&l.s23, 1).await;
  let verdict = l.store.is_eligible(l.scope, l.player, l.home, later.game_id).await.unwrap();
  assert!(verdict.eligible, "open contract covers later seasons");
}

// ─── Tenant isolation ────────────────────────────────────────────────────────

#[tokio::test]
async fn other_organization_sees_nothing() {
  let l = league().await;
  let contract = l.sign(l.home, &l.s22).await;
  let suspension_id = l.suspend(2).await;
  let stranger = Scope::new(Uuid::new_v4(), Uuid::new_v4());

  assert!(l.store.get_player(stranger, l.player).await.unwrap().is_none());
  assert!(l.store.get_team(stranger, l.home).await.unwrap().is_none());
  assert!(l.store.list_seasons(stranger).await.unwrap().is_empty());
  assert!(l.store.get_suspension(stranger, suspension_id).await.unwrap().is_none());
  assert!(l.store.contracts_for_player(stranger, l.player).await.unwrap().is_empty());

  let err = l
    .store
    .release(stranger, contract.contract_id, l.s23.season_id)
    .await
    .unwrap_err();
  assert_eq!(kind(&err), Some(ErrorKind::NotFound));

  let err = l.store.delete_suspension(stranger, suspension_id).await.unwrap_err();
  assert_eq!(kind(&err), Some(ErrorKind::NotFound));

  // Seasons are per organization, so the same dates are free elsewhere.
  l.store.add_season(stranger, new_season("2022-23", 2022)).await.unwrap();
}
