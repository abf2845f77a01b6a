//! Handlers for `/players` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/players` | Body: [`NewPlayer`]; returns 201 |
//! | `GET`    | `/players/:id` | Player plus current age |
//! | `DELETE` | `/players/:id` | 409 while contracts or suspensions reference them |
//! | `GET`    | `/players/:id/contracts` | Full contract history |
//! | `GET`    | `/players/:id/timeline` | Classified career events, oldest first |
//! | `GET`    | `/players/:id/suspensions` | Active suspensions only |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use lineup_core::{
  contract::Contract,
  player::{NewPlayer, Player},
  store::LeagueStore,
  suspension::Suspension,
  timeline::TimelineEntry,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{ApiState, Tenant, error::ApiError};

/// A player as returned by the API, with age derived as of today.
#[derive(Debug, Serialize)]
pub struct PlayerView {
  #[serde(flatten)]
  pub player: Player,
  pub age:    Option<u32>,
}

impl From<Player> for PlayerView {
  fn from(player: Player) -> Self {
    let age = player.age(Utc::now().date_naive());
    Self { player, age }
  }
}

/// `POST /players`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Json(body): Json<NewPlayer>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeagueStore,
{
  let player = state.store.add_player(scope, body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(PlayerView::from(player))))
}

/// `GET /players/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Path(id): Path<Uuid>,
) -> Result<Json<PlayerView>, ApiError>
where
  S: LeagueStore,
{
  let player = state
    .store
    .get_player(scope, id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("player {id} not found")))?;
  Ok(Json(player.into()))
}

/// `DELETE /players/:id`
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: LeagueStore,
{
  state.store.delete_player(scope, id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /players/:id/contracts`
pub async fn contracts<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Contract>>, ApiError>
where
  S: LeagueStore,
{
  let contracts = state
    .store
    .contracts_for_player(scope, id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(contracts))
}

/// `GET /players/:id/timeline`
pub async fn timeline<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<TimelineEntry>>, ApiError>
where
  S: LeagueStore,
{
  let entries = state.store.player_timeline(scope, id).await.map_err(ApiError::store)?;
  Ok(Json(entries))
}

/// `GET /players/:id/suspensions`
pub async fn active_suspensions<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Suspension>>, ApiError>
where
  S: LeagueStore,
{
  let suspensions = state
    .store
    .active_suspensions_for_player(scope, id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(suspensions))
}
