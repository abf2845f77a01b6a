//! Handlers for `/games` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/games` | Body: [`NewGame`]; returns 201 |
//! | `GET`  | `/games/:id` | 404 if not found |
//! | `POST` | `/games/:id/complete` | Marks completed and credits both teams; safe to retry |
//! | `POST` | `/games/:id/accrue` | Body: `{"team_id":"..."}`; credits one team |
//! | `GET`  | `/games/:id/suspensions` | Suspensions triggered in this game |
//! | `GET`  | `/games/:id/eligibility` | `?player_id&team_id` required |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use lineup_core::{
  eligibility::Eligibility,
  game::{AccrualReport, Game, NewGame},
  store::LeagueStore,
  suspension::Suspension,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, Tenant, error::ApiError};

/// `POST /games`
pub async fn schedule<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Json(body): Json<NewGame>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeagueStore,
{
  let game = state.store.schedule_game(scope, body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(game)))
}

/// `GET /games/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Path(id): Path<Uuid>,
) -> Result<Json<Game>, ApiError>
where
  S: LeagueStore,
{
  let game = state
    .store
    .get_game(scope, id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("game {id} not found")))?;
  Ok(Json(game))
}

// ─── Accrual ──────────────────────────────────────────────────────────────────

/// `POST /games/:id/complete`
pub async fn complete<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Path(id): Path<Uuid>,
) -> Result<Json<AccrualReport>, ApiError>
where
  S: LeagueStore,
{
  let report = state.store.complete_game(scope, id).await.map_err(ApiError::store)?;
  Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct AccrueBody {
  pub team_id: Uuid,
}

/// `POST /games/:id/accrue`
pub async fn accrue<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Path(id): Path<Uuid>,
  Json(body): Json<AccrueBody>,
) -> Result<Json<AccrualReport>, ApiError>
where
  S: LeagueStore,
{
  let report = state
    .store
    .accrue_service(scope, body.team_id, id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(report))
}

// ─── Queries ──────────────────────────────────────────────────────────────────

/// `GET /games/:id/suspensions`
pub async fn suspensions<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Suspension>>, ApiError>
where
  S: LeagueStore,
{
  let suspensions = state
    .store
    .suspensions_for_game(scope, id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(suspensions))
}

#[derive(Debug, Deserialize)]
pub struct EligibilityParams {
  pub player_id: Uuid,
  pub team_id:   Uuid,
}

/// `GET /games/:id/eligibility?player_id=<id>&team_id=<id>`
pub async fn eligibility<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Path(id): Path<Uuid>,
  Query(params): Query<EligibilityParams>,
) -> Result<Json<Eligibility>, ApiError>
where
  S: LeagueStore,
{
  let verdict = state
    .store
    .is_eligible(scope, params.player_id, params.team_id, id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(verdict))
}
