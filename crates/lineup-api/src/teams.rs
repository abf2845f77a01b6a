//! Handlers for `/teams` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/teams` | Body: `{"name":"..."}`; returns 201 |
//! | `GET`  | `/teams/:id` | 404 if not found |
//! | `GET`  | `/teams/:id/roster` | `?season_id` required |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use lineup_core::{contract::Contract, player::Team, store::LeagueStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, Tenant, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `POST /teams`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeagueStore,
{
  let team = state.store.add_team(scope, body.name).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(team)))
}

/// `GET /teams/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Path(id): Path<Uuid>,
) -> Result<Json<Team>, ApiError>
where
  S: LeagueStore,
{
  let team = state
    .store
    .get_team(scope, id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("team {id} not found")))?;
  Ok(Json(team))
}

#[derive(Debug, Deserialize)]
pub struct RosterParams {
  pub season_id: Uuid,
}

/// `GET /teams/:id/roster?season_id=<id>`
pub async fn roster<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Path(id): Path<Uuid>,
  Query(params): Query<RosterParams>,
) -> Result<Json<Vec<Contract>>, ApiError>
where
  S: LeagueStore,
{
  let roster = state
    .store
    .roster_for_season(scope, id, params.season_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(roster))
}
