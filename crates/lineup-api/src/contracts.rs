//! Handlers for `/contracts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/contracts` | Body: [`SignPlayer`]; returns 201 + open contract |
//! | `POST` | `/contracts/:id/transfer` | Body: [`Transfer`]; returns 201 + successor contract |
//! | `POST` | `/contracts/:id/release` | Body: `{"effective_season_id":"..."}`; returns the closed contract |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use lineup_core::{
  contract::{Contract, SignPlayer, Transfer},
  store::LeagueStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, Tenant, error::ApiError};

/// `POST /contracts`
pub async fn sign<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Json(body): Json<SignPlayer>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeagueStore,
{
  let contract = state.store.sign_player(scope, body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(contract)))
}

/// `POST /contracts/:id/transfer`
pub async fn transfer<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Path(id): Path<Uuid>,
  Json(body): Json<Transfer>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeagueStore,
{
  let contract = state.store.transfer(scope, id, body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(contract)))
}

#[derive(Debug, Deserialize)]
pub struct ReleaseBody {
  /// First season in which the player is a free agent.
  pub effective_season_id: Uuid,
}

/// `POST /contracts/:id/release`
pub async fn release<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Path(id): Path<Uuid>,
  Json(body): Json<ReleaseBody>,
) -> Result<Json<Contract>, ApiError>
where
  S: LeagueStore,
{
  let closed = state
    .store
    .release(scope, id, body.effective_season_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(closed))
}
