//! Handlers for `/seasons` endpoints.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use lineup_core::{
  season::{NewSeason, Season},
  store::LeagueStore,
};

use crate::{ApiState, Tenant, error::ApiError};

/// `GET /seasons`, ordered by start date.
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
) -> Result<Json<Vec<Season>>, ApiError>
where
  S: LeagueStore,
{
  let seasons = state.store.list_seasons(scope).await.map_err(ApiError::store)?;
  Ok(Json(seasons))
}

/// `POST /seasons`. Body: `{"name":"2024-25","starts_on":"2024-09-01","ends_on":"2025-04-30"}`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Json(body): Json<NewSeason>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeagueStore,
{
  let season = state.store.add_season(scope, body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(season)))
}
