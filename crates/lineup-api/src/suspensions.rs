//! Handlers for `/suspensions` and `/game-events`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/suspensions` | Body: [`NewSuspension`]; returns 201 |
//! | `GET`    | `/suspensions/:id` | 404 if not found |
//! | `PATCH`  | `/suspensions/:id` | Body: [`SuspensionUpdate`]; 409 once fully served |
//! | `DELETE` | `/suspensions/:id` | Administrative removal |
//! | `POST`   | `/game-events` | Body: [`GameEvent`]; 201 + suspension, or 204 if none applies |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use lineup_core::{
  store::LeagueStore,
  suspension::{GameEvent, NewSuspension, Suspension, SuspensionUpdate},
};
use uuid::Uuid;

use crate::{ApiState, Tenant, error::ApiError};

/// `POST /suspensions`
pub async fn issue<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Json(body): Json<NewSuspension>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeagueStore,
{
  let suspension = state.store.issue_suspension(scope, body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(suspension)))
}

/// `GET /suspensions/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Path(id): Path<Uuid>,
) -> Result<Json<Suspension>, ApiError>
where
  S: LeagueStore,
{
  let suspension = state
    .store
    .get_suspension(scope, id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("suspension {id} not found")))?;
  Ok(Json(suspension))
}

/// `PATCH /suspensions/:id`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Path(id): Path<Uuid>,
  Json(body): Json<SuspensionUpdate>,
) -> Result<Json<Suspension>, ApiError>
where
  S: LeagueStore,
{
  let suspension = state
    .store
    .update_suspension(scope, id, body)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(suspension))
}

/// `DELETE /suspensions/:id`
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: LeagueStore,
{
  state.store.delete_suspension(scope, id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /game-events`
///
/// Re-reporting an event returns the suspension it produced the first time.
pub async fn from_event<S>(
  State(state): State<ApiState<S>>,
  Tenant(scope): Tenant,
  Json(event): Json<GameEvent>,
) -> Result<Response, ApiError>
where
  S: LeagueStore,
{
  let issued = state
    .store
    .issue_from_event(scope, event, state.policy)
    .await
    .map_err(ApiError::store)?;
  Ok(match issued {
    Some(suspension) => (StatusCode::CREATED, Json(suspension)).into_response(),
    None => StatusCode::NO_CONTENT.into_response(),
  })
}
