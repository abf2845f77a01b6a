//! JSON REST API for Lineup.
//!
//! Exposes an axum [`Router`] backed by any [`lineup_core::store::LeagueStore`].
//! The tenant of each request comes from the `x-organization-id` and
//! `x-user-id` headers; auth, TLS and role checks are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", lineup_api::api_router(ApiState::new(store, policy)))
//! ```

pub mod contracts;
pub mod error;
pub mod games;
pub mod players;
pub mod seasons;
pub mod suspensions;
pub mod teams;
pub mod tenant;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use lineup_core::{store::LeagueStore, suspension::SuspensionPolicy};

pub use error::ApiError;
pub use tenant::Tenant;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:  Arc<S>,
  /// Games each qualifying penalty costs, applied to reported game events.
  pub policy: SuspensionPolicy,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, policy: SuspensionPolicy) -> Self { Self { store, policy } }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), policy: self.policy }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: LeagueStore + 'static,
{
  Router::new()
    // Players
    .route("/players", post(players::create::<S>))
    .route("/players/{id}", get(players::get_one::<S>).delete(players::delete_one::<S>))
    .route("/players/{id}/contracts", get(players::contracts::<S>))
    .route("/players/{id}/timeline", get(players::timeline::<S>))
    .route("/players/{id}/suspensions", get(players::active_suspensions::<S>))
    // Teams
    .route("/teams", post(teams::create::<S>))
    .route("/teams/{id}", get(teams::get_one::<S>))
    .route("/teams/{id}/roster", get(teams::roster::<S>))
    // Seasons
    .route("/seasons", get(seasons::list::<S>).post(seasons::create::<S>))
    // Contracts
    .route("/contracts", post(contracts::sign::<S>))
    .route("/contracts/{id}/transfer", post(contracts::transfer::<S>))
    .route("/contracts/{id}/release", post(contracts::release::<S>))
    // Suspensions
    .route("/suspensions", post(suspensions::issue::<S>))
    .route(
      "/suspensions/{id}",
      get(suspensions::get_one::<S>)
        .patch(suspensions::update::<S>)
        .delete(suspensions::delete_one::<S>),
    )
    .route("/game-events", post(suspensions::from_event::<S>))
    // Games
    .route("/games", post(games::schedule::<S>))
    .route("/games/{id}", get(games::get_one::<S>))
    .route("/games/{id}/complete", post(games::complete::<S>))
    .route("/games/{id}/accrue", post(games::accrue::<S>))
    .route("/games/{id}/suspensions", get(games::suspensions::<S>))
    .route("/games/{id}/eligibility", get(games::eligibility::<S>))
    .with_state(state)
}
