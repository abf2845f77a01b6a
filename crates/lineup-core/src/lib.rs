//! Domain model of the Lineup player eligibility engine.
//!
//! Contracts, suspensions, the season calendar and the rules over them live
//! here as plain types and pure functions. Storage backends implement
//! [`store::LeagueStore`]; nothing in this crate performs I/O.

pub mod contract;
pub mod eligibility;
pub mod error;
pub mod game;
pub mod player;
pub mod scope;
pub mod season;
pub mod store;
pub mod suspension;
pub mod timeline;

pub use error::{Entity, Error, ErrorKind, Result};
pub use scope::Scope;
