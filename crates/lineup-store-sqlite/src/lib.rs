//! SQLite backend for the Lineup league store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every command executes as one
//! `IMMEDIATE` transaction on that thread.

mod contracts;
mod encode;
mod ledger;
mod query;
mod registry;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
