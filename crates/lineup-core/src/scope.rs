//! Tenant scope attached to every store call.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The caller's active organization and acting user.
///
/// Supplied by the session layer and trusted as-is. Every read and write is
/// filtered by `organization_id`; ids from another organization behave as if
/// they did not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
  pub organization_id: Uuid,
  pub acting_user_id:  Uuid,
}

impl Scope {
  pub fn new(organization_id: Uuid, acting_user_id: Uuid) -> Self {
    Self { organization_id, acting_user_id }
  }
}
