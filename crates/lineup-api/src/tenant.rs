//! Tenant context extractor.
//!
//! Every request names its organization and acting user in headers. Whoever
//! sits in front of this API (gateway, session layer) is responsible for
//! having authenticated the user and authorised them for the organization.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use lineup_core::Scope;
use uuid::Uuid;

use crate::error::ApiError;

pub const ORGANIZATION_HEADER: &str = "x-organization-id";
pub const USER_HEADER: &str = "x-user-id";

/// The [`Scope`] of the current request.
#[derive(Debug, Clone, Copy)]
pub struct Tenant(pub Scope);

fn header_uuid(headers: &HeaderMap, name: &'static str) -> Result<Uuid, ApiError> {
  let value = headers
    .get(name)
    .ok_or_else(|| ApiError::BadRequest(format!("missing {name} header")))?;
  value
    .to_str()
    .ok()
    .and_then(|v| Uuid::parse_str(v.trim()).ok())
    .ok_or_else(|| ApiError::BadRequest(format!("{name} must be a UUID")))
}

impl<S> FromRequestParts<S> for Tenant
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    let organization_id = header_uuid(&parts.headers, ORGANIZATION_HEADER)?;
    let acting_user_id = header_uuid(&parts.headers, USER_HEADER)?;
    Ok(Tenant(Scope::new(organization_id, acting_user_id)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  #[test]
  fn missing_header_is_bad_request() {
    let headers = HeaderMap::new();
    assert!(matches!(
      header_uuid(&headers, ORGANIZATION_HEADER),
      Err(ApiError::BadRequest(m)) if m.contains("missing")
    ));
  }

  #[test]
  fn malformed_header_is_bad_request() {
    let mut headers = HeaderMap::new();
    headers.insert(USER_HEADER, HeaderValue::from_static("not-a-uuid"));
    assert!(matches!(header_uuid(&headers, USER_HEADER), Err(ApiError::BadRequest(_))));
  }

  #[test]
  fn uuid_header_parses() {
    let id = Uuid::new_v4();
    let mut headers = HeaderMap::new();
    headers.insert(USER_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());
    assert_eq!(header_uuid(&headers, USER_HEADER).unwrap(), id);
  }
}
