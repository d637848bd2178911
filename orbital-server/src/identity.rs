//! Caller identity
//!
//! Authentication happens in front of this service. The identity provider (or
//! the gateway holding its session) forwards the opaque user id in a header,
//! and handlers receive it as an [`AuthenticatedUser`]. Nothing past this
//! extractor looks at credentials.

use crate::error::ApiError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use orbital_core::UserId;

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user a request acts for
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| AuthenticatedUser(UserId::new(value)))
            .ok_or(ApiError::Unauthenticated)
    }
}
