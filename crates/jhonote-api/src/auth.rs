//! Caller identity.
//!
//! Authentication happens upstream; this server trusts the configured owner
//! header and never lets a request pick someone else's notes. Ownership of
//! an existing note is still checked by the repository on every access.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::{ApiError, AppState};

/// Extractor for the authenticated owner id.
///
/// ```ignore
/// async fn handler(Owner(owner_id): Owner) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone)]
pub struct Owner(pub String);

#[async_trait]
impl FromRequestParts<AppState> for Owner {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let owner = parts
            .headers
            .get(&state.owner_header)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        match owner {
            Some(id) => Ok(Owner(id.to_string())),
            None => Err(ApiError::Unauthorized("Authentication required".to_string())),
        }
    }
}
