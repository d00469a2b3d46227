//! Opens one storage session per request.

use crate::error::AppError;
use crate::state::AppState;
use crate::storage::Session;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// The unit of work for the current request. Dropped (and so closed) when
/// the handler returns.
pub struct RequestSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for RequestSession {
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(RequestSession(state.storage.session()?))
    }
}
