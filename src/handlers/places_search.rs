//! POST /places_search

use crate::error::AppError;
use crate::extractors::RequestSession;
use crate::response::{ok_many, JsonResponse};
use crate::service::{search_places, PlaceSearch};
use axum::Json;
use serde_json::Value;

/// Body must be a JSON object; `{}` or all-empty lists return every place.
pub async fn places_search(
    RequestSession(session): RequestSession,
    body: Option<Json<Value>>,
) -> Result<JsonResponse, AppError> {
    let Some(Json(value @ Value::Object(_))) = body else {
        return Err(AppError::not_a_json());
    };
    let filter: PlaceSearch = serde_json::from_value(value).map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(ok_many(search_places(&session, &filter).await?))
}
