//! /cities/:city_id/places and /places

use crate::error::AppError;
use crate::extractors::{JsonObject, RequestSession};
use crate::models::{City, Place, User};
use crate::response::{created, empty_ok, ok_many, ok_one, JsonResponse};
use crate::service::{CrudService, RequestValidator};
use axum::extract::Path;

pub async fn list_places_of_city(
    Path(city_id): Path<String>,
    RequestSession(session): RequestSession,
) -> Result<JsonResponse, AppError> {
    CrudService::ensure_exists::<City>(&session, &city_id).await?;
    Ok(ok_many(session.children_as::<Place>("city_id", &city_id).await?))
}

pub async fn get_place(
    Path(place_id): Path<String>,
    RequestSession(session): RequestSession,
) -> Result<JsonResponse, AppError> {
    Ok(ok_one(CrudService::fetch::<Place>(&session, &place_id).await?))
}

/// Needs an existing city, `user_id` naming an existing user, and `name`.
pub async fn create_place(
    Path(city_id): Path<String>,
    RequestSession(mut session): RequestSession,
    JsonObject(body): JsonObject,
) -> Result<JsonResponse, AppError> {
    CrudService::ensure_exists::<City>(&session, &city_id).await?;
    let user_id = RequestValidator::id_string(&body, "user_id")?
        .ok_or_else(|| AppError::missing("user_id"))?
        .to_string();
    CrudService::ensure_exists::<User>(&session, &user_id).await?;
    RequestValidator::require(&body, &["name"])?;
    let place = CrudService::create::<Place>(&mut session, body, &[("city_id", city_id.as_str())]).await?;
    Ok(created(place))
}

pub async fn update_place(
    Path(place_id): Path<String>,
    RequestSession(mut session): RequestSession,
    JsonObject(body): JsonObject,
) -> Result<JsonResponse, AppError> {
    let place = CrudService::update::<Place>(&mut session, &place_id, body, &[]).await?;
    Ok(ok_one(place))
}

pub async fn delete_place(
    Path(place_id): Path<String>,
    RequestSession(mut session): RequestSession,
) -> Result<JsonResponse, AppError> {
    CrudService::delete::<Place>(&mut session, &place_id).await?;
    Ok(empty_ok())
}
