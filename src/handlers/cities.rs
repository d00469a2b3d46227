//! /states/:state_id/cities and /cities

use crate::error::AppError;
use crate::extractors::{JsonObject, RequestSession};
use crate::models::{City, State};
use crate::response::{created, empty_ok, ok_many, ok_one, JsonResponse};
use crate::service::{CrudService, RequestValidator};
use axum::extract::Path;

pub async fn list_cities_of_state(
    Path(state_id): Path<String>,
    RequestSession(session): RequestSession,
) -> Result<JsonResponse, AppError> {
    CrudService::ensure_exists::<State>(&session, &state_id).await?;
    Ok(ok_many(session.children_as::<City>("state_id", &state_id).await?))
}

pub async fn get_city(
    Path(city_id): Path<String>,
    RequestSession(session): RequestSession,
) -> Result<JsonResponse, AppError> {
    Ok(ok_one(CrudService::fetch::<City>(&session, &city_id).await?))
}

pub async fn create_city(
    Path(state_id): Path<String>,
    RequestSession(mut session): RequestSession,
    JsonObject(body): JsonObject,
) -> Result<JsonResponse, AppError> {
    RequestValidator::require(&body, &["name"])?;
    CrudService::ensure_exists::<State>(&session, &state_id).await?;
    let city = CrudService::create::<City>(&mut session, body, &[("state_id", state_id.as_str())]).await?;
    Ok(created(city))
}

pub async fn update_city(
    Path(city_id): Path<String>,
    RequestSession(mut session): RequestSession,
    JsonObject(body): JsonObject,
) -> Result<JsonResponse, AppError> {
    let city = CrudService::update::<City>(&mut session, &city_id, body, &[]).await?;
    Ok(ok_one(city))
}

pub async fn delete_city(
    Path(city_id): Path<String>,
    RequestSession(mut session): RequestSession,
) -> Result<JsonResponse, AppError> {
    CrudService::delete::<City>(&mut session, &city_id).await?;
    Ok(empty_ok())
}
