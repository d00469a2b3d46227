//! /amenities

use crate::error::AppError;
use crate::extractors::{JsonObject, RequestSession};
use crate::models::Amenity;
use crate::response::{created, empty_ok, ok_many, ok_one, JsonResponse};
use crate::service::{CrudService, RequestValidator};
use axum::extract::Path;

pub async fn list_amenities(RequestSession(session): RequestSession) -> Result<JsonResponse, AppError> {
    Ok(ok_many(CrudService::list::<Amenity>(&session).await?))
}

pub async fn get_amenity(
    Path(amenity_id): Path<String>,
    RequestSession(session): RequestSession,
) -> Result<JsonResponse, AppError> {
    Ok(ok_one(CrudService::fetch::<Amenity>(&session, &amenity_id).await?))
}

pub async fn create_amenity(
    RequestSession(mut session): RequestSession,
    JsonObject(body): JsonObject,
) -> Result<JsonResponse, AppError> {
    RequestValidator::require(&body, &["name"])?;
    Ok(created(CrudService::create::<Amenity>(&mut session, body, &[]).await?))
}

pub async fn update_amenity(
    Path(amenity_id): Path<String>,
    RequestSession(mut session): RequestSession,
    JsonObject(body): JsonObject,
) -> Result<JsonResponse, AppError> {
    Ok(ok_one(CrudService::update::<Amenity>(&mut session, &amenity_id, body, &[]).await?))
}

pub async fn delete_amenity(
    Path(amenity_id): Path<String>,
    RequestSession(mut session): RequestSession,
) -> Result<JsonResponse, AppError> {
    CrudService::delete::<Amenity>(&mut session, &amenity_id).await?;
    Ok(empty_ok())
}
