//! /places/:place_id/amenities: the place/amenity association.

use crate::error::AppError;
use crate::extractors::RequestSession;
use crate::models::{Amenity, Persist, Place};
use crate::response::{created, empty_ok, ok_many, ok_one, JsonResponse};
use crate::service::CrudService;
use axum::extract::Path;

pub async fn list_place_amenities(
    Path(place_id): Path<String>,
    RequestSession(session): RequestSession,
) -> Result<JsonResponse, AppError> {
    CrudService::ensure_exists::<Place>(&session, &place_id).await?;
    Ok(ok_many(session.amenities_of(&place_id).await?))
}

/// 200 when the amenity was already linked, 201 when this call linked it.
pub async fn link_place_amenity(
    Path((place_id, amenity_id)): Path<(String, String)>,
    RequestSession(mut session): RequestSession,
) -> Result<JsonResponse, AppError> {
    CrudService::ensure_exists::<Place>(&session, &place_id).await?;
    let amenity = CrudService::fetch::<Amenity>(&session, &amenity_id).await?;
    let linked = session.amenities_of(&place_id).await?;
    if linked.iter().any(|a| a.id() == amenity.id()) {
        return Ok(ok_one(amenity));
    }
    session.link_amenity(&place_id, &amenity_id);
    session.save().await?;
    Ok(created(amenity))
}

/// 404 unless the place, the amenity and the link all exist.
pub async fn unlink_place_amenity(
    Path((place_id, amenity_id)): Path<(String, String)>,
    RequestSession(mut session): RequestSession,
) -> Result<JsonResponse, AppError> {
    CrudService::ensure_exists::<Place>(&session, &place_id).await?;
    CrudService::ensure_exists::<Amenity>(&session, &amenity_id).await?;
    let linked = session.amenities_of(&place_id).await?;
    if !linked.iter().any(|a| a.id() == amenity_id) {
        return Err(AppError::NotFound);
    }
    session.unlink_amenity(&place_id, &amenity_id);
    session.save().await?;
    Ok(empty_ok())
}
