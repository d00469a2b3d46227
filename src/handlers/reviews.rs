//! /places/:place_id/reviews and /reviews

use crate::error::AppError;
use crate::extractors::{JsonObject, RequestSession};
use crate::models::{Place, Review, User};
use crate::response::{created, empty_ok, ok_many, ok_one, JsonResponse};
use crate::service::{CrudService, RequestValidator};
use axum::extract::Path;

pub async fn list_reviews_of_place(
    Path(place_id): Path<String>,
    RequestSession(session): RequestSession,
) -> Result<JsonResponse, AppError> {
    CrudService::ensure_exists::<Place>(&session, &place_id).await?;
    Ok(ok_many(session.children_as::<Review>("place_id", &place_id).await?))
}

pub async fn get_review(
    Path(review_id): Path<String>,
    RequestSession(session): RequestSession,
) -> Result<JsonResponse, AppError> {
    Ok(ok_one(CrudService::fetch::<Review>(&session, &review_id).await?))
}

/// Needs an existing place, `user_id` naming an existing user, and `text`.
pub async fn create_review(
    Path(place_id): Path<String>,
    RequestSession(mut session): RequestSession,
    JsonObject(body): JsonObject,
) -> Result<JsonResponse, AppError> {
    CrudService::ensure_exists::<Place>(&session, &place_id).await?;
    let user_id = RequestValidator::id_string(&body, "user_id")?
        .ok_or_else(|| AppError::missing("user_id"))?
        .to_string();
    CrudService::ensure_exists::<User>(&session, &user_id).await?;
    RequestValidator::require(&body, &["text"])?;
    let review = CrudService::create::<Review>(&mut session, body, &[("place_id", place_id.as_str())]).await?;
    Ok(created(review))
}

pub async fn update_review(
    Path(review_id): Path<String>,
    RequestSession(mut session): RequestSession,
    JsonObject(body): JsonObject,
) -> Result<JsonResponse, AppError> {
    let review = CrudService::update::<Review>(&mut session, &review_id, body, &[]).await?;
    Ok(ok_one(review))
}

pub async fn delete_review(
    Path(review_id): Path<String>,
    RequestSession(mut session): RequestSession,
) -> Result<JsonResponse, AppError> {
    CrudService::delete::<Review>(&mut session, &review_id).await?;
    Ok(empty_ok())
}
