//! /users. Passwords are accepted on create and update but never returned.

use crate::error::AppError;
use crate::extractors::{JsonObject, RequestSession};
use crate::models::User;
use crate::response::{created, empty_ok, ok_many, ok_one, JsonResponse};
use crate::service::{CrudService, RequestValidator};
use axum::extract::Path;

pub async fn list_users(RequestSession(session): RequestSession) -> Result<JsonResponse, AppError> {
    Ok(ok_many(CrudService::list::<User>(&session).await?))
}

pub async fn get_user(
    Path(user_id): Path<String>,
    RequestSession(session): RequestSession,
) -> Result<JsonResponse, AppError> {
    Ok(ok_one(CrudService::fetch::<User>(&session, &user_id).await?))
}

pub async fn create_user(
    RequestSession(mut session): RequestSession,
    JsonObject(body): JsonObject,
) -> Result<JsonResponse, AppError> {
    RequestValidator::require(&body, &["email", "password"])?;
    RequestValidator::email(&body, "email")?;
    Ok(created(CrudService::create::<User>(&mut session, body, &[]).await?))
}

/// The email address is fixed at creation.
pub async fn update_user(
    Path(user_id): Path<String>,
    RequestSession(mut session): RequestSession,
    JsonObject(body): JsonObject,
) -> Result<JsonResponse, AppError> {
    Ok(ok_one(CrudService::update::<User>(&mut session, &user_id, body, &["email"]).await?))
}

pub async fn delete_user(
    Path(user_id): Path<String>,
    RequestSession(mut session): RequestSession,
) -> Result<JsonResponse, AppError> {
    CrudService::delete::<User>(&mut session, &user_id).await?;
    Ok(empty_ok())
}
