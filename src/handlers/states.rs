//! /states

use crate::error::AppError;
use crate::extractors::{JsonObject, RequestSession};
use crate::models::State;
use crate::response::{created, empty_ok, ok_many, ok_one, JsonResponse};
use crate::service::{CrudService, RequestValidator};
use axum::extract::Path;

pub async fn list_states(RequestSession(session): RequestSession) -> Result<JsonResponse, AppError> {
    Ok(ok_many(CrudService::list::<State>(&session).await?))
}

pub async fn get_state(
    Path(state_id): Path<String>,
    RequestSession(session): RequestSession,
) -> Result<JsonResponse, AppError> {
    Ok(ok_one(CrudService::fetch::<State>(&session, &state_id).await?))
}

pub async fn create_state(
    RequestSession(mut session): RequestSession,
    JsonObject(body): JsonObject,
) -> Result<JsonResponse, AppError> {
    RequestValidator::require(&body, &["name"])?;
    let state = CrudService::create::<State>(&mut session, body, &[]).await?;
    Ok(created(state))
}

pub async fn update_state(
    Path(state_id): Path<String>,
    RequestSession(mut session): RequestSession,
    JsonObject(body): JsonObject,
) -> Result<JsonResponse, AppError> {
    let state = CrudService::update::<State>(&mut session, &state_id, body, &[]).await?;
    Ok(ok_one(state))
}

pub async fn delete_state(
    Path(state_id): Path<String>,
    RequestSession(mut session): RequestSession,
) -> Result<JsonResponse, AppError> {
    CrudService::delete::<State>(&mut session, &state_id).await?;
    Ok(empty_ok())
}
