//! Response helpers. Entities render as bare JSON objects (lists as arrays)
//! with sensitive columns removed.

use crate::models::Entity;
use axum::{http::StatusCode, Json};
use serde_json::Value;

pub type JsonResponse = (StatusCode, Json<Value>);

pub fn ok_one(entity: impl Into<Entity>) -> JsonResponse {
    (StatusCode::OK, Json(entity.into().to_public_json()))
}

pub fn created(entity: impl Into<Entity>) -> JsonResponse {
    (StatusCode::CREATED, Json(entity.into().to_public_json()))
}

pub fn ok_many<E: Into<Entity>>(entities: impl IntoIterator<Item = E>) -> JsonResponse {
    let data: Vec<Value> = entities
        .into_iter()
        .map(|e| e.into().to_public_json())
        .collect();
    (StatusCode::OK, Json(Value::Array(data)))
}

/// `{}` with 200, the reply to a successful delete.
pub fn empty_ok() -> JsonResponse {
    (StatusCode::OK, Json(Value::Object(Default::default())))
}
