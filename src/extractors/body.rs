//! JSON object request body. Anything else, including an empty object, is
//! rejected with "Not a JSON".

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct JsonObject(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|_| AppError::not_a_json())?;
        match value {
            Value::Object(map) if !map.is_empty() => Ok(JsonObject(map)),
            _ => Err(AppError::not_a_json()),
        }
    }
}
