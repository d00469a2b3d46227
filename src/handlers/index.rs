//! Service status and per-kind entity counts.

use crate::error::AppError;
use crate::extractors::RequestSession;
use crate::models::Kind;
use axum::Json;
use serde_json::{json, Map, Value};

/// GET /status
pub async fn status() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

/// GET /stats: committed entity count per kind, keyed by plural name.
pub async fn stats(RequestSession(session): RequestSession) -> Result<Json<Value>, AppError> {
    let mut counts = Map::new();
    for kind in Kind::ALL {
        let n = session.count(Some(kind)).await?;
        counts.insert(kind.plural().to_string(), json!(n));
    }
    Ok(Json(Value::Object(counts)))
}
