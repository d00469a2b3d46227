//! Generic CRUD over a storage session, shared by every entity handler.

use super::payload;
use crate::error::AppError;
use crate::models::Model;
use crate::storage::Session;
use serde_json::{Map, Value};

pub struct CrudService;

impl CrudService {
    /// Fetch one entity or fail with NotFound.
    pub async fn fetch<M: Model>(session: &Session, id: &str) -> Result<M, AppError> {
        session.get_as::<M>(id).await?.ok_or(AppError::NotFound)
    }

    /// Fail with NotFound unless an entity of `M` with this id exists.
    pub async fn ensure_exists<M: Model>(session: &Session, id: &str) -> Result<(), AppError> {
        Self::fetch::<M>(session, id).await.map(|_| ())
    }

    pub async fn list<M: Model>(session: &Session) -> Result<Vec<M>, AppError> {
        Ok(session.list_as::<M>().await?)
    }

    /// Build an entity from the body, persist it, return what was stored.
    pub async fn create<M: Model>(
        session: &mut Session,
        body: Map<String, Value>,
        overrides: &[(&str, &str)],
    ) -> Result<M, AppError> {
        let mut entity: M = payload::build(body, overrides)?;
        session.add(&mut entity);
        session.save().await?;
        tracing::info!(key = %entity.key(), "created");
        Ok(entity)
    }

    pub async fn update<M: Model>(
        session: &mut Session,
        id: &str,
        body: Map<String, Value>,
        immutable: &[&str],
    ) -> Result<M, AppError> {
        let mut entity = Self::fetch::<M>(session, id).await?;
        payload::apply_update(&mut entity, body, immutable)?;
        session.add(&mut entity);
        session.save().await?;
        Ok(entity)
    }

    pub async fn delete<M: Model>(session: &mut Session, id: &str) -> Result<(), AppError> {
        let entity = Self::fetch::<M>(session, id).await?;
        session.delete(Some(&entity));
        session.save().await?;
        tracing::info!(key = %entity.key(), "deleted");
        Ok(())
    }
}
