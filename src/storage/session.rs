//! Request-scoped unit of work: reads go straight to the committed store,
//! writes are queued and committed together by [`Session::save`].

use crate::error::StorageError;
use crate::models::{Amenity, City, Entity, IntoKind, Kind, Model, Persist, Place, Review, State, User};
use crate::sql::{self, PgBindValue, QueryBuf};
use sqlx::{PgConnection, PgPool};
use std::collections::BTreeMap;

/// A write waiting for the next [`Session::save`].
#[derive(Clone, Debug, PartialEq)]
pub enum PendingOp {
    Upsert(Entity),
    Delete { kind: Kind, id: String },
    LinkAmenity { place_id: String, amenity_id: String },
    UnlinkAmenity { place_id: String, amenity_id: String },
}

impl PendingOp {
    fn query(&self) -> (QueryBuf, Vec<PgBindValue>) {
        match self {
            PendingOp::Upsert(entity) => {
                let q = sql::upsert(entity);
                let binds = q
                    .params
                    .iter()
                    .zip(entity.kind().columns())
                    .map(|(v, col)| PgBindValue::for_column(v, col))
                    .collect();
                (q, binds)
            }
            PendingOp::Delete { kind, id } => {
                (sql::delete_by_id(*kind), vec![PgBindValue::String(id.clone())])
            }
            PendingOp::LinkAmenity { place_id, amenity_id } => (
                sql::link_amenity(),
                vec![
                    PgBindValue::String(place_id.clone()),
                    PgBindValue::String(amenity_id.clone()),
                ],
            ),
            PendingOp::UnlinkAmenity { place_id, amenity_id } => (
                sql::unlink_amenity(),
                vec![
                    PgBindValue::String(place_id.clone()),
                    PgBindValue::String(amenity_id.clone()),
                ],
            ),
        }
    }

    async fn apply(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        let (q, binds) = self.query();
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let mut query = sqlx::query(&q.sql);
        for b in binds {
            query = query.bind(b);
        }
        query.execute(conn).await?;
        Ok(())
    }
}

/// One unit of work. Obtain from [`DbStorage::session`](super::DbStorage::session);
/// never shared between requests.
pub struct Session {
    pool: PgPool,
    pending: Vec<PendingOp>,
}

impl Session {
    pub(super) fn new(pool: PgPool) -> Self {
        Self {
            pool,
            pending: Vec::new(),
        }
    }

    /// Every committed entity of `kind`, or of every kind when `None`, keyed
    /// by `"<Kind>.<id>"`.
    pub async fn all(&self, kind: Option<Kind>) -> Result<BTreeMap<String, Entity>, StorageError> {
        let kinds: Vec<Kind> = match kind {
            Some(k) => vec![k],
            None => Kind::ALL.to_vec(),
        };
        let mut out = BTreeMap::new();
        for k in kinds {
            for entity in self.list_kind(k).await? {
                out.insert(entity.key(), entity);
            }
        }
        Ok(out)
    }

    /// The committed entity of `kind` with this id. Unknown kinds and absent
    /// or empty ids are `Ok(None)`; backend failures are errors.
    pub async fn get(&self, kind: impl IntoKind, id: Option<&str>) -> Result<Option<Entity>, StorageError> {
        let (Some(kind), Some(id)) = (kind.into_kind(), id.filter(|s| !s.is_empty())) else {
            return Ok(None);
        };
        Ok(match kind {
            Kind::Amenity => self.get_as::<Amenity>(id).await?.map(Entity::from),
            Kind::City => self.get_as::<City>(id).await?.map(Entity::from),
            Kind::Place => self.get_as::<Place>(id).await?.map(Entity::from),
            Kind::Review => self.get_as::<Review>(id).await?.map(Entity::from),
            Kind::State => self.get_as::<State>(id).await?.map(Entity::from),
            Kind::User => self.get_as::<User>(id).await?.map(Entity::from),
        })
    }

    pub async fn get_as<M: Model>(&self, id: &str) -> Result<Option<M>, StorageError> {
        let q = sql::select_by_id(M::KIND);
        tracing::debug!(sql = %q.sql, id = %id, "query");
        let row = sqlx::query_as::<_, M>(&q.sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list_as<M: Model>(&self) -> Result<Vec<M>, StorageError> {
        let q = sql::select_all(M::KIND);
        tracing::debug!(sql = %q.sql, "query");
        let rows = sqlx::query_as::<_, M>(&q.sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Entities of `M` whose `column` equals `value`, e.g. the cities of a
    /// state with `children_as::<City>("state_id", state_id)`.
    pub async fn children_as<M: Model>(&self, column: &str, value: &str) -> Result<Vec<M>, StorageError> {
        let q = sql::select_where(M::KIND, column).ok_or_else(|| StorageError::UnknownColumn {
            kind: M::KIND.as_str(),
            column: column.to_string(),
        })?;
        tracing::debug!(sql = %q.sql, value = %value, "query");
        let rows = sqlx::query_as::<_, M>(&q.sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Amenities linked to a place.
    pub async fn amenities_of(&self, place_id: &str) -> Result<Vec<Amenity>, StorageError> {
        let q = sql::select_amenities_of_place();
        tracing::debug!(sql = %q.sql, place_id = %place_id, "query");
        let rows = sqlx::query_as::<_, Amenity>(&q.sql)
            .bind(place_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Number of committed entities of `kind`, or of every kind when `None`.
    /// Pending writes are not counted.
    pub async fn count(&self, kind: Option<Kind>) -> Result<u64, StorageError> {
        let kinds: Vec<Kind> = match kind {
            Some(k) => vec![k],
            None => Kind::ALL.to_vec(),
        };
        let mut total = 0u64;
        for k in kinds {
            let q = sql::count(k);
            tracing::debug!(sql = %q.sql, "query");
            let (n,): (i64,) = sqlx::query_as(&q.sql).fetch_one(&self.pool).await?;
            total += n.max(0) as u64;
        }
        Ok(total)
    }

    /// Register a new or modified entity for the next save. Advances the
    /// entity's `updated_at` so the caller's copy matches what will be written.
    pub fn add<E>(&mut self, entity: &mut E)
    where
        E: Persist + Clone + Into<Entity>,
    {
        entity.base_mut().touch();
        self.pending.push(PendingOp::Upsert(entity.clone().into()));
    }

    /// Queue removal of an entity. `None` is a no-op.
    pub fn delete<P: Persist + ?Sized>(&mut self, entity: Option<&P>) {
        if let Some(e) = entity {
            self.pending.push(PendingOp::Delete {
                kind: e.kind(),
                id: e.id().to_string(),
            });
        }
    }

    pub fn link_amenity(&mut self, place_id: &str, amenity_id: &str) {
        self.pending.push(PendingOp::LinkAmenity {
            place_id: place_id.to_string(),
            amenity_id: amenity_id.to_string(),
        });
    }

    pub fn unlink_amenity(&mut self, place_id: &str, amenity_id: &str) {
        self.pending.push(PendingOp::UnlinkAmenity {
            place_id: place_id.to_string(),
            amenity_id: amenity_id.to_string(),
        });
    }

    pub fn pending(&self) -> &[PendingOp] {
        &self.pending
    }

    /// Commit every pending write in one transaction, in the order issued.
    /// Returns the number of writes applied. On failure the transaction rolls
    /// back and the pending writes are discarded.
    pub async fn save(&mut self) -> Result<usize, StorageError> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        let ops = std::mem::take(&mut self.pending);
        let mut tx = self.pool.begin().await?;
        for op in &ops {
            if let Err(e) = op.apply(&mut *tx).await {
                tracing::warn!(error = %e, writes = ops.len(), "save failed, rolling back");
                return Err(e.into());
            }
        }
        tx.commit().await?;
        Ok(ops.len())
    }

    /// End the unit of work, discarding anything not saved.
    pub fn close(mut self) {
        self.pending.clear();
    }

    async fn list_kind(&self, kind: Kind) -> Result<Vec<Entity>, StorageError> {
        Ok(match kind {
            Kind::Amenity => into_entities(self.list_as::<Amenity>().await?),
            Kind::City => into_entities(self.list_as::<City>().await?),
            Kind::Place => into_entities(self.list_as::<Place>().await?),
            Kind::Review => into_entities(self.list_as::<Review>().await?),
            Kind::State => into_entities(self.list_as::<State>().await?),
            Kind::User => into_entities(self.list_as::<User>().await?),
        })
    }
}

fn into_entities<M: Model>(rows: Vec<M>) -> Vec<Entity> {
    rows.into_iter().map(Into::into).collect()
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            tracing::warn!(discarded = self.pending.len(), "session closed with unsaved writes");
        }
    }
}
