//! Tagged union over every entity kind, plus the traits storage dispatches on.

use super::{Amenity, BaseFields, City, Kind, Place, Review, State, User};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;

/// Anything the storage engine can register or remove: it knows its kind and
/// carries the shared identity fields.
pub trait Persist {
    fn kind(&self) -> Kind;
    fn base(&self) -> &BaseFields;
    fn base_mut(&mut self) -> &mut BaseFields;

    fn id(&self) -> &str {
        &self.base().id
    }

    /// Composite key `"<Kind>.<id>"`, unique across all kinds.
    fn key(&self) -> String {
        format!("{}.{}", self.kind(), self.id())
    }
}

/// A concrete entity type with a row mapping. Used for typed reads.
pub trait Model:
    Persist
    + Clone
    + Serialize
    + DeserializeOwned
    + for<'r> sqlx::FromRow<'r, PgRow>
    + Into<Entity>
    + Send
    + Sync
    + Unpin
    + 'static
{
    const KIND: Kind;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "__class__")]
pub enum Entity {
    Amenity(Amenity),
    City(City),
    Place(Place),
    Review(Review),
    State(State),
    User(User),
}

impl Persist for Entity {
    fn kind(&self) -> Kind {
        match self {
            Entity::Amenity(_) => Kind::Amenity,
            Entity::City(_) => Kind::City,
            Entity::Place(_) => Kind::Place,
            Entity::Review(_) => Kind::Review,
            Entity::State(_) => Kind::State,
            Entity::User(_) => Kind::User,
        }
    }

    fn base(&self) -> &BaseFields {
        match self {
            Entity::Amenity(e) => &e.base,
            Entity::City(e) => &e.base,
            Entity::Place(e) => &e.base,
            Entity::Review(e) => &e.base,
            Entity::State(e) => &e.base,
            Entity::User(e) => &e.base,
        }
    }

    fn base_mut(&mut self) -> &mut BaseFields {
        match self {
            Entity::Amenity(e) => &mut e.base,
            Entity::City(e) => &mut e.base,
            Entity::Place(e) => &mut e.base,
            Entity::Review(e) => &mut e.base,
            Entity::State(e) => &mut e.base,
            Entity::User(e) => &mut e.base,
        }
    }
}

impl Entity {
    /// JSON object for API responses: `__class__` discriminator, all columns
    /// except the kind's sensitive ones.
    pub fn to_public_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        if let serde_json::Value::Object(map) = &mut value {
            for col in self.kind().sensitive_columns() {
                map.remove(*col);
            }
        }
        value
    }

    /// Column values in [`Kind::columns`] order, for parameter binding.
    pub fn column_values(&self) -> Vec<serde_json::Value> {
        let value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        self.kind()
            .columns()
            .iter()
            .map(|c| value.get(c.name).cloned().unwrap_or(serde_json::Value::Null))
            .collect()
    }
}

macro_rules! impl_model {
    ($ty:ident) => {
        impl Persist for $ty {
            fn kind(&self) -> Kind {
                Kind::$ty
            }

            fn base(&self) -> &BaseFields {
                &self.base
            }

            fn base_mut(&mut self) -> &mut BaseFields {
                &mut self.base
            }
        }

        impl Model for $ty {
            const KIND: Kind = Kind::$ty;
        }

        impl From<$ty> for Entity {
            fn from(e: $ty) -> Self {
                Entity::$ty(e)
            }
        }

        impl TryFrom<Entity> for $ty {
            type Error = Entity;

            fn try_from(e: Entity) -> Result<Self, Entity> {
                match e {
                    Entity::$ty(inner) => Ok(inner),
                    other => Err(other),
                }
            }
        }
    };
}

impl_model!(Amenity);
impl_model!(City);
impl_model!(Place);
impl_model!(Review);
impl_model!(State);
impl_model!(User);
