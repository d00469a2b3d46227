use super::BaseFields;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Amenity {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: BaseFields,
    pub name: String,
}

impl Amenity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: BaseFields::generate(),
            name: name.into(),
        }
    }
}
