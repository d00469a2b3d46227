use super::BaseFields;
use serde::{Deserialize, Serialize};

/// A state; owns its cities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct State {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: BaseFields,
    pub name: String,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: BaseFields::generate(),
            name: name.into(),
        }
    }
}
