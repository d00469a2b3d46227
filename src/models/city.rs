use super::BaseFields;
use serde::{Deserialize, Serialize};

/// A city inside a state; owns its places.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct City {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: BaseFields,
    pub state_id: String,
    pub name: String,
}

impl City {
    pub fn new(state_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            base: BaseFields::generate(),
            state_id: state_id.into(),
            name: name.into(),
        }
    }
}
