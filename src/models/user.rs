use super::BaseFields;
use serde::{Deserialize, Serialize};

/// A user; owns places and reviews. `password` is stored but never rendered
/// by the API (see [`Kind::sensitive_columns`](super::Kind::sensitive_columns)).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: BaseFields,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl User {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            base: BaseFields::generate(),
            email: email.into(),
            password: password.into(),
            first_name: None,
            last_name: None,
        }
    }
}
