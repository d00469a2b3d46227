//! Shared application state for all routes.

use crate::storage::DbStorage;

#[derive(Clone)]
pub struct AppState {
    pub storage: DbStorage,
}

impl AppState {
    pub fn new(storage: DbStorage) -> Self {
        Self { storage }
    }
}
