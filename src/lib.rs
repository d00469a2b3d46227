//! hbnb API: storage engine and REST routes for states, cities, amenities,
//! users, places and reviews on PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod storage;

pub use config::{Environment, ServerConfig, StorageConfig};
pub use error::{AppError, ConfigError, StorageError};
pub use models::{Amenity, City, Entity, IntoKind, Kind, Model, Persist, Place, Review, State, User};
pub use routes::{api_routes, app, common_routes};
pub use service::CrudService;
pub use state::AppState;
pub use storage::{ensure_database_exists, DbStorage, Session};
