//! CrudService and request helpers on top of the storage session.

mod crud;
pub mod payload;
pub mod search;
mod validation;
pub use crud::CrudService;
pub use search::{search_places, PlaceSearch};
pub use validation::RequestValidator;
