//! HTTP handlers, one module per resource.

pub mod amenities;
pub mod cities;
pub mod index;
pub mod places;
pub mod places_amenities;
pub mod places_search;
pub mod reviews;
pub mod states;
pub mod users;
