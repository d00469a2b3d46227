//! Entity model: the six persisted kinds and the union storage works with.

mod amenity;
mod base;
mod city;
mod entity;
mod kind;
mod place;
mod review;
mod state;
mod user;

pub use amenity::Amenity;
pub use base::{now, BaseFields};
pub use city::City;
pub use entity::{Entity, Model, Persist};
pub use kind::{Column, IntoKind, Kind, UnknownKind};
pub use place::Place;
pub use review::Review;
pub use state::State;
pub use user::User;
