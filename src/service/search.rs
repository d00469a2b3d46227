//! Place search by states, cities and amenities.

use crate::error::StorageError;
use crate::models::{City, Persist, Place};
use crate::storage::Session;
use serde::Deserialize;
use std::collections::HashSet;

/// Search filter. All lists empty means "every place".
#[derive(Debug, Default, Deserialize)]
pub struct PlaceSearch {
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
}

impl PlaceSearch {
    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.cities.is_empty() && self.amenities.is_empty()
    }

    /// City ids to draw places from: every city of each listed state, then
    /// the listed cities, without duplicates. Empty when neither is given.
    async fn city_ids(&self, session: &Session) -> Result<Vec<String>, StorageError> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for state_id in &self.states {
            for city in session.children_as::<City>("state_id", state_id).await? {
                if seen.insert(city.base.id.clone()) {
                    out.push(city.base.id);
                }
            }
        }
        for city_id in &self.cities {
            if seen.insert(city_id.clone()) {
                out.push(city_id.clone());
            }
        }
        Ok(out)
    }
}

/// Places matching the filter. With states or cities listed, only places in
/// those cities qualify; with amenities listed, a place must have all of them.
pub async fn search_places(session: &Session, filter: &PlaceSearch) -> Result<Vec<Place>, StorageError> {
    let candidates = if filter.states.is_empty() && filter.cities.is_empty() {
        session.list_as::<Place>().await?
    } else {
        let mut places = Vec::new();
        for city_id in filter.city_ids(session).await? {
            places.extend(session.children_as::<Place>("city_id", &city_id).await?);
        }
        places
    };
    if filter.amenities.is_empty() {
        return Ok(candidates);
    }
    let wanted: HashSet<&str> = filter.amenities.iter().map(String::as_str).collect();
    let mut out = Vec::new();
    for place in candidates {
        let linked = session.amenities_of(place.id()).await?;
        let have: HashSet<&str> = linked.iter().map(|a| a.id()).collect();
        if wanted.is_subset(&have) {
            out.push(place);
        }
    }
    Ok(out)
}
