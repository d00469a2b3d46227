//! Binding request bodies onto entities.

use crate::error::AppError;
use crate::models::{BaseFields, Model};
use serde_json::{Map, Value};

/// Keys a client can never set: identity, timestamps and the class tag.
pub const PROTECTED_KEYS: &[&str] = &["id", "created_at", "updated_at", "__class__"];

fn invalid(e: serde_json::Error) -> AppError {
    AppError::Validation(e.to_string())
}

/// Build a new entity from a request body. The entity gets a fresh identity;
/// `overrides` (typically a foreign key taken from the path) win over the body.
pub fn build<M: Model>(mut body: Map<String, Value>, overrides: &[(&str, &str)]) -> Result<M, AppError> {
    for key in PROTECTED_KEYS {
        body.remove(*key);
    }
    for (k, v) in overrides {
        body.insert(k.to_string(), Value::String(v.to_string()));
    }
    if let Value::Object(base) = serde_json::to_value(BaseFields::generate()).map_err(invalid)? {
        body.extend(base);
    }
    serde_json::from_value(Value::Object(body)).map_err(invalid)
}

/// Overwrite an entity's attributes with the body's values. Protected keys,
/// parent references, `immutable` keys and keys that are not attributes of
/// the entity are ignored.
pub fn apply_update<M: Model>(entity: &mut M, body: Map<String, Value>, immutable: &[&str]) -> Result<(), AppError> {
    let Value::Object(mut current) = serde_json::to_value(&*entity).map_err(invalid)? else {
        return Err(AppError::Validation("entity is not an object".into()));
    };
    let parents = M::KIND.foreign_keys();
    for (k, v) in body {
        let key = k.as_str();
        if PROTECTED_KEYS.contains(&key) || immutable.contains(&key) || parents.iter().any(|(fk, _)| *fk == key) {
            continue;
        }
        if current.contains_key(&k) {
            current.insert(k, v);
        }
    }
    *entity = serde_json::from_value(Value::Object(current)).map_err(invalid)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{City, Place, State};
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn build_assigns_fresh_identity() {
        let state: State = build(obj(json!({"name": "California", "id": "mine"})), &[]).unwrap();
        assert_eq!(state.name, "California");
        assert_ne!(state.base.id, "mine");
        assert_eq!(state.base.created_at, state.base.updated_at);
    }

    #[test]
    fn build_overrides_win() {
        let city: City = build(obj(json!({"name": "San Jose", "state_id": "other"})), &[("state_id", "s-1")]).unwrap();
        assert_eq!(city.state_id, "s-1");
    }

    #[test]
    fn build_fills_place_defaults() {
        let place: Place = build(obj(json!({"name": "Loft", "user_id": "u"})), &[("city_id", "c")]).unwrap();
        assert_eq!(place.number_rooms, 0);
        assert_eq!(place.latitude, None);
    }

    #[test]
    fn build_rejects_wrong_types() {
        let err = build::<Place>(obj(json!({"name": "Loft", "user_id": "u", "max_guest": "many"})), &[("city_id", "c")]);
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[test]
    fn update_skips_protected_immutable_and_unknown_keys() {
        let mut city = City::new("s-1", "San Jose");
        let before = city.clone();
        apply_update(
            &mut city,
            obj(json!({"name": "Oakland", "id": "x", "state_id": "s-2", "created_at": "2000-01-01T00:00:00Z", "mayor": "?"})),
            &[],
        )
        .unwrap();
        assert_eq!(city.name, "Oakland");
        assert_eq!(city.state_id, "s-1");
        assert_eq!(city.base, before.base);
    }

    #[test]
    fn update_sets_numbers_and_optionals() {
        let mut place = Place::new("c", "u", "Loft");
        apply_update(&mut place, obj(json!({"number_rooms": 3, "latitude": 37.77, "description": "Sunny"})), &[]).unwrap();
        assert_eq!(place.number_rooms, 3);
        assert_eq!(place.latitude, Some(37.77));
        assert_eq!(place.description.as_deref(), Some("Sunny"));
    }

    #[test]
    fn update_keeps_parent_references() {
        let mut place = Place::new("c-1", "u-1", "Loft");
        apply_update(&mut place, obj(json!({"city_id": "c-2", "user_id": "u-2", "name": "Attic"})), &[]).unwrap();
        assert_eq!((place.city_id.as_str(), place.user_id.as_str()), ("c-1", "u-1"));
        assert_eq!(place.name, "Attic");
    }
}
