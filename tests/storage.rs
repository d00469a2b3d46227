//! Storage engine and API against a live PostgreSQL.
//!
//! Run with `DATABASE_URL` set:
//! `DATABASE_URL=postgres://localhost/hbnb_test_db cargo test --test storage -- --ignored`

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use hbnb_api::{
    app, Amenity, AppState, City, DbStorage, Entity, Environment, Kind, Persist, Place, State, StorageConfig,
    User,
};
use serde_json::{json, Value};
use std::collections::HashSet;
use tokio::sync::{Mutex, MutexGuard};
use tower::ServiceExt;

/// Tests share one database; counts are only meaningful one test at a time.
static DB_LOCK: Mutex<()> = Mutex::const_new(());

fn config() -> StorageConfig {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    StorageConfig {
        database_url: Some(url),
        ..StorageConfig::default()
    }
}

async fn storage_with(config: StorageConfig) -> (DbStorage, MutexGuard<'static, ()>) {
    let guard = DB_LOCK.lock().await;
    let storage = DbStorage::new(&config).unwrap();
    storage.reload().await.unwrap();
    (storage, guard)
}

async fn storage() -> (DbStorage, MutexGuard<'static, ()>) {
    storage_with(config()).await
}

async fn seed_place(storage: &DbStorage) -> (State, City, User, Place) {
    let mut session = storage.session().unwrap();
    let mut state = State::new("Oregon");
    let mut city = City::new(&state.base.id, "Portland");
    let mut user = User::new("host@example.com", "pw");
    let mut place = Place::new(&city.base.id, &user.base.id, "Loft");
    place.description = Some("Sunny".into());
    place.number_rooms = 2;
    place.latitude = Some(45.52);
    session.add(&mut state);
    session.add(&mut city);
    session.add(&mut user);
    session.add(&mut place);
    assert_eq!(session.save().await.unwrap(), 4);
    (state, city, user, place)
}

#[tokio::test]
#[ignore = "requires database"]
async fn california_scenario() {
    let (storage, _guard) = storage().await;
    let mut session = storage.session().unwrap();

    let mut state = State::new("California");
    session.add(&mut state);
    session.save().await.unwrap();
    let found = session.get("State", Some(state.base.id.as_str())).await.unwrap();
    assert_eq!(found, Some(Entity::State(state.clone())));

    let mut city = City::new(&state.base.id, "San Jose");
    session.add(&mut city);
    session.save().await.unwrap();
    let cities = session.all(Some(Kind::City)).await.unwrap();
    let san_jose: Vec<_> = cities
        .values()
        .filter_map(|e| match e {
            Entity::City(c) if c.state_id == state.base.id => Some(c),
            _ => None,
        })
        .collect();
    assert_eq!(san_jose.len(), 1);
    assert_eq!(san_jose[0].name, "San Jose");

    let before = session.count(Some(Kind::State)).await.unwrap();
    session.delete(Some(&state));
    session.save().await.unwrap();
    assert_eq!(session.count(Some(Kind::State)).await.unwrap(), before - 1);
    assert!(session.get(Kind::City, Some(city.base.id.as_str())).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn saved_entities_read_back_equal() {
    let (storage, _guard) = storage().await;
    let (state, city, user, place) = seed_place(&storage).await;
    let session = storage.session().unwrap();
    assert_eq!(session.get_as::<State>(&state.base.id).await.unwrap(), Some(state));
    assert_eq!(session.get_as::<City>(&city.base.id).await.unwrap(), Some(city));
    assert_eq!(session.get_as::<User>(&user.base.id).await.unwrap(), Some(user));
    assert_eq!(session.get_as::<Place>(&place.base.id).await.unwrap(), Some(place));
}

#[tokio::test]
#[ignore = "requires database"]
async fn deleted_entities_are_gone() {
    let (storage, _guard) = storage().await;
    let mut session = storage.session().unwrap();
    let mut amenity = Amenity::new("Pool");
    session.add(&mut amenity);
    session.save().await.unwrap();
    session.delete(Some(&amenity));
    session.save().await.unwrap();
    assert!(session.get(Kind::Amenity, Some(amenity.id())).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn count_matches_all_and_union_has_no_duplicates() {
    let (storage, _guard) = storage().await;
    seed_place(&storage).await;
    let session = storage.session().unwrap();

    let mut union = HashSet::new();
    let mut total = 0u64;
    for kind in Kind::ALL {
        let of_kind = session.all(Some(kind)).await.unwrap();
        assert_eq!(session.count(Some(kind)).await.unwrap(), of_kind.len() as u64, "{kind}");
        assert!(of_kind.values().all(|e| e.kind() == kind));
        total += of_kind.len() as u64;
        union.extend(of_kind.into_keys());
    }
    let everything = session.all(None).await.unwrap();
    assert_eq!(everything.keys().cloned().collect::<HashSet<_>>(), union);
    assert_eq!(session.count(None).await.unwrap(), total);
}

#[tokio::test]
#[ignore = "requires database"]
async fn get_never_fails_on_bad_arguments() {
    let (storage, _guard) = storage().await;
    let session = storage.session().unwrap();
    assert!(session.get("BaseModel", Some("x")).await.unwrap().is_none());
    assert!(session.get(Kind::State, None).await.unwrap().is_none());
    assert!(session.get(Kind::State, Some("no-such-id")).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn pending_writes_are_not_counted_and_close_discards_them() {
    let (storage, _guard) = storage().await;
    let mut session = storage.session().unwrap();
    let before = session.count(Some(Kind::State)).await.unwrap();
    let mut state = State::new("Pending");
    session.add(&mut state);
    assert_eq!(session.count(Some(Kind::State)).await.unwrap(), before);
    session.close();

    let fresh = storage.session().unwrap();
    assert_eq!(fresh.count(Some(Kind::State)).await.unwrap(), before);
    assert!(fresh.get_as::<State>(&state.base.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn failed_save_commits_nothing() {
    let (storage, _guard) = storage().await;
    let mut session = storage.session().unwrap();
    let mut state = State::new("Atomic");
    let mut orphan = City::new("missing-state", "Nowhere");
    session.add(&mut state);
    session.add(&mut orphan);
    assert!(session.save().await.is_err());
    assert!(session.pending().is_empty());
    assert!(session.get_as::<State>(&state.base.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_advances_timestamp() {
    let (storage, _guard) = storage().await;
    let mut session = storage.session().unwrap();
    let mut state = State::new("Old");
    session.add(&mut state);
    session.save().await.unwrap();
    let first = state.base.updated_at;

    state.name = "New".into();
    session.add(&mut state);
    session.save().await.unwrap();
    let stored = session.get_as::<State>(&state.base.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "New");
    assert!(stored.base.updated_at > first);
    assert_eq!(stored.base.created_at, state.base.created_at);
}

#[tokio::test]
#[ignore = "requires database"]
async fn reload_is_idempotent() {
    let (storage, _guard) = storage().await;
    let (state, ..) = seed_place(&storage).await;
    storage.reload().await.unwrap();
    let session = storage.session().unwrap();
    assert!(session.get_as::<State>(&state.base.id).await.unwrap().is_some());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_environment_resets_once() {
    let (storage, _guard) = storage().await;
    seed_place(&storage).await;
    storage.shutdown().await;

    let config = StorageConfig {
        env: Environment::Test,
        ..config()
    };
    let storage = DbStorage::new(&config).unwrap();
    storage.reload().await.unwrap();
    let mut session = storage.session().unwrap();
    assert_eq!(session.count(None).await.unwrap(), 0);

    let mut state = State::new("Fresh");
    session.add(&mut state);
    session.save().await.unwrap();
    storage.reload().await.unwrap();
    assert_eq!(session.count(None).await.unwrap(), 1);
    assert_eq!(session.get_as::<State>(&state.base.id).await.unwrap(), Some(state));
}

#[tokio::test]
#[ignore = "requires database"]
async fn filling_optional_columns_on_one_connection() {
    let (storage, _guard) = storage_with(StorageConfig {
        max_connections: 1,
        ..config()
    })
    .await;
    let (.., mut place) = seed_place(&storage).await;
    let mut session = storage.session().unwrap();

    let mut bare = Place::new(&place.city_id, &place.user_id, "Bare");
    session.add(&mut bare);
    session.save().await.unwrap();
    bare.latitude = Some(37.77);
    bare.longitude = Some(-122.41);
    bare.description = Some("Now located".into());
    session.add(&mut bare);
    session.save().await.unwrap();
    assert_eq!(session.get_as::<Place>(&bare.base.id).await.unwrap(), Some(bare));

    place.latitude = None;
    session.add(&mut place);
    session.save().await.unwrap();
    let stored = session.get_as::<Place>(&place.base.id).await.unwrap().unwrap();
    assert_eq!(stored.latitude, None);
}

#[tokio::test]
#[ignore = "requires database"]
async fn amenity_links() {
    let (storage, _guard) = storage().await;
    let (.., place) = seed_place(&storage).await;
    let mut session = storage.session().unwrap();
    let mut wifi = Amenity::new("Wifi");
    session.add(&mut wifi);
    session.link_amenity(place.id(), wifi.id());
    session.save().await.unwrap();
    let linked = session.amenities_of(place.id()).await.unwrap();
    assert_eq!(linked, vec![wifi.clone()]);

    session.unlink_amenity(place.id(), wifi.id());
    session.save().await.unwrap();
    assert!(session.amenities_of(place.id()).await.unwrap().is_empty());
}

async fn call(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
#[ignore = "requires database"]
async fn http_state_and_city_lifecycle() {
    let (storage, _guard) = storage().await;
    let app = app(AppState::new(storage));

    let (status, body) = call(&app, "POST", "/api/v1/states", Some(json!({"foo": 1}))).await;
    assert_eq!((status, body["error"].as_str()), (StatusCode::BAD_REQUEST, Some("Missing name")));
    let (status, body) = call(&app, "POST", "/api/v1/states", Some(json!({}))).await;
    assert_eq!((status, body["error"].as_str()), (StatusCode::BAD_REQUEST, Some("Not a JSON")));

    let (status, state) = call(&app, "POST", "/api/v1/states", Some(json!({"name": "Utah"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(state["__class__"], "State");
    let state_id = state["id"].as_str().unwrap().to_string();

    let (status, body) = call(&app, "PUT", &format!("/api/v1/states/{state_id}"), Some(json!({"name": "Deseret", "id": "x"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Deseret");
    assert_eq!(body["id"], state_id.as_str());

    let (status, city) = call(&app, "POST", &format!("/api/v1/states/{state_id}/cities"), Some(json!({"name": "Provo"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(city["state_id"], state_id.as_str());

    let (status, cities) = call(&app, "GET", &format!("/api/v1/states/{state_id}/cities"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cities.as_array().map(Vec::len), Some(1));

    let (status, stats) = call(&app, "GET", "/api/v1/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(stats["states"].as_u64().unwrap() >= 1);
    assert!(stats.get("reviews").is_some());

    let (status, body) = call(&app, "DELETE", &format!("/api/v1/states/{state_id}"), None).await;
    assert_eq!((status, body), (StatusCode::OK, json!({})));
    let (status, _) = call(&app, "GET", &format!("/api/v1/states/{state_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, "POST", &format!("/api/v1/states/{state_id}/cities"), Some(json!({"name": "Ogden"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn http_users_places_reviews_and_search() {
    let (storage, _guard) = storage().await;
    let (state, city, ..) = seed_place(&storage).await;
    let app = app(AppState::new(storage));

    let (status, body) = call(&app, "POST", "/api/v1/users", Some(json!({"email": "guest@example.com"}))).await;
    assert_eq!((status, body["error"].as_str()), (StatusCode::BAD_REQUEST, Some("Missing password")));
    let (status, user) = call(&app, "POST", "/api/v1/users", Some(json!({"email": "guest@example.com", "password": "pw"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(user.get("password").is_none());
    let user_id = user["id"].as_str().unwrap().to_string();

    let places_uri = format!("/api/v1/cities/{}/places", city.base.id);
    let (status, body) = call(&app, "POST", &places_uri, Some(json!({"name": "Cabin"}))).await;
    assert_eq!((status, body["error"].as_str()), (StatusCode::BAD_REQUEST, Some("Missing user_id")));
    let (status, _) = call(&app, "POST", &places_uri, Some(json!({"name": "Cabin", "user_id": "nobody"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, place) = call(&app, "POST", &places_uri, Some(json!({"name": "Cabin", "user_id": user_id, "max_guest": 4}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(place["max_guest"], 4);
    let place_id = place["id"].as_str().unwrap().to_string();

    let reviews_uri = format!("/api/v1/places/{place_id}/reviews");
    let (status, body) = call(&app, "POST", &reviews_uri, Some(json!({"user_id": user_id}))).await;
    assert_eq!((status, body["error"].as_str()), (StatusCode::BAD_REQUEST, Some("Missing text")));
    let (status, review) = call(&app, "POST", &reviews_uri, Some(json!({"user_id": user_id, "text": "Cozy"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(review["place_id"], place_id.as_str());

    let (_, amenity) = call(&app, "POST", "/api/v1/amenities", Some(json!({"name": "Fireplace"}))).await;
    let amenity_id = amenity["id"].as_str().unwrap().to_string();
    let link_uri = format!("/api/v1/places/{place_id}/amenities/{amenity_id}");
    assert_eq!(call(&app, "POST", &link_uri, None).await.0, StatusCode::CREATED);
    assert_eq!(call(&app, "POST", &link_uri, None).await.0, StatusCode::OK);

    let (status, found) = call(&app, "POST", "/api/v1/places_search", Some(json!({"states": [state.base.id], "amenities": [amenity_id]}))).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = found.as_array().unwrap().iter().map(|p| p["id"].clone()).collect();
    assert_eq!(ids, vec![json!(place_id)]);

    assert_eq!(call(&app, "DELETE", &link_uri, None).await.0, StatusCode::OK);
    assert_eq!(call(&app, "DELETE", &link_uri, None).await.0, StatusCode::NOT_FOUND);
    let (status, body) = call(&app, "POST", "/api/v1/places_search", Some(json!([1]))).await;
    assert_eq!((status, body["error"].as_str()), (StatusCode::BAD_REQUEST, Some("Not a JSON")));
}
