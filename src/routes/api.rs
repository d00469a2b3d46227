//! Resource routes, mounted under `/api/v1` by the server.

use crate::error::AppError;
use crate::handlers::{
    amenities::*, cities::*, index::*, places::*, places_amenities::*, places_search::*, reviews::*,
    states::*, users::*,
};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/stats", get(stats))
        .route("/states", get(list_states).post(create_state))
        .route(
            "/states/:state_id",
            get(get_state).put(update_state).delete(delete_state),
        )
        .route(
            "/states/:state_id/cities",
            get(list_cities_of_state).post(create_city),
        )
        .route(
            "/cities/:city_id",
            get(get_city).put(update_city).delete(delete_city),
        )
        .route("/amenities", get(list_amenities).post(create_amenity))
        .route(
            "/amenities/:amenity_id",
            get(get_amenity).put(update_amenity).delete(delete_amenity),
        )
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route(
            "/cities/:city_id/places",
            get(list_places_of_city).post(create_place),
        )
        .route(
            "/places/:place_id",
            get(get_place).put(update_place).delete(delete_place),
        )
        .route(
            "/places/:place_id/reviews",
            get(list_reviews_of_place).post(create_review),
        )
        .route(
            "/reviews/:review_id",
            get(get_review).put(update_review).delete(delete_review),
        )
        .route("/places/:place_id/amenities", get(list_place_amenities))
        .route(
            "/places/:place_id/amenities/:amenity_id",
            post(link_place_amenity).delete(unlink_place_amenity),
        )
        .route("/places_search", post(places_search))
        .with_state(state)
}

/// Unmatched paths answer `{"error": "Not found"}` with 404.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
