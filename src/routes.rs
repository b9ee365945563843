use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{account, credentials, favorite, shared::AppState};

/// Builds the `/api/users` router; account-scoped routes require a bearer token
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/users/:phone_number", get(account::get_account))
        .route(
            "/api/users/:phone_number/favorite-cars",
            get(favorite::list_favorites),
        )
        .route(
            "/api/users/:phone_number/favorites/:car_id",
            post(favorite::add_favorite),
        )
        .route(
            "/api/users/:phone_number/favorite-cars/remove-from-favourites/:car_id",
            delete(favorite::remove_favorite),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            credentials::jwt_auth,
        ));

    Router::new()
        .route("/", get(|| async { "RentCar account service" }))
        .route("/api/users/register", post(account::register))
        .route("/api/users/login", post(account::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
