use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::service::FavoriteService;
use crate::car::CarModel;
use crate::credentials::{require_subject, SessionClaims};
use crate::shared::{AppError, AppState};

fn favorite_service(state: &AppState) -> FavoriteService {
    FavoriteService::new(
        Arc::clone(&state.account_repository),
        Arc::clone(&state.car_repository),
        Arc::clone(&state.favorite_repository),
    )
}

/// HTTP handler for listing an account's favorite cars
///
/// GET /api/users/:phone_number/favorite-cars
#[instrument(name = "list_favorites", skip(state, claims))]
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(phone_number): Path<String>,
) -> Result<Json<Vec<CarModel>>, AppError> {
    require_subject(&claims, &phone_number)?;

    let cars = favorite_service(&state).list_favorites(&phone_number).await?;

    info!(favorite_count = cars.len(), "Favorites listed successfully");
    Ok(Json(cars))
}

/// HTTP handler for marking a car as favorite
///
/// POST /api/users/:phone_number/favorites/:car_id
#[instrument(name = "add_favorite", skip(state, claims))]
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path((phone_number, car_id)): Path<(String, i32)>,
) -> Result<StatusCode, AppError> {
    require_subject(&claims, &phone_number)?;

    favorite_service(&state)
        .add_favorite(&phone_number, car_id)
        .await?;

    Ok(StatusCode::OK)
}

/// HTTP handler for unmarking a favorite car
///
/// DELETE /api/users/:phone_number/favorite-cars/remove-from-favourites/:car_id
#[instrument(name = "remove_favorite", skip(state, claims))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path((phone_number, car_id)): Path<(String, i32)>,
) -> Result<StatusCode, AppError> {
    require_subject(&claims, &phone_number)?;

    favorite_service(&state)
        .remove_favorite(&phone_number, car_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
