use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument, warn};

use super::models::FavoriteLink;
use crate::car::{CarModel, CarRepository};
use crate::shared::AppError;

/// Trait for favorite link operations
#[async_trait]
pub trait FavoriteRepository {
    /// Links a car to an account; returns false if the link already existed
    async fn add_favorite(&self, link: &FavoriteLink) -> Result<bool, AppError>;

    /// Removes a link; returns false if there was nothing to remove
    async fn remove_favorite(&self, link: &FavoriteLink) -> Result<bool, AppError>;

    /// Cars linked to the account, ordered by car id
    async fn list_favorite_cars(&self, phone_number: &str) -> Result<Vec<CarModel>, AppError>;
}

/// In-memory implementation of FavoriteRepository for development and testing
///
/// Listing joins against the given car repository the way the SQL
/// implementation joins against the cars table.
pub struct InMemoryFavoriteRepository {
    links: Mutex<BTreeSet<FavoriteLink>>,
    cars: Arc<dyn CarRepository + Send + Sync>,
}

impl InMemoryFavoriteRepository {
    pub fn new(cars: Arc<dyn CarRepository + Send + Sync>) -> Self {
        Self {
            links: Mutex::new(BTreeSet::new()),
            cars,
        }
    }

    pub fn link_count(&self) -> usize {
        self.links.lock().map(|links| links.len()).unwrap_or(0)
    }
}

#[async_trait]
impl FavoriteRepository for InMemoryFavoriteRepository {
    #[instrument(skip(self))]
    async fn add_favorite(&self, link: &FavoriteLink) -> Result<bool, AppError> {
        let mut links = self.links.lock().map_err(|_| AppError::Internal)?;
        let inserted = links.insert(link.clone());

        debug!(inserted, "Added favorite link in memory");
        Ok(inserted)
    }

    #[instrument(skip(self))]
    async fn remove_favorite(&self, link: &FavoriteLink) -> Result<bool, AppError> {
        let mut links = self.links.lock().map_err(|_| AppError::Internal)?;
        let removed = links.remove(link);

        debug!(removed, "Removed favorite link in memory");
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn list_favorite_cars(&self, phone_number: &str) -> Result<Vec<CarModel>, AppError> {
        let car_ids: Vec<i32> = {
            let links = self.links.lock().map_err(|_| AppError::Internal)?;
            links
                .iter()
                .filter(|link| link.phone_number == phone_number)
                .map(|link| link.car_id)
                .collect()
        };

        let mut cars = Vec::with_capacity(car_ids.len());
        for car_id in car_ids {
            match self.cars.get_car(car_id).await? {
                Some(car) => cars.push(car),
                None => warn!(car_id, "Favorite link points at a missing car"),
            }
        }

        debug!(favorite_count = cars.len(), "Listed favorite cars from memory");
        Ok(cars)
    }
}

/// PostgreSQL implementation of favorite repository
pub struct PostgresFavoriteRepository {
    pool: PgPool,
}

impl PostgresFavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteRepository for PostgresFavoriteRepository {
    #[instrument(skip(self))]
    async fn add_favorite(&self, link: &FavoriteLink) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT INTO favorite_cars (phone_number, car_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(&link.phone_number)
        .bind(link.car_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to add favorite link in database");
            AppError::DatabaseError(e.to_string())
        })?;

        let inserted = result.rows_affected() == 1;
        debug!(inserted, "Added favorite link in database");
        Ok(inserted)
    }

    #[instrument(skip(self))]
    async fn remove_favorite(&self, link: &FavoriteLink) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM favorite_cars WHERE phone_number = $1 AND car_id = $2")
            .bind(&link.phone_number)
            .bind(link.car_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to remove favorite link from database");
                AppError::DatabaseError(e.to_string())
            })?;

        let removed = result.rows_affected() > 0;
        debug!(removed, "Removed favorite link from database");
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn list_favorite_cars(&self, phone_number: &str) -> Result<Vec<CarModel>, AppError> {
        let cars = sqlx::query_as::<_, CarModel>(
            "SELECT c.id, c.make, c.model, c.year, c.price_per_day \
             FROM favorite_cars f JOIN cars c ON c.id = f.car_id \
             WHERE f.phone_number = $1 ORDER BY c.id",
        )
        .bind(phone_number)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list favorite cars from database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(favorite_count = cars.len(), "Listed favorite cars from database");
        Ok(cars)
    }
}
