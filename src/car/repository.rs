use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::CarModel;
use crate::shared::AppError;

/// Trait for car lookups; cars are managed outside this service
#[async_trait]
pub trait CarRepository {
    async fn get_car(&self, car_id: i32) -> Result<Option<CarModel>, AppError>;
}

/// In-memory implementation of CarRepository for development and testing
pub struct InMemoryCarRepository {
    cars: Mutex<HashMap<i32, CarModel>>,
}

impl Default for InMemoryCarRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCarRepository {
    pub fn new() -> Self {
        Self {
            cars: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated cars
    pub fn with_cars(cars: Vec<CarModel>) -> Self {
        Self {
            cars: Mutex::new(cars.into_iter().map(|car| (car.id, car)).collect()),
        }
    }

    /// Small fleet for running without a database, so favorites can be exercised
    pub fn with_sample_fleet() -> Self {
        Self::with_cars(vec![
            CarModel::new(1, "Toyota", "Corolla", 2021, 39.5),
            CarModel::new(2, "Kia", "Rio", 2019, 25.0),
            CarModel::new(3, "Volkswagen", "Golf", 2022, 45.0),
            CarModel::new(4, "Tesla", "Model 3", 2023, 89.0),
            CarModel::new(5, "Ford", "Transit", 2020, 70.0),
        ])
    }
}

#[async_trait]
impl CarRepository for InMemoryCarRepository {
    #[instrument(skip(self))]
    async fn get_car(&self, car_id: i32) -> Result<Option<CarModel>, AppError> {
        let cars = self.cars.lock().map_err(|_| AppError::Internal)?;
        let car = cars.get(&car_id).cloned();

        debug!(found = car.is_some(), "Fetched car from memory");
        Ok(car)
    }
}

/// PostgreSQL implementation of car repository
pub struct PostgresCarRepository {
    pool: PgPool,
}

impl PostgresCarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarRepository for PostgresCarRepository {
    #[instrument(skip(self))]
    async fn get_car(&self, car_id: i32) -> Result<Option<CarModel>, AppError> {
        let car = sqlx::query_as::<_, CarModel>(
            "SELECT id, make, model, year, price_per_day FROM cars WHERE id = $1",
        )
        .bind(car_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch car from database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(found = car.is_some(), "Fetched car from database");
        Ok(car)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_preloaded_car() {
        let repo = InMemoryCarRepository::with_cars(vec![
            CarModel::new(42, "Toyota", "Corolla", 2021, 39.5),
            CarModel::new(7, "Kia", "Rio", 2019, 25.0),
        ]);

        let car = repo.get_car(42).await.unwrap().unwrap();
        assert_eq!(car.make, "Toyota");
        assert!(repo.get_car(8).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sample_fleet_is_populated() {
        let repo = InMemoryCarRepository::with_sample_fleet();

        for car_id in 1..=5 {
            let car = repo.get_car(car_id).await.unwrap().unwrap();
            assert_eq!(car.id, car_id);
        }
        assert!(repo.get_car(6).await.unwrap().is_none());
    }
}
