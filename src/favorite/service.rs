use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{models::FavoriteLink, repository::FavoriteRepository};
use crate::account::repository::AccountRepository;
use crate::car::{CarModel, CarRepository};
use crate::shared::AppError;

/// Service for marking and unmarking favorite cars
pub struct FavoriteService {
    accounts: Arc<dyn AccountRepository + Send + Sync>,
    cars: Arc<dyn CarRepository + Send + Sync>,
    favorites: Arc<dyn FavoriteRepository + Send + Sync>,
}

impl FavoriteService {
    pub fn new(
        accounts: Arc<dyn AccountRepository + Send + Sync>,
        cars: Arc<dyn CarRepository + Send + Sync>,
        favorites: Arc<dyn FavoriteRepository + Send + Sync>,
    ) -> Self {
        Self {
            accounts,
            cars,
            favorites,
        }
    }

    /// Links `car_id` to the account. Adding an existing favorite is a no-op.
    #[instrument(skip(self))]
    pub async fn add_favorite(&self, phone_number: &str, car_id: i32) -> Result<(), AppError> {
        self.require_account(phone_number).await?;

        if self.cars.get_car(car_id).await?.is_none() {
            warn!(car_id, "Cannot favorite unknown car");
            return Err(AppError::CarNotFound);
        }

        let inserted = self
            .favorites
            .add_favorite(&FavoriteLink::new(phone_number, car_id))
            .await?;

        info!(car_id, inserted, "Favorite added");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove_favorite(&self, phone_number: &str, car_id: i32) -> Result<(), AppError> {
        self.require_account(phone_number).await?;

        let removed = self
            .favorites
            .remove_favorite(&FavoriteLink::new(phone_number, car_id))
            .await?;
        if !removed {
            warn!(car_id, "Car is not in favorites");
            return Err(AppError::FavoriteNotFound);
        }

        info!(car_id, "Favorite removed");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_favorites(&self, phone_number: &str) -> Result<Vec<CarModel>, AppError> {
        self.require_account(phone_number).await?;

        let cars = self.favorites.list_favorite_cars(phone_number).await?;
        debug!(favorite_count = cars.len(), "Listed favorites");
        Ok(cars)
    }

    async fn require_account(&self, phone_number: &str) -> Result<(), AppError> {
        match self.accounts.get_account(phone_number).await? {
            Some(_) => Ok(()),
            None => {
                warn!("Account not found");
                Err(AppError::UserNotFound)
            }
        }
    }
}
