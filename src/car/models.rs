use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the cars table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CarModel {
    pub id: i32,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price_per_day: f64,
}

impl CarModel {
    pub fn new(id: i32, make: &str, model: &str, year: i32, price_per_day: f64) -> Self {
        Self {
            id,
            make: make.to_string(),
            model: model.to_string(),
            year,
            price_per_day,
        }
    }
}
