use serde::{Deserialize, Serialize};

/// Association between an account and a car it has marked as favorite
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FavoriteLink {
    pub phone_number: String,
    pub car_id: i32,
}

impl FavoriteLink {
    pub fn new(phone_number: &str, car_id: i32) -> Self {
        Self {
            phone_number: phone_number.to_string(),
            car_id,
        }
    }
}
