pub mod models;
pub mod repository;

pub use models::CarModel;
pub use repository::{CarRepository, InMemoryCarRepository, PostgresCarRepository};
