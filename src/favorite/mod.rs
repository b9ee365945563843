// Public API - what other modules can use
pub use handlers::{add_favorite, list_favorites, remove_favorite};
pub use service::FavoriteService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
