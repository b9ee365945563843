// Public API - what other modules can use
pub use handlers::{get_account, login, register};
pub use service::AccountService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;
