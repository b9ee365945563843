// Library crate for the RentCar account service
// This file exposes the public API for integration tests

pub mod account;
pub mod car;
pub mod config;
pub mod credentials;
pub mod favorite;
pub mod notify;
pub mod routes;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use account::AccountService;
pub use config::{AppConfig, ConfigError, TokenSettings};
pub use credentials::{CredentialHasher, SessionClaims, SessionTokenIssuer};
pub use favorite::FavoriteService;
pub use routes::router;
pub use shared::{AppError, AppState};

/// Schema migrations, embedded from `migrations/` at compile time
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_embedded() {
        let descriptions: Vec<&str> = MIGRATOR
            .iter()
            .map(|migration| migration.description.as_ref())
            .collect();
        assert_eq!(descriptions, vec!["accounts"]);
    }
}
