use rentcar::{
    account::repository::{AccountRepository, InMemoryAccountRepository, PostgresAccountRepository},
    car::{CarRepository, InMemoryCarRepository, PostgresCarRepository},
    config::AppConfig,
    credentials::SessionTokenIssuer,
    favorite::repository::{
        FavoriteRepository, InMemoryFavoriteRepository, PostgresFavoriteRepository,
    },
    notify::{LoggingNotifier, RegistrationNotifier, SmtpNotifier},
    router, AppState, MIGRATOR,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Repositories = (
    Arc<dyn AccountRepository + Send + Sync>,
    Arc<dyn CarRepository + Send + Sync>,
    Arc<dyn FavoriteRepository + Send + Sync>,
);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rentcar=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting RentCar account service");

    // Fail before binding anything if the signing secret is missing or weak
    let config = AppConfig::from_env().inspect_err(|e| {
        error!(error = %e, "Invalid configuration");
    })?;

    let token_issuer = Arc::new(SessionTokenIssuer::new(&config.token));

    let (account_repository, car_repository, favorite_repository) =
        match config.database_url.as_deref() {
            Some(database_url) => postgres_repositories(database_url).await?,
            None => {
                warn!("DATABASE_URL not set, using in-memory datastore with a sample fleet");
                in_memory_repositories()
            }
        };

    let notifier: Arc<dyn RegistrationNotifier> = match &config.smtp {
        Some(smtp) => {
            info!(host = %smtp.host, port = smtp.port, "Registration notices go through SMTP");
            Arc::new(SmtpNotifier::new(smtp)?)
        }
        None => Arc::new(LoggingNotifier),
    };

    let app_state = AppState::new(
        account_repository,
        car_repository,
        favorite_repository,
        notifier,
        token_issuer,
    );

    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn postgres_repositories(database_url: &str) -> anyhow::Result<Repositories> {
    let pool = PgPool::connect(database_url).await?;
    MIGRATOR.run(&pool).await?;
    info!("Connected to PostgreSQL and applied migrations");

    Ok((
        Arc::new(PostgresAccountRepository::new(pool.clone())),
        Arc::new(PostgresCarRepository::new(pool.clone())),
        Arc::new(PostgresFavoriteRepository::new(pool)),
    ))
}

fn in_memory_repositories() -> Repositories {
    let cars: Arc<dyn CarRepository + Send + Sync> =
        Arc::new(InMemoryCarRepository::with_sample_fleet());

    (
        Arc::new(InMemoryAccountRepository::new()),
        cars.clone(),
        Arc::new(InMemoryFavoriteRepository::new(cars)),
    )
}
