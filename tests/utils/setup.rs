use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

use rentcar::{
    account::repository::InMemoryAccountRepository,
    car::{CarModel, CarRepository, InMemoryCarRepository},
    config::TokenSettings,
    credentials::SessionTokenIssuer,
    favorite::repository::InMemoryFavoriteRepository,
    notify::{LoggingNotifier, RegistrationNotifier},
    router, AppState,
};

pub const TEST_SECRET: &str =
    "integration-test-signing-secret-long-enough-for-hs512-0123456789";

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app: Router,
    pub accounts: Arc<InMemoryAccountRepository>,
    pub token_issuer: Arc<SessionTokenIssuer>,
}

pub struct TestSetupBuilder {
    cars: Vec<CarModel>,
    notifier: Arc<dyn RegistrationNotifier>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            cars: vec![],
            notifier: Arc::new(LoggingNotifier),
        }
    }

    pub fn with_default_cars(mut self) -> Self {
        self.cars = vec![
            CarModel::new(7, "Kia", "Rio", 2019, 25.0),
            CarModel::new(42, "Toyota", "Corolla", 2021, 39.5),
            CarModel::new(99, "Tesla", "Model 3", 2023, 89.0),
        ];
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn RegistrationNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn build(self) -> TestSetup {
        let accounts = Arc::new(InMemoryAccountRepository::new());
        let cars: Arc<dyn CarRepository + Send + Sync> =
            Arc::new(InMemoryCarRepository::with_cars(self.cars));
        let favorites = Arc::new(InMemoryFavoriteRepository::new(cars.clone()));
        let token_issuer = Arc::new(SessionTokenIssuer::new(
            &TokenSettings::new(TEST_SECRET, 24).unwrap(),
        ));

        let state = AppState::new(
            accounts.clone(),
            cars,
            favorites,
            self.notifier,
            token_issuer.clone(),
        );

        TestSetup {
            app: router(state),
            accounts,
            token_issuer,
        }
    }
}

impl TestSetup {
    /// Sends a request through the router and returns status plus body (Null if empty, String if not JSON)
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, value)
    }

    pub async fn register(&self, phone_number: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/api/users/register",
            None,
            Some(json!({
                "phone_number": phone_number,
                "first_name": "Ann",
                "last_name": "Lee",
                "email": "a@x.com",
                "password": password,
            })),
        )
        .await
    }

    pub async fn login(&self, phone_number: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "phone_number": phone_number, "password": password })),
        )
        .await
    }

    /// Registers and logs in, returning the bearer token
    pub async fn signed_in(&self, phone_number: &str, password: &str) -> String {
        let (status, _) = self.register(phone_number, password).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = self.login(phone_number, password).await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }
}
