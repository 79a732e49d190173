//! Common test utilities for E2E testing with mocks.
//!
//! Builds an in-process router around the fixture catalog, an in-memory
//! launch store and a [`MockGateway`], so the whole API can be exercised
//! without ssh or a real game server.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use cabinet_core::{
    testing::MockGateway, ApiKeyAuthenticator, AuthConfig, AuthMethod, Authenticator, Catalog,
    Config, LaunchGateway, LaunchStore, NoneAuthenticator, SqliteLaunchStore,
};

/// Re-export fixtures for test convenience
pub use cabinet_core::testing::fixtures;

/// API key used when a fixture is built with authentication enabled.
pub const TEST_API_KEY: &str = "test-key";

/// Test fixture for E2E testing with mock dependencies.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock game server - inspect launches and stops, inject failures
    pub gateway: Arc<MockGateway>,
    /// Launch history shared with the router
    pub launch_store: Arc<SqliteLaunchStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Leave the game server out, as when `[game_server]` is not configured
    pub without_gateway: bool,
    /// Require `TEST_API_KEY` on every API request
    pub with_api_key: bool,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let gateway = Arc::new(MockGateway::new());
        let launch_store =
            Arc::new(SqliteLaunchStore::in_memory().expect("Failed to create launch store"));

        let (auth, authenticator): (AuthConfig, Arc<dyn Authenticator>) =
            if test_config.with_api_key {
                (
                    AuthConfig {
                        method: AuthMethod::ApiKey,
                        api_key: Some(TEST_API_KEY.to_string()),
                    },
                    Arc::new(ApiKeyAuthenticator::new(TEST_API_KEY.to_string())),
                )
            } else {
                (
                    AuthConfig {
                        method: AuthMethod::None,
                        api_key: None,
                    },
                    Arc::new(NoneAuthenticator::new()),
                )
            };

        let config = Config {
            auth,
            server: Default::default(),
            database: Default::default(),
            catalog: Default::default(),
            game_server: None,
            game_clients: Vec::new(),
        };

        let gateway_dyn: Option<Arc<dyn LaunchGateway>> = if test_config.without_gateway {
            None
        } else {
            Some(Arc::clone(&gateway) as Arc<dyn LaunchGateway>)
        };

        let state = Arc::new(cabinet_server::state::AppState::new(
            config,
            authenticator,
            Arc::new(fixtures::catalog()),
            gateway_dyn,
            Arc::clone(&launch_store) as Arc<dyn LaunchStore>,
        ));

        let router = cabinet_server::api::create_router(state);

        Self {
            router,
            gateway,
            launch_store,
        }
    }

    /// The catalog the router serves.
    pub fn catalog(&self) -> Catalog {
        fixtures::catalog()
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, &[]).await
    }

    /// Send a GET request with extra headers.
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        self.request("GET", path, None, headers).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body), &[]).await
    }

    /// Send a GET request and return the raw body text (for non-JSON endpoints).
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Send a request to the test server.
    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            request_builder = request_builder.header(*name, *value);
        }

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
