//! Shared fixtures and request helpers for HTTP integration tests.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::{DateTime, Duration, Local, Utc};
use eyre::WrapErr;
use mockable::Clock;
use rstest::fixture;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use taskgate::{
    auth::{
        adapters::{InMemoryUserDirectory, JwtTokenService, TokenLifetimes},
        ports::{TokenIssuer, TokenValidator, UserDirectory},
        services::TokenService,
    },
    http::{AppState, router},
    task::{
        adapters::memory::InMemoryTaskRepository, ports::TaskRepository,
        services::TaskCreationService, validation::TaskValidationConfig,
    },
};
use tower::ServiceExt;

/// Username accepted by the test directory.
pub const USERNAME: &str = "alice";
/// Password for [`USERNAME`].
pub const PASSWORD: &str = "wonderland";

const SECRET: &[u8] = b"integration-test-secret";

/// Clock advanced explicitly by tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Moves the clock forward by `seconds`.
    pub fn advance(&self, seconds: i64) {
        let mut now = self.now.lock().expect("clock lock");
        *now += Duration::seconds(seconds);
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

/// Router wired to in-memory adapters, plus handles for steering it.
pub struct TestApp {
    /// Router under test.
    pub router: Router,
    /// Clock used for token issue and expiry.
    pub clock: Arc<ManualClock>,
}

/// Decoded response.
#[derive(Debug)]
pub struct TestResponse {
    /// Response status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// JSON body, or `null` when the body is empty.
    pub body: Value,
}

/// Builds a fresh application with one registered user.
#[fixture]
pub fn app() -> TestApp {
    let clock = Arc::new(ManualClock {
        now: Mutex::new(Utc::now()),
    });
    let jwt = Arc::new(JwtTokenService::new(
        SECRET,
        TokenLifetimes::default(),
        Arc::clone(&clock),
    ));
    let access_tokens: Arc<dyn TokenValidator> = jwt.clone();
    let issuer: Arc<dyn TokenIssuer> = jwt;
    let users: Arc<dyn UserDirectory> = Arc::new(InMemoryUserDirectory::from_credentials([(
        USERNAME, PASSWORD,
    )]));
    let repository: Arc<dyn TaskRepository> = Arc::new(InMemoryTaskRepository::new());
    let tasks = TaskCreationService::new(repository, &TaskValidationConfig::default())
        .expect("default validation config is valid");

    TestApp {
        router: router(AppState::new(
            tasks,
            access_tokens,
            TokenService::new(issuer, users),
        )),
        clock,
    }
}

/// Builds a request with a raw body and optional bearer token.
pub fn request(method: Method, uri: &str, body: Vec<u8>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(bearer) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {bearer}"));
    }
    builder.body(Body::from(body)).expect("request builds")
}

/// Builds a `POST` request with a JSON body.
pub fn post_json(uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    request(Method::POST, uri, body.to_string().into_bytes(), token)
}

impl TestApp {
    /// Sends `request` through the router and decodes the response.
    ///
    /// # Errors
    ///
    /// Returns an error when the body cannot be read or is not JSON.
    pub async fn send(&self, request: Request<Body>) -> eyre::Result<TestResponse> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .wrap_err("router call")?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .wrap_err("read response body")?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).wrap_err("decode response body")?
        };
        Ok(TestResponse {
            status,
            headers,
            body,
        })
    }

    /// Obtains a token pair for the registered user.
    ///
    /// # Errors
    ///
    /// Returns an error when the token endpoint refuses the credentials.
    pub async fn login(&self) -> eyre::Result<(String, String)> {
        let response = self
            .send(post_json(
                "/api/token/",
                &serde_json::json!({"username": USERNAME, "password": PASSWORD}),
                None,
            ))
            .await?;
        if response.status != StatusCode::OK {
            eyre::bail!("login failed with {}: {}", response.status, response.body);
        }
        let field = |name: &str| {
            response
                .body
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| eyre::eyre!("login response lacks {name}"))
        };
        Ok((field("access")?, field("refresh")?))
    }

    /// Returns a fresh access token for the registered user.
    ///
    /// # Errors
    ///
    /// Returns an error when login fails.
    pub async fn access_token(&self) -> eyre::Result<String> {
        Ok(self.login().await?.0)
    }
}
