//! HTTP surface.
//!
//! | Route                     | Auth   | Handler                         |
//! |---------------------------|--------|---------------------------------|
//! | `POST /tasks/`            | Bearer | [`handlers::create_task`]       |
//! | `POST /api/token/`        | none   | [`handlers::obtain_token`]      |
//! | `POST /api/token/refresh/`| none   | [`handlers::refresh_token`]     |

pub mod body;
pub mod error;
pub mod handlers;
pub mod middleware;

pub use error::ApiError;

use crate::auth::{
    ports::{TokenIssuer, TokenValidator, UserDirectory},
    services::TokenService,
};
use crate::task::{ports::TaskRepository, services::TaskCreationService};
use axum::{Router, routing::post};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Services shared by every handler.
#[derive(Clone)]
pub struct AppState {
    tasks: TaskCreationService<dyn TaskRepository>,
    access_tokens: Arc<dyn TokenValidator>,
    tokens: TokenService<dyn TokenIssuer, dyn UserDirectory>,
}

impl AppState {
    /// Bundles the services behind the router.
    #[must_use]
    pub const fn new(
        tasks: TaskCreationService<dyn TaskRepository>,
        access_tokens: Arc<dyn TokenValidator>,
        tokens: TokenService<dyn TokenIssuer, dyn UserDirectory>,
    ) -> Self {
        Self {
            tasks,
            access_tokens,
            tokens,
        }
    }

    /// Returns the task creation service.
    #[must_use]
    pub const fn tasks(&self) -> &TaskCreationService<dyn TaskRepository> {
        &self.tasks
    }

    /// Returns the access token validator.
    #[must_use]
    pub fn access_tokens(&self) -> &dyn TokenValidator {
        self.access_tokens.as_ref()
    }

    /// Returns the token issuance service.
    #[must_use]
    pub const fn tokens(&self) -> &TokenService<dyn TokenIssuer, dyn UserDirectory> {
        &self.tokens
    }
}

/// Builds the application router.
///
/// Bearer authentication is a route layer, so it also guards unsupported
/// methods on protected paths: those answer 401 before 405.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/tasks/", post(handlers::create_task))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_bearer,
        ));

    Router::new()
        .merge(protected)
        .route("/api/token/", post(handlers::obtain_token))
        .route("/api/token/refresh/", post(handlers::refresh_token))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves `app` on `listener` until Ctrl-C is received.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    if let Ok(address) = listener.local_addr() {
        info!(%address, "listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            warn!(error = %err, "cannot listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
