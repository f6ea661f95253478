//! Wiring from configuration to the running service graph.

use crate::auth::{
    adapters::{InMemoryUserDirectory, JwtTokenService},
    ports::{TokenIssuer, TokenValidator, UserDirectory},
    services::TokenService,
};
use crate::config::{AppConfig, ConfigError, StorageConfig};
use crate::http::AppState;
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    ports::{TaskRepository, TaskRepositoryError},
    services::TaskCreationService,
};
use mockable::DefaultClock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised while assembling the service graph.
#[derive(Debug, Error)]
pub enum AppError {
    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The special-title pattern does not compile.
    #[error("invalid special title pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// `PostgreSQL` storage was requested from a build without it.
    #[error("postgres storage requires building with the `postgres` feature")]
    PostgresUnavailable,

    /// The task store could not be opened.
    #[error("failed to open task store: {0}")]
    Storage(#[source] TaskRepositoryError),
}

/// Builds the shared handler state described by `config`.
///
/// # Errors
///
/// Returns [`AppError`] when the configuration is invalid or the task store
/// cannot be opened.
pub async fn build_state(config: &AppConfig) -> Result<AppState, AppError> {
    config.validate()?;

    let repository = open_repository(&config.storage).await?;
    let tasks = TaskCreationService::new(repository, &config.validation)?;

    let jwt = Arc::new(JwtTokenService::new(
        config.auth.signing_secret.as_bytes(),
        config.token_lifetimes()?,
        Arc::new(DefaultClock),
    ));
    let access_tokens: Arc<dyn TokenValidator> = jwt.clone();
    let issuer: Arc<dyn TokenIssuer> = jwt;

    if config.auth.users.is_empty() {
        warn!("no users configured; every token request will be refused");
    }
    let users: Arc<dyn UserDirectory> = Arc::new(InMemoryUserDirectory::from_credentials(
        config
            .auth
            .users
            .iter()
            .map(|user| (user.username.clone(), &user.password)),
    ));

    Ok(AppState::new(
        tasks,
        access_tokens,
        TokenService::new(issuer, users),
    ))
}

async fn open_repository(storage: &StorageConfig) -> Result<Arc<dyn TaskRepository>, AppError> {
    match storage {
        StorageConfig::Memory => {
            info!("using in-memory task storage");
            Ok(Arc::new(InMemoryTaskRepository::new()))
        }
        StorageConfig::Postgres {
            database_url,
            pool_size,
        } => open_postgres(database_url, *pool_size).await,
    }
}

#[cfg(feature = "postgres")]
async fn open_postgres(
    database_url: &str,
    pool_size: u32,
) -> Result<Arc<dyn TaskRepository>, AppError> {
    use crate::task::adapters::postgres::PostgresTaskRepository;

    let repository =
        PostgresTaskRepository::connect(database_url, pool_size).map_err(AppError::Storage)?;
    repository.ensure_schema().await.map_err(AppError::Storage)?;
    info!(pool_size, "using postgres task storage");
    Ok(Arc::new(repository))
}

#[cfg(not(feature = "postgres"))]
#[expect(
    clippy::unused_async,
    reason = "mirrors the postgres-enabled signature"
)]
async fn open_postgres(
    _database_url: &str,
    _pool_size: u32,
) -> Result<Arc<dyn TaskRepository>, AppError> {
    Err(AppError::PostgresUnavailable)
}
