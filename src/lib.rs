//! Taskgate: an authenticated task creation service.
//!
//! Authenticated callers submit candidate tasks over HTTP. Each candidate
//! passes a fixed, short-circuiting chain of rules before it is stored, and
//! the first failing rule determines the rejection.
//!
//! # Architecture
//!
//! Taskgate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (memory, `PostgreSQL`, JWT)
//!
//! # Modules
//!
//! - [`task`]: Task records, creation rules and storage
//! - [`auth`]: Bearer token issuance and validation
//! - [`http`]: The axum router and error mapping
//! - [`config`]: TOML and environment configuration
//! - [`app`]: Assembly of the service graph from configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod app;
pub mod auth;
pub mod config;
pub mod http;
pub mod task;
pub mod telemetry;
