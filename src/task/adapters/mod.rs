//! Adapter implementations for task ports.
//!
//! The in-memory adapter is always available; the `PostgreSQL` adapter is
//! compiled with the `postgres` cargo feature.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
