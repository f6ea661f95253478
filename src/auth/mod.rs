//! Bearer-token authentication.
//!
//! Access tokens guard the task endpoints; refresh tokens renew them. The
//! module follows the same hexagonal layout as [`crate::task`]:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
