//! Adapter implementations for authentication ports.

pub mod jwt;
pub mod memory;

pub use jwt::{JwtTokenService, TokenLifetimes};
pub use memory::InMemoryUserDirectory;
