//! Application services for token issuance.

mod token;

pub use token::TokenService;
