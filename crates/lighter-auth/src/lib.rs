//! Sessions and Auth Tokens
//!
//! API key session registry and signed auth tokens for the Lighter exchange.

pub mod session;
pub mod token;

pub use session::Session;
pub use token::{build_auth_token, create_auth_token, MAX_AUTH_TOKEN_LIFETIME_HOURS};
