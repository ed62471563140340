//! Lighter Signer: transaction signing for the Lighter L2 exchange
//!
//! This is the root crate that provides benchmark and integration-test access
//! to the workspace. For actual functionality, use the individual crates directly:
//!
//! - `lighter-core`: Transaction types, validation, canonical hashing, signing client
//! - `lighter-auth`: API key session registry, auth tokens

pub use lighter_auth as auth;
pub use lighter_core as core;
