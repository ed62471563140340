//! Lighter HTTP API: nonce and API-key lookups.

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::Result;

pub use client::LighterClient;
pub use types::{AccountApiKeys, ApiKey, NextNonce, ResultCode, TransferFeeInfo, CODE_OK};

/// Supplies the next nonce for an (account, API key) pair.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NonceSource: Send + Sync {
    async fn next_nonce(&self, account_index: i64, api_key_index: u8) -> Result<i64>;
}

/// Looks up the public keys registered on the exchange.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiKeySource: Send + Sync {
    async fn api_keys(&self, account_index: i64, api_key_index: u8) -> Result<AccountApiKeys>;
}
