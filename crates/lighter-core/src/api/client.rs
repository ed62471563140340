//! Lighter REST client.
//!
//! Only the read endpoints the signer needs: next nonce, registered API keys
//! and transfer fee. Requests are sent once; retrying a nonce fetch is the
//! caller's decision.

use std::time::Duration as StdDuration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::types::{AccountApiKeys, HasResultCode, NextNonce, TransferFeeInfo};
use super::{ApiKeySource, NonceSource};
use crate::config::Config;
use crate::{Error, Result};

/// HTTP client for the Lighter API.
#[derive(Debug, Clone)]
pub struct LighterClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl LighterClient {
    /// Mainnet API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://mainnet.zklighter.elliot.ai";

    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_timeouts(
            base_url,
            StdDuration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            StdDuration::from_secs(Self::DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_timeouts(
            config.url.clone(),
            StdDuration::from_secs(config.http.timeout_secs),
            StdDuration::from_secs(config.http.connect_timeout_secs),
        )
    }

    fn with_timeouts(
        base_url: Option<String>,
        timeout: StdDuration,
        connect_timeout: StdDuration,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(100)
            .pool_idle_timeout(StdDuration::from_secs(10))
            .tcp_keepalive(StdDuration::from_secs(60))
            .build()?;

        let base_url = base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a JSON body, failing on non-2xx statuses and non-OK result codes.
    async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned + HasResultCode,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http_client.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, url = %url, body = %body, "Lighter API request failed");
            return Err(Error::Api {
                message: format!("API error: {} {}", status, body),
                status: Some(status.as_u16()),
            });
        }

        let parsed: T = response.json().await?;
        let result = parsed.result_code();
        if !result.is_ok() {
            warn!(code = result.code, url = %url, "Lighter API returned error code");
            return Err(Error::Api {
                message: result
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("unexpected result code {}", result.code)),
                status: Some(status.as_u16()),
            });
        }

        Ok(parsed)
    }

    /// Fetch the next nonce for an API key.
    pub async fn get_next_nonce(&self, account_index: i64, api_key_index: u8) -> Result<i64> {
        let body: NextNonce = self
            .get_json(
                "/api/v1/nextNonce",
                &[
                    ("account_index", account_index.to_string()),
                    ("api_key_index", api_key_index.to_string()),
                ],
            )
            .await?;
        debug!(account_index, api_key_index, nonce = body.nonce, "Fetched next nonce");
        Ok(body.nonce)
    }

    /// Fetch the keys registered for an (account, key slot) pair.
    pub async fn get_api_keys(&self, account_index: i64, api_key_index: u8) -> Result<AccountApiKeys> {
        self.get_json(
            "/api/v1/apikeys",
            &[
                ("account_index", account_index.to_string()),
                ("api_key_index", api_key_index.to_string()),
            ],
        )
        .await
    }

    /// Fetch the fee charged for transfers out of an account, in USDC base units.
    pub async fn get_transfer_fee_info(&self, account_index: i64) -> Result<TransferFeeInfo> {
        self.get_json(
            "/api/v1/transferFeeInfo",
            &[("account_index", account_index.to_string())],
        )
        .await
    }
}

#[async_trait]
impl NonceSource for LighterClient {
    async fn next_nonce(&self, account_index: i64, api_key_index: u8) -> Result<i64> {
        self.get_next_nonce(account_index, api_key_index).await
    }
}

#[async_trait]
impl ApiKeySource for LighterClient {
    async fn api_keys(&self, account_index: i64, api_key_index: u8) -> Result<AccountApiKeys> {
        self.get_api_keys(account_index, api_key_index).await
    }
}
