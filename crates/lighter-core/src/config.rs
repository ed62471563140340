//! Configuration management for the Lighter signer.

use std::env;

use crate::signing::PrivateKeyBytes;
use crate::types::constants::{MAINNET_CHAIN_ID, MAX_ACCOUNT_INDEX, MIN_ACCOUNT_INDEX};
use crate::{Error, Result};

/// Signer configuration.
#[derive(Clone)]
pub struct Config {
    /// API base URL. `None` disables nonce fetching over HTTP.
    pub url: Option<String>,
    pub chain_id: u32,
    pub account_index: i64,
    pub api_key_index: u8,
    pub api_private_key: PrivateKeyBytes,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let account_index: i64 = parse_required(&get, "LIGHTER_ACCOUNT_INDEX")?;
        if !(MIN_ACCOUNT_INDEX..=MAX_ACCOUNT_INDEX).contains(&account_index) {
            return Err(Error::configuration(format!(
                "invalid account index {}",
                account_index
            )));
        }

        let private_key = get("LIGHTER_API_PRIVATE_KEY").ok_or_else(|| {
            Error::configuration("LIGHTER_API_PRIVATE_KEY environment variable not set")
        })?;

        Ok(Self {
            url: get("LIGHTER_URL").filter(|s| !s.trim().is_empty()),
            chain_id: parse_optional(&get, "LIGHTER_CHAIN_ID")?.unwrap_or(MAINNET_CHAIN_ID),
            account_index,
            api_key_index: parse_optional(&get, "LIGHTER_API_KEY_INDEX")?.unwrap_or(0),
            api_private_key: PrivateKeyBytes::from_hex(&private_key)?,
            http: HttpConfig {
                timeout_secs: parse_optional(&get, "LIGHTER_HTTP_TIMEOUT_SECS")?.unwrap_or(30),
                connect_timeout_secs: parse_optional(&get, "LIGHTER_CONNECT_TIMEOUT_SECS")?
                    .unwrap_or(10),
            },
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.url)
            .field("chain_id", &self.chain_id)
            .field("account_index", &self.account_index)
            .field("api_key_index", &self.api_key_index)
            .field("api_private_key", &"<redacted>")
            .field("http", &self.http)
            .finish()
    }
}

fn parse_required<F, T>(get: &F, key: &str) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    parse_optional(get, key)?
        .ok_or_else(|| Error::configuration(format!("{} environment variable not set", key)))
}

fn parse_optional<F, T>(get: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::configuration(format!("{} has an invalid value: {}", key, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const TEST_PRIVATE_KEY: &str =
        "0x0102030405060708091011121314151617181920212223242526272829303132333435363738393a";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("LIGHTER_ACCOUNT_INDEX", "42"),
            ("LIGHTER_API_PRIVATE_KEY", TEST_PRIVATE_KEY),
        ]))
        .unwrap();

        assert_eq!(config.url, None);
        assert_eq!(config.chain_id, 304);
        assert_eq!(config.account_index, 42);
        assert_eq!(config.api_key_index, 0);
        assert_eq!(config.http, HttpConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("LIGHTER_URL", "https://testnet.example"),
            ("LIGHTER_CHAIN_ID", "300"),
            ("LIGHTER_ACCOUNT_INDEX", "7"),
            ("LIGHTER_API_KEY_INDEX", "3"),
            ("LIGHTER_API_PRIVATE_KEY", TEST_PRIVATE_KEY),
            ("LIGHTER_HTTP_TIMEOUT_SECS", "5"),
            ("LIGHTER_CONNECT_TIMEOUT_SECS", "2"),
        ]))
        .unwrap();

        assert_eq!(config.url.as_deref(), Some("https://testnet.example"));
        assert_eq!(config.chain_id, 300);
        assert_eq!(config.api_key_index, 3);
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.connect_timeout_secs, 2);
    }

    #[test]
    fn test_missing_and_malformed_values() {
        let err = Config::from_lookup(lookup(&[("LIGHTER_API_PRIVATE_KEY", TEST_PRIVATE_KEY)]))
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));

        let err = Config::from_lookup(lookup(&[("LIGHTER_ACCOUNT_INDEX", "1")])).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));

        let err = Config::from_lookup(lookup(&[
            ("LIGHTER_ACCOUNT_INDEX", "1"),
            ("LIGHTER_API_KEY_INDEX", "300"),
            ("LIGHTER_API_PRIVATE_KEY", TEST_PRIVATE_KEY),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));

        let err = Config::from_lookup(lookup(&[
            ("LIGHTER_ACCOUNT_INDEX", "-1"),
            ("LIGHTER_API_PRIVATE_KEY", TEST_PRIVATE_KEY),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_account_index_bounds_match_client() {
        let config = Config::from_lookup(lookup(&[
            ("LIGHTER_ACCOUNT_INDEX", "0"),
            ("LIGHTER_API_PRIVATE_KEY", TEST_PRIVATE_KEY),
        ]))
        .unwrap();
        assert_eq!(config.account_index, 0);

        let max = MAX_ACCOUNT_INDEX.to_string();
        let config = Config::from_lookup(lookup(&[
            ("LIGHTER_ACCOUNT_INDEX", max.as_str()),
            ("LIGHTER_API_PRIVATE_KEY", TEST_PRIVATE_KEY),
        ]))
        .unwrap();
        assert_eq!(config.account_index, MAX_ACCOUNT_INDEX);

        let too_high = (MAX_ACCOUNT_INDEX + 1).to_string();
        let err = Config::from_lookup(lookup(&[
            ("LIGHTER_ACCOUNT_INDEX", too_high.as_str()),
            ("LIGHTER_API_PRIVATE_KEY", TEST_PRIVATE_KEY),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let config = Config::from_lookup(lookup(&[
            ("LIGHTER_ACCOUNT_INDEX", "1"),
            ("LIGHTER_API_PRIVATE_KEY", TEST_PRIVATE_KEY),
        ]))
        .unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("0102030405"));
    }
}
