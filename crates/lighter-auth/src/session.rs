//! Registry of signing clients, one per API key slot, with one active at a time.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use lighter_core::api::ApiKeySource;
use lighter_core::signing::TxClient;
use lighter_core::{Error, Result};
use tracing::{debug, info, warn};

use crate::token::create_auth_token;

fn configuration_error(message: impl Into<String>) -> Error {
    Error::Configuration {
        message: message.into(),
    }
}

/// Signing clients keyed by API key index.
///
/// Registered clients are never modified; registering the same slot again
/// replaces the entry.
#[derive(Debug, Default)]
pub struct Session {
    clients: HashMap<u8, Arc<TxClient>>,
    active: Option<u8>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client under its API key index and make it active.
    pub fn register(&mut self, client: TxClient) -> Arc<TxClient> {
        let api_key_index = client.api_key_index();
        let client = Arc::new(client);
        if self.clients.insert(api_key_index, client.clone()).is_some() {
            debug!(api_key_index, "Replaced registered client");
        }
        self.active = Some(api_key_index);
        info!(
            account_index = client.account_index(),
            api_key_index, "Registered signing client"
        );
        client
    }

    /// Make a registered key slot the active one.
    pub fn switch_api_key(&mut self, api_key_index: u8) -> Result<()> {
        if !self.clients.contains_key(&api_key_index) {
            return Err(configuration_error(format!(
                "no client registered for api key index {}",
                api_key_index
            )));
        }
        self.active = Some(api_key_index);
        debug!(api_key_index, "Switched active api key");
        Ok(())
    }

    /// The active client.
    pub fn active(&self) -> Result<Arc<TxClient>> {
        self.active
            .and_then(|index| self.clients.get(&index).cloned())
            .ok_or_else(|| configuration_error("no client registered"))
    }

    pub fn get(&self, api_key_index: u8) -> Option<Arc<TxClient>> {
        self.clients.get(&api_key_index).cloned()
    }

    pub fn active_api_key_index(&self) -> Option<u8> {
        self.active
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Auth token for the active client.
    pub fn create_auth_token(&self, deadline: Option<DateTime<Utc>>) -> Result<String> {
        create_auth_token(&*self.active()?, deadline)
    }

    /// Confirm the client in `api_key_index` belongs to `account_index` and
    /// that its public key is the one registered on the exchange.
    pub async fn check_client(
        &self,
        api_key_index: u8,
        account_index: i64,
        keys: &dyn ApiKeySource,
    ) -> Result<()> {
        let client = self.get(api_key_index).ok_or_else(|| {
            configuration_error(format!(
                "no client registered for api key index {}",
                api_key_index
            ))
        })?;

        if client.account_index() != account_index {
            return Err(configuration_error(format!(
                "account index mismatch: client has {}, expected {}",
                client.account_index(),
                account_index
            )));
        }

        let response = keys.api_keys(account_index, api_key_index).await?;
        let registered = response
            .api_keys
            .first()
            .ok_or_else(|| configuration_error("no api key registered on the exchange"))?;

        let registered_key = registered.public_key.trim_start_matches("0x").to_lowercase();
        if registered_key != hex::encode(client.public_key()) {
            warn!(account_index, api_key_index, "Local key does not match exchange");
            return Err(configuration_error(
                "private key does not match the one registered on the exchange",
            ));
        }

        Ok(())
    }
}
