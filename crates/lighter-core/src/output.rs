//! JSON output for signed transactions.

use serde::Serialize;

use crate::types::{L1SignatureBody, L2Transaction, TxType};
use crate::Result;

/// A signed transaction as handed to the submitter.
///
/// Serializes as the transaction's own fields, plus `MessageToSign` for the
/// kinds that also need an L1 signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedTxEnvelope<T> {
    #[serde(flatten)]
    pub tx: T,
    #[serde(rename = "MessageToSign", skip_serializing_if = "String::is_empty")]
    pub message_to_sign: String,
}

impl<T: L2Transaction> SignedTxEnvelope<T> {
    pub fn new(tx: T) -> Self {
        Self {
            tx,
            message_to_sign: String::new(),
        }
    }

    pub fn tx_type(&self) -> TxType {
        self.tx.tx_type()
    }

    pub fn tx_hash(&self) -> &str {
        self.tx.tx_hash()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<T: L2Transaction + L1SignatureBody> SignedTxEnvelope<T> {
    /// Wrap a transaction together with the text its L1 signature must cover.
    pub fn with_l1_message(tx: T) -> Self {
        let message_to_sign = tx.l1_signature_body();
        Self {
            tx,
            message_to_sign,
        }
    }
}
