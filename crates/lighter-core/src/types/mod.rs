//! Transaction variants accepted by the Lighter sequencer.
//!
//! Every variant knows how to validate itself against the protocol bounds and
//! how to lay out the field elements that are hashed and signed. The element
//! list always starts with `[chain_id, tx_type, nonce, expired_at]`.

use serde::Serialize;

use crate::error::ValidationError;
use crate::field::FieldElement;
use crate::hash::{Digest, FieldHasher};
use crate::Result;

/// Accessors shared by every variant carrying `nonce`, `sig` and `signed_hash`.
macro_rules! signed_tx_accessors {
    () => {
        fn nonce(&self) -> i64 {
            self.nonce
        }

        fn signature(&self) -> &[u8] {
            &self.sig
        }

        fn tx_hash(&self) -> &str {
            &self.signed_hash
        }

        fn attach_signature(&mut self, digest: &$crate::hash::Digest, signature: Vec<u8>) {
            self.signed_hash = digest.to_hex();
            self.sig = signature;
        }
    };
}

pub mod account;
pub(crate) mod base64_bytes;
pub mod constants;
pub mod grouped;
pub mod margin;
pub mod order;
pub mod pool;
pub mod transfer;
pub mod tx_info;
mod validation;

pub use account::{ChangePubKeyTx, CreateSubAccountTx};
pub use constants::TxType;
pub use grouped::CreateGroupedOrdersTx;
pub use margin::{UpdateLeverageTx, UpdateMarginTx};
pub use order::{CancelAllOrdersTx, CancelOrderTx, CreateOrderTx, ModifyOrderTx, OrderInfo};
pub use pool::{BurnSharesTx, CreatePublicPoolTx, MintSharesTx, UpdatePublicPoolTx};
pub use transfer::{parse_memo, TransferTx, WithdrawTx, MEMO_LENGTH};
pub use tx_info::TxInfo;

/// Outcome of a field-level validation pass.
pub type ValidationResult = std::result::Result<(), ValidationError>;

/// A signable L2 transaction.
pub trait L2Transaction: Serialize {
    const TX_TYPE: TxType;

    /// Check every field against protocol bounds, stopping at the first failure.
    fn validate(&self) -> ValidationResult;

    /// Canonical element list hashed into the digest.
    fn message_elements(&self, chain_id: u32, hasher: &dyn FieldHasher)
        -> Result<Vec<FieldElement>>;

    /// Digest of [`message_elements`](Self::message_elements).
    fn hash(&self, chain_id: u32, hasher: &dyn FieldHasher) -> Result<Digest> {
        let elements = self.message_elements(chain_id, hasher)?;
        Ok(Digest::compute(hasher, &elements))
    }

    fn nonce(&self) -> i64;

    /// Recorded signature; empty until signed.
    fn signature(&self) -> &[u8];

    /// Hex digest that was signed; empty until signed.
    fn tx_hash(&self) -> &str;

    /// Record the digest and signature. Only the orchestrator calls this.
    fn attach_signature(&mut self, digest: &Digest, signature: Vec<u8>);

    fn tx_type(&self) -> TxType {
        Self::TX_TYPE
    }

    /// Both the signature and the digest it covers have been recorded.
    fn is_signed(&self) -> bool {
        !self.signature().is_empty() && !self.tx_hash().is_empty()
    }

    /// JSON body as submitted to the exchange.
    fn tx_info(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Transactions that also need a human-readable L1 signature.
pub trait L1SignatureBody {
    fn l1_signature_body(&self) -> String;
}

/// Start an element list with the common `[chain, type, nonce, expired_at]` prefix.
pub(crate) fn message_header(
    chain_id: u32,
    tx_type: TxType,
    nonce: i64,
    expired_at: i64,
    capacity: usize,
) -> Vec<FieldElement> {
    let mut elements = Vec::with_capacity(capacity);
    elements.push(FieldElement::from_u32(chain_id));
    elements.push(FieldElement::from_u8(tx_type.as_u8()));
    elements.push(FieldElement::from_i64(nonce));
    elements.push(FieldElement::from_i64(expired_at));
    elements
}

/// Fixed-width hex used by the L1 message templates: `0x` plus 16 digits.
pub(crate) fn hex10(value: u64) -> String {
    format!("0x{:016x}", value)
}
