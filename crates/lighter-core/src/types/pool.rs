//! Public pool lifecycle and share accounting.

use serde::{Deserialize, Serialize};

use super::constants::*;
use super::validation::{
    check_account_index, check_api_key_index, check_min_operator_share_rate,
    check_nonce_and_expiry, check_operator_fee, check_public_pool_index, ensure,
};
use super::{base64_bytes, message_header, L2Transaction, ValidationResult};
use crate::error::ValidationError;
use crate::field::FieldElement;
use crate::hash::FieldHasher;
use crate::Result;

pub const POOL_STATUS_ACTIVE: u8 = 0;
pub const POOL_STATUS_FROZEN: u8 = 1;

fn check_pool_account(account_index: i64, max: i64, api_key_index: u8) -> ValidationResult {
    check_account_index(
        account_index,
        MIN_ACCOUNT_INDEX,
        max,
        ValidationError::FromAccountIndexTooLow,
        ValidationError::FromAccountIndexTooHigh,
    )?;
    check_api_key_index(api_key_index)
}

/// Open a public pool operated by a master account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatePublicPoolTx {
    pub account_index: i64,
    pub api_key_index: u8,
    pub operator_fee: i64,
    pub initial_total_shares: i64,
    pub min_operator_share_rate: i64,
    pub expired_at: i64,
    pub nonce: i64,
    #[serde(with = "base64_bytes")]
    pub sig: Vec<u8>,
    #[serde(skip)]
    pub signed_hash: String,
}

impl L2Transaction for CreatePublicPoolTx {
    const TX_TYPE: TxType = TxType::CreatePublicPool;

    fn validate(&self) -> ValidationResult {
        // Only master accounts may operate a pool.
        check_pool_account(self.account_index, MAX_MASTER_ACCOUNT_INDEX, self.api_key_index)?;
        check_operator_fee(self.operator_fee)?;
        ensure(
            self.initial_total_shares >= MIN_INITIAL_TOTAL_SHARES,
            ValidationError::PoolInitialTotalSharesTooLow,
        )?;
        ensure(
            self.initial_total_shares <= MAX_INITIAL_TOTAL_SHARES,
            ValidationError::PoolInitialTotalSharesTooHigh,
        )?;
        check_min_operator_share_rate(self.min_operator_share_rate)?;
        check_nonce_and_expiry(self.nonce, self.expired_at)
    }

    fn message_elements(
        &self,
        chain_id: u32,
        _hasher: &dyn FieldHasher,
    ) -> Result<Vec<FieldElement>> {
        let mut elements = message_header(chain_id, Self::TX_TYPE, self.nonce, self.expired_at, 9);
        elements.push(FieldElement::from_i64(self.account_index));
        elements.push(FieldElement::from_u8(self.api_key_index));
        elements.push(FieldElement::from_i64(self.operator_fee));
        elements.push(FieldElement::from_i64(self.initial_total_shares));
        elements.push(FieldElement::from_i64(self.min_operator_share_rate));
        Ok(elements)
    }

    signed_tx_accessors!();
}

/// Change the status, fee or share rate of an existing pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdatePublicPoolTx {
    pub account_index: i64,
    pub api_key_index: u8,
    pub public_pool_index: i64,
    pub status: u8,
    pub operator_fee: i64,
    pub min_operator_share_rate: i64,
    pub expired_at: i64,
    pub nonce: i64,
    #[serde(with = "base64_bytes")]
    pub sig: Vec<u8>,
    #[serde(skip)]
    pub signed_hash: String,
}

impl L2Transaction for UpdatePublicPoolTx {
    const TX_TYPE: TxType = TxType::UpdatePublicPool;

    fn validate(&self) -> ValidationResult {
        check_pool_account(self.account_index, MAX_ACCOUNT_INDEX, self.api_key_index)?;
        check_public_pool_index(self.public_pool_index)?;
        ensure(
            matches!(self.status, POOL_STATUS_ACTIVE | POOL_STATUS_FROZEN),
            ValidationError::InvalidPoolStatus,
        )?;
        check_operator_fee(self.operator_fee)?;
        check_min_operator_share_rate(self.min_operator_share_rate)?;
        check_nonce_and_expiry(self.nonce, self.expired_at)
    }

    fn message_elements(
        &self,
        chain_id: u32,
        _hasher: &dyn FieldHasher,
    ) -> Result<Vec<FieldElement>> {
        let mut elements = message_header(chain_id, Self::TX_TYPE, self.nonce, self.expired_at, 10);
        elements.push(FieldElement::from_i64(self.account_index));
        elements.push(FieldElement::from_u8(self.api_key_index));
        elements.push(FieldElement::from_i64(self.public_pool_index));
        elements.push(FieldElement::from_u8(self.status));
        elements.push(FieldElement::from_i64(self.operator_fee));
        elements.push(FieldElement::from_i64(self.min_operator_share_rate));
        Ok(elements)
    }

    signed_tx_accessors!();
}

/// Shared body of mint and burn: same fields, different tag and error names.
macro_rules! share_tx {
    ($(#[$meta:meta])* $name:ident, $tx_type:expr, $too_low:expr, $too_high:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "PascalCase")]
        pub struct $name {
            pub account_index: i64,
            pub api_key_index: u8,
            pub public_pool_index: i64,
            pub share_amount: i64,
            pub expired_at: i64,
            pub nonce: i64,
            #[serde(with = "base64_bytes")]
            pub sig: Vec<u8>,
            #[serde(skip)]
            pub signed_hash: String,
        }

        impl L2Transaction for $name {
            const TX_TYPE: TxType = $tx_type;

            fn validate(&self) -> ValidationResult {
                check_pool_account(self.account_index, MAX_ACCOUNT_INDEX, self.api_key_index)?;
                check_public_pool_index(self.public_pool_index)?;
                ensure(self.share_amount >= MIN_POOL_SHARES_TO_MINT_OR_BURN, $too_low)?;
                ensure(self.share_amount <= MAX_POOL_SHARES_TO_MINT_OR_BURN, $too_high)?;
                check_nonce_and_expiry(self.nonce, self.expired_at)
            }

            fn message_elements(
                &self,
                chain_id: u32,
                _hasher: &dyn FieldHasher,
            ) -> Result<Vec<FieldElement>> {
                let mut elements =
                    message_header(chain_id, Self::TX_TYPE, self.nonce, self.expired_at, 8);
                elements.push(FieldElement::from_i64(self.account_index));
                elements.push(FieldElement::from_u8(self.api_key_index));
                elements.push(FieldElement::from_i64(self.public_pool_index));
                elements.push(FieldElement::from_i64(self.share_amount));
                Ok(elements)
            }

            signed_tx_accessors!();
        }
    };
}

share_tx!(
    /// Buy into a public pool.
    MintSharesTx,
    TxType::MintShares,
    ValidationError::PoolMintShareAmountTooLow,
    ValidationError::PoolMintShareAmountTooHigh
);

share_tx!(
    /// Redeem public pool shares.
    BurnSharesTx,
    TxType::BurnShares,
    ValidationError::PoolBurnShareAmountTooLow,
    ValidationError::PoolBurnShareAmountTooHigh
);
