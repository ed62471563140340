//! Per-market leverage and isolated margin adjustments.

use serde::{Deserialize, Serialize};

use super::constants::*;
use super::validation::{
    check_account_index, check_api_key_index, check_market_index, check_nonce_and_expiry, ensure,
};
use super::{base64_bytes, message_header, L2Transaction, ValidationResult};
use crate::error::ValidationError;
use crate::field::FieldElement;
use crate::hash::FieldHasher;
use crate::Result;

fn check_market_account(account_index: i64, api_key_index: u8, market_index: u8) -> ValidationResult {
    check_account_index(
        account_index,
        MIN_ACCOUNT_INDEX,
        MAX_ACCOUNT_INDEX,
        ValidationError::FromAccountIndexTooLow,
        ValidationError::FromAccountIndexTooHigh,
    )?;
    check_api_key_index(api_key_index)?;
    check_market_index(market_index)
}

/// Set the initial margin fraction, in basis points, for one market.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateLeverageTx {
    pub account_index: i64,
    pub api_key_index: u8,
    pub market_index: u8,
    pub initial_margin_fraction: u16,
    pub expired_at: i64,
    pub nonce: i64,
    #[serde(with = "base64_bytes")]
    pub sig: Vec<u8>,
    #[serde(skip)]
    pub signed_hash: String,
}

impl L2Transaction for UpdateLeverageTx {
    const TX_TYPE: TxType = TxType::UpdateLeverage;

    fn validate(&self) -> ValidationResult {
        check_market_account(self.account_index, self.api_key_index, self.market_index)?;
        ensure(
            self.initial_margin_fraction > 0,
            ValidationError::InitialMarginFractionTooLow,
        )?;
        ensure(
            i64::from(self.initial_margin_fraction) <= MARGIN_FRACTION_TICK,
            ValidationError::InitialMarginFractionTooHigh,
        )?;
        check_nonce_and_expiry(self.nonce, self.expired_at)
    }

    fn message_elements(
        &self,
        chain_id: u32,
        _hasher: &dyn FieldHasher,
    ) -> Result<Vec<FieldElement>> {
        let mut elements = message_header(chain_id, Self::TX_TYPE, self.nonce, self.expired_at, 8);
        elements.push(FieldElement::from_i64(self.account_index));
        elements.push(FieldElement::from_u8(self.api_key_index));
        elements.push(FieldElement::from_u8(self.market_index));
        elements.push(FieldElement::from_u32(u32::from(self.initial_margin_fraction)));
        Ok(elements)
    }

    signed_tx_accessors!();
}

/// Add USDC to, or remove it from, an isolated position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateMarginTx {
    pub account_index: i64,
    pub api_key_index: u8,
    pub market_index: u8,
    #[serde(rename = "USDCAmount")]
    pub usdc_amount: i64,
    pub direction: u8,
    pub expired_at: i64,
    pub nonce: i64,
    #[serde(with = "base64_bytes")]
    pub sig: Vec<u8>,
    #[serde(skip)]
    pub signed_hash: String,
}

impl L2Transaction for UpdateMarginTx {
    const TX_TYPE: TxType = TxType::UpdateMargin;

    fn validate(&self) -> ValidationResult {
        check_market_account(self.account_index, self.api_key_index, self.market_index)?;
        // The exchange reports margin amounts with the transfer amount errors.
        ensure(
            self.usdc_amount >= MIN_TRANSFER_AMOUNT,
            ValidationError::TransferAmountTooLow,
        )?;
        ensure(
            self.usdc_amount <= MAX_TRANSFER_AMOUNT,
            ValidationError::TransferAmountTooHigh,
        )?;
        ensure(
            matches!(
                self.direction,
                REMOVE_FROM_ISOLATED_MARGIN | ADD_TO_ISOLATED_MARGIN
            ),
            ValidationError::InvalidUpdateMarginDirection,
        )?;
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
        elements.push(FieldElement::from_u8(self.market_index));
        elements.extend(FieldElement::split_u64(self.usdc_amount as u64));
        elements.push(FieldElement::from_u8(self.direction));
        Ok(elements)
    }

    signed_tx_accessors!();
}
