//! USDC movements: transfers between accounts and withdrawals to L1.

use serde::{Deserialize, Serialize};

use super::constants::*;
use super::validation::{check_account_index, check_api_key_index, check_nonce_and_expiry, ensure};
use super::{base64_bytes, hex10, message_header, L1SignatureBody, L2Transaction, ValidationResult};
use crate::error::ValidationError;
use crate::field::FieldElement;
use crate::hash::FieldHasher;
use crate::Result;

pub const MEMO_LENGTH: usize = 32;

/// Convert a text memo into the fixed 32-byte form.
pub fn parse_memo(memo: &str) -> std::result::Result<[u8; MEMO_LENGTH], ValidationError> {
    memo.as_bytes()
        .try_into()
        .map_err(|_| ValidationError::MemoLengthInvalid(memo.len()))
}

/// Move USDC to another account.
///
/// The memo travels with the transaction and is covered by the L1 signature,
/// but it is not part of the L2 digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransferTx {
    pub from_account_index: i64,
    pub api_key_index: u8,
    pub to_account_index: i64,
    #[serde(rename = "USDCAmount")]
    pub usdc_amount: i64,
    pub fee: i64,
    pub memo: [u8; MEMO_LENGTH],
    pub expired_at: i64,
    pub nonce: i64,
    #[serde(with = "base64_bytes")]
    pub sig: Vec<u8>,
    #[serde(skip)]
    pub signed_hash: String,
}

impl L2Transaction for TransferTx {
    const TX_TYPE: TxType = TxType::Transfer;

    fn validate(&self) -> ValidationResult {
        check_account_index(
            self.from_account_index,
            MIN_ACCOUNT_INDEX + 1,
            MAX_ACCOUNT_INDEX,
            ValidationError::FromAccountIndexTooLow,
            ValidationError::FromAccountIndexTooHigh,
        )?;
        check_api_key_index(self.api_key_index)?;
        check_account_index(
            self.to_account_index,
            MIN_ACCOUNT_INDEX + 1,
            MAX_ACCOUNT_INDEX,
            ValidationError::ToAccountIndexTooLow,
            ValidationError::ToAccountIndexTooHigh,
        )?;
        ensure(
            self.usdc_amount >= MIN_TRANSFER_AMOUNT,
            ValidationError::TransferAmountTooLow,
        )?;
        ensure(
            self.usdc_amount <= MAX_TRANSFER_AMOUNT,
            ValidationError::TransferAmountTooHigh,
        )?;
        ensure(self.fee >= 0, ValidationError::TransferFeeNegative)?;
        ensure(
            self.fee <= MAX_TRANSFER_AMOUNT,
            ValidationError::TransferFeeTooHigh,
        )?;
        check_nonce_and_expiry(self.nonce, self.expired_at)
    }

    fn message_elements(
        &self,
        chain_id: u32,
        _hasher: &dyn FieldHasher,
    ) -> Result<Vec<FieldElement>> {
        let mut elements = message_header(chain_id, Self::TX_TYPE, self.nonce, self.expired_at, 11);
        elements.push(FieldElement::from_i64(self.from_account_index));
        elements.push(FieldElement::from_u8(self.api_key_index));
        elements.push(FieldElement::from_i64(self.to_account_index));
        elements.extend(FieldElement::split_u64(self.usdc_amount as u64));
        elements.extend(FieldElement::split_u64(self.fee as u64));
        Ok(elements)
    }

    signed_tx_accessors!();
}

impl L1SignatureBody for TransferTx {
    fn l1_signature_body(&self) -> String {
        format!(
            "Transfer\n\nnonce: {}\nfrom: {}\napi key: {}\nto: {}\namount: {}\nfee: {}\nmemo: {}\nOnly sign this message for a trusted client!",
            hex10(self.nonce as u64),
            hex10(self.from_account_index as u64),
            hex10(u64::from(self.api_key_index)),
            hex10(self.to_account_index as u64),
            hex10(self.usdc_amount as u64),
            hex10(self.fee as u64),
            hex::encode(self.memo),
        )
    }
}

/// Withdraw USDC from the exchange to L1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WithdrawTx {
    pub from_account_index: i64,
    pub api_key_index: u8,
    #[serde(rename = "USDCAmount")]
    pub usdc_amount: u64,
    pub expired_at: i64,
    pub nonce: i64,
    #[serde(with = "base64_bytes")]
    pub sig: Vec<u8>,
    #[serde(skip)]
    pub signed_hash: String,
}

impl L2Transaction for WithdrawTx {
    const TX_TYPE: TxType = TxType::Withdraw;

    fn validate(&self) -> ValidationResult {
        check_account_index(
            self.from_account_index,
            MIN_ACCOUNT_INDEX,
            MAX_ACCOUNT_INDEX,
            ValidationError::FromAccountIndexTooLow,
            ValidationError::FromAccountIndexTooHigh,
        )?;
        check_api_key_index(self.api_key_index)?;
        ensure(
            self.usdc_amount >= MIN_WITHDRAWAL_AMOUNT,
            ValidationError::WithdrawalAmountTooLow,
        )?;
        ensure(
            self.usdc_amount <= MAX_WITHDRAWAL_AMOUNT,
            ValidationError::WithdrawalAmountTooHigh,
        )?;
        check_nonce_and_expiry(self.nonce, self.expired_at)
    }

    fn message_elements(
        &self,
        chain_id: u32,
        _hasher: &dyn FieldHasher,
    ) -> Result<Vec<FieldElement>> {
        let mut elements = message_header(chain_id, Self::TX_TYPE, self.nonce, self.expired_at, 8);
        elements.push(FieldElement::from_i64(self.from_account_index));
        elements.push(FieldElement::from_u8(self.api_key_index));
        elements.extend(FieldElement::split_u64(self.usdc_amount));
        Ok(elements)
    }

    signed_tx_accessors!();
}
