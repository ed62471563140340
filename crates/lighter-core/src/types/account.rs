//! Account management: API key rotation and sub-account creation.

use serde::{Deserialize, Serialize};

use super::constants::*;
use super::validation::{
    check_account_index, check_api_key_index, check_nonce_and_expiry, ensure,
};
use super::{base64_bytes, hex10, message_header, L1SignatureBody, L2Transaction, ValidationResult};
use crate::error::ValidationError;
use crate::field::FieldElement;
use crate::hash::FieldHasher;
use crate::signing::PUBLIC_KEY_LENGTH;
use crate::Result;

fn check_from_account(account_index: i64, api_key_index: u8) -> ValidationResult {
    check_account_index(
        account_index,
        MIN_ACCOUNT_INDEX,
        MAX_ACCOUNT_INDEX,
        ValidationError::FromAccountIndexTooLow,
        ValidationError::FromAccountIndexTooHigh,
    )?;
    check_api_key_index(api_key_index)
}

/// Register a new public key in an API key slot.
///
/// Needs an additional L1 signature over [`L1SignatureBody::l1_signature_body`],
/// recorded in `l1_sig` by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangePubKeyTx {
    pub account_index: i64,
    pub api_key_index: u8,
    #[serde(with = "base64_bytes")]
    pub pub_key: Vec<u8>,
    pub expired_at: i64,
    pub nonce: i64,
    #[serde(with = "base64_bytes")]
    pub sig: Vec<u8>,
    #[serde(rename = "L1Sig")]
    pub l1_sig: String,
    #[serde(skip)]
    pub signed_hash: String,
}

impl L2Transaction for ChangePubKeyTx {
    const TX_TYPE: TxType = TxType::ChangePubKey;

    fn validate(&self) -> ValidationResult {
        check_from_account(self.account_index, self.api_key_index)?;
        check_nonce_and_expiry(self.nonce, self.expired_at)?;
        ensure(
            self.pub_key.len() == PUBLIC_KEY_LENGTH && self.pub_key.iter().any(|b| *b != 0),
            ValidationError::PubKeyInvalid,
        )
    }

    fn message_elements(
        &self,
        chain_id: u32,
        _hasher: &dyn FieldHasher,
    ) -> Result<Vec<FieldElement>> {
        let mut elements = message_header(chain_id, Self::TX_TYPE, self.nonce, self.expired_at, 11);
        elements.push(FieldElement::from_i64(self.account_index));
        elements.push(FieldElement::from_u8(self.api_key_index));
        elements.extend(FieldElement::array_from_canonical_le_bytes(&self.pub_key)?);
        Ok(elements)
    }

    signed_tx_accessors!();
}

impl L1SignatureBody for ChangePubKeyTx {
    fn l1_signature_body(&self) -> String {
        format!(
            "Register Lighter Account\n\npubkey: 0x{}\nnonce: {}\naccount index: {}\napi key index: {}\nOnly sign this message for a trusted client!",
            hex::encode(&self.pub_key),
            hex10(self.nonce as u64),
            hex10(self.account_index as u64),
            hex10(u64::from(self.api_key_index)),
        )
    }
}

/// Create a sub-account under the signing account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateSubAccountTx {
    pub account_index: i64,
    pub api_key_index: u8,
    pub expired_at: i64,
    pub nonce: i64,
    #[serde(with = "base64_bytes")]
    pub sig: Vec<u8>,
    #[serde(skip)]
    pub signed_hash: String,
}

impl L2Transaction for CreateSubAccountTx {
    const TX_TYPE: TxType = TxType::CreateSubAccount;

    fn validate(&self) -> ValidationResult {
        check_from_account(self.account_index, self.api_key_index)?;
        check_nonce_and_expiry(self.nonce, self.expired_at)
    }

    fn message_elements(
        &self,
        chain_id: u32,
        _hasher: &dyn FieldHasher,
    ) -> Result<Vec<FieldElement>> {
        let mut elements = message_header(chain_id, Self::TX_TYPE, self.nonce, self.expired_at, 6);
        elements.push(FieldElement::from_i64(self.account_index));
        elements.push(FieldElement::from_u8(self.api_key_index));
        Ok(elements)
    }

    signed_tx_accessors!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeHasher, FakeSigner};
    use crate::signing::TxSigner;
    use crate::Error;

    fn change_pub_key() -> ChangePubKeyTx {
        ChangePubKeyTx {
            account_index: 12,
            api_key_index: 2,
            pub_key: FakeSigner::from_seed(9).public_key().to_vec(),
            expired_at: 1_700_000_600_000,
            nonce: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_change_pub_key_validation() {
        let tx = change_pub_key();
        assert_eq!(tx.validate(), Ok(()));

        let mut short = tx.clone();
        short.pub_key.pop();
        assert_eq!(short.validate(), Err(ValidationError::PubKeyInvalid));

        let mut zero = tx.clone();
        zero.pub_key = vec![0; PUBLIC_KEY_LENGTH];
        assert_eq!(zero.validate(), Err(ValidationError::PubKeyInvalid));

        let mut account = tx.clone();
        account.account_index = -1;
        assert_eq!(account.validate(), Err(ValidationError::FromAccountIndexTooLow));

        let mut key = tx;
        key.api_key_index = NIL_API_KEY_INDEX;
        assert_eq!(key.validate(), Err(ValidationError::ApiKeyIndexTooHigh));
    }

    #[test]
    fn test_change_pub_key_elements() {
        let hasher = FakeHasher::new();
        let tx = change_pub_key();
        let elements = tx.message_elements(304, &hasher).unwrap();
        assert_eq!(elements.len(), 11);
        assert_eq!(elements[1].value(), 8);
        assert_eq!(
            elements[6..].to_vec(),
            FieldElement::array_from_canonical_le_bytes(&tx.pub_key).unwrap()
        );
    }

    #[test]
    fn test_non_canonical_pub_key_is_encoding_error() {
        let hasher = FakeHasher::new();
        let mut tx = change_pub_key();
        tx.pub_key = vec![0xff; PUBLIC_KEY_LENGTH];
        let err = tx.message_elements(304, &hasher).unwrap_err();
        assert!(matches!(err, Error::Encoding { .. }));
    }

    #[test]
    fn test_l1_signature_body() {
        let mut tx = change_pub_key();
        tx.pub_key = (1..=40).collect();
        let body = tx.l1_signature_body();
        assert_eq!(
            body,
            format!(
                "Register Lighter Account\n\npubkey: 0x{}\nnonce: 0x0000000000000004\naccount index: 0x000000000000000c\napi key index: 0x0000000000000002\nOnly sign this message for a trusted client!",
                hex::encode((1..=40).collect::<Vec<u8>>())
            )
        );
    }

    #[test]
    fn test_json_field_names() {
        let mut tx = change_pub_key();
        tx.l1_sig = "0xabc".to_string();
        let json: serde_json::Value = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["AccountIndex"], 12);
        assert_eq!(json["ApiKeyIndex"], 2);
        assert_eq!(json["L1Sig"], "0xabc");
        assert!(json["PubKey"].is_string());
        assert_eq!(json["Sig"], "");
    }

    #[test]
    fn test_create_sub_account() {
        let hasher = FakeHasher::new();
        let tx = CreateSubAccountTx {
            account_index: 1,
            api_key_index: 0,
            expired_at: 1_700_000_600_000,
            nonce: 0,
            ..Default::default()
        };
        assert_eq!(tx.validate(), Ok(()));
        assert_eq!(tx.message_elements(304, &hasher).unwrap().len(), 6);

        let too_high = CreateSubAccountTx {
            account_index: MAX_ACCOUNT_INDEX + 1,
            ..tx
        };
        assert_eq!(
            too_high.validate(),
            Err(ValidationError::FromAccountIndexTooHigh)
        );
    }
}
