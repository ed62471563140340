//! Response bodies of the Lighter HTTP API.

use serde::{Deserialize, Serialize};

/// `code` value the API returns on success.
pub const CODE_OK: i32 = 200;

/// Status fields every response body carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCode {
    pub code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResultCode {
    pub fn ok() -> Self {
        Self {
            code: CODE_OK,
            message: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

/// `GET /api/v1/nextNonce`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextNonce {
    #[serde(flatten)]
    pub result: ResultCode,
    pub nonce: i64,
}

/// One API key registered on the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    pub account_index: i64,
    pub api_key_index: u8,
    pub nonce: i64,
    /// Hex-encoded public key without `0x`.
    pub public_key: String,
}

/// `GET /api/v1/apikeys`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountApiKeys {
    #[serde(flatten)]
    pub result: ResultCode,
    #[serde(default)]
    pub api_keys: Vec<ApiKey>,
}

/// `GET /api/v1/transferFeeInfo`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFeeInfo {
    #[serde(flatten)]
    pub result: ResultCode,
    #[serde(rename = "transfer_fee_usdc")]
    pub transfer_fee: i64,
}

/// Bodies that carry a result code.
pub(crate) trait HasResultCode {
    fn result_code(&self) -> &ResultCode;
}

macro_rules! impl_result_code {
    ($($ty:ty),*) => {
        $(impl HasResultCode for $ty {
            fn result_code(&self) -> &ResultCode {
                &self.result
            }
        })*
    };
}

impl_result_code!(NextNonce, AccountApiKeys, TransferFeeInfo);
