//! Error types for the Lighter transaction signer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Nonce unavailable: {message}")]
    NonceUnavailable { message: String },

    #[error("Signature error: {message}")]
    Signature { message: String },

    #[error("Encoding error: {message}")]
    Encoding { message: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {message}")]
    Api { message: String, status: Option<u16> },
}

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn encoding(message: impl Into<String>) -> Self {
        Error::Encoding {
            message: message.into(),
        }
    }

    /// The validation rule that failed, if this is a validation error.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// The first protocol rule a transaction violates.
///
/// Validation stops at the first failure, so each variant names exactly one
/// field or cross-field rule.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("account index too low")]
    AccountIndexTooLow,
    #[error("account index too high")]
    AccountIndexTooHigh,
    #[error("from account index too low")]
    FromAccountIndexTooLow,
    #[error("from account index too high")]
    FromAccountIndexTooHigh,
    #[error("to account index too low")]
    ToAccountIndexTooLow,
    #[error("to account index too high")]
    ToAccountIndexTooHigh,
    #[error("api key index too high")]
    ApiKeyIndexTooHigh,

    #[error("market index too high")]
    MarketIndexTooHigh,
    #[error("market index mismatch between grouped orders")]
    MarketIndexMismatch,
    #[error("client order index too low")]
    ClientOrderIndexTooLow,
    #[error("client order index too high")]
    ClientOrderIndexTooHigh,
    #[error("client order index must be nil")]
    ClientOrderIndexNotNil,
    #[error("order index too low")]
    OrderIndexTooLow,
    #[error("order index too high")]
    OrderIndexTooHigh,
    #[error("base amount too low")]
    BaseAmountTooLow,
    #[error("base amount too high")]
    BaseAmountTooHigh,
    #[error("base amount must be nil")]
    BaseAmountNotNil,
    #[error("base amounts not equal")]
    BaseAmountsNotEqual,
    #[error("price too low")]
    PriceTooLow,
    #[error("price too high")]
    PriceTooHigh,
    #[error("is ask flag invalid")]
    IsAskInvalid,
    #[error("order type invalid")]
    OrderTypeInvalid,
    #[error("order time in force invalid")]
    OrderTimeInForceInvalid,
    #[error("order reduce only flag invalid")]
    OrderReduceOnlyInvalid,
    #[error("order trigger price invalid")]
    OrderTriggerPriceInvalid,
    #[error("order expiry invalid")]
    OrderExpiryInvalid,
    #[error("order group size invalid")]
    OrderGroupSizeInvalid,
    #[error("grouping type invalid")]
    GroupingTypeInvalid,

    #[error("cancel all time must be nil")]
    CancelAllTimeNotNil,
    #[error("cancel all time is not in range")]
    CancelAllTimeNotInRange,
    #[error("cancel all time in force invalid")]
    InvalidCancelAllTimeInForce,

    #[error("nonce too low")]
    NonceTooLow,
    #[error("expired at invalid")]
    ExpiredAtInvalid,

    #[error("public key invalid")]
    PubKeyInvalid,

    #[error("transfer amount too low")]
    TransferAmountTooLow,
    #[error("transfer amount too high")]
    TransferAmountTooHigh,
    #[error("transfer fee is negative")]
    TransferFeeNegative,
    #[error("transfer fee too high")]
    TransferFeeTooHigh,
    #[error("memo expected to be 32 bytes long, got {0}")]
    MemoLengthInvalid(usize),
    #[error("withdrawal amount too low")]
    WithdrawalAmountTooLow,
    #[error("withdrawal amount too high")]
    WithdrawalAmountTooHigh,

    #[error("invalid pool operator fee")]
    InvalidPoolOperatorFee,
    #[error("pool initial total shares too low")]
    PoolInitialTotalSharesTooLow,
    #[error("pool initial total shares too high")]
    PoolInitialTotalSharesTooHigh,
    #[error("pool min operator share rate too low")]
    PoolMinOperatorShareRateTooLow,
    #[error("pool min operator share rate too high")]
    PoolMinOperatorShareRateTooHigh,
    #[error("public pool index too low")]
    PublicPoolIndexTooLow,
    #[error("public pool index too high")]
    PublicPoolIndexTooHigh,
    #[error("invalid pool status")]
    InvalidPoolStatus,
    #[error("pool mint share amount too low")]
    PoolMintShareAmountTooLow,
    #[error("pool mint share amount too high")]
    PoolMintShareAmountTooHigh,
    #[error("pool burn share amount too low")]
    PoolBurnShareAmountTooLow,
    #[error("pool burn share amount too high")]
    PoolBurnShareAmountTooHigh,

    #[error("initial margin fraction too low")]
    InitialMarginFractionTooLow,
    #[error("initial margin fraction too high")]
    InitialMarginFractionTooHigh,
    #[error("invalid update margin direction")]
    InvalidUpdateMarginDirection,

    #[error("deadline should be within 7 hours")]
    AuthDeadlineTooFar,
}
