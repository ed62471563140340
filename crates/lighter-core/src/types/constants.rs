//! Protocol constants: transaction tags, order enums and numeric bounds.
//!
//! Every bound here is enforced by the exchange when it re-validates a signed
//! transaction, so changing one silently produces transactions the server
//! rejects.

/// Transaction type tag, the second element of every canonical encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TxType {
    ChangePubKey = 8,
    CreateSubAccount = 9,
    CreatePublicPool = 10,
    UpdatePublicPool = 11,
    Transfer = 12,
    Withdraw = 13,
    CreateOrder = 14,
    CancelOrder = 15,
    CancelAllOrders = 16,
    ModifyOrder = 17,
    MintShares = 18,
    BurnShares = 19,
    UpdateLeverage = 20,
    CreateGroupedOrders = 28,
    UpdateMargin = 29,
}

impl TxType {
    /// Get the numeric tag used on the wire and in the hash preimage.
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl std::fmt::Display for TxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TxType::ChangePubKey => "ChangePubKey",
            TxType::CreateSubAccount => "CreateSubAccount",
            TxType::CreatePublicPool => "CreatePublicPool",
            TxType::UpdatePublicPool => "UpdatePublicPool",
            TxType::Transfer => "Transfer",
            TxType::Withdraw => "Withdraw",
            TxType::CreateOrder => "CreateOrder",
            TxType::CancelOrder => "CancelOrder",
            TxType::CancelAllOrders => "CancelAllOrders",
            TxType::ModifyOrder => "ModifyOrder",
            TxType::MintShares => "MintShares",
            TxType::BurnShares => "BurnShares",
            TxType::UpdateLeverage => "UpdateLeverage",
            TxType::CreateGroupedOrders => "CreateGroupedOrders",
            TxType::UpdateMargin => "UpdateMargin",
        };
        write!(f, "{}", name)
    }
}

// Order types
pub const LIMIT_ORDER: u8 = 0;
pub const MARKET_ORDER: u8 = 1;
pub const STOP_LOSS_ORDER: u8 = 2;
pub const STOP_LOSS_LIMIT_ORDER: u8 = 3;
pub const TAKE_PROFIT_ORDER: u8 = 4;
pub const TAKE_PROFIT_LIMIT_ORDER: u8 = 5;
pub const TWAP_ORDER: u8 = 6;

// Order time in force
pub const IMMEDIATE_OR_CANCEL: u8 = 0;
pub const GOOD_TILL_TIME: u8 = 1;
pub const POST_ONLY: u8 = 2;

// Grouping types
pub const GROUPING_ONE_TRIGGERS_THE_OTHER: u8 = 1;
pub const GROUPING_ONE_CANCELS_THE_OTHER: u8 = 2;
pub const GROUPING_ONE_TRIGGERS_A_ONE_CANCELS_THE_OTHER: u8 = 3;

// Cancel-all time in force
pub const IMMEDIATE_CANCEL_ALL: u8 = 0;
pub const SCHEDULED_CANCEL_ALL: u8 = 1;
pub const ABORT_SCHEDULED_CANCEL_ALL: u8 = 2;

// Margin modes and update-margin directions
pub const CROSS_MARGIN: u8 = 0;
pub const ISOLATED_MARGIN: u8 = 1;
pub const REMOVE_FROM_ISOLATED_MARGIN: u8 = 0;
pub const ADD_TO_ISOLATED_MARGIN: u8 = 1;

/// Lighter mainnet chain id.
pub const MAINNET_CHAIN_ID: u32 = 304;

pub const ONE_USDC: i64 = 1_000_000;
pub const FEE_TICK: i64 = 1_000_000;
pub const MARGIN_FRACTION_TICK: i64 = 10_000;
pub const SHARE_TICK: i64 = 10_000;

pub const MIN_ACCOUNT_INDEX: i64 = 0;
pub const MAX_ACCOUNT_INDEX: i64 = (1 << 48) - 2;
pub const MAX_MASTER_ACCOUNT_INDEX: i64 = (1 << 47) - 1;
pub const MAX_API_KEY_INDEX: u8 = 254;
/// Key index meaning "every key of the account", accepted by cancel-all only.
pub const NIL_API_KEY_INDEX: u8 = MAX_API_KEY_INDEX + 1;

pub const MAX_MARKET_INDEX: u8 = 254;

/// 0.001 USDC per share at pool creation.
pub const INITIAL_POOL_SHARE_VALUE: i64 = 1_000;
pub const MIN_INITIAL_TOTAL_SHARES: i64 = 1_000 * (ONE_USDC / INITIAL_POOL_SHARE_VALUE);
pub const MAX_INITIAL_TOTAL_SHARES: i64 = 1_000_000_000 * (ONE_USDC / INITIAL_POOL_SHARE_VALUE);
pub const MIN_POOL_SHARES_TO_MINT_OR_BURN: i64 = 1;
pub const MAX_POOL_SHARES_TO_MINT_OR_BURN: i64 = (1 << 60) - 1;

pub const MIN_NONCE: i64 = 0;

pub const NIL_CLIENT_ORDER_INDEX: i64 = 0;
pub const MIN_CLIENT_ORDER_INDEX: i64 = 1;
pub const MAX_CLIENT_ORDER_INDEX: i64 = (1 << 48) - 1;
pub const MIN_ORDER_INDEX: i64 = MAX_CLIENT_ORDER_INDEX + 1;
pub const MAX_ORDER_INDEX: i64 = (1 << 56) - 1;

pub const NIL_ORDER_BASE_AMOUNT: i64 = 0;
pub const MIN_ORDER_BASE_AMOUNT: i64 = 1;
pub const MAX_ORDER_BASE_AMOUNT: i64 = (1 << 48) - 1;

pub const MIN_ORDER_PRICE: u32 = 1;
pub const MAX_ORDER_PRICE: u32 = u32::MAX;

pub const NIL_ORDER_TRIGGER_PRICE: u32 = 0;
pub const MIN_ORDER_TRIGGER_PRICE: u32 = 1;
pub const MAX_ORDER_TRIGGER_PRICE: u32 = u32::MAX;

pub const NIL_ORDER_EXPIRY: i64 = 0;
pub const MIN_ORDER_EXPIRY: i64 = 1;
pub const MAX_ORDER_EXPIRY: i64 = i64::MAX;

pub const MAX_GROUPED_ORDER_COUNT: usize = 3;

pub const MAX_TIMESTAMP: i64 = (1 << 48) - 1;

pub const MAX_EXCHANGE_USDC: i64 = (1 << 60) - 1;
pub const MIN_TRANSFER_AMOUNT: i64 = 1;
pub const MAX_TRANSFER_AMOUNT: i64 = MAX_EXCHANGE_USDC;
pub const MIN_WITHDRAWAL_AMOUNT: u64 = 1;
pub const MAX_WITHDRAWAL_AMOUNT: u64 = MAX_EXCHANGE_USDC as u64;
