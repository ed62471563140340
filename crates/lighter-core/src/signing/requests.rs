//! Caller intent for each transaction kind, before protocol fields are filled in.

use serde::{Deserialize, Serialize};

use super::options::ResolvedOpts;
use super::signer::PUBLIC_KEY_LENGTH;
use crate::error::ValidationError;
use crate::types::transfer::{parse_memo, MEMO_LENGTH};
use crate::types::{
    BurnSharesTx, CancelAllOrdersTx, CancelOrderTx, ChangePubKeyTx, CreateGroupedOrdersTx,
    CreateOrderTx, CreatePublicPoolTx, CreateSubAccountTx, L2Transaction, MintSharesTx,
    ModifyOrderTx, OrderInfo, TransferTx, UpdateLeverageTx, UpdateMarginTx, UpdatePublicPoolTx,
    WithdrawTx,
};

/// A request that becomes an unsigned transaction once options are resolved.
pub trait TxRequest {
    type Tx: L2Transaction;

    fn into_tx(self, opts: &ResolvedOpts) -> Self::Tx;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangePubKeyReq {
    pub pub_key: [u8; PUBLIC_KEY_LENGTH],
}

impl TxRequest for ChangePubKeyReq {
    type Tx = ChangePubKeyTx;

    fn into_tx(self, opts: &ResolvedOpts) -> ChangePubKeyTx {
        ChangePubKeyTx {
            account_index: opts.from_account_index,
            api_key_index: opts.api_key_index,
            pub_key: self.pub_key.to_vec(),
            expired_at: opts.expired_at,
            nonce: opts.nonce,
            ..Default::default()
        }
    }
}

/// Sub-account creation carries no fields of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateSubAccountReq;

impl TxRequest for CreateSubAccountReq {
    type Tx = CreateSubAccountTx;

    fn into_tx(self, opts: &ResolvedOpts) -> CreateSubAccountTx {
        CreateSubAccountTx {
            account_index: opts.from_account_index,
            api_key_index: opts.api_key_index,
            expired_at: opts.expired_at,
            nonce: opts.nonce,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferTxReq {
    pub to_account_index: i64,
    pub usdc_amount: i64,
    pub fee: i64,
    pub memo: [u8; MEMO_LENGTH],
}

impl TransferTxReq {
    /// Set the memo from text, which must be exactly 32 bytes.
    pub fn with_text_memo(mut self, memo: &str) -> Result<Self, ValidationError> {
        self.memo = parse_memo(memo)?;
        Ok(self)
    }
}

impl TxRequest for TransferTxReq {
    type Tx = TransferTx;

    fn into_tx(self, opts: &ResolvedOpts) -> TransferTx {
        TransferTx {
            from_account_index: opts.from_account_index,
            api_key_index: opts.api_key_index,
            to_account_index: self.to_account_index,
            usdc_amount: self.usdc_amount,
            fee: self.fee,
            memo: self.memo,
            expired_at: opts.expired_at,
            nonce: opts.nonce,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawTxReq {
    pub usdc_amount: u64,
}

impl TxRequest for WithdrawTxReq {
    type Tx = WithdrawTx;

    fn into_tx(self, opts: &ResolvedOpts) -> WithdrawTx {
        WithdrawTx {
            from_account_index: opts.from_account_index,
            api_key_index: opts.api_key_index,
            usdc_amount: self.usdc_amount,
            expired_at: opts.expired_at,
            nonce: opts.nonce,
            ..Default::default()
        }
    }
}

/// A single order is placed straight from its [`OrderInfo`].
pub type CreateOrderTxReq = OrderInfo;

impl TxRequest for OrderInfo {
    type Tx = CreateOrderTx;

    fn into_tx(self, opts: &ResolvedOpts) -> CreateOrderTx {
        CreateOrderTx {
            account_index: opts.from_account_index,
            api_key_index: opts.api_key_index,
            order: self,
            expired_at: opts.expired_at,
            nonce: opts.nonce,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGroupedOrdersTxReq {
    pub grouping_type: u8,
    pub orders: Vec<OrderInfo>,
}

impl TxRequest for CreateGroupedOrdersTxReq {
    type Tx = CreateGroupedOrdersTx;

    fn into_tx(self, opts: &ResolvedOpts) -> CreateGroupedOrdersTx {
        CreateGroupedOrdersTx {
            account_index: opts.from_account_index,
            api_key_index: opts.api_key_index,
            grouping_type: self.grouping_type,
            orders: self.orders,
            expired_at: opts.expired_at,
            nonce: opts.nonce,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyOrderTxReq {
    pub market_index: u8,
    pub index: i64,
    pub base_amount: i64,
    pub price: u32,
    pub trigger_price: u32,
}

impl TxRequest for ModifyOrderTxReq {
    type Tx = ModifyOrderTx;

    fn into_tx(self, opts: &ResolvedOpts) -> ModifyOrderTx {
        ModifyOrderTx {
            account_index: opts.from_account_index,
            api_key_index: opts.api_key_index,
            market_index: self.market_index,
            index: self.index,
            base_amount: self.base_amount,
            price: self.price,
            trigger_price: self.trigger_price,
            expired_at: opts.expired_at,
            nonce: opts.nonce,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrderTxReq {
    pub market_index: u8,
    pub index: i64,
}

impl TxRequest for CancelOrderTxReq {
    type Tx = CancelOrderTx;

    fn into_tx(self, opts: &ResolvedOpts) -> CancelOrderTx {
        CancelOrderTx {
            account_index: opts.from_account_index,
            api_key_index: opts.api_key_index,
            market_index: self.market_index,
            index: self.index,
            expired_at: opts.expired_at,
            nonce: opts.nonce,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelAllOrdersTxReq {
    pub time_in_force: u8,
    pub time: i64,
}

impl TxRequest for CancelAllOrdersTxReq {
    type Tx = CancelAllOrdersTx;

    fn into_tx(self, opts: &ResolvedOpts) -> CancelAllOrdersTx {
        CancelAllOrdersTx {
            account_index: opts.from_account_index,
            api_key_index: opts.api_key_index,
            time_in_force: self.time_in_force,
            time: self.time,
            expired_at: opts.expired_at,
            nonce: opts.nonce,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePublicPoolTxReq {
    pub operator_fee: i64,
    pub initial_total_shares: i64,
    pub min_operator_share_rate: i64,
}

impl TxRequest for CreatePublicPoolTxReq {
    type Tx = CreatePublicPoolTx;

    fn into_tx(self, opts: &ResolvedOpts) -> CreatePublicPoolTx {
        CreatePublicPoolTx {
            account_index: opts.from_account_index,
            api_key_index: opts.api_key_index,
            operator_fee: self.operator_fee,
            initial_total_shares: self.initial_total_shares,
            min_operator_share_rate: self.min_operator_share_rate,
            expired_at: opts.expired_at,
            nonce: opts.nonce,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePublicPoolTxReq {
    pub public_pool_index: i64,
    pub status: u8,
    pub operator_fee: i64,
    pub min_operator_share_rate: i64,
}

impl TxRequest for UpdatePublicPoolTxReq {
    type Tx = UpdatePublicPoolTx;

    fn into_tx(self, opts: &ResolvedOpts) -> UpdatePublicPoolTx {
        UpdatePublicPoolTx {
            account_index: opts.from_account_index,
            api_key_index: opts.api_key_index,
            public_pool_index: self.public_pool_index,
            status: self.status,
            operator_fee: self.operator_fee,
            min_operator_share_rate: self.min_operator_share_rate,
            expired_at: opts.expired_at,
            nonce: opts.nonce,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintSharesTxReq {
    pub public_pool_index: i64,
    pub share_amount: i64,
}

impl TxRequest for MintSharesTxReq {
    type Tx = MintSharesTx;

    fn into_tx(self, opts: &ResolvedOpts) -> MintSharesTx {
        MintSharesTx {
            account_index: opts.from_account_index,
            api_key_index: opts.api_key_index,
            public_pool_index: self.public_pool_index,
            share_amount: self.share_amount,
            expired_at: opts.expired_at,
            nonce: opts.nonce,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnSharesTxReq {
    pub public_pool_index: i64,
    pub share_amount: i64,
}

impl TxRequest for BurnSharesTxReq {
    type Tx = BurnSharesTx;

    fn into_tx(self, opts: &ResolvedOpts) -> BurnSharesTx {
        BurnSharesTx {
            account_index: opts.from_account_index,
            api_key_index: opts.api_key_index,
            public_pool_index: self.public_pool_index,
            share_amount: self.share_amount,
            expired_at: opts.expired_at,
            nonce: opts.nonce,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLeverageTxReq {
    pub market_index: u8,
    pub initial_margin_fraction: u16,
}

impl TxRequest for UpdateLeverageTxReq {
    type Tx = UpdateLeverageTx;

    fn into_tx(self, opts: &ResolvedOpts) -> UpdateLeverageTx {
        UpdateLeverageTx {
            account_index: opts.from_account_index,
            api_key_index: opts.api_key_index,
            market_index: self.market_index,
            initial_margin_fraction: self.initial_margin_fraction,
            expired_at: opts.expired_at,
            nonce: opts.nonce,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMarginTxReq {
    pub market_index: u8,
    pub usdc_amount: i64,
    pub direction: u8,
}

impl TxRequest for UpdateMarginTxReq {
    type Tx = UpdateMarginTx;

    fn into_tx(self, opts: &ResolvedOpts) -> UpdateMarginTx {
        UpdateMarginTx {
            account_index: opts.from_account_index,
            api_key_index: opts.api_key_index,
            market_index: self.market_index,
            usdc_amount: self.usdc_amount,
            direction: self.direction,
            expired_at: opts.expired_at,
            nonce: opts.nonce,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> ResolvedOpts {
        ResolvedOpts {
            from_account_index: 5,
            api_key_index: 3,
            expired_at: 1_700_000_600_000,
            nonce: 41,
            dry_run: false,
        }
    }

    #[test]
    fn test_requests_carry_resolved_fields() {
        let tx = WithdrawTxReq { usdc_amount: 9 }.into_tx(&opts());
        assert_eq!(tx.from_account_index, 5);
        assert_eq!(tx.api_key_index, 3);
        assert_eq!(tx.nonce, 41);
        assert_eq!(tx.expired_at, 1_700_000_600_000);
        assert!(tx.sig.is_empty());
        assert!(tx.signed_hash.is_empty());

        let tx = CancelOrderTxReq {
            market_index: 1,
            index: 77,
        }
        .into_tx(&opts());
        assert_eq!(tx.account_index, 5);
        assert_eq!(tx.index, 77);
    }

    #[test]
    fn test_order_info_is_its_own_request() {
        let order = CreateOrderTxReq {
            market_index: 3,
            price: 10,
            ..Default::default()
        };
        let tx = order.into_tx(&opts());
        assert_eq!(tx.order, order);
        assert_eq!(tx.nonce, 41);
    }

    #[test]
    fn test_transfer_text_memo() {
        let req = TransferTxReq {
            to_account_index: 9,
            usdc_amount: 1,
            fee: 0,
            memo: [0; MEMO_LENGTH],
        };
        let err = req.with_text_memo("too short").unwrap_err();
        assert_eq!(err, ValidationError::MemoLengthInvalid(9));

        let req = req
            .with_text_memo("abcdefghijklmnopqrstuvwxyz012345")
            .unwrap();
        assert_eq!(&req.memo[..3], b"abc");
        assert_eq!(req.into_tx(&opts()).memo, req.memo);
    }
}
