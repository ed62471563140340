//! Closed set of every transaction variant, for callers that handle them uniformly.

use serde::Serialize;

use super::{
    BurnSharesTx, CancelAllOrdersTx, CancelOrderTx, ChangePubKeyTx, CreateGroupedOrdersTx,
    CreateOrderTx, CreatePublicPoolTx, CreateSubAccountTx, L2Transaction, MintSharesTx,
    ModifyOrderTx, TransferTx, TxType, UpdateLeverageTx, UpdateMarginTx, UpdatePublicPoolTx,
    ValidationResult, WithdrawTx,
};
use crate::hash::{Digest, FieldHasher};
use crate::Result;

macro_rules! tx_info {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        /// Any signable transaction. Serializes as the inner variant's JSON.
        #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
        #[serde(untagged)]
        pub enum TxInfo {
            $($variant($ty),)+
        }

        $(impl From<$ty> for TxInfo {
            fn from(tx: $ty) -> Self {
                TxInfo::$variant(tx)
            }
        })+

        impl TxInfo {
            pub fn tx_type(&self) -> TxType {
                match self {
                    $(TxInfo::$variant(tx) => tx.tx_type(),)+
                }
            }

            pub fn validate(&self) -> ValidationResult {
                match self {
                    $(TxInfo::$variant(tx) => tx.validate(),)+
                }
            }

            pub fn hash(&self, chain_id: u32, hasher: &dyn FieldHasher) -> Result<Digest> {
                match self {
                    $(TxInfo::$variant(tx) => tx.hash(chain_id, hasher),)+
                }
            }

            pub fn nonce(&self) -> i64 {
                match self {
                    $(TxInfo::$variant(tx) => tx.nonce(),)+
                }
            }

            pub fn signature(&self) -> &[u8] {
                match self {
                    $(TxInfo::$variant(tx) => tx.signature(),)+
                }
            }

            pub fn tx_hash(&self) -> &str {
                match self {
                    $(TxInfo::$variant(tx) => tx.tx_hash(),)+
                }
            }

            pub fn tx_info(&self) -> Result<String> {
                match self {
                    $(TxInfo::$variant(tx) => tx.tx_info(),)+
                }
            }
        }
    };
}

tx_info! {
    ChangePubKey(ChangePubKeyTx),
    CreateSubAccount(CreateSubAccountTx),
    CreatePublicPool(CreatePublicPoolTx),
    UpdatePublicPool(UpdatePublicPoolTx),
    Transfer(TransferTx),
    Withdraw(WithdrawTx),
    CreateOrder(CreateOrderTx),
    CancelOrder(CancelOrderTx),
    CancelAllOrders(CancelAllOrdersTx),
    ModifyOrder(ModifyOrderTx),
    MintShares(MintSharesTx),
    BurnShares(BurnSharesTx),
    UpdateLeverage(UpdateLeverageTx),
    CreateGroupedOrders(CreateGroupedOrdersTx),
    UpdateMargin(UpdateMarginTx),
}

impl TxInfo {
    /// Protocol tag, as sent alongside the JSON body.
    pub fn tx_type_tag(&self) -> u8 {
        self.tx_type().as_u8()
    }

    pub fn is_signed(&self) -> bool {
        !self.signature().is_empty() && !self.tx_hash().is_empty()
    }
}
