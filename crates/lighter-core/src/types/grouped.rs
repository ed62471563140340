//! Grouped order placement: OTO, OCO and OTOCO.

use serde::{Deserialize, Serialize};

use super::constants::*;
use super::order::OrderInfo;
use super::validation::{
    check_account_index, check_api_key_index, check_market_index, check_nonce_and_expiry, ensure,
};
use super::{base64_bytes, message_header, L2Transaction, ValidationResult};
use crate::error::ValidationError;
use crate::field::{FieldElement, HashOut};
use crate::hash::{fold_hashes, FieldHasher};
use crate::Result;

/// Up to three orders on one market, linked by a grouping rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateGroupedOrdersTx {
    pub account_index: i64,
    pub api_key_index: u8,
    pub grouping_type: u8,
    pub orders: Vec<OrderInfo>,
    pub expired_at: i64,
    pub nonce: i64,
    #[serde(with = "base64_bytes")]
    pub sig: Vec<u8>,
    #[serde(skip)]
    pub signed_hash: String,
}

impl CreateGroupedOrdersTx {
    /// Aggregate hash of the member orders, in order.
    ///
    /// Reordering members changes the result.
    pub fn orders_hash(&self, hasher: &dyn FieldHasher) -> HashOut {
        let leaves: Vec<HashOut> = self
            .orders
            .iter()
            .map(|order| hasher.hash_no_pad(&order.elements()))
            .collect();
        fold_hashes(hasher, &leaves)
    }

    fn check_member(&self, first: &OrderInfo, order: &OrderInfo) -> ValidationResult {
        ensure(
            order.market_index == first.market_index,
            ValidationError::MarketIndexMismatch,
        )?;
        ensure(
            order.client_order_index == NIL_CLIENT_ORDER_INDEX,
            ValidationError::ClientOrderIndexNotNil,
        )?;
        order.check_base_amount()?;
        order.check_price()?;
        order.check_flags()?;
        order.check_expiry_range()?;
        order.check_trigger_range()
    }

    fn check_grouping(&self) -> ValidationResult {
        let orders = self.orders.as_slice();
        match self.grouping_type {
            GROUPING_ONE_CANCELS_THE_OTHER => {
                let [a, b] = orders else {
                    return Err(ValidationError::OrderGroupSizeInvalid);
                };
                ensure(
                    a.base_amount == b.base_amount,
                    ValidationError::BaseAmountsNotEqual,
                )?;
                ensure(a.is_ask == b.is_ask, ValidationError::IsAskInvalid)?;
                ensure(
                    a.reduce_only == 1 && b.reduce_only == 1,
                    ValidationError::OrderReduceOnlyInvalid,
                )?;
                ensure(
                    a.order_expiry == b.order_expiry,
                    ValidationError::OrderExpiryInvalid,
                )?;
                check_siblings(orders)
            }
            GROUPING_ONE_TRIGGERS_THE_OTHER => {
                let [parent, child] = orders else {
                    return Err(ValidationError::OrderGroupSizeInvalid);
                };
                ensure(
                    child.base_amount == NIL_ORDER_BASE_AMOUNT,
                    ValidationError::BaseAmountNotNil,
                )?;
                ensure(parent.is_ask != child.is_ask, ValidationError::IsAskInvalid)?;
                check_parent_expiry(parent, child)?;
                parent.check_parent_rules()?;
                child.check_child_rules()
            }
            GROUPING_ONE_TRIGGERS_A_ONE_CANCELS_THE_OTHER => {
                let [parent, first, second] = orders else {
                    return Err(ValidationError::OrderGroupSizeInvalid);
                };
                ensure(
                    first.base_amount == NIL_ORDER_BASE_AMOUNT
                        && second.base_amount == NIL_ORDER_BASE_AMOUNT,
                    ValidationError::BaseAmountNotNil,
                )?;
                ensure(
                    parent.is_ask != first.is_ask && parent.is_ask != second.is_ask,
                    ValidationError::IsAskInvalid,
                )?;
                ensure(
                    first.order_expiry == second.order_expiry,
                    ValidationError::OrderExpiryInvalid,
                )?;
                check_parent_expiry(parent, first)?;
                parent.check_parent_rules()?;
                check_siblings(&orders[1..])
            }
            _ => Err(ValidationError::GroupingTypeInvalid),
        }
    }
}

/// A parent with an expiry must expire together with its children.
fn check_parent_expiry(parent: &OrderInfo, child: &OrderInfo) -> ValidationResult {
    ensure(
        parent.order_expiry == NIL_ORDER_EXPIRY || parent.order_expiry == child.order_expiry,
        ValidationError::OrderExpiryInvalid,
    )
}

/// One stop-loss and one take-profit leg.
fn check_siblings(orders: &[OrderInfo]) -> ValidationResult {
    let [a, b] = orders else {
        return Err(ValidationError::OrderGroupSizeInvalid);
    };
    a.check_child_rules()?;
    b.check_child_rules()?;
    let has_stop_loss = a.is_stop_loss() || b.is_stop_loss();
    let has_take_profit = a.is_take_profit() || b.is_take_profit();
    ensure(
        has_stop_loss && has_take_profit,
        ValidationError::OrderTypeInvalid,
    )
}

impl L2Transaction for CreateGroupedOrdersTx {
    const TX_TYPE: TxType = TxType::CreateGroupedOrders;

    fn validate(&self) -> ValidationResult {
        check_account_index(
            self.account_index,
            MIN_ACCOUNT_INDEX,
            MAX_ACCOUNT_INDEX,
            ValidationError::AccountIndexTooLow,
            ValidationError::AccountIndexTooHigh,
        )?;
        check_api_key_index(self.api_key_index)?;

        let Some(first) = self.orders.first() else {
            return Err(ValidationError::OrderGroupSizeInvalid);
        };
        ensure(
            self.orders.len() <= MAX_GROUPED_ORDER_COUNT,
            ValidationError::OrderGroupSizeInvalid,
        )?;
        check_market_index(first.market_index)?;
        for order in &self.orders {
            self.check_member(first, order)?;
        }

        check_nonce_and_expiry(self.nonce, self.expired_at)?;
        self.check_grouping()
    }

    fn message_elements(
        &self,
        chain_id: u32,
        hasher: &dyn FieldHasher,
    ) -> Result<Vec<FieldElement>> {
        let mut elements = message_header(chain_id, Self::TX_TYPE, self.nonce, self.expired_at, 11);
        elements.push(FieldElement::from_i64(self.account_index));
        elements.push(FieldElement::from_u8(self.api_key_index));
        elements.push(FieldElement::from_u8(self.grouping_type));
        elements.extend_from_slice(&self.orders_hash(hasher));
        Ok(elements)
    }

    signed_tx_accessors!();
}
