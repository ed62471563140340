//! Order placement, modification and cancellation.

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

/// Per-order fields shared by single and grouped order placement.
///
/// Zero is the nil value for client order index, base amount, trigger price
/// and order expiry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderInfo {
    pub market_index: u8,
    pub client_order_index: i64,
    pub base_amount: i64,
    pub price: u32,
    pub is_ask: u8,
    #[serde(rename = "Type")]
    pub order_type: u8,
    pub time_in_force: u8,
    pub reduce_only: u8,
    pub trigger_price: u32,
    pub order_expiry: i64,
}

impl OrderInfo {
    /// The ten order fields in hashing order.
    pub fn elements(&self) -> [FieldElement; 10] {
        [
            FieldElement::from_u8(self.market_index),
            FieldElement::from_i64(self.client_order_index),
            FieldElement::from_i64(self.base_amount),
            FieldElement::from_u32(self.price),
            FieldElement::from_u8(self.is_ask),
            FieldElement::from_u8(self.order_type),
            FieldElement::from_u8(self.time_in_force),
            FieldElement::from_u8(self.reduce_only),
            FieldElement::from_u32(self.trigger_price),
            FieldElement::from_i64(self.order_expiry),
        ]
    }

    pub fn is_stop_loss(&self) -> bool {
        matches!(self.order_type, STOP_LOSS_ORDER | STOP_LOSS_LIMIT_ORDER)
    }

    pub fn is_take_profit(&self) -> bool {
        matches!(self.order_type, TAKE_PROFIT_ORDER | TAKE_PROFIT_LIMIT_ORDER)
    }

    pub(crate) fn check_client_order_index(&self) -> ValidationResult {
        if self.client_order_index == NIL_CLIENT_ORDER_INDEX {
            return Ok(());
        }
        ensure(
            self.client_order_index >= MIN_CLIENT_ORDER_INDEX,
            ValidationError::ClientOrderIndexTooLow,
        )?;
        ensure(
            self.client_order_index <= MAX_CLIENT_ORDER_INDEX,
            ValidationError::ClientOrderIndexTooHigh,
        )
    }

    /// A nil base amount is only allowed on reduce-only orders.
    pub(crate) fn check_base_amount(&self) -> ValidationResult {
        if self.reduce_only != 1 && self.base_amount == NIL_ORDER_BASE_AMOUNT {
            return Err(ValidationError::BaseAmountTooLow);
        }
        if self.base_amount != NIL_ORDER_BASE_AMOUNT && self.base_amount < MIN_ORDER_BASE_AMOUNT {
            return Err(ValidationError::BaseAmountTooLow);
        }
        ensure(
            self.base_amount <= MAX_ORDER_BASE_AMOUNT,
            ValidationError::BaseAmountTooHigh,
        )
    }

    pub(crate) fn check_price(&self) -> ValidationResult {
        check_price(self.price)
    }

    /// Side, time in force and reduce-only flags.
    pub(crate) fn check_flags(&self) -> ValidationResult {
        ensure(self.is_ask <= 1, ValidationError::IsAskInvalid)?;
        ensure(
            matches!(
                self.time_in_force,
                IMMEDIATE_OR_CANCEL | GOOD_TILL_TIME | POST_ONLY
            ),
            ValidationError::OrderTimeInForceInvalid,
        )?;
        ensure(self.reduce_only <= 1, ValidationError::OrderReduceOnlyInvalid)
    }

    pub(crate) fn check_expiry_range(&self) -> ValidationResult {
        ensure(
            self.order_expiry == NIL_ORDER_EXPIRY
                || (MIN_ORDER_EXPIRY..=MAX_ORDER_EXPIRY).contains(&self.order_expiry),
            ValidationError::OrderExpiryInvalid,
        )
    }

    pub(crate) fn check_trigger_range(&self) -> ValidationResult {
        check_trigger_price(self.trigger_price)
    }

    /// Shape rules for every order type a client may place.
    pub(crate) fn check_type_rules(&self) -> ValidationResult {
        match self.order_type {
            MARKET_ORDER | LIMIT_ORDER => self.check_parent_rules(),
            STOP_LOSS_ORDER | TAKE_PROFIT_ORDER | STOP_LOSS_LIMIT_ORDER
            | TAKE_PROFIT_LIMIT_ORDER => self.check_child_rules(),
            TWAP_ORDER => {
                ensure(
                    self.time_in_force == GOOD_TILL_TIME,
                    ValidationError::OrderTimeInForceInvalid,
                )?;
                ensure(
                    self.trigger_price == NIL_ORDER_TRIGGER_PRICE,
                    ValidationError::OrderTriggerPriceInvalid,
                )?;
                ensure(
                    self.order_expiry != NIL_ORDER_EXPIRY,
                    ValidationError::OrderExpiryInvalid,
                )
            }
            _ => Err(ValidationError::OrderTypeInvalid),
        }
    }

    /// Market and limit orders: the only types allowed to open a group.
    pub(crate) fn check_parent_rules(&self) -> ValidationResult {
        match self.order_type {
            MARKET_ORDER => {
                ensure(
                    self.time_in_force == IMMEDIATE_OR_CANCEL,
                    ValidationError::OrderTimeInForceInvalid,
                )?;
                ensure(
                    self.order_expiry == NIL_ORDER_EXPIRY,
                    ValidationError::OrderExpiryInvalid,
                )?;
                ensure(
                    self.trigger_price == NIL_ORDER_TRIGGER_PRICE,
                    ValidationError::OrderTriggerPriceInvalid,
                )
            }
            LIMIT_ORDER => {
                ensure(
                    self.trigger_price == NIL_ORDER_TRIGGER_PRICE,
                    ValidationError::OrderTriggerPriceInvalid,
                )?;
                // IOC limits carry no expiry, resting limits must have one.
                let is_ioc = self.time_in_force == IMMEDIATE_OR_CANCEL;
                ensure(
                    is_ioc == (self.order_expiry == NIL_ORDER_EXPIRY),
                    ValidationError::OrderExpiryInvalid,
                )
            }
            _ => Err(ValidationError::OrderTypeInvalid),
        }
    }

    /// Stop-loss and take-profit orders, market or limit flavoured.
    pub(crate) fn check_child_rules(&self) -> ValidationResult {
        match self.order_type {
            STOP_LOSS_ORDER | TAKE_PROFIT_ORDER => {
                ensure(
                    self.time_in_force == IMMEDIATE_OR_CANCEL,
                    ValidationError::OrderTimeInForceInvalid,
                )?;
                self.check_trigger_and_expiry_set()
            }
            STOP_LOSS_LIMIT_ORDER | TAKE_PROFIT_LIMIT_ORDER => self.check_trigger_and_expiry_set(),
            _ => Err(ValidationError::OrderTypeInvalid),
        }
    }

    fn check_trigger_and_expiry_set(&self) -> ValidationResult {
        ensure(
            self.trigger_price != NIL_ORDER_TRIGGER_PRICE,
            ValidationError::OrderTriggerPriceInvalid,
        )?;
        ensure(
            self.order_expiry != NIL_ORDER_EXPIRY,
            ValidationError::OrderExpiryInvalid,
        )
    }
}

fn check_price(price: u32) -> ValidationResult {
    ensure(price >= MIN_ORDER_PRICE, ValidationError::PriceTooLow)?;
    ensure(price <= MAX_ORDER_PRICE, ValidationError::PriceTooHigh)
}

fn check_trigger_price(trigger_price: u32) -> ValidationResult {
    ensure(
        trigger_price == NIL_ORDER_TRIGGER_PRICE
            || (MIN_ORDER_TRIGGER_PRICE..=MAX_ORDER_TRIGGER_PRICE).contains(&trigger_price),
        ValidationError::OrderTriggerPriceInvalid,
    )
}

fn check_trading_account(account_index: i64, api_key_index: u8) -> ValidationResult {
    check_account_index(
        account_index,
        MIN_ACCOUNT_INDEX,
        MAX_ACCOUNT_INDEX,
        ValidationError::AccountIndexTooLow,
        ValidationError::AccountIndexTooHigh,
    )?;
    check_api_key_index(api_key_index)
}

/// Place a single order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateOrderTx {
    pub account_index: i64,
    pub api_key_index: u8,
    #[serde(flatten)]
    pub order: OrderInfo,
    pub expired_at: i64,
    pub nonce: i64,
    #[serde(with = "base64_bytes")]
    pub sig: Vec<u8>,
    #[serde(skip)]
    pub signed_hash: String,
}

impl L2Transaction for CreateOrderTx {
    const TX_TYPE: TxType = TxType::CreateOrder;

    fn validate(&self) -> ValidationResult {
        check_trading_account(self.account_index, self.api_key_index)?;
        check_market_index(self.order.market_index)?;
        self.order.check_client_order_index()?;
        self.order.check_base_amount()?;
        self.order.check_price()?;
        self.order.check_flags()?;
        self.order.check_expiry_range()?;
        self.order.check_type_rules()?;
        self.order.check_trigger_range()?;
        check_nonce_and_expiry(self.nonce, self.expired_at)
    }

    fn message_elements(
        &self,
        chain_id: u32,
        _hasher: &dyn FieldHasher,
    ) -> Result<Vec<FieldElement>> {
        let mut elements = message_header(chain_id, Self::TX_TYPE, self.nonce, self.expired_at, 16);
        elements.push(FieldElement::from_i64(self.account_index));
        elements.push(FieldElement::from_u8(self.api_key_index));
        elements.extend_from_slice(&self.order.elements());
        Ok(elements)
    }

    signed_tx_accessors!();
}

/// Cancel and modify accept either a client order index or an exchange order
/// index, so the accepted range spans both.
fn check_order_index(
    index: i64,
    too_low: ValidationError,
    too_high: ValidationError,
) -> ValidationResult {
    ensure(index >= MIN_CLIENT_ORDER_INDEX, too_low)?;
    ensure(index <= MAX_ORDER_INDEX, too_high)
}

/// Cancel one resting order by client or exchange order index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CancelOrderTx {
    pub account_index: i64,
    pub api_key_index: u8,
    pub market_index: u8,
    pub index: i64,
    pub expired_at: i64,
    pub nonce: i64,
    #[serde(with = "base64_bytes")]
    pub sig: Vec<u8>,
    #[serde(skip)]
    pub signed_hash: String,
}

impl L2Transaction for CancelOrderTx {
    const TX_TYPE: TxType = TxType::CancelOrder;

    fn validate(&self) -> ValidationResult {
        check_trading_account(self.account_index, self.api_key_index)?;
        check_market_index(self.market_index)?;
        check_order_index(
            self.index,
            ValidationError::OrderIndexTooLow,
            ValidationError::OrderIndexTooHigh,
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
        elements.push(FieldElement::from_i64(self.index));
        Ok(elements)
    }

    signed_tx_accessors!();
}

/// Change size, price or trigger of a resting order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModifyOrderTx {
    pub account_index: i64,
    pub api_key_index: u8,
    pub market_index: u8,
    pub index: i64,
    pub base_amount: i64,
    pub price: u32,
    pub trigger_price: u32,
    pub expired_at: i64,
    pub nonce: i64,
    #[serde(with = "base64_bytes")]
    pub sig: Vec<u8>,
    #[serde(skip)]
    pub signed_hash: String,
}

impl L2Transaction for ModifyOrderTx {
    const TX_TYPE: TxType = TxType::ModifyOrder;

    fn validate(&self) -> ValidationResult {
        check_trading_account(self.account_index, self.api_key_index)?;
        check_market_index(self.market_index)?;
        check_order_index(
            self.index,
            ValidationError::ClientOrderIndexTooLow,
            ValidationError::ClientOrderIndexTooHigh,
        )?;
        ensure(
            self.base_amount == NIL_ORDER_BASE_AMOUNT || self.base_amount >= MIN_ORDER_BASE_AMOUNT,
            ValidationError::BaseAmountTooLow,
        )?;
        ensure(
            self.base_amount <= MAX_ORDER_BASE_AMOUNT,
            ValidationError::BaseAmountTooHigh,
        )?;
        check_price(self.price)?;
        check_trigger_price(self.trigger_price)?;
        check_nonce_and_expiry(self.nonce, self.expired_at)
    }

    fn message_elements(
        &self,
        chain_id: u32,
        _hasher: &dyn FieldHasher,
    ) -> Result<Vec<FieldElement>> {
        let mut elements = message_header(chain_id, Self::TX_TYPE, self.nonce, self.expired_at, 11);
        elements.push(FieldElement::from_i64(self.account_index));
        elements.push(FieldElement::from_u8(self.api_key_index));
        elements.push(FieldElement::from_u8(self.market_index));
        elements.push(FieldElement::from_i64(self.index));
        elements.push(FieldElement::from_i64(self.base_amount));
        elements.push(FieldElement::from_u32(self.price));
        elements.push(FieldElement::from_u32(self.trigger_price));
        Ok(elements)
    }

    signed_tx_accessors!();
}

/// Cancel every order of the account, now or at a scheduled time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CancelAllOrdersTx {
    pub account_index: i64,
    pub api_key_index: u8,
    pub time_in_force: u8,
    pub time: i64,
    pub expired_at: i64,
    pub nonce: i64,
    #[serde(with = "base64_bytes")]
    pub sig: Vec<u8>,
    #[serde(skip)]
    pub signed_hash: String,
}

impl L2Transaction for CancelAllOrdersTx {
    const TX_TYPE: TxType = TxType::CancelAllOrders;

    fn validate(&self) -> ValidationResult {
        check_account_index(
            self.account_index,
            MIN_ACCOUNT_INDEX,
            MAX_ACCOUNT_INDEX,
            ValidationError::AccountIndexTooLow,
            ValidationError::AccountIndexTooHigh,
        )?;
        // The nil key index cancels orders placed by every key of the account.
        ensure(
            self.api_key_index <= MAX_API_KEY_INDEX || self.api_key_index == NIL_API_KEY_INDEX,
            ValidationError::ApiKeyIndexTooHigh,
        )?;
        check_nonce_and_expiry(self.nonce, self.expired_at)?;

        match self.time_in_force {
            IMMEDIATE_CANCEL_ALL => {
                ensure(self.time == NIL_ORDER_EXPIRY, ValidationError::CancelAllTimeNotNil)
            }
            SCHEDULED_CANCEL_ALL => ensure(
                (MIN_ORDER_EXPIRY..=MAX_ORDER_EXPIRY).contains(&self.time),
                ValidationError::CancelAllTimeNotInRange,
            ),
            ABORT_SCHEDULED_CANCEL_ALL => {
                ensure(self.time == 0, ValidationError::CancelAllTimeNotInRange)
            }
            _ => Err(ValidationError::InvalidCancelAllTimeInForce),
        }
    }

    fn message_elements(
        &self,
        chain_id: u32,
        _hasher: &dyn FieldHasher,
    ) -> Result<Vec<FieldElement>> {
        let mut elements = message_header(chain_id, Self::TX_TYPE, self.nonce, self.expired_at, 8);
        elements.push(FieldElement::from_i64(self.account_index));
        elements.push(FieldElement::from_u8(self.api_key_index));
        elements.push(FieldElement::from_u8(self.time_in_force));
        elements.push(FieldElement::from_i64(self.time));
        Ok(elements)
    }

    signed_tx_accessors!();
}
