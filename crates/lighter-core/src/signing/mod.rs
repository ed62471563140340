//! Signing: key seam, per-call options, request types and the orchestrator.

pub mod client;
pub mod options;
pub mod requests;
pub mod signer;

pub use client::TxClient;
pub use options::{ResolvedOpts, TransactOpts, DEFAULT_EXPIRE_MS};
pub use requests::{
    BurnSharesTxReq, CancelAllOrdersTxReq, CancelOrderTxReq, ChangePubKeyReq,
    CreateGroupedOrdersTxReq, CreateOrderTxReq, CreatePublicPoolTxReq, CreateSubAccountReq,
    MintSharesTxReq, ModifyOrderTxReq, TransferTxReq, TxRequest, UpdateLeverageTxReq,
    UpdateMarginTxReq, UpdatePublicPoolTxReq, WithdrawTxReq,
};
pub use signer::{
    generate_api_key, ApiKeyPair, KeyGenerator, PrivateKeyBytes, TxSigner, PRIVATE_KEY_LENGTH,
    PUBLIC_KEY_LENGTH,
};
