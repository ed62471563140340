//! Transaction signing orchestrator.
//!
//! A [`TxClient`] is bound to one (account, API key) identity. Every
//! construction call runs the same linear pipeline: resolve options, build
//! the transaction, validate, hash, sign, attach. A failure at any step
//! returns only the error.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::options::{ResolvedOpts, TransactOpts, DEFAULT_EXPIRE_MS};
use super::requests::*;
use super::signer::{TxSigner, PUBLIC_KEY_LENGTH};
use crate::api::{LighterClient, NonceSource};
use crate::config::Config;
use crate::hash::{Digest, FieldHasher};
use crate::output::SignedTxEnvelope;
use crate::types::constants::{MAX_ACCOUNT_INDEX, MAX_API_KEY_INDEX};
use crate::types::{
    BurnSharesTx, CancelAllOrdersTx, CancelOrderTx, ChangePubKeyTx, CreateGroupedOrdersTx,
    CreateOrderTx, CreatePublicPoolTx, CreateSubAccountTx, L2Transaction, MintSharesTx,
    ModifyOrderTx, TransferTx, UpdateLeverageTx, UpdateMarginTx, UpdatePublicPoolTx, WithdrawTx,
};
use crate::{Error, Result};

/// Signs transactions for one API key of one account.
pub struct TxClient {
    nonce_source: Option<Arc<dyn NonceSource>>,
    signer: Arc<dyn TxSigner>,
    hasher: Arc<dyn FieldHasher>,
    chain_id: u32,
    account_index: i64,
    api_key_index: u8,
}

impl TxClient {
    /// Create a client without a nonce source; every call must then carry a nonce.
    pub fn new(
        signer: Arc<dyn TxSigner>,
        hasher: Arc<dyn FieldHasher>,
        chain_id: u32,
        account_index: i64,
        api_key_index: u8,
    ) -> Result<Self> {
        if !(0..=MAX_ACCOUNT_INDEX).contains(&account_index) {
            return Err(Error::configuration(format!(
                "invalid account index {}",
                account_index
            )));
        }
        if api_key_index > MAX_API_KEY_INDEX {
            return Err(Error::configuration(format!(
                "invalid api key index {}",
                api_key_index
            )));
        }

        Ok(Self {
            nonce_source: None,
            signer,
            hasher,
            chain_id,
            account_index,
            api_key_index,
        })
    }

    /// Fetch missing nonces from `source`.
    pub fn with_nonce_source(mut self, source: Arc<dyn NonceSource>) -> Self {
        self.nonce_source = Some(source);
        self
    }

    /// Build a client from configuration, talking to the API only when a URL is set.
    pub fn from_config(
        config: &Config,
        signer: Arc<dyn TxSigner>,
        hasher: Arc<dyn FieldHasher>,
    ) -> Result<Self> {
        let client = Self::new(
            signer,
            hasher,
            config.chain_id,
            config.account_index,
            config.api_key_index,
        )?;

        if config.url.is_none() {
            return Ok(client);
        }
        let http = LighterClient::from_config(config)?;
        info!(
            url = http.base_url(),
            account_index = config.account_index,
            api_key_index = config.api_key_index,
            "Transaction client connected to Lighter API"
        );
        Ok(client.with_nonce_source(Arc::new(http)))
    }

    pub fn chain_id(&self) -> u32 {
        self.chain_id
    }

    pub fn account_index(&self) -> i64 {
        self.account_index
    }

    pub fn api_key_index(&self) -> u8 {
        self.api_key_index
    }

    pub fn public_key(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.signer.public_key()
    }

    pub fn hasher(&self) -> &dyn FieldHasher {
        self.hasher.as_ref()
    }

    /// Sign an arbitrary digest with this client's key.
    pub fn sign_digest(&self, digest: &Digest) -> Result<Vec<u8>> {
        self.signer.sign(digest)
    }

    /// Fill in every unset option.
    ///
    /// Expiry defaults to ten minutes (minus one second) from now, account and
    /// key slot to this client's identity, and the nonce to the nonce source's
    /// answer. Fully specified options come back unchanged.
    pub async fn resolve_opts(&self, opts: TransactOpts) -> Result<ResolvedOpts> {
        let from_account_index = opts.from_account_index.unwrap_or(self.account_index);
        let api_key_index = opts.api_key_index.unwrap_or(self.api_key_index);
        let expired_at = opts
            .expired_at
            .unwrap_or_else(|| Utc::now().timestamp_millis() + DEFAULT_EXPIRE_MS);

        let nonce = match opts.nonce {
            Some(nonce) => nonce,
            None => self.fetch_nonce(from_account_index, api_key_index).await?,
        };

        Ok(ResolvedOpts {
            from_account_index,
            api_key_index,
            expired_at,
            nonce,
            dry_run: opts.dry_run,
        })
    }

    async fn fetch_nonce(&self, account_index: i64, api_key_index: u8) -> Result<i64> {
        let source = self.nonce_source.as_ref().ok_or_else(|| Error::NonceUnavailable {
            message: "no nonce provided and no nonce source configured".to_string(),
        })?;

        match source.next_nonce(account_index, api_key_index).await {
            Ok(nonce) => {
                debug!(account_index, api_key_index, nonce, "Resolved nonce");
                Ok(nonce)
            }
            Err(e) => {
                warn!(account_index, api_key_index, error = %e, "Nonce fetch failed");
                Err(Error::NonceUnavailable {
                    message: e.to_string(),
                })
            }
        }
    }

    /// Validate, hash and sign an already built transaction.
    pub fn sign_transaction<T: L2Transaction>(&self, tx: T) -> Result<T> {
        self.finalize(tx, false)
    }

    /// Resolve options, build the transaction from `req`, and sign it.
    pub async fn sign_request<R: TxRequest>(&self, req: R, opts: TransactOpts) -> Result<R::Tx> {
        let resolved = self.resolve_opts(opts).await?;
        self.sign_transaction(req.into_tx(&resolved))
    }

    fn finalize<T: L2Transaction>(&self, mut tx: T, verify: bool) -> Result<T> {
        tx.validate()?;
        let digest = tx.hash(self.chain_id, self.hasher.as_ref())?;
        let signature = self.signer.sign(&digest)?;
        if verify {
            self.signer.verify(&digest, &signature).map_err(|e| Error::Signature {
                message: format!("signature self-check failed: {}", e),
            })?;
        }
        tx.attach_signature(&digest, signature);

        info!(
            tx_type = %tx.tx_type(),
            nonce = tx.nonce(),
            tx_hash = tx.tx_hash(),
            "Transaction signed"
        );
        Ok(tx)
    }

    /// Rotate the public key of an API key slot.
    ///
    /// The fresh signature is checked against this client's own public key
    /// before the transaction is returned.
    pub async fn change_pub_key(
        &self,
        req: ChangePubKeyReq,
        opts: TransactOpts,
    ) -> Result<ChangePubKeyTx> {
        let resolved = self.resolve_opts(opts).await?;
        self.finalize(req.into_tx(&resolved), true)
    }

    /// [`change_pub_key`](Self::change_pub_key) plus the registration message
    /// the account owner signs on L1.
    pub async fn change_pub_key_envelope(
        &self,
        req: ChangePubKeyReq,
        opts: TransactOpts,
    ) -> Result<SignedTxEnvelope<ChangePubKeyTx>> {
        self.change_pub_key(req, opts)
            .await
            .map(SignedTxEnvelope::with_l1_message)
    }

    pub async fn create_sub_account(&self, opts: TransactOpts) -> Result<CreateSubAccountTx> {
        self.sign_request(CreateSubAccountReq, opts).await
    }

    pub async fn create_public_pool(
        &self,
        req: CreatePublicPoolTxReq,
        opts: TransactOpts,
    ) -> Result<CreatePublicPoolTx> {
        self.sign_request(req, opts).await
    }

    pub async fn update_public_pool(
        &self,
        req: UpdatePublicPoolTxReq,
        opts: TransactOpts,
    ) -> Result<UpdatePublicPoolTx> {
        self.sign_request(req, opts).await
    }

    pub async fn transfer(&self, req: TransferTxReq, opts: TransactOpts) -> Result<TransferTx> {
        self.sign_request(req, opts).await
    }

    /// [`transfer`](Self::transfer) plus the transfer message signed on L1.
    pub async fn transfer_envelope(
        &self,
        req: TransferTxReq,
        opts: TransactOpts,
    ) -> Result<SignedTxEnvelope<TransferTx>> {
        self.transfer(req, opts)
            .await
            .map(SignedTxEnvelope::with_l1_message)
    }

    pub async fn withdraw(&self, req: WithdrawTxReq, opts: TransactOpts) -> Result<WithdrawTx> {
        self.sign_request(req, opts).await
    }

    pub async fn create_order(
        &self,
        req: CreateOrderTxReq,
        opts: TransactOpts,
    ) -> Result<CreateOrderTx> {
        self.sign_request(req, opts).await
    }

    pub async fn create_grouped_orders(
        &self,
        req: CreateGroupedOrdersTxReq,
        opts: TransactOpts,
    ) -> Result<CreateGroupedOrdersTx> {
        self.sign_request(req, opts).await
    }

    pub async fn cancel_order(
        &self,
        req: CancelOrderTxReq,
        opts: TransactOpts,
    ) -> Result<CancelOrderTx> {
        self.sign_request(req, opts).await
    }

    pub async fn modify_order(
        &self,
        req: ModifyOrderTxReq,
        opts: TransactOpts,
    ) -> Result<ModifyOrderTx> {
        self.sign_request(req, opts).await
    }

    pub async fn cancel_all_orders(
        &self,
        req: CancelAllOrdersTxReq,
        opts: TransactOpts,
    ) -> Result<CancelAllOrdersTx> {
        self.sign_request(req, opts).await
    }

    pub async fn mint_shares(
        &self,
        req: MintSharesTxReq,
        opts: TransactOpts,
    ) -> Result<MintSharesTx> {
        self.sign_request(req, opts).await
    }

    pub async fn burn_shares(
        &self,
        req: BurnSharesTxReq,
        opts: TransactOpts,
    ) -> Result<BurnSharesTx> {
        self.sign_request(req, opts).await
    }

    pub async fn update_leverage(
        &self,
        req: UpdateLeverageTxReq,
        opts: TransactOpts,
    ) -> Result<UpdateLeverageTx> {
        self.sign_request(req, opts).await
    }

    pub async fn update_margin(
        &self,
        req: UpdateMarginTxReq,
        opts: TransactOpts,
    ) -> Result<UpdateMarginTx> {
        self.sign_request(req, opts).await
    }
}

impl std::fmt::Debug for TxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxClient")
            .field("chain_id", &self.chain_id)
            .field("account_index", &self.account_index)
            .field("api_key_index", &self.api_key_index)
            .field("public_key", &hex::encode(self.signer.public_key()))
            .field("nonce_source", &self.nonce_source.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockNonceSource;
    use crate::error::ValidationError;
    use crate::testing::{FakeHasher, FakeSigner, FAKE_SIGNATURE_LENGTH};
    use crate::types::constants::*;
    use crate::types::{L1SignatureBody, OrderInfo};
    use mockall::predicate::eq;

    const EXPIRED_AT: i64 = 1_700_000_600_000;

    fn client_with(signer: Arc<FakeSigner>, hasher: Arc<FakeHasher>) -> TxClient {
        TxClient::new(signer, hasher, MAINNET_CHAIN_ID, 5, 3).unwrap()
    }

    fn client() -> TxClient {
        client_with(Arc::new(FakeSigner::from_seed(1)), Arc::new(FakeHasher::new()))
    }

    fn fixed_opts(nonce: i64) -> TransactOpts {
        TransactOpts::new().with_expired_at(EXPIRED_AT).with_nonce(nonce)
    }

    fn limit_order() -> OrderInfo {
        OrderInfo {
            market_index: 0,
            client_order_index: 1,
            base_amount: 100,
            price: 1_000,
            is_ask: 1,
            order_type: LIMIT_ORDER,
            time_in_force: GOOD_TILL_TIME,
            reduce_only: 0,
            trigger_price: 0,
            order_expiry: EXPIRED_AT + 86_400_000,
        }
    }

    /// Signs normally but rejects every signature on verification.
    struct RejectingSigner(FakeSigner);

    impl TxSigner for RejectingSigner {
        fn sign(&self, digest: &Digest) -> Result<Vec<u8>> {
            self.0.sign(digest)
        }

        fn public_key(&self) -> [u8; PUBLIC_KEY_LENGTH] {
            self.0.public_key()
        }

        fn verify(&self, _digest: &Digest, _signature: &[u8]) -> Result<()> {
            Err(Error::Signature {
                message: "rejected".to_string(),
            })
        }
    }

    #[test]
    fn test_new_rejects_bad_identity() {
        let signer = Arc::new(FakeSigner::from_seed(1));
        let hasher = Arc::new(FakeHasher::new());
        let err = TxClient::new(signer.clone(), hasher.clone(), 304, -1, 0).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        let err = TxClient::new(signer, hasher, 304, 1, NIL_API_KEY_INDEX).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_resolve_fills_defaults() {
        let mut source = MockNonceSource::new();
        source
            .expect_next_nonce()
            .with(eq(5), eq(3))
            .times(1)
            .returning(|_, _| Ok(722));
        let client = client().with_nonce_source(Arc::new(source));

        let before = Utc::now().timestamp_millis();
        let resolved = client.resolve_opts(TransactOpts::new()).await.unwrap();
        let after = Utc::now().timestamp_millis();

        assert_eq!(resolved.from_account_index, 5);
        assert_eq!(resolved.api_key_index, 3);
        assert_eq!(resolved.nonce, 722);
        assert!(resolved.expired_at >= before + DEFAULT_EXPIRE_MS);
        assert!(resolved.expired_at <= after + DEFAULT_EXPIRE_MS);
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let mut source = MockNonceSource::new();
        source.expect_next_nonce().times(0);
        let client = client().with_nonce_source(Arc::new(source));

        let opts = TransactOpts::new()
            .with_account_index(9)
            .with_api_key_index(4)
            .with_expired_at(EXPIRED_AT)
            .with_nonce(11)
            .dry_run(true);
        let once = client.resolve_opts(opts.clone()).await.unwrap();
        let twice = client.resolve_opts(once.into_opts()).await.unwrap();

        assert_eq!(once, twice);
        assert_eq!(once.into_opts(), opts);
    }

    #[tokio::test]
    async fn test_missing_nonce_source() {
        let err = client().resolve_opts(TransactOpts::new()).await.unwrap_err();
        assert!(matches!(err, Error::NonceUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_nonce_source_failure() {
        let mut source = MockNonceSource::new();
        source.expect_next_nonce().returning(|_, _| {
            Err(Error::Api {
                message: "boom".to_string(),
                status: Some(500),
            })
        });
        let client = client().with_nonce_source(Arc::new(source));

        let err = client
            .withdraw(WithdrawTxReq { usdc_amount: 1 }, TransactOpts::new())
            .await
            .unwrap_err();
        match err {
            Error::NonceUnavailable { message } => assert!(message.contains("boom")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_order_is_signed() {
        let signer = Arc::new(FakeSigner::from_seed(1));
        let hasher = Arc::new(FakeHasher::new());
        let client = client_with(signer.clone(), hasher.clone());

        let tx = client
            .create_order(limit_order(), fixed_opts(722))
            .await
            .unwrap();

        assert!(tx.is_signed());
        assert_eq!(tx.sig.len(), FAKE_SIGNATURE_LENGTH);
        assert_eq!(tx.nonce, 722);
        assert_eq!(tx.account_index, 5);

        let digest = Digest::from_hex(tx.tx_hash()).unwrap();
        assert_eq!(digest, tx.hash(MAINNET_CHAIN_ID, hasher.as_ref()).unwrap());
        assert!(signer.verify(&digest, &tx.sig).is_ok());
    }

    #[tokio::test]
    async fn test_validation_failure_skips_signing() {
        let signer = Arc::new(FakeSigner::from_seed(1));
        let hasher = Arc::new(FakeHasher::new());
        let client = client_with(signer.clone(), hasher.clone());

        let err = client
            .withdraw(WithdrawTxReq { usdc_amount: 0 }, fixed_opts(1))
            .await
            .unwrap_err();

        assert_eq!(
            err.as_validation(),
            Some(&ValidationError::WithdrawalAmountTooLow)
        );
        assert_eq!(hasher.calls(), 0);
        assert_eq!(signer.sign_calls(), 0);
    }

    #[tokio::test]
    async fn test_signer_failure_is_terminal() {
        let client = client_with(Arc::new(FakeSigner::failing(1)), Arc::new(FakeHasher::new()));
        let err = client
            .cancel_order(
                CancelOrderTxReq {
                    market_index: 0,
                    index: 1,
                },
                fixed_opts(1),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Signature { .. }));
    }

    #[tokio::test]
    async fn test_change_pub_key_self_verifies() {
        let new_key = FakeSigner::from_seed(2).public_key();
        let tx = client()
            .change_pub_key(ChangePubKeyReq { pub_key: new_key }, fixed_opts(3))
            .await
            .unwrap();
        assert_eq!(tx.pub_key, new_key.to_vec());
        assert!(tx.is_signed());

        let rejecting = TxClient::new(
            Arc::new(RejectingSigner(FakeSigner::from_seed(1))),
            Arc::new(FakeHasher::new()),
            MAINNET_CHAIN_ID,
            5,
            3,
        )
        .unwrap();
        let err = rejecting
            .change_pub_key(ChangePubKeyReq { pub_key: new_key }, fixed_opts(3))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Signature { .. }));
    }

    #[tokio::test]
    async fn test_l1_envelopes_carry_message() {
        let client = client();

        let transfer = client
            .transfer_envelope(
                TransferTxReq {
                    to_account_index: 8,
                    usdc_amount: ONE_USDC,
                    fee: 0,
                    memo: [0; 32],
                },
                fixed_opts(4),
            )
            .await
            .unwrap();
        assert!(transfer.tx.is_signed());
        assert!(transfer.message_to_sign.starts_with("Transfer\n\nnonce: "));
        assert_eq!(transfer.message_to_sign, transfer.tx.l1_signature_body());
        let json: serde_json::Value = serde_json::from_str(&transfer.to_json().unwrap()).unwrap();
        assert_eq!(json["MessageToSign"], transfer.message_to_sign.as_str());

        let new_key = FakeSigner::from_seed(2).public_key();
        let rotation = client
            .change_pub_key_envelope(ChangePubKeyReq { pub_key: new_key }, fixed_opts(5))
            .await
            .unwrap();
        assert!(rotation.tx.is_signed());
        assert!(!rotation.message_to_sign.is_empty());
        assert!(rotation.message_to_sign.contains(&hex::encode(new_key)));
    }

    #[tokio::test]
    async fn test_l1_envelope_not_built_on_failure() {
        let err = client()
            .transfer_envelope(
                TransferTxReq {
                    to_account_index: 0,
                    usdc_amount: ONE_USDC,
                    fee: 0,
                    memo: [0; 32],
                },
                fixed_opts(4),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.as_validation(),
            Some(&ValidationError::ToAccountIndexTooLow)
        );
    }

    #[tokio::test]
    async fn test_update_margin_resolves_nonce() {
        let mut source = MockNonceSource::new();
        source
            .expect_next_nonce()
            .times(1)
            .returning(|_, _| Ok(15));
        let client = client().with_nonce_source(Arc::new(source));

        let tx = client
            .update_margin(
                UpdateMarginTxReq {
                    market_index: 1,
                    usdc_amount: ONE_USDC,
                    direction: ADD_TO_ISOLATED_MARGIN,
                },
                TransactOpts::new(),
            )
            .await
            .unwrap();
        assert_eq!(tx.nonce, 15);
        assert!(tx.is_signed());
    }

    #[tokio::test]
    async fn test_account_override_reaches_transaction() {
        let tx = client()
            .create_sub_account(fixed_opts(0).with_account_index(77))
            .await
            .unwrap();
        assert_eq!(tx.account_index, 77);
        assert_eq!(tx.api_key_index, 3);
    }

    #[test]
    fn test_debug_shows_identity_only() {
        let debug = format!("{:?}", client());
        assert!(debug.contains("account_index: 5"));
        assert!(debug.contains("nonce_source: false"));
    }
}
