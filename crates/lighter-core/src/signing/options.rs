//! Per-call transaction options and their resolved form.

/// Default lifetime of a transaction: ten minutes minus one second, in ms.
pub const DEFAULT_EXPIRE_MS: i64 = 10 * 60 * 1000 - 1000;

/// Caller overrides for the protocol fields every transaction carries.
///
/// Unset fields are filled in by [`TxClient::resolve_opts`](super::TxClient::resolve_opts).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactOpts {
    pub from_account_index: Option<i64>,
    pub api_key_index: Option<u8>,
    /// Absolute expiry in milliseconds since the epoch.
    pub expired_at: Option<i64>,
    pub nonce: Option<i64>,
    /// Carried through for callers that build without submitting.
    pub dry_run: bool,
}

impl TransactOpts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account_index(mut self, account_index: i64) -> Self {
        self.from_account_index = Some(account_index);
        self
    }

    pub fn with_api_key_index(mut self, api_key_index: u8) -> Self {
        self.api_key_index = Some(api_key_index);
        self
    }

    pub fn with_expired_at(mut self, expired_at: i64) -> Self {
        self.expired_at = Some(expired_at);
        self
    }

    pub fn with_nonce(mut self, nonce: i64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// All fields already set, so resolution has nothing to do.
    pub fn is_complete(&self) -> bool {
        self.from_account_index.is_some()
            && self.api_key_index.is_some()
            && self.expired_at.is_some()
            && self.nonce.is_some()
    }
}

/// Options with every field filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOpts {
    pub from_account_index: i64,
    pub api_key_index: u8,
    pub expired_at: i64,
    pub nonce: i64,
    pub dry_run: bool,
}

impl ResolvedOpts {
    pub fn into_opts(self) -> TransactOpts {
        TransactOpts {
            from_account_index: Some(self.from_account_index),
            api_key_index: Some(self.api_key_index),
            expired_at: Some(self.expired_at),
            nonce: Some(self.nonce),
            dry_run: self.dry_run,
        }
    }
}

impl From<ResolvedOpts> for TransactOpts {
    fn from(opts: ResolvedOpts) -> Self {
        opts.into_opts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_completeness() {
        let opts = TransactOpts::new()
            .with_account_index(5)
            .with_api_key_index(3)
            .with_expired_at(1_000)
            .with_nonce(7);
        assert!(opts.is_complete());
        assert!(!TransactOpts::new().with_nonce(7).is_complete());
    }

    #[test]
    fn test_resolved_round_trips_into_opts() {
        let resolved = ResolvedOpts {
            from_account_index: 5,
            api_key_index: 3,
            expired_at: 1_000,
            nonce: 7,
            dry_run: true,
        };
        let opts: TransactOpts = resolved.into();
        assert!(opts.is_complete());
        assert!(opts.dry_run);
        assert_eq!(opts.nonce, Some(7));
    }
}
