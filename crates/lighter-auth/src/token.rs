//! Short-lived auth tokens signed with an API key.
//!
//! A token is `"{deadline}:{account}:{api_key}:{signature}"`, where the
//! signature covers the first three fields and the deadline is in unix seconds.

use chrono::{DateTime, Duration, Utc};
use lighter_core::hash::hash_message_bytes;
use lighter_core::signing::TxClient;
use lighter_core::{Result, ValidationError};
use tracing::debug;

/// Longest allowed token lifetime, and the default when no deadline is given.
pub const MAX_AUTH_TOKEN_LIFETIME_HOURS: i64 = 7;

/// Build a token for `client` expiring at `deadline`, or in seven hours.
pub fn create_auth_token(client: &TxClient, deadline: Option<DateTime<Utc>>) -> Result<String> {
    let now = Utc::now();
    let deadline =
        deadline.unwrap_or_else(|| now + Duration::hours(MAX_AUTH_TOKEN_LIFETIME_HOURS));
    build_auth_token(client, deadline.timestamp(), now.timestamp())
}

/// Build a token with an explicit clock, both arguments in unix seconds.
///
/// Deadlines further than seven hours past `now_secs` are rejected before
/// anything is hashed or signed.
pub fn build_auth_token(client: &TxClient, deadline_secs: i64, now_secs: i64) -> Result<String> {
    let max_lifetime = Duration::hours(MAX_AUTH_TOKEN_LIFETIME_HOURS).num_seconds();
    if deadline_secs - now_secs > max_lifetime {
        return Err(ValidationError::AuthDeadlineTooFar.into());
    }

    let message = format!(
        "{}:{}:{}",
        deadline_secs,
        client.account_index(),
        client.api_key_index()
    );
    let digest = hash_message_bytes(client.hasher(), message.as_bytes())?;
    let signature = client.sign_digest(&digest)?;

    debug!(
        account_index = client.account_index(),
        api_key_index = client.api_key_index(),
        deadline = deadline_secs,
        "Created auth token"
    );
    Ok(format!("{}:{}", message, hex::encode(signature)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lighter_core::hash::Digest;
    use lighter_core::signing::TxSigner;
    use lighter_core::testing::{FakeHasher, FakeSigner};
    use lighter_core::Error;
    use std::sync::Arc;

    const NOW: i64 = 1_700_000_000;

    fn client_with(signer: Arc<FakeSigner>, hasher: Arc<FakeHasher>) -> TxClient {
        TxClient::new(signer, hasher, 304, 12, 4).unwrap()
    }

    #[test]
    fn test_token_format() {
        let signer = Arc::new(FakeSigner::from_seed(3));
        let hasher = Arc::new(FakeHasher::new());
        let client = client_with(signer.clone(), hasher.clone());

        let token = build_auth_token(&client, NOW + 3_600, NOW).unwrap();
        let parts: Vec<&str> = token.split(':').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], (NOW + 3_600).to_string());
        assert_eq!(parts[1], "12");
        assert_eq!(parts[2], "4");

        let message = format!("{}:12:4", NOW + 3_600);
        let digest: Digest = hash_message_bytes(hasher.as_ref(), message.as_bytes()).unwrap();
        let signature = hex::decode(parts[3]).unwrap();
        assert!(signer.verify(&digest, &signature).is_ok());
    }

    #[test]
    fn test_deadline_boundary() {
        let client = client_with(Arc::new(FakeSigner::from_seed(3)), Arc::new(FakeHasher::new()));
        let seven_hours = 7 * 3_600;
        assert!(build_auth_token(&client, NOW + seven_hours, NOW).is_ok());

        let err = build_auth_token(&client, NOW + seven_hours + 1, NOW).unwrap_err();
        assert_eq!(err.as_validation(), Some(&ValidationError::AuthDeadlineTooFar));
    }

    #[test]
    fn test_far_deadline_rejected_before_hashing() {
        let signer = Arc::new(FakeSigner::from_seed(3));
        let hasher = Arc::new(FakeHasher::new());
        let client = client_with(signer.clone(), hasher.clone());

        let err = build_auth_token(&client, NOW + 8 * 3_600, NOW).unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::AuthDeadlineTooFar)));
        assert_eq!(hasher.calls(), 0);
        assert_eq!(signer.sign_calls(), 0);
    }

    #[test]
    fn test_default_deadline() {
        let client = client_with(Arc::new(FakeSigner::from_seed(3)), Arc::new(FakeHasher::new()));
        let before = Utc::now().timestamp();
        let token = create_auth_token(&client, None).unwrap();
        let deadline: i64 = token.split(':').next().unwrap().parse().unwrap();
        assert!(deadline >= before + 7 * 3_600);
        assert!(deadline <= Utc::now().timestamp() + 7 * 3_600);
    }

    #[test]
    fn test_signer_failure_propagates() {
        let client = client_with(Arc::new(FakeSigner::failing(3)), Arc::new(FakeHasher::new()));
        let err = create_auth_token(&client, Some(Utc::now() + Duration::hours(1))).unwrap_err();
        assert!(matches!(err, Error::Signature { .. }));
    }
}
