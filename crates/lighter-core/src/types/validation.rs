//! Range checks shared across transaction variants.

use super::constants::*;
use super::ValidationResult;
use crate::error::ValidationError;

pub(crate) fn ensure(condition: bool, err: ValidationError) -> ValidationResult {
    if condition {
        Ok(())
    } else {
        Err(err)
    }
}

/// `[min, max]` account index check with caller-chosen error variants.
pub(crate) fn check_account_index(
    index: i64,
    min: i64,
    max: i64,
    too_low: ValidationError,
    too_high: ValidationError,
) -> ValidationResult {
    ensure(index >= min, too_low)?;
    ensure(index <= max, too_high)
}

pub(crate) fn check_api_key_index(index: u8) -> ValidationResult {
    ensure(index <= MAX_API_KEY_INDEX, ValidationError::ApiKeyIndexTooHigh)
}

pub(crate) fn check_market_index(index: u8) -> ValidationResult {
    ensure(index <= MAX_MARKET_INDEX, ValidationError::MarketIndexTooHigh)
}

pub(crate) fn check_nonce(nonce: i64) -> ValidationResult {
    ensure(nonce >= MIN_NONCE, ValidationError::NonceTooLow)
}

pub(crate) fn check_expired_at(expired_at: i64) -> ValidationResult {
    ensure(
        (0..=MAX_TIMESTAMP).contains(&expired_at),
        ValidationError::ExpiredAtInvalid,
    )
}

/// Nonce then expiry, the tail of nearly every variant's checks.
pub(crate) fn check_nonce_and_expiry(nonce: i64, expired_at: i64) -> ValidationResult {
    check_nonce(nonce)?;
    check_expired_at(expired_at)
}

pub(crate) fn check_public_pool_index(index: i64) -> ValidationResult {
    check_account_index(
        index,
        MIN_ACCOUNT_INDEX,
        MAX_ACCOUNT_INDEX,
        ValidationError::PublicPoolIndexTooLow,
        ValidationError::PublicPoolIndexTooHigh,
    )
}

pub(crate) fn check_operator_fee(fee: i64) -> ValidationResult {
    ensure(
        (0..=FEE_TICK).contains(&fee),
        ValidationError::InvalidPoolOperatorFee,
    )
}

pub(crate) fn check_min_operator_share_rate(rate: i64) -> ValidationResult {
    ensure(rate >= 0, ValidationError::PoolMinOperatorShareRateTooLow)?;
    ensure(rate <= SHARE_TICK, ValidationError::PoolMinOperatorShareRateTooHigh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_at_bounds() {
        assert!(check_expired_at(0).is_ok());
        assert!(check_expired_at(MAX_TIMESTAMP).is_ok());
        assert_eq!(check_expired_at(-1), Err(ValidationError::ExpiredAtInvalid));
        assert_eq!(
            check_expired_at(MAX_TIMESTAMP + 1),
            Err(ValidationError::ExpiredAtInvalid)
        );
    }

    #[test]
    fn test_api_key_and_market_bounds() {
        assert!(check_api_key_index(MAX_API_KEY_INDEX).is_ok());
        assert_eq!(
            check_api_key_index(NIL_API_KEY_INDEX),
            Err(ValidationError::ApiKeyIndexTooHigh)
        );
        assert!(check_market_index(254).is_ok());
        assert_eq!(check_market_index(255), Err(ValidationError::MarketIndexTooHigh));
    }

    #[test]
    fn test_pool_fee_and_rate_bounds() {
        assert!(check_operator_fee(0).is_ok());
        assert!(check_operator_fee(FEE_TICK).is_ok());
        assert_eq!(check_operator_fee(-1), Err(ValidationError::InvalidPoolOperatorFee));
        assert_eq!(
            check_operator_fee(FEE_TICK + 1),
            Err(ValidationError::InvalidPoolOperatorFee)
        );
        assert_eq!(
            check_min_operator_share_rate(-1),
            Err(ValidationError::PoolMinOperatorShareRateTooLow)
        );
        assert_eq!(
            check_min_operator_share_rate(SHARE_TICK + 1),
            Err(ValidationError::PoolMinOperatorShareRateTooHigh)
        );
    }
}
