use thiserror::Error;

use crate::db_types::PaymentHash;

#[derive(Debug, Clone, Error)]
pub enum LockError {
    #[error("Timed out waiting for the lock on payment {0}")]
    Timeout(PaymentHash),
    #[error("A lock for payment {held} was supplied, but payment {requested} is being processed")]
    GuardMismatch { held: PaymentHash, requested: PaymentHash },
    #[error("The lock service is unavailable. {0}")]
    Unavailable(String),
}

/// Proof that the holder has exclusive access to a payment hash. Access is released when the guard is dropped.
pub trait PaymentLockGuard {
    fn payment_hash(&self) -> &PaymentHash;
}

/// Mutual exclusion keyed by payment hash.
///
/// Implementations may be backed by an in-process keyed mutex or by a distributed lock service. Whatever the backing,
/// the exclusion must be released on every exit path of the holder, which in Rust means when the guard is dropped.
#[allow(async_fn_in_trait)]
pub trait PaymentLock {
    type Guard: PaymentLockGuard;

    /// Waits until exclusive access to `payment_hash` is available and returns the guard for it.
    async fn acquire(&self, payment_hash: &PaymentHash) -> Result<Self::Guard, LockError>;
}
