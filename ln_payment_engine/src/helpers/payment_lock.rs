//! An in-process [`PaymentLock`] backed by one tokio mutex per payment hash.
//!
//! Entries are created on demand and pruned by the last guard to be dropped, so the registry only ever holds the
//! payment hashes that are currently locked or being waited on.
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use log::*;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::{
    db_types::PaymentHash,
    traits::{LockError, PaymentLock, PaymentLockGuard},
};

type Registry = Arc<Mutex<HashMap<PaymentHash, Arc<AsyncMutex<()>>>>>;

#[derive(Clone, Default)]
pub struct MemoryPaymentLock {
    registry: Registry,
    timeout: Option<Duration>,
}

impl MemoryPaymentLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquisition fails with [`LockError::Timeout`] if the lock is not available within `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { registry: Registry::default(), timeout: Some(timeout) }
    }

    /// The number of payment hashes that are currently locked or contended.
    pub fn active_keys(&self) -> usize {
        self.registry.lock().map(|r| r.len()).unwrap_or_default()
    }

    fn entry_for(&self, payment_hash: &PaymentHash) -> Result<Arc<AsyncMutex<()>>, LockError> {
        let mut registry = self.registry.lock().map_err(|e| LockError::Unavailable(e.to_string()))?;
        Ok(Arc::clone(registry.entry(payment_hash.clone()).or_default()))
    }
}

impl PaymentLock for MemoryPaymentLock {
    type Guard = MemoryPaymentGuard;

    async fn acquire(&self, payment_hash: &PaymentHash) -> Result<Self::Guard, LockError> {
        let mutex = self.entry_for(payment_hash)?;
        let guard = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, mutex.lock_owned()).await.map_err(|_| {
                warn!("🔒️ Timed out after {timeout:?} waiting for the lock on {payment_hash}");
                LockError::Timeout(payment_hash.clone())
            })?,
            None => mutex.lock_owned().await,
        };
        trace!("🔒️ Lock acquired for {payment_hash}");
        Ok(MemoryPaymentGuard {
            payment_hash: payment_hash.clone(),
            guard: Some(guard),
            registry: Arc::clone(&self.registry),
        })
    }
}

/// Exclusive access to a payment hash. The lock is released when this guard is dropped.
pub struct MemoryPaymentGuard {
    payment_hash: PaymentHash,
    guard: Option<OwnedMutexGuard<()>>,
    registry: Registry,
}

impl PaymentLockGuard for MemoryPaymentGuard {
    fn payment_hash(&self) -> &PaymentHash {
        &self.payment_hash
    }
}

impl Drop for MemoryPaymentGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let Ok(mut registry) = self.registry.lock() else {
            return;
        };
        // Waiters hold a clone of the entry, so a lone reference means nobody else wants it
        if registry.get(&self.payment_hash).is_some_and(|m| Arc::strong_count(m) == 1) {
            registry.remove(&self.payment_hash);
        }
        trace!("🔒️ Lock released for {}", self.payment_hash);
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn hash(c: char) -> PaymentHash {
        c.to_string().repeat(64).parse().unwrap()
    }

    async fn exclusive_work(lock: &MemoryPaymentLock, inside: &AtomicUsize, max_inside: &AtomicUsize) {
        let _guard = lock.acquire(&hash('a')).await.unwrap();
        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
        max_inside.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        inside.fetch_sub(1, Ordering::SeqCst);
    }

    #[tokio::test]
    async fn same_hash_is_mutually_exclusive() {
        let lock = MemoryPaymentLock::new();
        let inside = AtomicUsize::new(0);
        let max_inside = AtomicUsize::new(0);
        tokio::join!(
            exclusive_work(&lock, &inside, &max_inside),
            exclusive_work(&lock, &inside, &max_inside),
            exclusive_work(&lock, &inside, &max_inside)
        );
        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert_eq!(lock.active_keys(), 0);
    }

    #[tokio::test]
    async fn different_hashes_do_not_contend() {
        let lock = MemoryPaymentLock::with_timeout(Duration::from_millis(50));
        let a = lock.acquire(&hash('a')).await.unwrap();
        let b = lock.acquire(&hash('b')).await.unwrap();
        assert_eq!(a.payment_hash(), &hash('a'));
        assert_eq!(b.payment_hash(), &hash('b'));
        assert_eq!(lock.active_keys(), 2);
        drop(a);
        assert_eq!(lock.active_keys(), 1);
        drop(b);
        assert_eq!(lock.active_keys(), 0);
    }

    #[tokio::test]
    async fn acquisition_times_out() {
        let lock = MemoryPaymentLock::with_timeout(Duration::from_millis(20));
        let held = lock.acquire(&hash('c')).await.unwrap();
        let err = lock.acquire(&hash('c')).await.err().unwrap();
        assert!(matches!(err, LockError::Timeout(h) if h == hash('c')));
        drop(held);
        assert!(lock.acquire(&hash('c')).await.is_ok());
    }

    #[tokio::test]
    async fn released_on_error_paths() {
        let lock = MemoryPaymentLock::with_timeout(Duration::from_millis(20));
        async fn fails(lock: &MemoryPaymentLock) -> Result<(), LockError> {
            let _guard = lock.acquire(&hash('d')).await?;
            Err(LockError::Unavailable("boom".into()))
        }
        assert!(fails(&lock).await.is_err());
        assert!(lock.acquire(&hash('d')).await.is_ok());
    }
}
