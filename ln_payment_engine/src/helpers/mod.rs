mod deposit_fee;
mod payment_lock;

pub use deposit_fee::{DepositFeeCalculator, DepositFeePolicy};
pub use payment_lock::{MemoryPaymentGuard, MemoryPaymentLock};
