use serde::{Deserialize, Serialize};

use crate::db_types::Sats;

const BPS_DENOMINATOR: i128 = 10_000;

/// The fee charged on incoming deposits, in basis points of the received amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositFeePolicy {
    /// Lightning deposits are free by default.
    pub ln_fee_bps: u32,
}

impl DepositFeePolicy {
    pub fn new(ln_fee_bps: u32) -> Self {
        Self { ln_fee_bps }
    }
}

/// Computes the deposit fee for a single received amount.
#[derive(Debug, Clone, Copy)]
pub struct DepositFeeCalculator {
    amount: Sats,
}

impl DepositFeeCalculator {
    pub fn new(amount: Sats) -> Self {
        Self { amount }
    }

    /// `floor(amount × bps / 10 000)`, clamped to `[0, amount]`.
    pub fn ln_deposit_fee(&self, policy: &DepositFeePolicy) -> Sats {
        let amount = self.amount.value();
        if amount <= 0 {
            return Sats::from(0);
        }
        let fee = i128::from(amount) * i128::from(policy.ln_fee_bps) / BPS_DENOMINATOR;
        let fee = i64::try_from(fee).unwrap_or(amount).min(amount);
        Sats::from(fee)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_policy_is_free() {
        let fee = DepositFeeCalculator::new(Sats::from(10_000)).ln_deposit_fee(&DepositFeePolicy::default());
        assert_eq!(fee, Sats::from(0));
    }

    #[test]
    fn fee_is_rounded_down() {
        let policy = DepositFeePolicy::new(25);
        assert_eq!(DepositFeeCalculator::new(Sats::from(10_000)).ln_deposit_fee(&policy), Sats::from(25));
        assert_eq!(DepositFeeCalculator::new(Sats::from(399)).ln_deposit_fee(&policy), Sats::from(0));
        assert_eq!(DepositFeeCalculator::new(Sats::from(401)).ln_deposit_fee(&policy), Sats::from(1));
    }

    #[test]
    fn fee_never_exceeds_the_amount() {
        let policy = DepositFeePolicy::new(50_000);
        assert_eq!(DepositFeeCalculator::new(Sats::from(1_000)).ln_deposit_fee(&policy), Sats::from(1_000));
        let policy = DepositFeePolicy::new(u32::MAX);
        assert_eq!(DepositFeeCalculator::new(Sats::from(i64::MAX)).ln_deposit_fee(&policy), Sats::from(i64::MAX));
    }

    #[test]
    fn fee_is_never_negative() {
        let policy = DepositFeePolicy::new(100);
        assert_eq!(DepositFeeCalculator::new(Sats::from(-500)).ln_deposit_fee(&policy), Sats::from(0));
    }
}
