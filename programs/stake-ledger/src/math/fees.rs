//! Withdrawal fee arithmetic.

/// Denominator of `StakeLedger::withdrawal_fee_rate` (a rate of 5_000 is 0.5%).
pub const FEE_RATE_DENOMINATOR_VALUE: u64 = 1_000_000;

/// Amounts paid out by a withdrawal.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WithdrawalSplit {
    /// Sent back to the withdrawing owner.
    pub to_owner: u64,
    /// Routed to the treasury.
    pub fee: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fees;

impl Fees {
    /// Fee charged on `amount`, rounded down.
    pub fn withdrawal_fee(amount: u64, fee_rate: u64) -> Option<u64> {
        u64::try_from(
            u128::from(amount)
                .checked_mul(u128::from(fee_rate))?
                .checked_div(u128::from(FEE_RATE_DENOMINATOR_VALUE))?,
        )
        .ok()
    }

    pub fn split_withdrawal(amount: u64, fee_rate: u64) -> Option<WithdrawalSplit> {
        let fee = Self::withdrawal_fee(amount, fee_rate)?;
        Some(WithdrawalSplit {
            to_owner: amount.checked_sub(fee)?,
            fee,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn half_percent_of_two_thousand() {
        let split = Fees::split_withdrawal(2_000_000_000_000, 5_000).unwrap();
        assert_eq!(split.to_owner, 1_990_000_000_000);
        assert_eq!(split.fee, 10_000_000_000);
    }

    #[test]
    fn zero_rate_pays_everything_out() {
        let split = Fees::split_withdrawal(12_345, 0).unwrap();
        assert_eq!(split, WithdrawalSplit { to_owner: 12_345, fee: 0 });
    }

    #[test]
    fn fee_rounds_down() {
        // 199 * 0.5% = 0.995
        assert_eq!(Fees::withdrawal_fee(199, 5_000), Some(0));
    }

    proptest! {
        #[test]
        fn split_conserves_amount(amount in any::<u64>(), rate in 0..=FEE_RATE_DENOMINATOR_VALUE) {
            let split = Fees::split_withdrawal(amount, rate).unwrap();
            prop_assert_eq!(split.to_owner as u128 + split.fee as u128, amount as u128);
        }
    }
}
