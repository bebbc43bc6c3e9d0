//! Scaled-integer arithmetic for reward-per-weight indices.
//!
//! Every reward pool keeps a cumulative index expressed in units of
//! `reward * REWARD_PRECISION / weight`. Values stay scaled through all
//! pool arithmetic and are descaled exactly once, when an account's owed
//! amount is computed.

use crate::error::ErrorCode;
use anchor_lang::prelude::*;

// Kept out of the prelude's scope: the macro expands `Result<T, E>`.
mod wide {
    use uint::construct_uint;

    construct_uint! {
        pub struct U256(4);
    }
}

pub use wide::U256;

/// Fixed-point scale of every reward index (1e18).
pub const REWARD_PRECISION: u128 = 1_000_000_000_000_000_000;

/// Stateless helper around [`REWARD_PRECISION`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FixedPointAccumulator;

impl FixedPointAccumulator {
    pub fn scale(value: u128) -> Result<u128> {
        value
            .checked_mul(REWARD_PRECISION)
            .ok_or(error!(ErrorCode::ArithmeticOverflow))
    }

    pub fn unscale(value: u128) -> u128 {
        value / REWARD_PRECISION
    }

    /// Index increase produced by distributing `amount` over `total_weight`.
    ///
    /// Rounds down; the remainder stays undistributed in the pool vault.
    pub fn index_delta(amount: u128, total_weight: u64) -> Result<u128> {
        Self::scale(amount)?
            .checked_div(total_weight as u128)
            .ok_or(error!(ErrorCode::ArithmeticOverflow))
    }

    pub fn advance(index: u128, delta: u128) -> Result<u128> {
        index
            .checked_add(delta)
            .ok_or(error!(ErrorCode::ArithmeticOverflow))
    }

    /// Reward owed to `weight` for the index movement `paid -> index`.
    ///
    /// The product is formed in 256 bits so only the final, descaled value
    /// has to fit in a `u64`.
    pub fn accrued(weight: u64, index: u128, paid: u128) -> Result<u64> {
        let delta = index
            .checked_sub(paid)
            .ok_or(error!(ErrorCode::ArithmeticOverflow))?;
        let owed = U256::from(weight)
            .checked_mul(U256::from(delta))
            .ok_or(error!(ErrorCode::ArithmeticOverflow))?
            / U256::from(REWARD_PRECISION);
        if owed > U256::from(u64::MAX) {
            return err!(ErrorCode::ArithmeticOverflow);
        }
        Ok(owed.low_u64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use quickcheck::quickcheck;

    quickcheck! {
        fn scale_then_unscale_is_identity(x: u64) -> bool {
            let x = x as u128;
            FixedPointAccumulator::unscale(FixedPointAccumulator::scale(x).unwrap()) == x
        }
    }

    #[test]
    fn scale_rejects_overflow() {
        let too_big = u128::MAX / REWARD_PRECISION + 1;
        assert!(FixedPointAccumulator::scale(too_big).is_err());
    }

    #[test]
    fn sole_staker_recovers_whole_deposit() {
        let weight = 1_000_000_000_000u64;
        let delta = FixedPointAccumulator::index_delta(1_000_000_000_000, weight).unwrap();
        assert_eq!(FixedPointAccumulator::accrued(weight, delta, 0).unwrap(), 1_000_000_000_000);
    }

    #[test]
    fn accrued_rejects_index_regression() {
        assert!(FixedPointAccumulator::accrued(10, 5, 6).is_err());
    }

    #[test]
    fn accrued_rejects_result_wider_than_u64() {
        let index = REWARD_PRECISION * (u64::MAX as u128);
        assert!(FixedPointAccumulator::accrued(2, index, 0).is_err());
        assert_eq!(
            FixedPointAccumulator::accrued(1, index, 0).unwrap(),
            u64::MAX
        );
    }

    #[test]
    fn product_beyond_u128_is_an_error_not_a_panic() {
        let wide = U256::from(u64::MAX) * U256::from(u128::MAX);
        assert!(wide > U256::from(u128::MAX));
        assert!(FixedPointAccumulator::accrued(u64::MAX, u128::MAX, 0).is_err());
    }

    proptest! {
        #[test]
        fn shares_never_exceed_deposit(
            amount in 1u64..u64::MAX / 2,
            weights in prop::collection::vec(1u64..1_000_000_000_000_000, 1..8),
        ) {
            let total: u64 = weights.iter().sum();
            let delta = FixedPointAccumulator::index_delta(amount as u128, total).unwrap();
            let paid: u128 = weights
                .iter()
                .map(|w| FixedPointAccumulator::accrued(*w, delta, 0).unwrap() as u128)
                .sum();
            prop_assert!(paid <= amount as u128);
            // Each share loses less than one unit to rounding plus the index floor.
            prop_assert!(amount as u128 - paid <= weights.len() as u128 + 1);
        }
    }
}
