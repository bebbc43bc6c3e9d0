use crate::error::ErrorCode;
use crate::math::{Fees, WithdrawalSplit, FEE_RATE_DENOMINATOR_VALUE};
use crate::states::{PoolPosition, RewardPool, StakeAccount};
use crate::MAX_REWARD_POOLS;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// StakeLedger Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive the ledger singleton.
pub const STAKE_LEDGER_SEED: &str = "stake_ledger";

/// Protocol-wide staking state: configuration, the staked total and the
/// ordered registry of reward pools notified on every balance change.
///
/// Created once by `initialise_ledger`. Every `stake`/`withdraw` reads the
/// registry and checkpoints each listed pool before touching principal.
#[account]
#[derive(Default, Debug)]
pub struct StakeLedger {
    /// PDA bump for this account.
    pub bump: u8,

    /// Administrator allowed to reconfigure the ledger and its pools.
    pub admin: Pubkey,

    /// Mint of the staked asset.
    pub stake_mint: Pubkey,

    /// Program-owned token account holding all staked principal.
    pub stake_vault: Pubkey,

    /// Token account (staked mint) credited with withdrawal fees.
    pub treasury: Pubkey,

    /// Lock window in seconds, restarted by every stake.
    pub epoch_duration: u64,

    /// Withdrawal fee numerator over `FEE_RATE_DENOMINATOR_VALUE`.
    pub withdrawal_fee_rate: u64,

    /// Sum of every account's principal.
    pub total_staked: u64,

    /// Cumulative fees routed to `treasury`.
    pub total_fees_collected: u64,

    /// Reward pools checkpointed on every balance change, in call order.
    pub reward_pools: Vec<Pubkey>,
}

impl StakeLedger {
    /// Fixed serialized size of the account (for allocation at initialization).
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32 * 4: four Pubkeys
    /// - 8 * 4: four u64 fields
    /// - 4 + 32 * MAX_REWARD_POOLS: pool registry
    pub const LEN: usize = 8 + 1 + 32 * 4 + 8 * 4 + 4 + 32 * MAX_REWARD_POOLS;

    pub fn validate_fee_rate(fee_rate: u64) -> Result<()> {
        require!(
            fee_rate <= FEE_RATE_DENOMINATOR_VALUE,
            ErrorCode::InvalidFeeRate
        );
        Ok(())
    }

    /// First instant at which `account` may withdraw.
    pub fn unlock_time(&self, account: &StakeAccount) -> Result<i64> {
        let epoch = i64::try_from(self.epoch_duration).map_err(|_| ErrorCode::InvalidTimestamp)?;
        account
            .last_stake_time
            .checked_add(epoch)
            .ok_or(error!(ErrorCode::ArithmeticOverflow))
    }

    pub fn is_locked(&self, account: &StakeAccount, now: i64) -> Result<bool> {
        Ok(now < self.unlock_time(account)?)
    }

    pub fn is_registered(&self, reward_pool: &Pubkey) -> bool {
        self.reward_pools.contains(reward_pool)
    }

    pub fn require_registered(&self, reward_pool: &Pubkey) -> Result<()> {
        require!(
            self.is_registered(reward_pool),
            ErrorCode::UnregisteredRewardPool
        );
        Ok(())
    }

    /// Pays out `position` in `pool`.
    ///
    /// A pool outside the registry is not checkpointed on balance changes,
    /// so its index says nothing about the owner's current weight; only the
    /// already-settled `accrued_unclaimed` is paid.
    pub fn settle_claim(
        &self,
        pool_key: &Pubkey,
        pool: &mut RewardPool,
        position: &mut PoolPosition,
        weight: u64,
        now: i64,
    ) -> Result<u64> {
        if self.is_registered(pool_key) {
            pool.take_reward(position, weight, self.total_staked, now)
        } else {
            pool.take_settled(position)
        }
    }

    /// Settles `weight`'s accrued rewards in every pool of the registry.
    ///
    /// Must run with the pre-mutation weight and total; callers apply the
    /// principal change only after this returns.
    pub fn checkpoint_pools<'a, I>(&self, positions: I, weight: u64, now: i64) -> Result<()>
    where
        I: IntoIterator<Item = (&'a mut RewardPool, &'a mut PoolPosition)>,
    {
        for (pool, position) in positions {
            pool.checkpoint(position, weight, self.total_staked, now)?;
        }
        Ok(())
    }

    /// Credits `amount` to `account` and restarts its lock for the whole
    /// principal.
    pub fn record_stake(&mut self, account: &mut StakeAccount, amount: u64, now: i64) -> Result<()> {
        require!(amount > 0, ErrorCode::InvalidAmount);
        let principal = account
            .principal
            .checked_add(amount)
            .ok_or(ErrorCode::ArithmeticOverflow)?;
        let total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(ErrorCode::ArithmeticOverflow)?;

        account.principal = principal;
        account.last_stake_time = now;
        self.total_staked = total_staked;
        Ok(())
    }

    /// Validates a withdrawal without mutating anything.
    pub fn check_withdrawal(
        &self,
        account: &StakeAccount,
        amount: u64,
        now: i64,
    ) -> Result<WithdrawalSplit> {
        require!(amount > 0, ErrorCode::InvalidAmount);
        require!(!self.is_locked(account, now)?, ErrorCode::WithdrawalLocked);
        require!(amount <= account.principal, ErrorCode::InsufficientPrincipal);
        Fees::split_withdrawal(amount, self.withdrawal_fee_rate)
            .ok_or(error!(ErrorCode::ArithmeticOverflow))
    }

    /// Debits `amount` from `account`; the lock is left untouched.
    pub fn record_withdrawal(
        &mut self,
        account: &mut StakeAccount,
        amount: u64,
        now: i64,
    ) -> Result<WithdrawalSplit> {
        let split = self.check_withdrawal(account, amount, now)?;
        let total_staked = self
            .total_staked
            .checked_sub(amount)
            .ok_or(ErrorCode::ArithmeticOverflow)?;
        let total_fees_collected = self
            .total_fees_collected
            .checked_add(split.fee)
            .ok_or(ErrorCode::ArithmeticOverflow)?;

        account.principal -= amount;
        self.total_staked = total_staked;
        self.total_fees_collected = total_fees_collected;
        Ok(split)
    }

    /// Replaces the registry. Only allowed while nothing is staked, so no
    /// existing weight can predate a newly registered pool.
    pub fn replace_reward_pools(&mut self, reward_pools: Vec<Pubkey>) -> Result<()> {
        require!(self.total_staked == 0, ErrorCode::PoolsLocked);
        require!(
            reward_pools.len() <= MAX_REWARD_POOLS,
            ErrorCode::TooManyRewardPools
        );
        for (i, pool) in reward_pools.iter().enumerate() {
            require!(
                !reward_pools[..i].contains(pool),
                ErrorCode::DuplicateRewardPool
            );
        }
        self.reward_pools = reward_pools;
        Ok(())
    }
}
