use crate::error::ErrorCode;
use crate::math::FixedPointAccumulator;
use crate::states::PoolPosition;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// RewardPool Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive reward pools (`seed + reward_mint + kind tag`).
pub const REWARD_POOL_SEED: &str = "reward_pool";

pub const FEE_POOL_TAG: u8 = 0;
pub const EMISSION_POOL_TAG: u8 = 1;

/// How a pool's cumulative index moves forward.
///
/// This is the only behaviour that differs between pool variants; the
/// checkpoint and claim logic in [`RewardPool`] is shared.
pub trait IndexSource {
    /// Index as of `now`, computed from `stored` without persisting it.
    fn current_index(&self, stored: u128, total_weight: u64, now: i64) -> Result<u128>;

    /// Records that the stored index has been brought up to `now`.
    fn sync(&mut self, now: i64);
}

/// Push model: the index only moves when the fee source deposits.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeState {
    /// Sole signer allowed to call `deposit_fee`.
    pub fee_source: Pubkey,
    /// `10^decimals` of the reward mint, for clients normalizing amounts.
    pub decimals_scale: u64,
}

impl IndexSource for FeeState {
    fn current_index(&self, stored: u128, _total_weight: u64, _now: i64) -> Result<u128> {
        Ok(stored)
    }

    fn sync(&mut self, _now: i64) {}
}

/// Lazy pull model: a queued budget streams at `reward_rate` until
/// `period_finish`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmissionState {
    /// Reward units emitted per second across all weight.
    pub reward_rate: u64,
    /// Unix time at which emission stops.
    pub period_finish: i64,
    /// Time up to which the stored index accounts for emission.
    pub last_update_time: i64,
    /// Window length applied on every `queue_new_rewards`.
    pub rewards_duration: u64,
}

impl EmissionState {
    pub fn last_time_reward_applicable(&self, now: i64) -> i64 {
        now.min(self.period_finish)
    }

    /// Budget still to be streamed after `now`.
    pub fn unspent(&self, now: i64) -> Result<u128> {
        if now >= self.period_finish {
            return Ok(0);
        }
        let remaining = (self.period_finish - now) as u128;
        remaining
            .checked_mul(self.reward_rate as u128)
            .ok_or(error!(ErrorCode::ArithmeticOverflow))
    }

    /// Restarts the window with `amount` plus whatever was still unspent.
    ///
    /// The caller must have synced the index to `now` with the old rate.
    pub fn queue(&mut self, amount: u64, now: i64) -> Result<()> {
        require!(self.rewards_duration > 0, ErrorCode::InvalidDuration);
        let budget = (amount as u128)
            .checked_add(self.unspent(now)?)
            .ok_or(ErrorCode::ArithmeticOverflow)?;
        let reward_rate = budget / self.rewards_duration as u128;
        require!(reward_rate > 0, ErrorCode::InvalidAmount);

        let duration =
            i64::try_from(self.rewards_duration).map_err(|_| ErrorCode::InvalidTimestamp)?;
        self.period_finish = now
            .checked_add(duration)
            .ok_or(ErrorCode::ArithmeticOverflow)?;
        self.reward_rate = u64::try_from(reward_rate).map_err(|_| ErrorCode::ArithmeticOverflow)?;
        self.last_update_time = now;
        Ok(())
    }
}

impl IndexSource for EmissionState {
    fn current_index(&self, stored: u128, total_weight: u64, now: i64) -> Result<u128> {
        let applicable = self.last_time_reward_applicable(now);
        if total_weight == 0 || applicable <= self.last_update_time {
            return Ok(stored);
        }
        let emitted = ((applicable - self.last_update_time) as u128)
            .checked_mul(self.reward_rate as u128)
            .ok_or(ErrorCode::ArithmeticOverflow)?;
        let delta = FixedPointAccumulator::index_delta(emitted, total_weight)?;
        FixedPointAccumulator::advance(stored, delta)
    }

    fn sync(&mut self, now: i64) {
        let applicable = self.last_time_reward_applicable(now);
        if applicable > self.last_update_time {
            self.last_update_time = applicable;
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolKind {
    Fee(FeeState),
    Emission(EmissionState),
}

impl Default for PoolKind {
    fn default() -> Self {
        PoolKind::Fee(FeeState::default())
    }
}

impl PoolKind {
    pub fn tag(&self) -> u8 {
        match self {
            PoolKind::Fee(_) => FEE_POOL_TAG,
            PoolKind::Emission(_) => EMISSION_POOL_TAG,
        }
    }
}

impl IndexSource for PoolKind {
    fn current_index(&self, stored: u128, total_weight: u64, now: i64) -> Result<u128> {
        match self {
            PoolKind::Fee(state) => state.current_index(stored, total_weight, now),
            PoolKind::Emission(state) => state.current_index(stored, total_weight, now),
        }
    }

    fn sync(&mut self, now: i64) {
        match self {
            PoolKind::Fee(state) => state.sync(now),
            PoolKind::Emission(state) => state.sync(now),
        }
    }
}

/// An independently funded reward stream.
///
/// Stores the global cumulative index (`reward_per_weight_stored`, scaled by
/// `REWARD_PRECISION`); each owner's share is settled against it in their
/// `PoolPosition`, so no operation ever visits other owners.
#[account]
#[derive(Default, Debug)]
pub struct RewardPool {
    /// PDA bump for this account.
    pub bump: u8,

    /// Mint of the reward asset.
    pub reward_mint: Pubkey,

    /// Program-owned token account paying out rewards.
    pub reward_vault: Pubkey,

    /// Monotonically nondecreasing reward-per-weight index.
    pub reward_per_weight_stored: u128,

    /// Cumulative reward deposited or queued into the pool.
    pub total_funded: u64,

    /// Cumulative reward paid out to owners.
    pub total_claimed: u64,

    /// Variant-specific state.
    pub kind: PoolKind,
}

impl RewardPool {
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32 * 2: two Pubkeys
    /// - 16: one `u128` field
    /// - 8 * 2: two `u64` fields
    /// - 1 + 40: enum tag + largest variant (`FeeState`)
    pub const LEN: usize = 8 + 1 + 32 * 2 + 16 + 8 * 2 + 1 + 40;

    pub fn new_fee(bump: u8, reward_mint: Pubkey, reward_vault: Pubkey, fee_source: Pubkey, decimals: u8) -> Result<Self> {
        let decimals_scale = 10u64
            .checked_pow(decimals as u32)
            .ok_or(ErrorCode::ArithmeticOverflow)?;
        Ok(Self {
            bump,
            reward_mint,
            reward_vault,
            kind: PoolKind::Fee(FeeState {
                fee_source,
                decimals_scale,
            }),
            ..Default::default()
        })
    }

    pub fn new_emission(bump: u8, reward_mint: Pubkey, reward_vault: Pubkey, rewards_duration: u64) -> Result<Self> {
        require!(rewards_duration > 0, ErrorCode::InvalidDuration);
        i64::try_from(rewards_duration).map_err(|_| ErrorCode::InvalidDuration)?;
        Ok(Self {
            bump,
            reward_mint,
            reward_vault,
            kind: PoolKind::Emission(EmissionState {
                rewards_duration,
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    /// Brings `reward_per_weight_stored` up to `now`.
    pub fn advance_index(&mut self, total_weight: u64, now: i64) -> Result<()> {
        self.reward_per_weight_stored =
            self.kind
                .current_index(self.reward_per_weight_stored, total_weight, now)?;
        self.kind.sync(now);
        Ok(())
    }

    /// Settles `weight`'s reward since the position's last checkpoint.
    ///
    /// Idempotent: a repeat call with no index or weight change adds zero.
    pub fn checkpoint(
        &mut self,
        position: &mut PoolPosition,
        weight: u64,
        total_weight: u64,
        now: i64,
    ) -> Result<()> {
        self.advance_index(total_weight, now)?;
        let owed = FixedPointAccumulator::accrued(
            weight,
            self.reward_per_weight_stored,
            position.reward_per_weight_paid,
        )?;
        position.accrued_unclaimed = position
            .accrued_unclaimed
            .checked_add(owed)
            .ok_or(ErrorCode::ArithmeticOverflow)?;
        position.reward_per_weight_paid = self.reward_per_weight_stored;
        Ok(())
    }

    /// What `checkpoint` would leave in `accrued_unclaimed`, without writing.
    pub fn claimable(
        &self,
        position: &PoolPosition,
        weight: u64,
        total_weight: u64,
        now: i64,
    ) -> Result<u64> {
        let index = self
            .kind
            .current_index(self.reward_per_weight_stored, total_weight, now)?;
        let owed = FixedPointAccumulator::accrued(weight, index, position.reward_per_weight_paid)?;
        position
            .accrued_unclaimed
            .checked_add(owed)
            .ok_or(error!(ErrorCode::ArithmeticOverflow))
    }

    /// Checkpoints the position and empties it. Returns the amount to pay,
    /// which may be zero.
    pub fn take_reward(
        &mut self,
        position: &mut PoolPosition,
        weight: u64,
        total_weight: u64,
        now: i64,
    ) -> Result<u64> {
        self.checkpoint(position, weight, total_weight, now)?;
        self.take_settled(position)
    }

    /// Empties the position's settled accrual without checkpointing.
    pub fn take_settled(&mut self, position: &mut PoolPosition) -> Result<u64> {
        let reward = position.accrued_unclaimed;
        self.total_claimed = self
            .total_claimed
            .checked_add(reward)
            .ok_or(ErrorCode::ArithmeticOverflow)?;
        position.total_claimed = position
            .total_claimed
            .checked_add(reward)
            .ok_or(ErrorCode::ArithmeticOverflow)?;
        position.accrued_unclaimed = 0;
        Ok(reward)
    }

    /// Distributes a fee deposit pro rata to the weights at this instant.
    pub fn deposit_fee(&mut self, source: &Pubkey, amount: u64, total_weight: u64) -> Result<()> {
        let PoolKind::Fee(fee) = &self.kind else {
            return err!(ErrorCode::InvalidPoolKind);
        };
        require_keys_eq!(*source, fee.fee_source, ErrorCode::Unauthorized);
        require!(amount > 0, ErrorCode::InvalidAmount);
        require!(total_weight > 0, ErrorCode::NoStakers);

        let delta = FixedPointAccumulator::index_delta(amount as u128, total_weight)?;
        let total_funded = self
            .total_funded
            .checked_add(amount)
            .ok_or(ErrorCode::ArithmeticOverflow)?;
        self.reward_per_weight_stored =
            FixedPointAccumulator::advance(self.reward_per_weight_stored, delta)?;
        self.total_funded = total_funded;
        Ok(())
    }

    /// Queues `amount` for streaming over the next `rewards_duration`,
    /// blending in any unspent budget from the running window.
    pub fn queue_new_rewards(&mut self, amount: u64, total_weight: u64, now: i64) -> Result<()> {
        require!(
            matches!(self.kind, PoolKind::Emission(_)),
            ErrorCode::InvalidPoolKind
        );
        require!(amount > 0, ErrorCode::InvalidAmount);
        let total_funded = self
            .total_funded
            .checked_add(amount)
            .ok_or(ErrorCode::ArithmeticOverflow)?;

        self.advance_index(total_weight, now)?;
        if let PoolKind::Emission(emission) = &mut self.kind {
            emission.queue(amount, now)?;
        }
        self.total_funded = total_funded;
        Ok(())
    }

    pub fn set_fee_source(&mut self, fee_source: Pubkey) -> Result<()> {
        match &mut self.kind {
            PoolKind::Fee(fee) => {
                fee.fee_source = fee_source;
                Ok(())
            }
            PoolKind::Emission(_) => err!(ErrorCode::InvalidPoolKind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::REWARD_PRECISION;

    const DAY: i64 = 86_400;
    const UNIT: u64 = 1_000_000_000;

    fn fee_pool(source: Pubkey) -> RewardPool {
        RewardPool::new_fee(255, Pubkey::new_unique(), Pubkey::new_unique(), source, 6).unwrap()
    }

    fn emission_pool(duration: u64) -> RewardPool {
        RewardPool::new_emission(255, Pubkey::new_unique(), Pubkey::new_unique(), duration).unwrap()
    }

    fn emission(pool: &RewardPool) -> EmissionState {
        match pool.kind {
            PoolKind::Emission(state) => state,
            PoolKind::Fee(_) => panic!("not an emission pool"),
        }
    }

    #[test]
    fn fee_pool_records_decimals_scale() {
        let pool = fee_pool(Pubkey::new_unique());
        match pool.kind {
            PoolKind::Fee(fee) => assert_eq!(fee.decimals_scale, 1_000_000),
            PoolKind::Emission(_) => unreachable!(),
        }
    }

    #[test]
    fn deposit_from_unknown_source_is_unauthorized() {
        let mut pool = fee_pool(Pubkey::new_unique());
        let err = pool.deposit_fee(&Pubkey::new_unique(), 10, 10).unwrap_err();
        assert_eq!(err, ErrorCode::Unauthorized.into());
        assert_eq!(pool.reward_per_weight_stored, 0);
    }

    #[test]
    fn deposit_without_stakers_fails() {
        let source = Pubkey::new_unique();
        let mut pool = fee_pool(source);
        assert_eq!(
            pool.deposit_fee(&source, 10, 0).unwrap_err(),
            ErrorCode::NoStakers.into()
        );
        assert_eq!(
            pool.deposit_fee(&source, 0, 10).unwrap_err(),
            ErrorCode::InvalidAmount.into()
        );
    }

    #[test]
    fn deposit_advances_index_by_ratio() {
        let source = Pubkey::new_unique();
        let mut pool = fee_pool(source);
        pool.deposit_fee(&source, 1_000, 4_000).unwrap();
        assert_eq!(pool.reward_per_weight_stored, REWARD_PRECISION / 4);
        assert_eq!(pool.total_funded, 1_000);
    }

    #[test]
    fn fee_index_ignores_time() {
        let source = Pubkey::new_unique();
        let mut pool = fee_pool(source);
        pool.deposit_fee(&source, 500, 1_000).unwrap();
        let before = pool.reward_per_weight_stored;
        pool.advance_index(1_000, 365 * DAY).unwrap();
        assert_eq!(pool.reward_per_weight_stored, before);
    }

    #[test]
    fn checkpoint_is_idempotent() {
        let source = Pubkey::new_unique();
        let mut pool = fee_pool(source);
        let mut position = PoolPosition::default();
        pool.deposit_fee(&source, 777, 1_000).unwrap();

        pool.checkpoint(&mut position, 300, 1_000, 10).unwrap();
        let first = position.accrued_unclaimed;
        pool.checkpoint(&mut position, 300, 1_000, 10).unwrap();
        assert_eq!(position.accrued_unclaimed, first);
        assert_eq!(first, 233);
    }

    #[test]
    fn emission_checkpoint_is_idempotent_at_same_instant() {
        let mut pool = emission_pool(30 * DAY as u64);
        pool.queue_new_rewards(1_000 * UNIT, 0, 0).unwrap();
        let mut position = PoolPosition::default();

        pool.checkpoint(&mut position, 10 * UNIT, 10 * UNIT, 0).unwrap();
        pool.checkpoint(&mut position, 10 * UNIT, 10 * UNIT, 5 * DAY).unwrap();
        let first = position.accrued_unclaimed;
        pool.checkpoint(&mut position, 10 * UNIT, 10 * UNIT, 5 * DAY).unwrap();
        assert_eq!(position.accrued_unclaimed, first);
        assert!(first > 0);
    }

    #[test]
    fn claimable_matches_checkpoint_without_writing() {
        let mut pool = emission_pool(30 * DAY as u64);
        pool.queue_new_rewards(1_000 * UNIT, 0, 0).unwrap();
        let mut position = PoolPosition::default();

        let preview = pool.claimable(&position, UNIT, UNIT, 15 * DAY).unwrap();
        assert_eq!(pool.reward_per_weight_stored, 0);
        assert_eq!(emission(&pool).last_update_time, 0);

        pool.checkpoint(&mut position, UNIT, UNIT, 15 * DAY).unwrap();
        assert_eq!(position.accrued_unclaimed, preview);
    }

    #[test]
    fn half_window_earns_half_budget() {
        let duration = 30 * DAY as u64;
        let mut pool = emission_pool(duration);
        pool.queue_new_rewards(1_000 * UNIT, 0, 0).unwrap();
        let rate = emission(&pool).reward_rate;
        assert_eq!(rate, 1_000 * UNIT / duration);

        let position = PoolPosition::default();
        let earned = pool.claimable(&position, 1_000 * UNIT, 1_000 * UNIT, 15 * DAY).unwrap();
        assert_eq!(earned, rate * 15 * DAY as u64);
        // Within rounding of the rate floor.
        assert!(500 * UNIT - earned < duration);
    }

    #[test]
    fn top_up_blends_unspent_budget() {
        let duration = 30 * DAY as u64;
        let mut pool = emission_pool(duration);
        pool.queue_new_rewards(1_000 * UNIT, UNIT, 0).unwrap();
        let first_rate = emission(&pool).reward_rate;

        pool.queue_new_rewards(1_000 * UNIT, UNIT, 15 * DAY).unwrap();
        let state = emission(&pool);
        let leftover = first_rate as u128 * (15 * DAY) as u128;
        assert_eq!(
            state.reward_rate as u128,
            (1_000 * UNIT as u128 + leftover) / duration as u128
        );
        assert_eq!(state.period_finish, 45 * DAY);
        assert_eq!(state.last_update_time, 15 * DAY);
        // The first half of the first window is already in the index.
        let position = PoolPosition::default();
        assert_eq!(
            pool.claimable(&position, UNIT, UNIT, 15 * DAY).unwrap(),
            first_rate * 15 * DAY as u64
        );
    }

    #[test]
    fn queue_after_exhaustion_starts_fresh() {
        let duration = 10 * DAY as u64;
        let mut pool = emission_pool(duration);
        pool.queue_new_rewards(100 * UNIT, UNIT, 0).unwrap();
        pool.queue_new_rewards(50 * UNIT, UNIT, 20 * DAY).unwrap();
        assert_eq!(emission(&pool).reward_rate, 50 * UNIT / duration);
        // Emission stopped at day 10, not day 20.
        let position = PoolPosition::default();
        assert_eq!(
            pool.claimable(&position, UNIT, UNIT, 20 * DAY).unwrap(),
            (100 * UNIT / duration) * duration
        );
    }

    #[test]
    fn emission_without_weight_is_not_attributed() {
        let mut pool = emission_pool(10 * DAY as u64);
        pool.queue_new_rewards(100 * UNIT, 0, 0).unwrap();
        pool.advance_index(0, 5 * DAY).unwrap();
        assert_eq!(pool.reward_per_weight_stored, 0);
        assert_eq!(emission(&pool).last_update_time, 5 * DAY);
    }

    #[test]
    fn dust_queue_is_rejected() {
        let mut pool = emission_pool(30 * DAY as u64);
        assert_eq!(
            pool.queue_new_rewards(1_000, 0, 0).unwrap_err(),
            ErrorCode::InvalidAmount.into()
        );
        assert_eq!(pool.total_funded, 0);
    }

    #[test]
    fn wrong_kind_operations_are_rejected() {
        let mut emission = emission_pool(DAY as u64);
        assert_eq!(
            emission.deposit_fee(&Pubkey::default(), 1, 1).unwrap_err(),
            ErrorCode::InvalidPoolKind.into()
        );
        assert_eq!(
            emission.set_fee_source(Pubkey::new_unique()).unwrap_err(),
            ErrorCode::InvalidPoolKind.into()
        );
        let mut fee = fee_pool(Pubkey::new_unique());
        assert_eq!(
            fee.queue_new_rewards(1, 1, 0).unwrap_err(),
            ErrorCode::InvalidPoolKind.into()
        );
    }

    #[test]
    fn take_reward_empties_position() {
        let source = Pubkey::new_unique();
        let mut pool = fee_pool(source);
        let mut position = PoolPosition::default();
        pool.deposit_fee(&source, 1_000, 1_000).unwrap();

        assert_eq!(pool.take_reward(&mut position, 1_000, 1_000, 0).unwrap(), 1_000);
        assert_eq!(position.accrued_unclaimed, 0);
        assert_eq!(position.total_claimed, 1_000);
        assert_eq!(pool.total_claimed, 1_000);
        assert_eq!(pool.take_reward(&mut position, 1_000, 1_000, 0).unwrap(), 0);
    }

    #[test]
    fn pool_len_covers_largest_variant() {
        let pool = RewardPool::new_fee(1, Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique(), 9).unwrap();
        let mut data = Vec::new();
        pool.try_serialize(&mut data).unwrap();
        assert_eq!(data.len(), RewardPool::LEN);
    }
}
