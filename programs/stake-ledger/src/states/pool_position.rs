use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// PoolPosition Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive an owner's position in a reward pool.
pub const POOL_POSITION_SEED: &str = "pool_position";

/// Per-owner bookkeeping inside one reward pool.
///
/// Derived from `POOL_POSITION_SEED + pool + owner`. The owner's weight is
/// not stored here; it is read from their `StakeAccount` at each checkpoint.
#[account]
#[derive(Default, Debug)]
pub struct PoolPosition {
    /// PDA bump for this account.
    pub bump: u8,

    /// Reward pool this position belongs to.
    pub pool: Pubkey,

    /// Owner of the position.
    pub owner: Pubkey,

    /// Pool index (`reward_per_weight_stored`) at the last checkpoint.
    pub reward_per_weight_paid: u128,

    /// Reward settled at checkpoints and not yet claimed.
    pub accrued_unclaimed: u64,

    /// Lifetime reward paid to the owner from this pool.
    pub total_claimed: u64,
}

impl PoolPosition {
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32 * 2: pool, owner
    /// - 16: one `u128` field
    /// - 8 * 2: two `u64` fields
    pub const LEN: usize = 8 + 1 + 32 * 2 + 16 + 8 * 2;
}
