use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Events: Emitted for off-chain indexers/clients to track ledger state changes
// ──────────────────────────────────────────────────────────────────────────────
//

/// Emitted once when the ledger singleton is created.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct LedgerInitialised {
    /// Ledger admin (may later be updated).
    pub admin: Pubkey,
    /// Mint of the staked asset.
    pub stake_mint: Pubkey,
    /// Vault holding staked principal.
    pub stake_vault: Pubkey,
    /// Token account receiving withdrawal fees.
    pub treasury: Pubkey,
    /// Lock window in seconds.
    pub epoch_duration: u64,
    /// Withdrawal fee numerator.
    pub withdrawal_fee_rate: u64,
}

/// Emitted whenever configuration is modified via `update_config`.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct ConfigUpdated {
    /// Admin after the update.
    pub admin: Pubkey,
    /// Treasury after the update.
    pub treasury: Pubkey,
    /// Lock window after the update.
    pub epoch_duration: u64,
    /// Fee rate after the update.
    pub withdrawal_fee_rate: u64,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct RewardPoolInitialised {
    pub reward_pool: Pubkey,
    pub reward_mint: Pubkey,
    pub reward_vault: Pubkey,
    /// `FEE_POOL_TAG` or `EMISSION_POOL_TAG`.
    pub kind: u8,
}

/// Emitted when the admin replaces the pool registry.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct RewardPoolsSet {
    /// New registry, in checkpoint order.
    pub reward_pools: Vec<Pubkey>,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct FeeSourceSet {
    pub reward_pool: Pubkey,
    pub fee_source: Pubkey,
}

/// Emitted after principal is credited.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Staked {
    pub owner: Pubkey,
    /// Amount staked in this call.
    pub amount: u64,
    /// Owner's principal afterwards.
    pub principal: u64,
    /// Ledger total afterwards.
    pub total_staked: u64,
    /// First instant a withdrawal is allowed.
    pub unlock_time: i64,
}

/// Emitted after principal is debited and paid out.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Withdrawn {
    pub owner: Pubkey,
    /// Principal removed (before fee).
    pub amount: u64,
    /// Portion sent to the owner.
    pub to_owner: u64,
    /// Portion sent to the treasury.
    pub fee: u64,
    /// Owner's principal afterwards.
    pub principal: u64,
    /// Ledger total afterwards.
    pub total_staked: u64,
}

/// Emitted when the fee source pushes revenue into a fee pool.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct FeeDeposited {
    pub reward_pool: Pubkey,
    pub amount: u64,
    /// Weight the deposit was spread over.
    pub total_staked: u64,
    /// Pool index after the deposit.
    pub reward_per_weight_stored: u128,
}

/// Emitted when the admin queues a new emission window.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct RewardsQueued {
    pub reward_pool: Pubkey,
    pub amount: u64,
    /// Per-second rate for the new window (includes carried-over budget).
    pub reward_rate: u64,
    pub period_finish: i64,
}

/// Emitted on every claim, including zero-amount claims.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct RewardPaid {
    pub owner: Pubkey,
    pub reward_pool: Pubkey,
    pub amount: u64,
}
