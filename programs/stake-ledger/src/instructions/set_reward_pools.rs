use crate::error::ErrorCode;
use crate::states::{RewardPoolsSet, StakeLedger, STAKE_LEDGER_SEED};
use crate::utils::verify_reward_pool_accounts;
use anchor_lang::prelude::*;

/// Accounts context for `set_reward_pools`.
///
/// Every pool in the new list must also be passed, in the same order, as a
/// remaining account so its type can be checked.
#[derive(Accounts)]
pub struct SetRewardPools<'info> {
    #[account(
        constraint = owner.key() == stake_ledger.admin @ ErrorCode::Unauthorized
    )]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKE_LEDGER_SEED.as_bytes()],
        bump = stake_ledger.bump,
    )]
    pub stake_ledger: Account<'info, StakeLedger>,
}

/// Replaces the ordered registry of pools checkpointed on every stake and
/// withdrawal.
///
/// # Errors
/// - `PoolsLocked`: something is currently staked.
/// - `TooManyRewardPools` / `DuplicateRewardPool`: invalid list.
/// - `RewardPoolMismatch`: remaining accounts differ from the list, or one of
///   them is not a reward pool.
pub fn set_reward_pools<'info>(
    ctx: Context<'_, '_, 'info, 'info, SetRewardPools<'info>>,
    reward_pools: Vec<Pubkey>,
) -> Result<()> {
    verify_reward_pool_accounts(ctx.remaining_accounts, &reward_pools)?;
    ctx.accounts
        .stake_ledger
        .replace_reward_pools(reward_pools.clone())?;
    msg!("Registered {} reward pools", reward_pools.len());

    emit!(RewardPoolsSet { reward_pools });
    Ok(())
}
